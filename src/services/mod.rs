pub mod bundle;
pub mod enrichment;
pub mod genre;
pub mod providers;
pub mod similarity;
