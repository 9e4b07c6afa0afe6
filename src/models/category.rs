use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Home feed categories exposed by the provider
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeedCategory {
    Popular,
    Trending,
    TopRated,
    Upcoming,
    NowPlaying,
}

impl FeedCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedCategory::Popular => "popular",
            FeedCategory::Trending => "trending",
            FeedCategory::TopRated => "top_rated",
            FeedCategory::Upcoming => "upcoming",
            FeedCategory::NowPlaying => "now_playing",
        }
    }

    /// Provider path serving this feed
    pub fn provider_path(&self) -> String {
        match self {
            FeedCategory::Trending => "/trending/movie/day".to_string(),
            other => format!("/movie/{}", other.as_str()),
        }
    }
}

impl Display for FeedCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FeedCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "popular" => Ok(FeedCategory::Popular),
            "trending" => Ok(FeedCategory::Trending),
            "top_rated" => Ok(FeedCategory::TopRated),
            "upcoming" => Ok(FeedCategory::Upcoming),
            "now_playing" => Ok(FeedCategory::NowPlaying),
            other => Err(format!("Invalid category: '{}'", other)),
        }
    }
}
