use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Book genre, stored by its three-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    #[serde(rename = "hor")]
    Horror,
    #[serde(rename = "rom")]
    Romance,
    #[serde(rename = "adv")]
    Adventure,
    #[serde(rename = "fan")]
    Fantasy,
    #[serde(rename = "sci")]
    ScienceFiction,
    #[serde(rename = "non")]
    NonFiction,
}

impl Genre {
    pub const ALL: [Genre; 6] = [
        Genre::Horror,
        Genre::Romance,
        Genre::Adventure,
        Genre::Fantasy,
        Genre::ScienceFiction,
        Genre::NonFiction,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Genre::Horror => "hor",
            Genre::Romance => "rom",
            Genre::Adventure => "adv",
            Genre::Fantasy => "fan",
            Genre::ScienceFiction => "sci",
            Genre::NonFiction => "non",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Genre::Horror => "Horror",
            Genre::Romance => "Romance",
            Genre::Adventure => "Adventure",
            Genre::Fantasy => "Fantasy",
            Genre::ScienceFiction => "Science Fiction",
            Genre::NonFiction => "Non-fiction",
        }
    }

    /// `(code, label)` pairs in declaration order, for select widgets.
    pub fn choices() -> Vec<(&'static str, &'static str)> {
        Self::ALL.iter().map(|g| (g.code(), g.label())).collect()
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Genre {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|g| g.code() == s)
            .ok_or_else(|| CoreError::invalid_genre(s))
    }
}
