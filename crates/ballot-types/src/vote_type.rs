use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A position on an Rfc.
///
/// Every presentation lookup below matches exhaustively, so a new variant
/// will not compile until each mapping handles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    Yes,
    No,
}

#[derive(Debug, Error)]
#[error("unknown vote type: {0:?}")]
pub struct ParseVoteTypeError(pub String);

impl VoteType {
    /// Storage and wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Yes => "green",
            Self::No => "red",
        }
    }

    pub fn background_color(self) -> &'static str {
        match self {
            Self::Yes => "bg-green-200",
            Self::No => "bg-red-200",
        }
    }

    pub fn border_color(self) -> &'static str {
        match self {
            Self::Yes => "border-green-400",
            Self::No => "border-red-400",
        }
    }

    pub fn justify(self) -> &'static str {
        match self {
            Self::Yes => "justify-start",
            Self::No => "justify-end",
        }
    }

    pub fn direction(self) -> &'static str {
        match self {
            Self::Yes => "flex-row",
            Self::No => "flex-row-reverse",
        }
    }
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteType {
    type Err = ParseVoteTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            other => Err(ParseVoteTypeError(other.to_string())),
        }
    }
}
