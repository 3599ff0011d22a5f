use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::vote_type::VoteType;

/// Public view of an account. The password credential never leaves the DB layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub reputation: i64,
    pub created_at: DateTime<Utc>,
}

/// A proposal with its cached tallies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rfc {
    pub id: Uuid,
    pub title: String,
    pub count_yes: i64,
    pub count_no: i64,
    pub created_at: DateTime<Utc>,
}

impl Rfc {
    pub fn count_for(&self, vote_type: VoteType) -> i64 {
        match vote_type {
            VoteType::Yes => self.count_yes,
            VoteType::No => self.count_no,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub id: Uuid,
    pub user_id: Uuid,
    pub rfc_id: Uuid,
    #[serde(rename = "type")]
    pub vote_type: VoteType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub id: Uuid,
    pub user_id: Uuid,
    pub rfc_id: Uuid,
    pub body: String,
    pub vote_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An upvote. Its existence is the whole signal; there is no polarity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentVote {
    pub id: Uuid,
    pub user_id: Uuid,
    pub argument_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a find-or-create write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "record", rename_all = "lowercase")]
pub enum Saved<T> {
    Created(T),
    Updated(T),
}

impl<T> Saved<T> {
    pub fn new(value: T, created: bool) -> Self {
        if created {
            Self::Created(value)
        } else {
            Self::Updated(value)
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    pub fn get(&self) -> &T {
        match self {
            Self::Created(value) | Self::Updated(value) => value,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Self::Created(value) | Self::Updated(value) => value,
        }
    }
}

/// Outcome of toggling an upvote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Toggle {
    Added,
    Removed,
}
