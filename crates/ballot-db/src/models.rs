//! Database row types: these map directly to SQLite rows.
//! Distinct from ballot-types models to keep the DB layer independent;
//! conversions parse ids and timestamps and fail on corrupt rows.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use uuid::Uuid;

use ballot_types::{Argument, ArgumentVote, Rfc, User, Vote, VoteType};

pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub reputation: i64,
    pub created_at: String,
}

pub struct RfcRow {
    pub id: String,
    pub title: String,
    pub count_yes: i64,
    pub count_no: i64,
    pub created_at: String,
}

pub struct VoteRow {
    pub id: String,
    pub user_id: String,
    pub rfc_id: String,
    pub vote_type: VoteType,
    pub created_at: String,
    pub updated_at: String,
}

pub struct ArgumentRow {
    pub id: String,
    pub user_id: String,
    pub rfc_id: String,
    pub body: String,
    pub vote_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

pub struct ArgumentVoteRow {
    pub id: String,
    pub user_id: String,
    pub argument_id: String,
    pub created_at: String,
}

/// SQLite `datetime('now')` format.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .with_context(|| format!("Invalid timestamp: {}", raw))?;
    Ok(naive.and_utc())
}

fn parse_id(raw: &str) -> Result<Uuid> {
    raw.parse().with_context(|| format!("Invalid id: {}", raw))
}

impl TryFrom<UserRow> for User {
    type Error = anyhow::Error;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(Self {
            id: parse_id(&row.id)?,
            name: row.name,
            email: row.email,
            reputation: row.reputation,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

impl TryFrom<RfcRow> for Rfc {
    type Error = anyhow::Error;

    fn try_from(row: RfcRow) -> Result<Self> {
        Ok(Self {
            id: parse_id(&row.id)?,
            title: row.title,
            count_yes: row.count_yes,
            count_no: row.count_no,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

impl TryFrom<VoteRow> for Vote {
    type Error = anyhow::Error;

    fn try_from(row: VoteRow) -> Result<Self> {
        Ok(Self {
            id: parse_id(&row.id)?,
            user_id: parse_id(&row.user_id)?,
            rfc_id: parse_id(&row.rfc_id)?,
            vote_type: row.vote_type,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

impl TryFrom<ArgumentRow> for Argument {
    type Error = anyhow::Error;

    fn try_from(row: ArgumentRow) -> Result<Self> {
        Ok(Self {
            id: parse_id(&row.id)?,
            user_id: parse_id(&row.user_id)?,
            rfc_id: parse_id(&row.rfc_id)?,
            body: row.body,
            vote_count: row.vote_count,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

impl TryFrom<ArgumentVoteRow> for ArgumentVote {
    type Error = anyhow::Error;

    fn try_from(row: ArgumentVoteRow) -> Result<Self> {
        Ok(Self {
            id: parse_id(&row.id)?,
            user_id: parse_id(&row.user_id)?,
            argument_id: parse_id(&row.argument_id)?,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sqlite_timestamps() {
        let ts = parse_timestamp("2024-03-01 12:30:45").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-03-01T12:30:45+00:00");
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn user_conversion_drops_password() {
        let id = Uuid::new_v4();
        let user = User::try_from(UserRow {
            id: id.to_string(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "$argon2id$secret".into(),
            reputation: 3,
            created_at: "2024-03-01 00:00:00".into(),
        })
        .unwrap();

        assert_eq!(user.id, id);
        assert_eq!(user.reputation, 3);
        assert!(!format!("{:?}", user).contains("argon2"));
    }

    #[test]
    fn corrupt_id_is_an_error() {
        let row = RfcRow {
            id: "not-a-uuid".into(),
            title: "t".into(),
            count_yes: 0,
            count_no: 0,
            created_at: "2024-03-01 00:00:00".into(),
        };
        assert!(Rfc::try_from(row).is_err());
    }
}
