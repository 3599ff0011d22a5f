use anyhow::Result;

use ballot_types::VoteType;

use crate::models::{ArgumentRow, ArgumentVoteRow, RfcRow, UserRow, VoteRow};

/// Persistence capabilities the voting operations rely on: point lookups by
/// id or natural key, inserts, in-place updates, deletes and counts.
///
/// Implemented for [`rusqlite::Connection`]; a transaction derefs to one, so
/// the same calls work inside [`crate::Database::transaction`].
pub trait Store {
    // -- Users --

    fn insert_user(&self, id: &str, name: &str, email: &str, password_hash: &str) -> Result<UserRow>;
    fn find_user(&self, id: &str) -> Result<Option<UserRow>>;

    // -- Rfcs --

    fn insert_rfc(&self, id: &str, title: &str) -> Result<RfcRow>;
    fn find_rfc(&self, id: &str) -> Result<Option<RfcRow>>;
    fn list_rfcs(&self) -> Result<Vec<RfcRow>>;
    fn update_rfc_counts(&self, id: &str, count_yes: i64, count_no: i64) -> Result<()>;

    // -- Votes --

    fn find_vote(&self, user_id: &str, rfc_id: &str) -> Result<Option<VoteRow>>;
    fn votes_by_user(&self, user_id: &str) -> Result<Vec<VoteRow>>;
    fn insert_vote(&self, id: &str, user_id: &str, rfc_id: &str, vote_type: VoteType) -> Result<VoteRow>;
    fn update_vote_type(&self, id: &str, vote_type: VoteType) -> Result<VoteRow>;
    fn count_votes(&self, rfc_id: &str, vote_type: VoteType) -> Result<i64>;

    // -- Arguments --

    fn find_argument(&self, id: &str) -> Result<Option<ArgumentRow>>;
    fn find_argument_by_author(&self, user_id: &str, rfc_id: &str) -> Result<Option<ArgumentRow>>;
    fn arguments_by_user(&self, user_id: &str) -> Result<Vec<ArgumentRow>>;
    fn arguments_for_rfc(&self, rfc_id: &str) -> Result<Vec<ArgumentRow>>;
    fn insert_argument(&self, id: &str, user_id: &str, rfc_id: &str, body: &str) -> Result<ArgumentRow>;
    fn update_argument_body(&self, id: &str, body: &str) -> Result<ArgumentRow>;
    fn update_argument_vote_count(&self, id: &str, vote_count: i64) -> Result<()>;

    // -- Argument votes --

    fn find_argument_vote(&self, user_id: &str, argument_id: &str) -> Result<Option<ArgumentVoteRow>>;
    fn argument_votes_by_user(&self, user_id: &str) -> Result<Vec<ArgumentVoteRow>>;
    fn insert_argument_vote(&self, id: &str, user_id: &str, argument_id: &str) -> Result<ArgumentVoteRow>;
    fn delete_argument_vote(&self, id: &str) -> Result<()>;
    fn count_argument_votes(&self, argument_id: &str) -> Result<i64>;
}
