use tracing::debug;
use uuid::Uuid;

use ballot_db::{Database, Store};
use ballot_types::{Argument, ArgumentVote, Saved, Toggle, User, Vote, VoteType};

use crate::arguments::{toggle_upvote, write_argument};
use crate::error::Result;
use crate::votes::cast_vote;

/// A loaded account acting on Rfcs and arguments.
///
/// Lookups are point queries by natural key, so they always reflect writes
/// made through this handle or any other.
pub struct UserHandle<'a> {
    db: &'a Database,
    user: User,
}

impl<'a> UserHandle<'a> {
    pub(crate) fn new(db: &'a Database, user: User) -> Self {
        Self { db, user }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn id(&self) -> Uuid {
        self.user.id
    }

    // -- Writes --

    /// Cast or change this user's vote on an Rfc and refresh its tallies.
    pub fn create_vote(&self, rfc_id: Uuid, vote_type: VoteType) -> Result<Saved<Vote>> {
        let saved = self
            .db
            .transaction(|conn| cast_vote(conn, self.user.id, rfc_id, vote_type))?;

        debug!(
            "User {} voted {} on rfc {} (created: {})",
            self.user.id,
            vote_type,
            rfc_id,
            saved.was_created()
        );
        Ok(saved)
    }

    /// Write or rewrite this user's argument on an Rfc.
    pub fn save_argument(&self, rfc_id: Uuid, body: &str) -> Result<Saved<Argument>> {
        let saved = self
            .db
            .transaction(|conn| write_argument(conn, self.user.id, rfc_id, body))?;

        debug!(
            "User {} saved argument {} on rfc {} (created: {})",
            self.user.id,
            saved.get().id,
            rfc_id,
            saved.was_created()
        );
        Ok(saved)
    }

    /// Upvote an argument, or retract the upvote if one exists.
    pub fn toggle_argument_vote(&self, argument_id: Uuid) -> Result<Toggle> {
        let toggle = self
            .db
            .transaction(|conn| toggle_upvote(conn, self.user.id, argument_id))?;

        debug!(
            "User {} toggled upvote on argument {}: {:?}",
            self.user.id, argument_id, toggle
        );
        Ok(toggle)
    }

    // -- Lookups --

    pub fn get_vote_for_rfc(&self, rfc_id: Uuid) -> Result<Option<Vote>> {
        let (uid, rid) = (self.user.id.to_string(), rfc_id.to_string());
        let vote = self.db.with_conn(|conn| {
            conn.find_vote(&uid, &rid)?.map(Vote::try_from).transpose()
        })?;
        Ok(vote)
    }

    pub fn get_argument_for_rfc(&self, rfc_id: Uuid) -> Result<Option<Argument>> {
        let (uid, rid) = (self.user.id.to_string(), rfc_id.to_string());
        let argument = self.db.with_conn(|conn| {
            conn.find_argument_by_author(&uid, &rid)?
                .map(Argument::try_from)
                .transpose()
        })?;
        Ok(argument)
    }

    pub fn get_argument_vote_for_argument(&self, argument_id: Uuid) -> Result<Option<ArgumentVote>> {
        let (uid, aid) = (self.user.id.to_string(), argument_id.to_string());
        let upvote = self.db.with_conn(|conn| {
            conn.find_argument_vote(&uid, &aid)?
                .map(ArgumentVote::try_from)
                .transpose()
        })?;
        Ok(upvote)
    }

    pub fn has_voted_for_argument(&self, argument_id: Uuid) -> Result<bool> {
        Ok(self.get_argument_vote_for_argument(argument_id)?.is_some())
    }

    // -- Owned collections, oldest first --

    pub fn votes(&self) -> Result<Vec<Vote>> {
        let uid = self.user.id.to_string();
        let votes = self.db.with_conn(|conn| {
            conn.votes_by_user(&uid)?
                .into_iter()
                .map(Vote::try_from)
                .collect::<anyhow::Result<Vec<_>>>()
        })?;
        Ok(votes)
    }

    pub fn arguments(&self) -> Result<Vec<Argument>> {
        let uid = self.user.id.to_string();
        let arguments = self.db.with_conn(|conn| {
            conn.arguments_by_user(&uid)?
                .into_iter()
                .map(Argument::try_from)
                .collect::<anyhow::Result<Vec<_>>>()
        })?;
        Ok(arguments)
    }

    pub fn argument_votes(&self) -> Result<Vec<ArgumentVote>> {
        let uid = self.user.id.to_string();
        let upvotes = self.db.with_conn(|conn| {
            conn.argument_votes_by_user(&uid)?
                .into_iter()
                .map(ArgumentVote::try_from)
                .collect::<anyhow::Result<Vec<_>>>()
        })?;
        Ok(upvotes)
    }
}
