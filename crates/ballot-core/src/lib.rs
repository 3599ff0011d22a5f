//! RFC voting and argumentation.
//!
//! [`Ballot`] owns the database and creates accounts and proposals. Everything
//! a user does goes through a [`UserHandle`], whose writes each run in one
//! IMMEDIATE transaction so cached tallies never drift from the rows they
//! count.

mod accounts;
mod arguments;
pub mod error;
pub mod user;
mod votes;

pub use error::{BallotError, Result};
pub use user::UserHandle;

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use ballot_db::{Database, Store};
use ballot_types::{Argument, Rfc, User};

#[derive(Clone)]
pub struct Ballot {
    db: Arc<Database>,
}

impl Ballot {
    pub fn new(db: Database) -> Self {
        Self { db: Arc::new(db) }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    // -- Accounts --

    pub fn create_user(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let password_hash = accounts::hash_password(password)?;
        let id = Uuid::new_v4();

        let row = self
            .db
            .with_conn(|conn| conn.insert_user(&id.to_string(), name, email, &password_hash))?;

        info!("Created user {} ({})", id, email);
        Ok(User::try_from(row)?)
    }

    pub fn get_user(&self, id: Uuid) -> Result<User> {
        let row = self
            .db
            .with_conn(|conn| conn.find_user(&id.to_string()))?
            .ok_or(BallotError::UserNotFound(id))?;
        Ok(User::try_from(row)?)
    }

    /// Act as the given user. Fails if the account does not exist.
    pub fn user(&self, id: Uuid) -> Result<UserHandle<'_>> {
        let user = self.get_user(id)?;
        Ok(UserHandle::new(&self.db, user))
    }

    // -- Rfcs --

    pub fn create_rfc(&self, title: &str) -> Result<Rfc> {
        let id = Uuid::new_v4();
        let row = self
            .db
            .with_conn(|conn| conn.insert_rfc(&id.to_string(), title))?;

        info!("Created rfc {}", id);
        Ok(Rfc::try_from(row)?)
    }

    pub fn get_rfc(&self, id: Uuid) -> Result<Rfc> {
        let row = self
            .db
            .with_conn(|conn| conn.find_rfc(&id.to_string()))?
            .ok_or(BallotError::RfcNotFound(id))?;
        Ok(Rfc::try_from(row)?)
    }

    /// Newest first.
    pub fn list_rfcs(&self) -> Result<Vec<Rfc>> {
        let rows = self.db.with_conn(|conn| conn.list_rfcs())?;
        let rfcs = rows
            .into_iter()
            .map(Rfc::try_from)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(rfcs)
    }

    pub fn get_argument(&self, id: Uuid) -> Result<Argument> {
        let row = self
            .db
            .with_conn(|conn| conn.find_argument(&id.to_string()))?
            .ok_or(BallotError::ArgumentNotFound(id))?;
        Ok(Argument::try_from(row)?)
    }

    /// Arguments on an Rfc, most upvoted first.
    pub fn arguments_for_rfc(&self, rfc_id: Uuid) -> Result<Vec<Argument>> {
        let rid = rfc_id.to_string();
        let rows = self.db.with_conn(|conn| {
            if conn.find_rfc(&rid)?.is_none() {
                return Ok(None);
            }
            conn.arguments_for_rfc(&rid).map(Some)
        })?;

        rows.ok_or(BallotError::RfcNotFound(rfc_id))?
            .into_iter()
            .map(|row| Argument::try_from(row).map_err(BallotError::from))
            .collect()
    }
}
