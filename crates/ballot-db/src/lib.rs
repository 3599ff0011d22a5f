pub mod migrations;
pub mod models;
pub mod queries;
pub mod store;

pub use store::Store;

use anyhow::Result;
use rusqlite::{Connection, TransactionBehavior};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::info;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let mut conn = Connection::open(path)?;

        // Other handles on the same file wait for the write lock instead of failing
        conn.busy_timeout(BUSY_TIMEOUT)?;
        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        migrations::run(&mut conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Private in-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        migrations::run(&mut conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.lock()?;
        f(&conn)
    }

    /// Run `f` inside an IMMEDIATE transaction.
    ///
    /// The write lock is taken at `BEGIN`, so read-then-write sequences on the
    /// same rows are serialized across connections. The transaction commits
    /// only when `f` returns `Ok`; any error drops it, which rolls back.
    pub fn transaction<F, T, E>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&Connection) -> std::result::Result<T, E>,
        E: From<anyhow::Error>,
    {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(anyhow::Error::from)?;

        let scoped: &Connection = &tx;
        let value = f(scoped)?;

        tx.commit().map_err(anyhow::Error::from)?;
        Ok(value)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_types::VoteType;

    fn seeded() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            conn.insert_user("u1", "Ada", "ada@example.com", "hash")?;
            conn.insert_rfc("r1", "Pattern types")?;
            Ok(())
        })
        .unwrap();
        db
    }

    #[test]
    fn transaction_commits_on_ok() {
        let db = seeded();

        db.transaction(|conn| -> Result<()> {
            conn.insert_vote("v1", "u1", "r1", VoteType::Yes)?;
            Ok(())
        })
        .unwrap();

        let count = db
            .with_conn(|conn| conn.count_votes("r1", VoteType::Yes))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn transaction_rolls_back_on_error() {
        let db = seeded();

        let result = db.transaction(|conn| -> Result<()> {
            conn.insert_vote("v1", "u1", "r1", VoteType::Yes)?;
            conn.update_rfc_counts("r1", 1, 0)?;
            Err(anyhow::anyhow!("abort"))
        });
        assert!(result.is_err());

        let (votes, rfc) = db
            .with_conn(|conn| Ok((conn.count_votes("r1", VoteType::Yes)?, conn.find_rfc("r1")?)))
            .unwrap();
        assert_eq!(votes, 0);
        assert_eq!(rfc.unwrap().count_yes, 0);
    }

    #[test]
    fn file_database_reopens_with_schema_intact() {
        let path = std::env::temp_dir().join(format!("ballot_db_test_{}.db", uuid::Uuid::new_v4()));

        {
            let db = Database::open(&path).unwrap();
            db.with_conn(|conn| conn.insert_rfc("r1", "Persisted").map(|_| ()))
                .unwrap();
        }

        let db = Database::open(&path).unwrap();
        let rfc = db.with_conn(|conn| conn.find_rfc("r1")).unwrap();
        assert_eq!(rfc.unwrap().title, "Persisted");

        drop(db);
        remove_db_files(&path);
    }

    fn remove_db_files(path: &Path) {
        for suffix in ["", "-wal", "-shm"] {
            let mut file = path.as_os_str().to_owned();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}
