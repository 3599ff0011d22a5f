use anyhow::Result;
use rusqlite::{Connection, TransactionBehavior};
use tracing::info;

/// Bring the schema up to date.
///
/// The version check and every migration run under one IMMEDIATE transaction,
/// so handles opening the same file at once apply each step exactly once and
/// a failed step leaves the schema at its previous version.
pub fn run(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    tx.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    // Read under the write lock; another handle may have migrated while we waited
    let version: i64 = tx.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        tx.execute_batch(
            "
            CREATE TABLE users (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL,
                email       TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL,
                reputation  INTEGER NOT NULL DEFAULT 0,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE rfcs (
                id          TEXT PRIMARY KEY,
                title       TEXT NOT NULL,
                count_yes   INTEGER NOT NULL DEFAULT 0,
                count_no    INTEGER NOT NULL DEFAULT 0,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE votes (
                id          TEXT PRIMARY KEY,
                user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                rfc_id      TEXT NOT NULL REFERENCES rfcs(id) ON DELETE CASCADE,
                type        TEXT NOT NULL CHECK (type IN ('yes', 'no')),
                created_at  TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at  TEXT NOT NULL DEFAULT (datetime('now')),
                UNIQUE(user_id, rfc_id)
            );

            CREATE INDEX idx_votes_rfc_type ON votes(rfc_id, type);

            CREATE TABLE arguments (
                id          TEXT PRIMARY KEY,
                user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                rfc_id      TEXT NOT NULL REFERENCES rfcs(id) ON DELETE CASCADE,
                body        TEXT NOT NULL,
                vote_count  INTEGER NOT NULL DEFAULT 0,
                created_at  TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at  TEXT NOT NULL DEFAULT (datetime('now')),
                UNIQUE(user_id, rfc_id)
            );

            CREATE INDEX idx_arguments_rfc ON arguments(rfc_id, vote_count);

            CREATE TABLE argument_votes (
                id           TEXT PRIMARY KEY,
                user_id      TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                argument_id  TEXT NOT NULL REFERENCES arguments(id) ON DELETE CASCADE,
                created_at   TEXT NOT NULL DEFAULT (datetime('now')),
                UNIQUE(user_id, argument_id)
            );

            CREATE INDEX idx_argument_votes_argument ON argument_votes(argument_id);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    tx.commit()?;

    info!("Database migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_is_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        run(&mut conn).unwrap();
        run(&mut conn).unwrap();

        let versions: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(versions, 1);
    }

    #[test]
    fn rejects_unknown_vote_type() {
        let mut conn = Connection::open_in_memory().unwrap();
        run(&mut conn).unwrap();
        conn.execute_batch(
            "INSERT INTO users (id, name, email, password) VALUES ('u', 'n', 'e', 'p');
             INSERT INTO rfcs (id, title) VALUES ('r', 't');",
        )
        .unwrap();

        let result = conn.execute(
            "INSERT INTO votes (id, user_id, rfc_id, type) VALUES ('v', 'u', 'r', 'maybe')",
            [],
        );
        assert!(result.is_err());
    }
}
