use anyhow::{Result, bail};
use rusqlite::types::Type;
use rusqlite::{Connection, Row, params};

use ballot_types::VoteType;

use crate::models::{ArgumentRow, ArgumentVoteRow, RfcRow, UserRow, VoteRow};
use crate::store::Store;

impl Store for Connection {
    // -- Users --

    fn insert_user(&self, id: &str, name: &str, email: &str, password_hash: &str) -> Result<UserRow> {
        let row = self.query_row(
            "INSERT INTO users (id, name, email, password) VALUES (?1, ?2, ?3, ?4)
             RETURNING id, name, email, password, reputation, created_at",
            params![id, name, email, password_hash],
            user_row,
        )?;
        Ok(row)
    }

    fn find_user(&self, id: &str) -> Result<Option<UserRow>> {
        self.query_row(
            "SELECT id, name, email, password, reputation, created_at FROM users WHERE id = ?1",
            [id],
            user_row,
        )
        .optional()
    }

    // -- Rfcs --

    fn insert_rfc(&self, id: &str, title: &str) -> Result<RfcRow> {
        let row = self.query_row(
            "INSERT INTO rfcs (id, title) VALUES (?1, ?2)
             RETURNING id, title, count_yes, count_no, created_at",
            params![id, title],
            rfc_row,
        )?;
        Ok(row)
    }

    fn find_rfc(&self, id: &str) -> Result<Option<RfcRow>> {
        self.query_row(
            "SELECT id, title, count_yes, count_no, created_at FROM rfcs WHERE id = ?1",
            [id],
            rfc_row,
        )
        .optional()
    }

    fn list_rfcs(&self) -> Result<Vec<RfcRow>> {
        let mut stmt = self.prepare(
            "SELECT id, title, count_yes, count_no, created_at FROM rfcs
             ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = stmt
            .query_map([], rfc_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn update_rfc_counts(&self, id: &str, count_yes: i64, count_no: i64) -> Result<()> {
        let changed = self.execute(
            "UPDATE rfcs SET count_yes = ?2, count_no = ?3 WHERE id = ?1",
            params![id, count_yes, count_no],
        )?;
        if changed == 0 {
            bail!("Rfc not found: {}", id);
        }
        Ok(())
    }

    // -- Votes --

    fn find_vote(&self, user_id: &str, rfc_id: &str) -> Result<Option<VoteRow>> {
        self.query_row(
            "SELECT id, user_id, rfc_id, type, created_at, updated_at FROM votes
             WHERE user_id = ?1 AND rfc_id = ?2",
            [user_id, rfc_id],
            vote_row,
        )
        .optional()
    }

    fn votes_by_user(&self, user_id: &str) -> Result<Vec<VoteRow>> {
        let mut stmt = self.prepare(
            "SELECT id, user_id, rfc_id, type, created_at, updated_at FROM votes
             WHERE user_id = ?1
             ORDER BY created_at, rowid",
        )?;
        let rows = stmt
            .query_map([user_id], vote_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn insert_vote(&self, id: &str, user_id: &str, rfc_id: &str, vote_type: VoteType) -> Result<VoteRow> {
        let row = self.query_row(
            "INSERT INTO votes (id, user_id, rfc_id, type) VALUES (?1, ?2, ?3, ?4)
             RETURNING id, user_id, rfc_id, type, created_at, updated_at",
            params![id, user_id, rfc_id, vote_type.as_str()],
            vote_row,
        )?;
        Ok(row)
    }

    fn update_vote_type(&self, id: &str, vote_type: VoteType) -> Result<VoteRow> {
        // Leave updated_at alone when nothing changes so repeated votes are no-ops
        let row = self.query_row(
            "UPDATE votes
             SET updated_at = CASE WHEN type = ?2 THEN updated_at ELSE datetime('now') END,
                 type = ?2
             WHERE id = ?1
             RETURNING id, user_id, rfc_id, type, created_at, updated_at",
            params![id, vote_type.as_str()],
            vote_row,
        )?;
        Ok(row)
    }

    fn count_votes(&self, rfc_id: &str, vote_type: VoteType) -> Result<i64> {
        let count = self.query_row(
            "SELECT COUNT(*) FROM votes WHERE rfc_id = ?1 AND type = ?2",
            params![rfc_id, vote_type.as_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // -- Arguments --

    fn find_argument(&self, id: &str) -> Result<Option<ArgumentRow>> {
        self.query_row(
            "SELECT id, user_id, rfc_id, body, vote_count, created_at, updated_at FROM arguments
             WHERE id = ?1",
            [id],
            argument_row,
        )
        .optional()
    }

    fn find_argument_by_author(&self, user_id: &str, rfc_id: &str) -> Result<Option<ArgumentRow>> {
        self.query_row(
            "SELECT id, user_id, rfc_id, body, vote_count, created_at, updated_at FROM arguments
             WHERE user_id = ?1 AND rfc_id = ?2",
            [user_id, rfc_id],
            argument_row,
        )
        .optional()
    }

    fn arguments_by_user(&self, user_id: &str) -> Result<Vec<ArgumentRow>> {
        let mut stmt = self.prepare(
            "SELECT id, user_id, rfc_id, body, vote_count, created_at, updated_at FROM arguments
             WHERE user_id = ?1
             ORDER BY created_at, rowid",
        )?;
        let rows = stmt
            .query_map([user_id], argument_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn arguments_for_rfc(&self, rfc_id: &str) -> Result<Vec<ArgumentRow>> {
        let mut stmt = self.prepare(
            "SELECT id, user_id, rfc_id, body, vote_count, created_at, updated_at FROM arguments
             WHERE rfc_id = ?1
             ORDER BY vote_count DESC, created_at, rowid",
        )?;
        let rows = stmt
            .query_map([rfc_id], argument_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn insert_argument(&self, id: &str, user_id: &str, rfc_id: &str, body: &str) -> Result<ArgumentRow> {
        let row = self.query_row(
            "INSERT INTO arguments (id, user_id, rfc_id, body) VALUES (?1, ?2, ?3, ?4)
             RETURNING id, user_id, rfc_id, body, vote_count, created_at, updated_at",
            params![id, user_id, rfc_id, body],
            argument_row,
        )?;
        Ok(row)
    }

    fn update_argument_body(&self, id: &str, body: &str) -> Result<ArgumentRow> {
        let row = self.query_row(
            "UPDATE arguments
             SET updated_at = CASE WHEN body = ?2 THEN updated_at ELSE datetime('now') END,
                 body = ?2
             WHERE id = ?1
             RETURNING id, user_id, rfc_id, body, vote_count, created_at, updated_at",
            params![id, body],
            argument_row,
        )?;
        Ok(row)
    }

    fn update_argument_vote_count(&self, id: &str, vote_count: i64) -> Result<()> {
        let changed = self.execute(
            "UPDATE arguments SET vote_count = ?2 WHERE id = ?1",
            params![id, vote_count],
        )?;
        if changed == 0 {
            bail!("Argument not found: {}", id);
        }
        Ok(())
    }

    // -- Argument votes --

    fn find_argument_vote(&self, user_id: &str, argument_id: &str) -> Result<Option<ArgumentVoteRow>> {
        self.query_row(
            "SELECT id, user_id, argument_id, created_at FROM argument_votes
             WHERE user_id = ?1 AND argument_id = ?2",
            [user_id, argument_id],
            argument_vote_row,
        )
        .optional()
    }

    fn argument_votes_by_user(&self, user_id: &str) -> Result<Vec<ArgumentVoteRow>> {
        let mut stmt = self.prepare(
            "SELECT id, user_id, argument_id, created_at FROM argument_votes
             WHERE user_id = ?1
             ORDER BY created_at, rowid",
        )?;
        let rows = stmt
            .query_map([user_id], argument_vote_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn insert_argument_vote(&self, id: &str, user_id: &str, argument_id: &str) -> Result<ArgumentVoteRow> {
        let row = self.query_row(
            "INSERT INTO argument_votes (id, user_id, argument_id) VALUES (?1, ?2, ?3)
             RETURNING id, user_id, argument_id, created_at",
            params![id, user_id, argument_id],
            argument_vote_row,
        )?;
        Ok(row)
    }

    fn delete_argument_vote(&self, id: &str) -> Result<()> {
        self.execute("DELETE FROM argument_votes WHERE id = ?1", [id])?;
        Ok(())
    }

    fn count_argument_votes(&self, argument_id: &str) -> Result<i64> {
        let count = self.query_row(
            "SELECT COUNT(*) FROM argument_votes WHERE argument_id = ?1",
            [argument_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn user_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
        reputation: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn rfc_row(row: &Row<'_>) -> rusqlite::Result<RfcRow> {
    Ok(RfcRow {
        id: row.get(0)?,
        title: row.get(1)?,
        count_yes: row.get(2)?,
        count_no: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn vote_row(row: &Row<'_>) -> rusqlite::Result<VoteRow> {
    Ok(VoteRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        rfc_id: row.get(2)?,
        vote_type: vote_type_at(row, 3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

fn argument_row(row: &Row<'_>) -> rusqlite::Result<ArgumentRow> {
    Ok(ArgumentRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        rfc_id: row.get(2)?,
        body: row.get(3)?,
        vote_count: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn argument_vote_row(row: &Row<'_>) -> rusqlite::Result<ArgumentVoteRow> {
    Ok(ArgumentVoteRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        argument_id: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn vote_type_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<VoteType> {
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
