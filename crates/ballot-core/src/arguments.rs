use tracing::warn;
use uuid::Uuid;

use ballot_db::Store;
use ballot_types::{Argument, Saved, Toggle};

use crate::error::{BallotError, Result};

/// Find-or-create the user's argument on an Rfc and overwrite its body.
/// The body is stored as given.
pub(crate) fn write_argument<S: Store + ?Sized>(
    store: &S,
    user_id: Uuid,
    rfc_id: Uuid,
    body: &str,
) -> Result<Saved<Argument>> {
    let uid = user_id.to_string();
    let rid = rfc_id.to_string();

    if store.find_rfc(&rid)?.is_none() {
        warn!("Argument rejected: rfc {} does not exist", rfc_id);
        return Err(BallotError::RfcNotFound(rfc_id));
    }

    let (row, created) = match store.find_argument_by_author(&uid, &rid)? {
        Some(existing) => (store.update_argument_body(&existing.id, body)?, false),
        None => {
            let id = Uuid::new_v4().to_string();
            (store.insert_argument(&id, &uid, &rid, body)?, true)
        }
    };

    Ok(Saved::new(Argument::try_from(row)?, created))
}

/// Toggle the user's upvote: removes it if present, adds it if not, then
/// recomputes the argument's cached vote count. Must run inside a single
/// transaction.
pub(crate) fn toggle_upvote<S: Store + ?Sized>(
    store: &S,
    user_id: Uuid,
    argument_id: Uuid,
) -> Result<Toggle> {
    let uid = user_id.to_string();
    let aid = argument_id.to_string();

    if store.find_argument(&aid)?.is_none() {
        warn!("Upvote rejected: argument {} does not exist", argument_id);
        return Err(BallotError::ArgumentNotFound(argument_id));
    }

    let toggle = match store.find_argument_vote(&uid, &aid)? {
        Some(existing) => {
            store.delete_argument_vote(&existing.id)?;
            Toggle::Removed
        }
        None => {
            let id = Uuid::new_v4().to_string();
            store.insert_argument_vote(&id, &uid, &aid)?;
            Toggle::Added
        }
    };

    let vote_count = store.count_argument_votes(&aid)?;
    store.update_argument_vote_count(&aid, vote_count)?;

    Ok(toggle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_db::Database;

    struct Fixture {
        db: Database,
        author: Uuid,
        reader: Uuid,
        rfc_id: Uuid,
    }

    fn setup() -> Fixture {
        let db = Database::open_in_memory().unwrap();
        let author = Uuid::new_v4();
        let reader = Uuid::new_v4();
        let rfc_id = Uuid::new_v4();
        db.with_conn(|conn| {
            conn.insert_user(&author.to_string(), "Ada", "ada@example.com", "hash")?;
            conn.insert_user(&reader.to_string(), "Grace", "grace@example.com", "hash")?;
            conn.insert_rfc(&rfc_id.to_string(), "Pattern types")?;
            Ok(())
        })
        .unwrap();
        Fixture { db, author, reader, rfc_id }
    }

    fn vote_count(db: &Database, argument_id: Uuid) -> i64 {
        db.with_conn(|conn| conn.find_argument(&argument_id.to_string()))
            .unwrap()
            .unwrap()
            .vote_count
    }

    #[test]
    fn rewriting_keeps_one_argument() {
        let f = setup();

        let first = f
            .db
            .transaction(|conn| write_argument(conn, f.author, f.rfc_id, "hello"))
            .unwrap();
        let second = f
            .db
            .transaction(|conn| write_argument(conn, f.author, f.rfc_id, "world"))
            .unwrap();

        assert!(first.was_created());
        assert!(!second.was_created());
        assert_eq!(first.get().id, second.get().id);
        assert_eq!(second.get().body, "world");

        let rows = f
            .db
            .with_conn(|conn| conn.arguments_for_rfc(&f.rfc_id.to_string()))
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn empty_body_is_stored_as_given() {
        let f = setup();
        let saved = f
            .db
            .transaction(|conn| write_argument(conn, f.author, f.rfc_id, ""))
            .unwrap();
        assert_eq!(saved.get().body, "");
    }

    #[test]
    fn toggle_is_an_involution() {
        let f = setup();
        let argument = f
            .db
            .transaction(|conn| write_argument(conn, f.author, f.rfc_id, "body"))
            .unwrap()
            .into_inner();
        assert_eq!(vote_count(&f.db, argument.id), 0);

        let added = f
            .db
            .transaction(|conn| toggle_upvote(conn, f.reader, argument.id))
            .unwrap();
        assert_eq!(added, Toggle::Added);
        assert_eq!(vote_count(&f.db, argument.id), 1);

        let removed = f
            .db
            .transaction(|conn| toggle_upvote(conn, f.reader, argument.id))
            .unwrap();
        assert_eq!(removed, Toggle::Removed);
        assert_eq!(vote_count(&f.db, argument.id), 0);
    }

    #[test]
    fn missing_argument_writes_nothing() {
        let f = setup();
        let missing = Uuid::new_v4();

        let err = f
            .db
            .transaction(|conn| toggle_upvote(conn, f.reader, missing))
            .unwrap_err();

        assert!(matches!(err, BallotError::ArgumentNotFound(id) if id == missing));
        let upvotes = f
            .db
            .with_conn(|conn| conn.argument_votes_by_user(&f.reader.to_string()))
            .unwrap();
        assert!(upvotes.is_empty());
    }
}
