use tracing::warn;
use uuid::Uuid;

use ballot_db::Store;
use ballot_types::{Saved, Vote, VoteType};

use crate::error::{BallotError, Result};

/// Find-or-create the user's vote on an Rfc, set its type, then recompute the
/// Rfc's tallies from the vote rows. Must run inside a single transaction.
pub(crate) fn cast_vote<S: Store + ?Sized>(
    store: &S,
    user_id: Uuid,
    rfc_id: Uuid,
    vote_type: VoteType,
) -> Result<Saved<Vote>> {
    let uid = user_id.to_string();
    let rid = rfc_id.to_string();

    if store.find_rfc(&rid)?.is_none() {
        warn!("Vote rejected: rfc {} does not exist", rfc_id);
        return Err(BallotError::RfcNotFound(rfc_id));
    }

    let (row, created) = match store.find_vote(&uid, &rid)? {
        Some(existing) => (store.update_vote_type(&existing.id, vote_type)?, false),
        None => {
            let id = Uuid::new_v4().to_string();
            (store.insert_vote(&id, &uid, &rid, vote_type)?, true)
        }
    };

    recount_rfc(store, &rid)?;

    Ok(Saved::new(Vote::try_from(row)?, created))
}

/// Overwrite the cached tallies with fresh counts. Returns (yes, no).
pub(crate) fn recount_rfc<S: Store + ?Sized>(store: &S, rfc_id: &str) -> Result<(i64, i64)> {
    let count_yes = store.count_votes(rfc_id, VoteType::Yes)?;
    let count_no = store.count_votes(rfc_id, VoteType::No)?;
    store.update_rfc_counts(rfc_id, count_yes, count_no)?;
    Ok((count_yes, count_no))
}
