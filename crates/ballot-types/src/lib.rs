pub mod models;
pub mod vote_type;

pub use models::{Argument, ArgumentVote, Rfc, Saved, Toggle, User, Vote};
pub use vote_type::{ParseVoteTypeError, VoteType};
