use serde::Serialize;
use tracing::info;

use ballot_core::{Ballot, BallotError};
use ballot_types::{Argument, ArgumentVote, Rfc, Saved, Toggle, User, Vote, VoteType};

use crate::cli::{Command, RfcCommand, UserCommand};

/// True when the command failed because a referenced record does not exist.
pub fn is_not_found(err: &anyhow::Error) -> bool {
    err.downcast_ref::<BallotError>()
        .is_some_and(BallotError::is_not_found)
}

/// Rendering hints for a vote position.
#[derive(Debug, Serialize)]
pub struct VoteStyle {
    pub color: &'static str,
    pub background: &'static str,
    pub border: &'static str,
    pub justify: &'static str,
    pub direction: &'static str,
}

impl From<VoteType> for VoteStyle {
    fn from(vote_type: VoteType) -> Self {
        Self {
            color: vote_type.color(),
            background: vote_type.background_color(),
            border: vote_type.border_color(),
            justify: vote_type.justify(),
            direction: vote_type.direction(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VoteView {
    pub vote: Saved<Vote>,
    pub style: VoteStyle,
    pub rfc: Rfc,
}

#[derive(Debug, Serialize)]
pub struct UpvoteView {
    pub toggle: Toggle,
    pub argument: Argument,
}

#[derive(Debug, Serialize)]
pub struct RfcView {
    pub rfc: Rfc,
    pub arguments: Vec<Argument>,
}

#[derive(Debug, Serialize)]
pub struct UserView {
    pub user: User,
    pub votes: Vec<Vote>,
    pub arguments: Vec<Argument>,
    pub argument_votes: Vec<ArgumentVote>,
}

/// Execute one subcommand and return what should be printed.
pub fn run(ballot: &Ballot, command: Command) -> anyhow::Result<serde_json::Value> {
    let value = match command {
        Command::User(UserCommand::Add { name, email, password }) => {
            let user = ballot.create_user(&name, &email, &password)?;
            serde_json::to_value(user)?
        }
        Command::User(UserCommand::Show { id }) => {
            let handle = ballot.user(id)?;
            serde_json::to_value(UserView {
                votes: handle.votes()?,
                arguments: handle.arguments()?,
                argument_votes: handle.argument_votes()?,
                user: handle.user().clone(),
            })?
        }
        Command::Rfc(RfcCommand::Add { title }) => serde_json::to_value(ballot.create_rfc(&title)?)?,
        Command::Rfc(RfcCommand::Show { id }) => serde_json::to_value(RfcView {
            rfc: ballot.get_rfc(id)?,
            arguments: ballot.arguments_for_rfc(id)?,
        })?,
        Command::Rfc(RfcCommand::List) => serde_json::to_value(ballot.list_rfcs()?)?,
        Command::Vote { user, rfc, vote_type } => {
            let saved = ballot.user(user)?.create_vote(rfc, vote_type)?;
            let rfc = ballot.get_rfc(rfc)?;
            info!(
                "Recorded {} vote on rfc {} ({} {} so far)",
                vote_type,
                rfc.id,
                rfc.count_for(vote_type),
                vote_type
            );
            serde_json::to_value(VoteView {
                style: VoteStyle::from(saved.get().vote_type),
                rfc,
                vote: saved,
            })?
        }
        Command::Argue { user, rfc, body } => {
            let saved = ballot.user(user)?.save_argument(rfc, &body)?;
            serde_json::to_value(saved)?
        }
        Command::Upvote { user, argument } => {
            let toggle = ballot.user(user)?.toggle_argument_vote(argument)?;
            serde_json::to_value(UpvoteView {
                toggle,
                argument: ballot.get_argument(argument)?,
            })?
        }
    };

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_db::Database;
    use uuid::Uuid;

    fn ballot() -> Ballot {
        Ballot::new(Database::open_in_memory().unwrap())
    }

    fn id_of(value: &serde_json::Value) -> Uuid {
        value["id"].as_str().unwrap().parse().unwrap()
    }

    #[test]
    fn vote_output_carries_tallies_and_style() {
        let ballot = ballot();
        let user = run(
            &ballot,
            Command::User(UserCommand::Add {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                password: "password1".into(),
            }),
        )
        .unwrap();
        assert!(user.get("password").is_none());

        let rfc = run(&ballot, Command::Rfc(RfcCommand::Add { title: "Pattern types".into() })).unwrap();

        let out = run(
            &ballot,
            Command::Vote {
                user: id_of(&user),
                rfc: id_of(&rfc),
                vote_type: VoteType::No,
            },
        )
        .unwrap();

        assert_eq!(out["vote"]["outcome"], "created");
        assert_eq!(out["vote"]["record"]["type"], "no");
        assert_eq!(out["rfc"]["count_no"], 1);
        assert_eq!(out["style"]["color"], "red");
        assert_eq!(out["style"]["direction"], "flex-row-reverse");
    }

    #[test]
    fn upvote_output_reports_toggle() {
        let ballot = ballot();
        let ada = ballot.create_user("Ada", "ada@example.com", "password1").unwrap();
        let grace = ballot.create_user("Grace", "grace@example.com", "password2").unwrap();
        let rfc = ballot.create_rfc("Pattern types").unwrap();
        let argument = ballot
            .user(ada.id)
            .unwrap()
            .save_argument(rfc.id, "body")
            .unwrap()
            .into_inner();

        let out = run(&ballot, Command::Upvote { user: grace.id, argument: argument.id }).unwrap();
        assert_eq!(out["toggle"], "added");
        assert_eq!(out["argument"]["vote_count"], 1);

        let shown = run(&ballot, Command::User(UserCommand::Show { id: grace.id })).unwrap();
        assert_eq!(shown["argument_votes"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn missing_rfc_is_reported() {
        let ballot = ballot();
        let err = run(&ballot, Command::Rfc(RfcCommand::Show { id: Uuid::new_v4() })).unwrap_err();
        assert!(err.to_string().starts_with("Rfc not found"));
        assert!(is_not_found(&err));
    }

    #[test]
    fn missing_user_is_not_found_but_duplicate_email_is_not() {
        let ballot = ballot();
        let err = run(
            &ballot,
            Command::Vote {
                user: Uuid::new_v4(),
                rfc: Uuid::new_v4(),
                vote_type: VoteType::Yes,
            },
        )
        .unwrap_err();
        assert!(is_not_found(&err));

        let add = || {
            run(
                &ballot,
                Command::User(UserCommand::Add {
                    name: "Ada".into(),
                    email: "ada@example.com".into(),
                    password: "password1".into(),
                }),
            )
        };
        add().unwrap();
        let err = add().unwrap_err();
        assert!(!is_not_found(&err));
    }
}
