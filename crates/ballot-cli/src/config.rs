use std::path::PathBuf;

const DEFAULT_DB_PATH: &str = "ballot.db";

pub struct Config {
    pub db_path: PathBuf,
}

impl Config {
    /// Read settings from the process environment (after `.env` is loaded).
    /// A `--db` flag wins over `BALLOT_DB_PATH`.
    pub fn from_env(db_override: Option<PathBuf>) -> Self {
        Self::from_vars(db_override, |key| std::env::var(key).ok())
    }

    fn from_vars<F>(db_override: Option<PathBuf>, var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = db_override
            .or_else(|| var("BALLOT_DB_PATH").filter(|v| !v.is_empty()).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        Self { db_path }
    }
}
