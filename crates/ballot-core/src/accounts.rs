use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use rand_core::OsRng;

use crate::error::{BallotError, Result};

/// Hash a password credential with Argon2id and a random salt.
/// The PHC string is the only form in which the credential is stored.
pub(crate) fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| BallotError::PasswordHash(e.to_string()))?
        .to_string();
    Ok(hash)
}
