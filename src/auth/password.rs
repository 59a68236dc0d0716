use anyhow::anyhow;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;

lazy_static! {
    /// Hash checked against when the email is unknown, so a failed login costs
    /// the same whether or not the account exists.
    static ref DECOY_HASH: Option<String> = hash_password("taskboard-decoy-password").ok();
}

/// Argon2id, default cost. Every account gets a fresh salt.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("hash password: {e}"))
}

/// `Ok(false)` on mismatch. `Err` means the stored value is not a PHC hash,
/// i.e. the users row is corrupt.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let stored = PasswordHash::new(stored).map_err(|e| anyhow!("stored password hash: {e}"))?;
    match Argon2::default().verify_password(plain.as_bytes(), &stored) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow!("verify password: {e}")),
    }
}

/// Burns one verification against the decoy hash. Always returns `false`.
pub fn verify_against_decoy(plain: &str) -> bool {
    if let Some(hash) = DECOY_HASH.as_ref() {
        let _ = verify_password(plain, hash);
    }
    false
}
