use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use tracing::{error, warn};

lazy_static! {
    // Verified against when the username is unknown, so that path costs the same.
    static ref DUMMY_HASH: Option<String> = hash_password("fintrack-dummy-password").ok();
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Burns one verification worth of work. Always reports a mismatch.
pub fn verify_dummy(plain: &str) -> bool {
    burn_verification(plain, DUMMY_HASH.as_deref())
}

fn burn_verification(plain: &str, hash: Option<&str>) -> bool {
    match hash {
        Some(hash) => {
            let _ = verify_password(plain, hash);
        }
        None => warn!("dummy password hash unavailable; unknown-user logins skip hashing work"),
    }
    false
}
