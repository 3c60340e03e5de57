use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use regex::Regex;
use tracing::error;

pub const PASSWORD_MIN_LEN: usize = 5;

/// Length of an issued token key, in characters.
pub const TOKEN_KEY_LEN: usize = 40;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Lower-case the domain portion only; the local part is case-significant
/// and stays as the user typed it.
pub fn normalize_email(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => trimmed.to_string(),
    }
}

/// Random opaque key for the token table.
pub fn generate_token_key() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_KEY_LEN)
        .map(char::from)
        .collect()
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
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

#[cfg(test)]
mod password_tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}

#[cfg(test)]
mod email_tests {
    use super::*;

    #[test]
    fn domain_is_lowercased_local_part_preserved() {
        let cases = [
            ("test1@EXAMPLE.com", "test1@example.com"),
            ("Test2@EXAMPLE.com", "Test2@example.com"),
            ("TEST3@EXAMPLE.com", "TEST3@example.com"),
            ("test4@example.COM", "test4@example.com"),
        ];
        for (raw, expected) in cases {
            assert_eq!(normalize_email(raw), expected);
        }
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(normalize_email("  user@Example.COM \n"), "user@example.com");
    }

    #[test]
    fn validation_rejects_garbage() {
        assert!(is_valid_email("user@example.com"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("two words@example.com"));
        assert!(!is_valid_email("user@nodot"));
    }
}

#[cfg(test)]
mod token_tests {
    use super::*;

    #[test]
    fn key_is_forty_alphanumeric_chars() {
        let key = generate_token_key();
        assert_eq!(key.len(), TOKEN_KEY_LEN);
        assert!(key.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn keys_differ_between_issuances() {
        assert_ne!(generate_token_key(), generate_token_key());
    }
}
