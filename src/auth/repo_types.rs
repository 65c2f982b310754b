use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

pub const MIN_PASSWORD_LEN: usize = 8;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,      // Argon2 hash, not exposed in JSON
    pub full_name: String,
    pub company: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl User {
    /// Argon2 PHC string for a new account password.
    pub fn hash_password(plain: &str) -> anyhow::Result<String> {
        if plain.chars().count() < MIN_PASSWORD_LEN {
            anyhow::bail!("password shorter than {MIN_PASSWORD_LEN} characters");
        }
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plain.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| anyhow::anyhow!("argon2 hash: {e}"))
    }

    /// False on mismatch; errors only when the stored hash is unreadable.
    pub fn password_matches(&self, plain: &str) -> anyhow::Result<bool> {
        let stored = PasswordHash::new(&self.password_hash)
            .map_err(|e| anyhow::anyhow!("stored hash for {}: {e}", self.id))?;
        Ok(Argon2::default()
            .verify_password(plain.as_bytes(), &stored)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_hash(password_hash: String) -> User {
        User {
            id: Uuid::new_v4(),
            email: "ana@example.com".into(),
            password_hash,
            full_name: "Ana Silva".into(),
            company: Some("Acme".into()),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn stored_hash_accepts_only_its_password() {
        let user = user_with_hash(User::hash_password("lunchbox-42").unwrap());
        assert!(user.password_hash.starts_with("$argon2"));
        assert!(user.password_matches("lunchbox-42").unwrap());
        assert!(!user.password_matches("lunchbox-43").unwrap());
    }

    #[test]
    fn short_passwords_are_never_hashed() {
        assert!(User::hash_password("1234567").is_err());
    }

    #[test]
    fn unreadable_stored_hash_is_an_error() {
        let user = user_with_hash("plaintext".into());
        assert!(user.password_matches("plaintext").is_err());
    }

    #[test]
    fn hash_is_not_serialized() {
        let user = user_with_hash("secret".into());
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret"));
    }
}
