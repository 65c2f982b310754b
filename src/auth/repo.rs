use crate::auth::repo_types::User;
use sqlx::PgPool;
use uuid::Uuid;

/// Fields needed to create a user.
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub full_name: &'a str,
    pub company: Option<&'a str>,
}

impl User {
    /// Find a user by email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, full_name, company, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, full_name, company, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with hashed password.
    pub async fn create(db: &PgPool, new: NewUser<'_>) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, full_name, company)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password_hash, full_name, company, created_at, updated_at
            "#,
        )
        .bind(new.email)
        .bind(new.password_hash)
        .bind(new.full_name)
        .bind(new.company)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        full_name: &str,
        company: Option<&str>,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
               SET full_name = $2, company = $3, updated_at = now()
             WHERE id = $1
            RETURNING id, email, password_hash, full_name, company, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(full_name)
        .bind(company)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }
}
