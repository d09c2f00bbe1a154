use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo_types::{EmailVerificationHash, User};

impl User {
    /// Full user row by the login identifier (email).
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, phone, profile_picture,
                   email_verified, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Insert the user row and its interest rows in one transaction.
    pub async fn create_with_interests(
        db: &PgPool,
        username: &str,
        email: &str,
        password_hash: &str,
        phone: Option<&str>,
        interests: &[String],
    ) -> anyhow::Result<User> {
        let mut tx = db.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password_hash, phone, profile_picture,
                      email_verified, created_at
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(phone)
        .fetch_one(&mut *tx)
        .await?;

        for interest in interests {
            sqlx::query(
                "INSERT INTO interests (user_id, interest) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(user.id)
            .bind(interest)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(user)
    }

    pub async fn update_password_by_email(
        db: &PgPool,
        email: &str,
        password_hash: &str,
    ) -> anyhow::Result<u64> {
        let done = sqlx::query("UPDATE users SET password_hash = $1 WHERE email = $2")
            .bind(password_hash)
            .bind(email)
            .execute(db)
            .await?;
        Ok(done.rows_affected())
    }

    pub async fn update_password_by_id(
        db: &PgPool,
        user_id: Uuid,
        password_hash: &str,
    ) -> anyhow::Result<u64> {
        let done = sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(done.rows_affected())
    }
}

impl EmailVerificationHash {
    /// Persist a freshly issued verification token for an email address.
    pub async fn save(db: &PgPool, hash: &str, email: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO email_verification_hashes (hash, email)
            VALUES ($1, $2)
            ON CONFLICT (hash) DO NOTHING
            "#,
        )
        .bind(hash)
        .bind(email)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Deletes the token and flips `email_verified` for its email, in one
    /// transaction. Returns false for unknown or already-consumed tokens.
    pub async fn consume(db: &PgPool, hash: &str) -> anyhow::Result<bool> {
        let mut tx = db.begin().await?;

        let row: Option<(String,)> = sqlx::query_as(
            "DELETE FROM email_verification_hashes WHERE hash = $1 RETURNING email",
        )
        .bind(hash)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((email,)) = row else {
            return Ok(false);
        };

        let done = sqlx::query("UPDATE users SET email_verified = TRUE WHERE email = $1")
            .bind(&email)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(done.rows_affected() > 0)
    }
}
