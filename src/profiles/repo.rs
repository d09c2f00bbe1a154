use sqlx::PgPool;
use uuid::Uuid;

use crate::profiles::repo_types::{EmailRow, IdentityRow, LikeMindRow, ProfileRow, UsernameRow};

impl UsernameRow {
    pub async fn get(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Self>> {
        let row = sqlx::query_as::<_, UsernameRow>("SELECT username FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(db)
            .await?;
        Ok(row)
    }
}

impl EmailRow {
    pub async fn get(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Self>> {
        let row = sqlx::query_as::<_, EmailRow>("SELECT email FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(db)
            .await?;
        Ok(row)
    }
}

impl ProfileRow {
    pub async fn get(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Self>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT username, email, phone, profile_picture, email_verified
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn get_by_username(db: &PgPool, username: &str) -> anyhow::Result<Option<Self>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT username, email, phone, profile_picture, email_verified
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }
}

impl IdentityRow {
    pub async fn get(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Self>> {
        let row = sqlx::query_as::<_, IdentityRow>(
            "SELECT username, profile_picture FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }
}

impl LikeMindRow {
    /// Every other user sharing at least one interest with `user_id`, one row
    /// per shared interest.
    pub async fn find_for(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, LikeMindRow>(
            r#"
            SELECT u.username, u.profile_picture, i.interest
            FROM users u
            JOIN interests i ON i.user_id = u.id
            WHERE u.id <> $1
              AND i.interest IN (SELECT interest FROM interests WHERE user_id = $1)
            ORDER BY u.username, i.interest
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}

pub async fn interests_of(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<String>> {
    let rows: Vec<(String,)> =
        sqlx::query_as("SELECT interest FROM interests WHERE user_id = $1 ORDER BY interest")
            .bind(user_id)
            .fetch_all(db)
            .await?;
    Ok(rows.into_iter().map(|(i,)| i).collect())
}

pub async fn interests_by_username(db: &PgPool, username: &str) -> anyhow::Result<Vec<String>> {
    let rows: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT i.interest
        FROM interests i
        JOIN users u ON u.id = i.user_id
        WHERE u.username = $1
        ORDER BY i.interest
        "#,
    )
    .bind(username)
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().map(|(i,)| i).collect())
}

pub async fn update_username(db: &PgPool, user_id: Uuid, username: &str) -> anyhow::Result<u64> {
    let done = sqlx::query("UPDATE users SET username = $1 WHERE id = $2")
        .bind(username)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(done.rows_affected())
}

pub async fn update_email(db: &PgPool, user_id: Uuid, email: &str) -> anyhow::Result<u64> {
    let done = sqlx::query("UPDATE users SET email = $1, email_verified = FALSE WHERE id = $2")
        .bind(email)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(done.rows_affected())
}

/// Columns the uniqueness probe may touch. Anything else never reaches SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueColumn {
    Username,
    Email,
    Phone,
}

impl UniqueColumn {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "username" => Some(Self::Username),
            "email" => Some(Self::Email),
            "phone" => Some(Self::Phone),
            _ => None,
        }
    }

    fn as_sql(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }
}

pub async fn value_exists(db: &PgPool, column: UniqueColumn, value: &str) -> anyhow::Result<bool> {
    let sql = format!(
        "SELECT EXISTS (SELECT 1 FROM users WHERE {} = $1)",
        column.as_sql()
    );
    let (exists,): (bool,) = sqlx::query_as(&sql).bind(value).fetch_one(db).await?;
    Ok(exists)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_column_whitelist() {
        assert_eq!(UniqueColumn::parse("username"), Some(UniqueColumn::Username));
        assert_eq!(UniqueColumn::parse("email"), Some(UniqueColumn::Email));
        assert_eq!(UniqueColumn::parse("phone"), Some(UniqueColumn::Phone));
        assert_eq!(UniqueColumn::parse("password_hash"), None);
        assert_eq!(UniqueColumn::parse("users; DROP TABLE users"), None);
    }
}
