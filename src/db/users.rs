use anyhow::{Context, Result};
use chrono::Utc;

use crate::db::{parse_timestamp, FightStore};
use crate::models::{NewUser, User, UserUpdate};

impl FightStore {
    pub async fn insert_user(&self, user: &NewUser) -> Result<User> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, email, display_name, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to insert user")?;

        let id = result.last_insert_rowid();
        self.get_user(id)
            .await?
            .with_context(|| format!("User {} missing after insert", id))
    }

    pub async fn get_user(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user")?;

        Ok(row.map(|r| r.into()))
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.find_user("username", username).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.find_user("email", email).await
    }

    /// Lookup on a unique text column
    async fn find_user(&self, column: &'static str, value: &str) -> Result<Option<User>> {
        let sql = format!("SELECT * FROM users WHERE {} = ?", column);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to fetch user by {}", column))?;

        Ok(row.map(|r| r.into()))
    }

    pub async fn update_user(&self, id: i64, update: UserUpdate) -> Result<Option<User>> {
        let mut user = match self.get_user(id).await? {
            Some(user) => user,
            None => return Ok(None),
        };
        if let Some(email) = update.email {
            user.email = email;
        }
        if update.display_name.is_some() {
            user.display_name = update.display_name;
        }

        sqlx::query("UPDATE users SET email = ?, display_name = ? WHERE id = ?")
            .bind(&user.email)
            .bind(&user.display_name)
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to update user")?;

        Ok(Some(user))
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    display_name: Option<String>,
    created_at: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            display_name: row.display_name,
            created_at: parse_timestamp(&row.created_at),
        }
    }
}
