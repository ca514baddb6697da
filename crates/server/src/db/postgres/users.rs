//! User account queries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use pet_store_core::{Authority, Email, UserId};

use super::{PgStorage, expect_affected, map_write_error};
use crate::db::{RepositoryError, UserRepository};
use crate::models::{Cart, User};

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: UserId,
    username: String,
    password_hash: String,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    authority: Authority,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = row
            .email
            .map(|e| Email::parse(&e))
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid user email in database: {e}"))
            })?;

        Ok(Self {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            first_name: row.first_name,
            last_name: row.last_name,
            email,
            phone: row.phone,
            authority: row.authority,
            created_at: row.created_at,
        })
    }
}

const USER_COLUMNS: &str =
    "id, username, password_hash, first_name, last_name, email, phone, authority, created_at";

#[async_trait]
impl UserRepository for PgStorage {
    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM pms.app_user ORDER BY created_at, id"
        ))
        .fetch_all(self.pool())
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn find_user(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM pms.app_user WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM pms.app_user WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(self.pool())
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn insert_user(&self, user: &User, cart: &Cart) -> Result<(), RepositoryError> {
        let mut tx = self.pool().begin().await?;

        sqlx::query(
            r"
            INSERT INTO pms.app_user
                (id, username, password_hash, first_name, last_name, email, phone, authority, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.email.as_ref())
        .bind(&user.phone)
        .bind(user.authority)
        .bind(user.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, &format!("username {} is taken", user.username)))?;

        sqlx::query("INSERT INTO pms.cart (id, user_id) VALUES ($1, $2)")
            .bind(&cart.id)
            .bind(&user.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_write_error(e, "cart already exists"))?;

        tx.commit().await?;
        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE pms.app_user
            SET username = $2, password_hash = $3, first_name = $4, last_name = $5,
                email = $6, phone = $7, authority = $8
            WHERE id = $1
            ",
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.email.as_ref())
        .bind(&user.phone)
        .bind(user.authority)
        .execute(self.pool())
        .await
        .map_err(|e| map_write_error(e, &format!("username {} is taken", user.username)))?;

        expect_affected(result.rows_affected())
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), RepositoryError> {
        // cart cascades, managed stocks lose their manager
        let result = sqlx::query("DELETE FROM pms.app_user WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        expect_affected(result.rows_affected())
    }
}
