use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{FromRow, Pool, Postgres};

use super::super::{
    error::{DbError, Result},
    models::{NewUser, UserRole, UserRow, UserUpdate},
    repositories::UsersRepository,
};

const USER_COLUMNS: &str = "id, username, email, address, contact, role";

#[derive(FromRow)]
struct UserRecord {
    id: i32,
    username: String,
    email: String,
    address: String,
    contact: String,
    role: String,
}

impl TryFrom<UserRecord> for UserRow {
    type Error = DbError;

    fn try_from(record: UserRecord) -> Result<Self> {
        let role = record.role.parse::<UserRole>().map_err(|_| {
            DbError::UnexpectedQueryResult(format!(
                "`role` ({}) of user {} is not a known role",
                record.role, record.id
            ))
        })?;

        Ok(Self {
            id: record.id,
            username: record.username,
            email: record.email,
            address: record.address,
            contact: record.contact,
            role,
        })
    }
}

pub(crate) struct PgUsersRepo {
    pool: Arc<Pool<Postgres>>,
}

impl PgUsersRepo {
    pub fn new(pool: Arc<Pool<Postgres>>) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &Pool<Postgres> {
        self.pool.as_ref()
    }
}

#[async_trait]
impl UsersRepository for PgUsersRepo {
    async fn get_users(&self) -> Result<Vec<UserRow>> {
        let records = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id DESC"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(DbError::Query)?;

        records.into_iter().map(UserRow::try_from).collect()
    }

    async fn add_user(&self, user: &NewUser) -> Result<UserRow> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "INSERT INTO users (username, email, password, address, contact, role)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.address)
        .bind(&user.contact)
        .bind(user.role.as_ref())
        .fetch_one(self.pool())
        .await
        .map_err(DbError::from_write)?;

        UserRow::try_from(record)
    }

    async fn get_user_by_credentials(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<UserRow>> {
        sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND password = $2"
        ))
        .bind(email)
        .bind(password_hash)
        .fetch_optional(self.pool())
        .await
        .map_err(DbError::Query)?
        .map(UserRow::try_from)
        .transpose()
    }

    async fn update_user(&self, user_id: i32, update: &UserUpdate) -> Result<Option<UserRow>> {
        sqlx::query_as::<_, UserRecord>(&format!(
            "UPDATE users
             SET username = $1, email = $2, address = $3, contact = $4, role = $5
             WHERE id = $6
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&update.username)
        .bind(&update.email)
        .bind(&update.address)
        .bind(&update.contact)
        .bind(update.role.as_ref())
        .bind(user_id)
        .fetch_optional(self.pool())
        .await
        .map_err(DbError::from_write)?
        .map(UserRow::try_from)
        .transpose()
    }

    async fn remove_user(&self, user_id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(self.pool())
            .await
            .map_err(DbError::Query)?;

        Ok(result.rows_affected() > 0)
    }
}
