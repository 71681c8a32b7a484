use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;

use super::model::UserDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::users;
use crate::utils::format_timestamp;
use tallyfolio_core::errors::{Error, Result};
use tallyfolio_core::fx::Currency;
use tallyfolio_core::users::{User, UserRepositoryTrait};

pub struct UserRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl UserRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let mut conn = get_connection(&self.pool)?;
        let row = users::table
            .find(user_id)
            .select(UserDB::as_select())
            .first::<UserDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(User::try_from).transpose()?)
    }

    fn list_users(&self) -> Result<Vec<User>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = users::table
            .select(UserDB::as_select())
            .order(users::created_at.asc())
            .load::<UserDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter()
            .map(|row| User::try_from(row).map_err(Error::from))
            .collect()
    }

    async fn insert_user(&self, user: User) -> Result<User> {
        let row = UserDB::from(user);
        self.writer
            .exec(move |conn| {
                let stored = diesel::insert_into(users::table)
                    .values(&row)
                    .returning(UserDB::as_returning())
                    .get_result::<UserDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(User::try_from(stored)?)
            })
            .await
    }

    async fn update_default_currency(&self, user_id: &str, currency: Currency) -> Result<User> {
        let id = user_id.to_string();
        self.writer
            .exec(move |conn| {
                let stored = diesel::update(users::table.find(&id))
                    .set((
                        users::default_currency.eq(currency.as_str()),
                        users::updated_at.eq(format_timestamp(&Utc::now())),
                    ))
                    .returning(UserDB::as_returning())
                    .get_result::<UserDB>(conn)
                    .optional()
                    .map_err(StorageError::from)?
                    .ok_or_else(|| Error::NotFound(format!("user {}", id)))?;
                Ok(User::try_from(stored)?)
            })
            .await
    }
}
