//! Database model for users.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::StorageError;
use crate::utils::{format_timestamp, parse_currency, parse_timestamp};
use tallyfolio_core::users::User;

#[derive(Debug, Clone, Queryable, Selectable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct UserDB {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub default_currency: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<UserDB> for User {
    type Error = StorageError;

    fn try_from(db: UserDB) -> Result<Self, Self::Error> {
        Ok(User {
            default_currency: parse_currency("users.default_currency", &db.default_currency)?,
            created_at: parse_timestamp("users.created_at", &db.created_at)?,
            updated_at: parse_timestamp("users.updated_at", &db.updated_at)?,
            id: db.id,
            email: db.email,
            password_hash: db.password_hash,
        })
    }
}

impl From<User> for UserDB {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            password_hash: user.password_hash,
            default_currency: user.default_currency.as_str().to_string(),
            created_at: format_timestamp(&user.created_at),
            updated_at: format_timestamp(&user.updated_at),
        }
    }
}
