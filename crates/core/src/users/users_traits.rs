use async_trait::async_trait;

use super::users_model::{NewUser, User};
use crate::errors::Result;
use crate::fx::Currency;

#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    fn get_user(&self, user_id: &str) -> Result<Option<User>>;
    fn list_users(&self) -> Result<Vec<User>>;
    async fn insert_user(&self, user: User) -> Result<User>;
    async fn update_default_currency(&self, user_id: &str, currency: Currency) -> Result<User>;
}

#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn create_user(&self, new_user: NewUser) -> Result<User>;
    /// Fails with `NotFound` for an unknown id.
    fn get_user(&self, user_id: &str) -> Result<User>;
    fn list_users(&self) -> Result<Vec<User>>;
    async fn update_default_currency(&self, user_id: &str, currency: Currency) -> Result<User>;
}
