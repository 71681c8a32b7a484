use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::users_model::{NewUser, User, DEFAULT_USER_CURRENCY};
use super::users_traits::{UserRepositoryTrait, UserServiceTrait};
use crate::errors::{Error, Result};
use crate::fx::Currency;
use crate::utils::Clock;

pub struct UserService {
    repository: Arc<dyn UserRepositoryTrait>,
    clock: Arc<dyn Clock>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepositoryTrait>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    async fn create_user(&self, new_user: NewUser) -> Result<User> {
        new_user.validate()?;
        let now = self.clock.now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: new_user.email.trim().to_lowercase(),
            password_hash: new_user.password_hash.unwrap_or_default(),
            default_currency: new_user.default_currency.unwrap_or(DEFAULT_USER_CURRENCY),
            created_at: now,
            updated_at: now,
        };
        let created = self.repository.insert_user(user).await?;
        log::debug!("Created user {}", created.id);
        Ok(created)
    }

    fn get_user(&self, user_id: &str) -> Result<User> {
        self.repository
            .get_user(user_id)?
            .ok_or_else(|| Error::NotFound(format!("User {} not found", user_id)))
    }

    fn list_users(&self) -> Result<Vec<User>> {
        self.repository.list_users()
    }

    async fn update_default_currency(&self, user_id: &str, currency: Currency) -> Result<User> {
        self.get_user(user_id)?;
        self.repository
            .update_default_currency(user_id, currency)
            .await
    }
}
