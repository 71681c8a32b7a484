//! Users own ledgers and snapshots and pick the display currency.

mod users_model;
mod users_service;
mod users_traits;

pub use users_model::{NewUser, User, DEFAULT_USER_CURRENCY};
pub use users_service::UserService;
pub use users_traits::{UserRepositoryTrait, UserServiceTrait};
