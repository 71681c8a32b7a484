//! Portfolio snapshot module - end-of-day totals and the value series.

mod snapshot_model;
pub mod snapshot_scheduler;
pub mod snapshot_service;
mod snapshot_traits;

pub use snapshot_model::*;
pub use snapshot_scheduler::*;
pub use snapshot_service::*;
pub use snapshot_traits::*;
