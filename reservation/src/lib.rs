pub mod admission;
pub mod audit;
pub mod error;
pub mod model;
pub mod registry;
pub mod service;

pub use error::{ReservationError, Result};
pub use service::{ClaimPolicy, ReservationService};
