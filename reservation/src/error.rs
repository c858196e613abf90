use thiserror::Error;

use crate::model::{ReservationId, ReservationStatus};
use inventory::types::{RequesterId, ResourceId, ResourceStatus};

pub type Result<T> = std::result::Result<T, ReservationError>;

/// Every way a reservation call can be rejected.
///
/// Three families: unknown identities, registration collisions, and
/// operations that are invalid in the current state. A rejected call
/// leaves the registry untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReservationError {
    #[error("no resource registered under id `{0}`")]
    ResourceNotFound(ResourceId),

    #[error("no reservation registered under id `{0}`")]
    ReservationNotFound(ReservationId),

    #[error("no requester registered under id `{0}`")]
    RequesterNotFound(RequesterId),

    #[error("resource id `{0}` is already registered")]
    DuplicateResource(ResourceId),

    #[error("requester id `{0}` is already registered")]
    DuplicateRequester(RequesterId),

    #[error("resource `{id}` is {status}, not Available")]
    ResourceUnavailable {
        id: ResourceId,
        status: ResourceStatus,
    },

    #[error("resource transition {from} -> {to} is not allowed")]
    InvalidTransition {
        from: ResourceStatus,
        to: ResourceStatus,
    },

    #[error("reservation `{id}` is already {status}")]
    AlreadyTerminated {
        id: ReservationId,
        status: ReservationStatus,
    },

    #[error("resource `{resource}` is a {actual} unit, requester needs {required}")]
    CategoryMismatch {
        resource: ResourceId,
        required: String,
        actual: String,
    },

    #[error("requester `{0}` holds no open reservation")]
    NotCurrentlyHeld(RequesterId),

    #[error("reservation interval ends before it starts")]
    InvalidInterval,
}

impl ReservationError {
    /// Stable label used as the `outcome` field of audit events.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ResourceNotFound(_) => "resource_not_found",
            Self::ReservationNotFound(_) => "reservation_not_found",
            Self::RequesterNotFound(_) => "requester_not_found",
            Self::DuplicateResource(_) => "duplicate_resource",
            Self::DuplicateRequester(_) => "duplicate_requester",
            Self::ResourceUnavailable { .. } => "resource_unavailable",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::AlreadyTerminated { .. } => "already_terminated",
            Self::CategoryMismatch { .. } => "category_mismatch",
            Self::NotCurrentlyHeld(_) => "not_currently_held",
            Self::InvalidInterval => "invalid_interval",
        }
    }
}
