use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use inventory::types::{RequesterId, ResourceId};

pub type ReservationId = uuid::Uuid;

/// Lifecycle of a reservation record.
///
/// Two-phase claims open as `Confirmed` and become `Active` at check-in;
/// direct claims open as `Active`. `Canceled` and `Closed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReservationStatus {
    Confirmed,
    Active,
    Canceled,
    Closed,
}

impl ReservationStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, ReservationStatus::Canceled | ReservationStatus::Closed)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReservationStatus::Confirmed => "Confirmed",
            ReservationStatus::Active => "Active",
            ReservationStatus::Canceled => "Canceled",
            ReservationStatus::Closed => "Closed",
        };
        f.write_str(s)
    }
}

impl FromStr for ReservationStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Confirmed" => Ok(ReservationStatus::Confirmed),
            "Active" => Ok(ReservationStatus::Active),
            "Canceled" => Ok(ReservationStatus::Canceled),
            "Closed" => Ok(ReservationStatus::Closed),
            other => Err(anyhow::anyhow!("Invalid ReservationStatus value: {}", other)),
        }
    }
}

/// The span a reservation covers.
///
/// A hotel stay knows both ends up front; a parking receipt opens with
/// the entry time only and gets its end stamped on release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
}

impl Interval {
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self { start, end: None }
    }

    /// A bounded interval must not end before it starts.
    pub fn is_well_formed(&self) -> bool {
        match self.end {
            Some(end) => end >= self.start,
            None => true,
        }
    }
}

/// One reservation: a requester bound to a resource for an interval.
///
/// Records are never deleted; terminated ones stay in the registry so
/// history queries can see them.
#[derive(Debug, Clone, Serialize)]
pub struct Reservation {
    pub id: ReservationId,

    // Identity
    pub requester_id: RequesterId,
    pub resource_id: ResourceId,

    // Span
    pub interval: Interval,
    pub created_at: DateTime<Utc>,

    // Lifecycle
    pub status: ReservationStatus,
}
