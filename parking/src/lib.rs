//! Parking lot instantiation of the reservation core.
//!
//! Vehicles take spots directly (no booked-but-empty phase) and must
//! match the spot kind exactly. The reservation record doubles as the
//! parking receipt: entry time on creation, exit time stamped on
//! release.

use std::fmt;
use std::sync::Arc;

use inventory::types::{Category, Requester};
use reservation::audit::TracingAudit;
use reservation::service::{ClaimPolicy, ReservationService};

/// Spot kinds and their flat rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpotKind {
    Car,
    Motorcycle,
    Truck,
}

impl fmt::Display for SpotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SpotKind::Car => "Car",
            SpotKind::Motorcycle => "Motorcycle",
            SpotKind::Truck => "Truck",
        })
    }
}

impl Category for SpotKind {
    fn rate(&self) -> u64 {
        match self {
            SpotKind::Car => 50,
            SpotKind::Motorcycle => 20,
            SpotKind::Truck => 100,
        }
    }
}

/// The lot: a reservation service over spot inventory.
pub type ParkingLot<A> = ReservationService<SpotKind, A>;

/// Parking lot wired to the default tracing audit sink.
pub fn parking_lot() -> ParkingLot<TracingAudit> {
    ReservationService::new(ClaimPolicy::direct(), Arc::new(TracingAudit))
}

/// A vehicle, identified by its plate and bound to its spot kind.
pub fn vehicle(plate: &str, kind: SpotKind) -> Requester<SpotKind> {
    Requester::new(plate, plate).requiring(kind)
}

pub fn car(plate: &str) -> Requester<SpotKind> {
    vehicle(plate, SpotKind::Car)
}

pub fn motorcycle(plate: &str) -> Requester<SpotKind> {
    vehicle(plate, SpotKind::Motorcycle)
}

pub fn truck(plate: &str) -> Requester<SpotKind> {
    vehicle(plate, SpotKind::Truck)
}
