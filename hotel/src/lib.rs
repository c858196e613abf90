//! Hotel instantiation of the reservation core.
//!
//! Guests book rooms through a front desk, check in, and check out.
//! Rooms follow the two-phase flow: a fresh booking holds the room as
//! Booked, check-in moves it to Occupied.

use std::fmt;
use std::sync::Arc;

use inventory::types::{Category, Requester};
use reservation::audit::TracingAudit;
use reservation::service::{ClaimPolicy, ReservationService};

/// Room classes on offer, with their nightly rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomClass {
    Basic,
    Deluxe,
}

impl fmt::Display for RoomClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RoomClass::Basic => "Basic",
            RoomClass::Deluxe => "Deluxe",
        })
    }
}

impl Category for RoomClass {
    fn rate(&self) -> u64 {
        match self {
            RoomClass::Basic => 2000,
            RoomClass::Deluxe => 4000,
        }
    }
}

/// The front desk: a reservation service over room inventory.
pub type FrontDesk<A> = ReservationService<RoomClass, A>;

/// Front desk wired to the default tracing audit sink.
pub fn front_desk() -> FrontDesk<TracingAudit> {
    ReservationService::new(ClaimPolicy::two_phase(), Arc::new(TracingAudit))
}

/// A guest. Guests may book any room class, so no category binding.
pub fn guest(id: &str, name: &str, email: &str) -> Requester<RoomClass> {
    Requester::new(id, name).with_contact(email)
}
