//! Inventory model shared by every domain instantiation.
//!
//! A `Resource` is one bookable unit (a room, a parking spot); a
//! `Requester` is whoever claims it (a guest, a vehicle). Which concrete
//! categories exist is up to the domain crate, via the `Category` trait.

use std::fmt;
use std::str::FromStr;

pub type ResourceId = String;
pub type RequesterId = String;

/// A category of inventory (room class, spot kind).
///
/// Rates are flat per category and fixed by the domain crate; the core
/// only copies them onto resources at registration time.
pub trait Category: Clone + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Flat rate charged for a resource of this category.
    fn rate(&self) -> u64;
}

/// Lifecycle of a single resource.
///
/// `Booked` means claimed but not yet in use; the direct claim flow
/// (parking) skips it and goes straight to `Occupied`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceStatus {
    Available,
    Booked,
    Occupied,
    Unavailable,
}

impl ResourceStatus {
    /// The transition table. Everything not listed here is rejected by
    /// the service with an `InvalidTransition` error.
    pub fn can_transition_to(self, next: ResourceStatus) -> bool {
        use ResourceStatus::*;

        matches!(
            (self, next),
            (Available, Booked)
                | (Available, Occupied)
                | (Booked, Occupied)
                | (Booked, Available)
                | (Occupied, Available)
                | (Available, Unavailable)
                | (Unavailable, Available)
        )
    }
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResourceStatus::Available => "Available",
            ResourceStatus::Booked => "Booked",
            ResourceStatus::Occupied => "Occupied",
            ResourceStatus::Unavailable => "Unavailable",
        };
        f.write_str(s)
    }
}

impl FromStr for ResourceStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(ResourceStatus::Available),
            "Booked" => Ok(ResourceStatus::Booked),
            "Occupied" => Ok(ResourceStatus::Occupied),
            "Unavailable" => Ok(ResourceStatus::Unavailable),
            other => Err(anyhow::anyhow!("Invalid ResourceStatus value: {}", other)),
        }
    }
}

/// One bookable unit of inventory.
///
/// Resources are registered once and never deleted; only their status
/// changes, and only through the reservation service.
#[derive(Debug, Clone)]
pub struct Resource<C> {
    pub id: ResourceId,
    pub category: C,
    pub status: ResourceStatus,
    /// Copied from the category at registration time.
    pub rate: u64,
}

impl<C: Category> Resource<C> {
    pub fn new(id: impl Into<ResourceId>, category: C) -> Self {
        let rate = category.rate();
        Self {
            id: id.into(),
            category,
            status: ResourceStatus::Available,
            rate,
        }
    }
}

/// Whoever claims resources: a guest, a vehicle.
///
/// When `required_category` is set, a claim is admitted only for a
/// resource of exactly that category (a truck cannot take a car spot).
#[derive(Debug, Clone)]
pub struct Requester<C> {
    pub id: RequesterId,
    pub name: String,
    pub contact: Option<String>,
    pub required_category: Option<C>,
}

impl<C> Requester<C> {
    pub fn new(id: impl Into<RequesterId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            contact: None,
            required_category: None,
        }
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    pub fn requiring(mut self, category: C) -> Self {
        self.required_category = Some(category);
        self
    }
}
