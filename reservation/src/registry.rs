//! In-memory registry of resources, requesters, and reservations.
//!
//! A plain struct with no locking of its own; `ReservationService` wraps
//! it in `Arc<Mutex<...>>` and every mutation happens inside that lock.

use std::collections::HashMap;

use crate::model::{Reservation, ReservationId};
use inventory::types::{Requester, RequesterId, Resource, ResourceId, ResourceStatus};

#[derive(Debug, Default)]
pub struct Registry<C> {
    resources: HashMap<ResourceId, Resource<C>>,
    requesters: HashMap<RequesterId, Requester<C>>,
    reservations: HashMap<ReservationId, Reservation>,
    /// Secondary index, in creation order per requester.
    by_requester: HashMap<RequesterId, Vec<ReservationId>>,
}

impl<C> Registry<C> {
    pub fn new() -> Self {
        Self {
            resources: HashMap::new(),
            requesters: HashMap::new(),
            reservations: HashMap::new(),
            by_requester: HashMap::new(),
        }
    }

    pub fn resource(&self, id: &str) -> Option<&Resource<C>> {
        self.resources.get(id)
    }

    pub fn resource_mut(&mut self, id: &str) -> Option<&mut Resource<C>> {
        self.resources.get_mut(id)
    }

    pub fn requester(&self, id: &str) -> Option<&Requester<C>> {
        self.requesters.get(id)
    }

    pub fn reservation(&self, id: &ReservationId) -> Option<&Reservation> {
        self.reservations.get(id)
    }

    pub fn reservation_mut(&mut self, id: &ReservationId) -> Option<&mut Reservation> {
        self.reservations.get_mut(id)
    }

    pub fn insert_resource(&mut self, resource: Resource<C>) {
        self.resources.insert(resource.id.clone(), resource);
    }

    pub fn insert_requester(&mut self, requester: Requester<C>) {
        self.requesters.insert(requester.id.clone(), requester);
    }

    /// Store a fresh reservation and index it under its requester.
    pub fn record_reservation(&mut self, reservation: Reservation) {
        self.by_requester
            .entry(reservation.requester_id.clone())
            .or_default()
            .push(reservation.id);

        self.reservations.insert(reservation.id, reservation);
    }

    /// Every reservation a requester ever made, terminated ones
    /// included, in creation order.
    pub fn reservations_for(&self, requester_id: &str) -> Vec<Reservation> {
        let Some(ids) = self.by_requester.get(requester_id) else {
            return vec![];
        };

        ids.iter()
            .filter_map(|rid| self.reservations.get(rid).cloned())
            .collect()
    }

    /// The oldest reservation the requester still holds open, if any.
    pub fn open_reservation_for(&self, requester_id: &str) -> Option<ReservationId> {
        let ids = self.by_requester.get(requester_id)?;

        ids.iter()
            .find(|rid| {
                self.reservations
                    .get(rid)
                    .is_some_and(|r| !r.status.is_terminal())
            })
            .copied()
    }

    /// Ids of every resource currently Available, sorted for stable
    /// output.
    pub fn available_resources(&self) -> Vec<ResourceId> {
        let mut ids: Vec<ResourceId> = self
            .resources
            .values()
            .filter(|r| r.status == ResourceStatus::Available)
            .map(|r| r.id.clone())
            .collect();

        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use std::fmt;

    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::model::{Interval, ReservationStatus};
    use inventory::types::Category;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Flat;

    impl fmt::Display for Flat {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("Flat")
        }
    }

    impl Category for Flat {
        fn rate(&self) -> u64 {
            10
        }
    }

    fn record(reg: &mut Registry<Flat>, requester_id: &str, resource_id: &str) -> ReservationId {
        let id = Uuid::new_v4();
        reg.record_reservation(Reservation {
            id,
            requester_id: requester_id.into(),
            resource_id: resource_id.into(),
            interval: Interval::starting_at(Utc::now()),
            created_at: Utc::now(),
            status: ReservationStatus::Active,
        });
        id
    }

    #[test]
    fn reservations_for_preserves_creation_order() {
        let mut reg = Registry::new();

        let first = record(&mut reg, "u1", "r1");
        let second = record(&mut reg, "u1", "r2");
        let third = record(&mut reg, "u1", "r3");
        record(&mut reg, "u2", "r4");

        let history = reg.reservations_for("u1");

        let ids: Vec<ReservationId> = history.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![first, second, third]);
    }

    #[test]
    fn open_reservation_skips_terminated_ones() {
        let mut reg = Registry::new();

        let first = record(&mut reg, "u1", "r1");
        let second = record(&mut reg, "u1", "r2");

        reg.reservation_mut(&first).unwrap().status = ReservationStatus::Canceled;

        assert_eq!(reg.open_reservation_for("u1"), Some(second));

        reg.reservation_mut(&second).unwrap().status = ReservationStatus::Closed;

        assert_eq!(reg.open_reservation_for("u1"), None);
    }

    #[test]
    fn open_reservation_for_unknown_requester_is_none() {
        let reg: Registry<Flat> = Registry::new();

        assert_eq!(reg.open_reservation_for("ghost"), None);
    }

    #[test]
    fn available_resources_is_sorted_and_filtered() {
        let mut reg = Registry::new();

        reg.insert_resource(Resource::new("b", Flat));
        reg.insert_resource(Resource::new("a", Flat));
        reg.insert_resource(Resource::new("c", Flat));

        reg.resource_mut("b").unwrap().status = ResourceStatus::Occupied;

        assert_eq!(reg.available_resources(), vec!["a".to_string(), "c".to_string()]);
    }
}
