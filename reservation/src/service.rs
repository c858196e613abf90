//! The reservation service.
//!
//! For each mutating call, it:
//!   1. Takes the single registry lock.
//!   2. Runs every check (identity, admission, transition legality).
//!   3. Applies the state change, or nothing at all on rejection.
//!   4. Releases the lock and emits one audit event.
//!
//! The whole check-then-set runs inside one critical section, so of N
//! concurrent claims on a resource exactly one can win. One coarse lock
//! also serializes claims on *unrelated* resources; at this scale that
//! throughput cost is accepted rather than traded against correctness.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::admission::{self, Admission};
use crate::audit::{AuditEvent, AuditSink};
use crate::error::{ReservationError, Result};
use crate::model::{Interval, Reservation, ReservationId, ReservationStatus};
use crate::registry::Registry;
use inventory::types::{Category, Requester, Resource, ResourceId, ResourceStatus};

/// How a successful claim binds resource and reservation state together.
#[derive(Debug, Clone, Copy)]
pub struct ClaimPolicy {
    /// Status a resource enters when claimed.
    pub claimed: ResourceStatus,
    /// Status a fresh reservation opens with.
    pub opening: ReservationStatus,
}

impl ClaimPolicy {
    /// Claim now, occupy later: reserve -> check-in (hotel flow).
    pub fn two_phase() -> Self {
        Self {
            claimed: ResourceStatus::Booked,
            opening: ReservationStatus::Confirmed,
        }
    }

    /// The resource is in use the moment it is claimed (parking flow).
    pub fn direct() -> Self {
        Self {
            claimed: ResourceStatus::Occupied,
            opening: ReservationStatus::Active,
        }
    }
}

/// Coordinates all registry mutation under one lock and reports every
/// mutating call to the audit sink.
///
/// Explicitly constructed and explicitly owned; callers share it via
/// `Arc`. There is no global instance.
pub struct ReservationService<C, A> {
    registry: Arc<Mutex<Registry<C>>>,
    policy: ClaimPolicy,
    audit: Arc<A>,
}

impl<C: Category, A: AuditSink> ReservationService<C, A> {
    pub fn new(policy: ClaimPolicy, audit: Arc<A>) -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::new())),
            policy,
            audit,
        }
    }

    /// Register a new unit of inventory, starting out Available.
    pub async fn register_resource(&self, id: &str, category: C) -> Result<()> {
        let result = self.register_resource_inner(id, category).await;

        self.emit(AuditEvent {
            operation: "register_resource",
            resource_id: Some(id.to_string()),
            requester_id: None,
            reservation_id: None,
            outcome: outcome(&result),
        })
        .await;

        result
    }

    async fn register_resource_inner(&self, id: &str, category: C) -> Result<()> {
        let mut reg = self.registry.lock().await;

        if reg.resource(id).is_some() {
            return Err(ReservationError::DuplicateResource(id.to_string()));
        }

        reg.insert_resource(Resource::new(id, category));
        Ok(())
    }

    /// Register a requester. Requesters are immutable once registered.
    pub async fn register_requester(&self, requester: Requester<C>) -> Result<()> {
        let requester_id = requester.id.clone();
        let result = self.register_requester_inner(requester).await;

        self.emit(AuditEvent {
            operation: "register_requester",
            resource_id: None,
            requester_id: Some(requester_id),
            reservation_id: None,
            outcome: outcome(&result),
        })
        .await;

        result
    }

    async fn register_requester_inner(&self, requester: Requester<C>) -> Result<()> {
        let mut reg = self.registry.lock().await;

        if reg.requester(&requester.id).is_some() {
            return Err(ReservationError::DuplicateRequester(requester.id));
        }

        reg.insert_requester(requester);
        Ok(())
    }

    /// Claim a resource for a requester over an interval.
    ///
    /// Atomic with respect to every other mutation: the availability
    /// check and the claim happen under the same lock acquisition.
    pub async fn reserve(
        &self,
        requester_id: &str,
        resource_id: &str,
        interval: Interval,
    ) -> Result<Reservation> {
        let result = self.reserve_inner(requester_id, resource_id, interval).await;

        self.emit(AuditEvent {
            operation: "reserve",
            resource_id: Some(resource_id.to_string()),
            requester_id: Some(requester_id.to_string()),
            reservation_id: result.as_ref().ok().map(|r| r.id),
            outcome: outcome(&result),
        })
        .await;

        result
    }

    async fn reserve_inner(
        &self,
        requester_id: &str,
        resource_id: &str,
        interval: Interval,
    ) -> Result<Reservation> {
        if !interval.is_well_formed() {
            return Err(ReservationError::InvalidInterval);
        }

        let mut reg = self.registry.lock().await;

        let requester = reg
            .requester(requester_id)
            .ok_or_else(|| ReservationError::RequesterNotFound(requester_id.to_string()))?;
        let resource = reg
            .resource(resource_id)
            .ok_or_else(|| ReservationError::ResourceNotFound(resource_id.to_string()))?;

        match admission::check_claim(requester, resource) {
            Admission::Granted => {}
            Admission::NotAvailable(status) => {
                return Err(ReservationError::ResourceUnavailable {
                    id: resource_id.to_string(),
                    status,
                });
            }
            Admission::WrongCategory { required, actual } => {
                return Err(ReservationError::CategoryMismatch {
                    resource: resource_id.to_string(),
                    required,
                    actual,
                });
            }
        }

        let resource = reg
            .resource_mut(resource_id)
            .ok_or_else(|| ReservationError::ResourceNotFound(resource_id.to_string()))?;

        debug_assert!(
            resource.status.can_transition_to(self.policy.claimed),
            "admitted claim must be a legal transition"
        );
        resource.status = self.policy.claimed;

        let reservation = Reservation {
            id: Uuid::new_v4(),
            requester_id: requester_id.to_string(),
            resource_id: resource_id.to_string(),
            interval,
            created_at: Utc::now(),
            status: self.policy.opening,
        };

        reg.record_reservation(reservation.clone());
        Ok(reservation)
    }

    /// Check-in: a Confirmed reservation starts being used, its
    /// resource moves Booked -> Occupied.
    pub async fn activate(&self, reservation_id: ReservationId) -> Result<Reservation> {
        let result = self.activate_inner(reservation_id).await;

        self.emit(AuditEvent {
            operation: "activate",
            resource_id: result.as_ref().ok().map(|r| r.resource_id.clone()),
            requester_id: result.as_ref().ok().map(|r| r.requester_id.clone()),
            reservation_id: Some(reservation_id),
            outcome: outcome(&result),
        })
        .await;

        result
    }

    async fn activate_inner(&self, reservation_id: ReservationId) -> Result<Reservation> {
        let mut reg = self.registry.lock().await;

        let resv = reg
            .reservation(&reservation_id)
            .ok_or(ReservationError::ReservationNotFound(reservation_id))?;

        if resv.status.is_terminal() {
            return Err(ReservationError::AlreadyTerminated {
                id: reservation_id,
                status: resv.status,
            });
        }

        let resource_id = resv.resource_id.clone();
        let resource = reg
            .resource(&resource_id)
            .ok_or_else(|| ReservationError::ResourceNotFound(resource_id.clone()))?;

        if !resource.status.can_transition_to(ResourceStatus::Occupied) {
            return Err(ReservationError::InvalidTransition {
                from: resource.status,
                to: ResourceStatus::Occupied,
            });
        }

        // All checks passed; both writes below succeed together.
        reg.resource_mut(&resource_id)
            .ok_or_else(|| ReservationError::ResourceNotFound(resource_id.clone()))?
            .status = ResourceStatus::Occupied;

        let resv = reg
            .reservation_mut(&reservation_id)
            .ok_or(ReservationError::ReservationNotFound(reservation_id))?;
        resv.status = ReservationStatus::Active;

        Ok(resv.clone())
    }

    /// Cancel an open reservation; its resource returns to Available.
    pub async fn cancel(&self, reservation_id: ReservationId) -> Result<Reservation> {
        let result = self
            .terminate_inner(reservation_id, ReservationStatus::Canceled)
            .await;

        self.emit(AuditEvent {
            operation: "cancel",
            resource_id: result.as_ref().ok().map(|r| r.resource_id.clone()),
            requester_id: result.as_ref().ok().map(|r| r.requester_id.clone()),
            reservation_id: Some(reservation_id),
            outcome: outcome(&result),
        })
        .await;

        result
    }

    /// Check-out / exit by reservation id; an open-ended interval gets
    /// its end stamped with the close time.
    pub async fn close(&self, reservation_id: ReservationId) -> Result<Reservation> {
        let result = self
            .terminate_inner(reservation_id, ReservationStatus::Closed)
            .await;

        self.emit(AuditEvent {
            operation: "close",
            resource_id: result.as_ref().ok().map(|r| r.resource_id.clone()),
            requester_id: result.as_ref().ok().map(|r| r.requester_id.clone()),
            reservation_id: Some(reservation_id),
            outcome: outcome(&result),
        })
        .await;

        result
    }

    /// Unpark analogue: terminate the oldest reservation the requester
    /// still holds open.
    pub async fn release_by_requester(&self, requester_id: &str) -> Result<Reservation> {
        let result = self.release_by_requester_inner(requester_id).await;

        self.emit(AuditEvent {
            operation: "release_by_requester",
            resource_id: result.as_ref().ok().map(|r| r.resource_id.clone()),
            requester_id: Some(requester_id.to_string()),
            reservation_id: result.as_ref().ok().map(|r| r.id),
            outcome: outcome(&result),
        })
        .await;

        result
    }

    async fn release_by_requester_inner(&self, requester_id: &str) -> Result<Reservation> {
        let mut reg = self.registry.lock().await;

        reg.requester(requester_id)
            .ok_or_else(|| ReservationError::RequesterNotFound(requester_id.to_string()))?;

        let reservation_id = reg
            .open_reservation_for(requester_id)
            .ok_or_else(|| ReservationError::NotCurrentlyHeld(requester_id.to_string()))?;

        terminate(&mut reg, reservation_id, ReservationStatus::Closed)
    }

    async fn terminate_inner(
        &self,
        reservation_id: ReservationId,
        terminal: ReservationStatus,
    ) -> Result<Reservation> {
        let mut reg = self.registry.lock().await;
        terminate(&mut reg, reservation_id, terminal)
    }

    /// Administratively disable a resource. Only an Available resource
    /// can be taken out of service; live claims block it.
    pub async fn take_out_of_service(&self, resource_id: &str) -> Result<()> {
        let result = self
            .set_status_inner(resource_id, ResourceStatus::Unavailable)
            .await;

        self.emit(AuditEvent {
            operation: "take_out_of_service",
            resource_id: Some(resource_id.to_string()),
            requester_id: None,
            reservation_id: None,
            outcome: outcome(&result),
        })
        .await;

        result
    }

    /// Put an out-of-service resource back into rotation.
    pub async fn return_to_service(&self, resource_id: &str) -> Result<()> {
        let result = self
            .set_status_inner(resource_id, ResourceStatus::Available)
            .await;

        self.emit(AuditEvent {
            operation: "return_to_service",
            resource_id: Some(resource_id.to_string()),
            requester_id: None,
            reservation_id: None,
            outcome: outcome(&result),
        })
        .await;

        result
    }

    async fn set_status_inner(&self, resource_id: &str, next: ResourceStatus) -> Result<()> {
        let mut reg = self.registry.lock().await;

        let resource = reg
            .resource_mut(resource_id)
            .ok_or_else(|| ReservationError::ResourceNotFound(resource_id.to_string()))?;

        if !resource.status.can_transition_to(next) {
            return Err(ReservationError::InvalidTransition {
                from: resource.status,
                to: next,
            });
        }

        resource.status = next;
        Ok(())
    }

    /// Full reservation history of a requester, in creation order.
    /// Snapshot consistent with the lock at the instant of the call.
    pub async fn list_reservations_for(&self, requester_id: &str) -> Result<Vec<Reservation>> {
        let reg = self.registry.lock().await;

        reg.requester(requester_id)
            .ok_or_else(|| ReservationError::RequesterNotFound(requester_id.to_string()))?;

        Ok(reg.reservations_for(requester_id))
    }

    /// Ids of every resource currently Available, sorted.
    pub async fn list_available_resources(&self) -> Vec<ResourceId> {
        let reg = self.registry.lock().await;
        reg.available_resources()
    }

    pub async fn resource_status(&self, resource_id: &str) -> Result<ResourceStatus> {
        let reg = self.registry.lock().await;

        let resource = reg
            .resource(resource_id)
            .ok_or_else(|| ReservationError::ResourceNotFound(resource_id.to_string()))?;

        Ok(resource.status)
    }

    /// Helper to fetch a single resource.
    pub async fn get_resource(&self, resource_id: &str) -> Option<Resource<C>> {
        let reg = self.registry.lock().await;
        reg.resource(resource_id).cloned()
    }

    /// Helper to fetch a single reservation.
    pub async fn get_reservation(&self, id: ReservationId) -> Option<Reservation> {
        let reg = self.registry.lock().await;
        reg.reservation(&id).cloned()
    }

    async fn emit(&self, event: AuditEvent) {
        self.audit.record(event).await;
    }
}

/// Shared tail of cancel / close / release, run inside the caller's
/// lock: the reservation reaches the given terminal status and its
/// resource goes back to Available, or nothing changes.
fn terminate<C>(
    reg: &mut Registry<C>,
    reservation_id: ReservationId,
    terminal: ReservationStatus,
) -> Result<Reservation> {
    debug_assert!(terminal.is_terminal());

    let resv = reg
        .reservation(&reservation_id)
        .ok_or(ReservationError::ReservationNotFound(reservation_id))?;

    if resv.status.is_terminal() {
        return Err(ReservationError::AlreadyTerminated {
            id: reservation_id,
            status: resv.status,
        });
    }

    let resource_id = resv.resource_id.clone();
    let resource = reg
        .resource(&resource_id)
        .ok_or_else(|| ReservationError::ResourceNotFound(resource_id.clone()))?;

    if !resource.status.can_transition_to(ResourceStatus::Available) {
        return Err(ReservationError::InvalidTransition {
            from: resource.status,
            to: ResourceStatus::Available,
        });
    }

    reg.resource_mut(&resource_id)
        .ok_or_else(|| ReservationError::ResourceNotFound(resource_id.clone()))?
        .status = ResourceStatus::Available;

    let resv = reg
        .reservation_mut(&reservation_id)
        .ok_or(ReservationError::ReservationNotFound(reservation_id))?;

    resv.status = terminal;
    if terminal == ReservationStatus::Closed && resv.interval.end.is_none() {
        resv.interval.end = Some(Utc::now());
    }

    Ok(resv.clone())
}

fn outcome<T>(result: &Result<T>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    }
}
