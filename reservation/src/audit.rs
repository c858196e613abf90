//! Audit seam: one structured event per mutating service call.
//!
//! The service emits events *after* releasing the registry lock, so a
//! slow sink can never stall a concurrent claim. Core logic never
//! depends on what a sink does with the events.

use async_trait::async_trait;

use crate::model::ReservationId;
use inventory::types::{RequesterId, ResourceId};

/// One record per mutating operation, success or failure.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub operation: &'static str,
    pub resource_id: Option<ResourceId>,
    pub requester_id: Option<RequesterId>,
    pub reservation_id: Option<ReservationId>,
    /// "ok", or the error kind that rejected the call.
    pub outcome: &'static str,
}

#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, event: AuditEvent);
}

/// Default sink: one structured tracing line per event.
#[derive(Debug, Default)]
pub struct TracingAudit;

#[async_trait]
impl AuditSink for TracingAudit {
    async fn record(&self, event: AuditEvent) {
        tracing::info!(
            operation = event.operation,
            resource = ?event.resource_id,
            requester = ?event.requester_id,
            reservation = ?event.reservation_id,
            outcome = event.outcome,
            "audit"
        );
    }
}
