use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use reservation::audit::{AuditEvent, AuditSink};

/// Captures audit events in memory so tests can assert on them.
#[derive(Default)]
pub struct InMemoryAudit {
    pub events: Arc<Mutex<Vec<AuditEvent>>>,
}

#[async_trait]
impl AuditSink for InMemoryAudit {
    async fn record(&self, event: AuditEvent) {
        self.events.lock().await.push(event);
    }
}
