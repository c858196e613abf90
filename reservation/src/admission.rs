//! Decides whether a requester may claim a given resource.
//
//  This module is deliberately pure: no locking, no IO. The service
//  runs it inside the registry lock so the answer cannot go stale
//  between the check and the claim.

use inventory::types::{Category, Requester, Resource, ResourceStatus};

/// Result of an admission check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Granted,
    NotAvailable(ResourceStatus),
    WrongCategory { required: String, actual: String },
}

impl Admission {
    pub fn is_granted(&self) -> bool {
        matches!(self, Admission::Granted)
    }
}

/// Check whether `requester` may claim `resource` right now.
///
/// This enforces:
///   - the resource must currently be Available
///   - a requester bound to a category only fits a resource of that
///     exact category (a truck cannot take a car spot)
pub fn check_claim<C: Category>(requester: &Requester<C>, resource: &Resource<C>) -> Admission {
    if resource.status != ResourceStatus::Available {
        return Admission::NotAvailable(resource.status);
    }

    if let Some(required) = &requester.required_category {
        if *required != resource.category {
            return Admission::WrongCategory {
                required: required.to_string(),
                actual: resource.category.to_string(),
            };
        }
    }

    Admission::Granted
}
