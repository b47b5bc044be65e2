//! Subscription plan types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{Email, PlanId};

/// A subscription plan record from `GET /plan/{planId}`.
///
/// Only the id is interpreted; everything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(alias = "id")]
    pub plan_id: PlanId,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Plan {
    /// Look up an opaque attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }
}

/// Body of `POST /confirm`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmRequest {
    pub email: Email,
}

/// Subscription confirmation returned by `POST /confirm`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub plan_id: PlanId,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_keeps_opaque_attributes() {
        let plan: Plan =
            serde_json::from_str(r#"{"plan_id":"pro","name":"Pro","price":500}"#).unwrap();
        assert_eq!(plan.plan_id.as_str(), "pro");
        assert_eq!(plan.attribute("name"), Some(&Value::from("Pro")));
        assert_eq!(plan.attribute("price"), Some(&Value::from(500)));
    }

    #[test]
    fn test_plan_accepts_id_alias() {
        let plan: Plan = serde_json::from_str(r#"{"id":"basic"}"#).unwrap();
        assert_eq!(plan.plan_id.as_str(), "basic");
        assert!(plan.attributes.is_empty());
    }

    #[test]
    fn test_confirmation_parses_plan_id() {
        let confirmation: Confirmation =
            serde_json::from_str(r#"{"plan_id":"pro","status":"active"}"#).unwrap();
        assert_eq!(confirmation.plan_id.as_str(), "pro");
        assert_eq!(confirmation.details.get("status"), Some(&Value::from("active")));
    }
}
