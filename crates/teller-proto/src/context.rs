//! Customer context record shared between host and console.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The customer/session record the host pushes into the console.
///
/// Hosts populate whatever slice of this they have; every field is
/// optional. Fields this crate does not model are preserved verbatim in
/// `extra` so a round trip never drops host data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_tier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cin: Option<String>,
    /// Intent hint carried inside `host.state` payloads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    /// Unmodeled host fields, kept as-is.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl CustomerContext {
    /// Whether a customer is attached. Drives context vs manual mode.
    pub fn has_customer(&self) -> bool {
        self.customer_id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// Shallow merge: fields present in `incoming` overwrite, absent
    /// fields are preserved. Used for `intent.changed` and
    /// `context.updated`; `host.state` replaces the record instead.
    pub fn merge(&mut self, incoming: CustomerContext) {
        merge_field(&mut self.customer_id, incoming.customer_id);
        merge_field(&mut self.customer_name, incoming.customer_name);
        merge_field(&mut self.email, incoming.email);
        merge_field(&mut self.phone, incoming.phone);
        merge_field(&mut self.location, incoming.location);
        merge_field(&mut self.account_number, incoming.account_number);
        merge_field(&mut self.account_type, incoming.account_type);
        merge_field(&mut self.customer_tier, incoming.customer_tier);
        merge_field(&mut self.cin, incoming.cin);
        merge_field(&mut self.intent, incoming.intent);
        merge_field(&mut self.agent_id, incoming.agent_id);
        self.extra.extend(incoming.extra);
    }

    /// Synthetic record used when the console self-activates without a
    /// host (direct browser access, local demos).
    pub fn demo() -> Self {
        CustomerContext {
            customer_id: Some("demo-123".to_string()),
            customer_name: Some("Demo Customer".to_string()),
            agent_id: Some("agent-demo".to_string()),
            ..CustomerContext::default()
        }
    }
}

fn merge_field(current: &mut Option<String>, incoming: Option<String>) {
    if incoming.is_some() {
        *current = incoming;
    }
}

#[cfg(test)]
mod tests {
    use super::CustomerContext;

    fn named(customer_id: &str, customer_name: &str) -> CustomerContext {
        CustomerContext {
            customer_id: Some(customer_id.to_string()),
            customer_name: Some(customer_name.to_string()),
            ..CustomerContext::default()
        }
    }

    #[test]
    fn merge_overwrites_present_fields_and_keeps_absent_ones() {
        let mut context = named("cust-1", "Ada");
        context.email = Some("ada@example.bank".to_string());

        context.merge(CustomerContext {
            customer_name: Some("Ada Lovelace".to_string()),
            phone: Some("+44 20 7946 0000".to_string()),
            ..CustomerContext::default()
        });

        assert_eq!(context.customer_id.as_deref(), Some("cust-1"));
        assert_eq!(context.customer_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(context.email.as_deref(), Some("ada@example.bank"));
        assert_eq!(context.phone.as_deref(), Some("+44 20 7946 0000"));
    }

    #[test]
    fn has_customer_requires_non_empty_id() {
        assert!(!CustomerContext::default().has_customer());
        assert!(!named("", "Nobody").has_customer());
        assert!(named("cust-2", "Grace").has_customer());
    }

    #[test]
    fn unmodeled_fields_survive_decode_and_merge() {
        let decoded: Result<CustomerContext, _> = serde_json::from_str(
            r#"{"customerId":"cust-3","riskScore":42,"segment":"retail"}"#,
        );
        let Ok(mut context) = decoded else {
            unreachable!("context with extra fields must decode");
        };
        assert_eq!(context.extra.len(), 2);

        context.merge(CustomerContext {
            extra: [("segment".to_string(), "business".into())].into(),
            ..CustomerContext::default()
        });
        assert_eq!(context.extra["riskScore"], 42);
        assert_eq!(context.extra["segment"], "business");
    }

    #[test]
    fn demo_record_matches_standalone_activation() {
        let demo = CustomerContext::demo();
        assert_eq!(demo.customer_id.as_deref(), Some("demo-123"));
        assert_eq!(demo.customer_name.as_deref(), Some("Demo Customer"));
        assert_eq!(demo.agent_id.as_deref(), Some("agent-demo"));
        assert!(demo.has_customer());
    }
}
