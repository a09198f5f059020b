//! Explicit session-state store.
//!
//! Every mutation of the shared context/intent state goes through one
//! reducer with typed action variants, so handlers can't drift into ad hoc
//! setters and the shell can tell when a frame actually changed anything.

use teller_proto::CustomerContext;

use crate::intent::Intent;
use crate::launch::Mode;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub context: CustomerContext,
    pub intent: Option<Intent>,
    pub mode: Mode,
    pub connected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    /// Replace the whole context record (`host.state`).
    SetContext(CustomerContext),
    /// Shallow-merge into the current record (`context.updated`,
    /// `intent.changed`).
    MergeContext(CustomerContext),
    SetIntent(Intent),
    SetMode(Mode),
    MarkConnected,
}

impl SessionState {
    pub fn new(context: CustomerContext, intent: Option<Intent>, mode: Mode) -> Self {
        SessionState {
            context,
            intent,
            mode,
            connected: false,
        }
    }

    /// Apply one action, reporting whether any state changed.
    pub fn apply(&mut self, action: SessionAction) -> bool {
        match action {
            SessionAction::SetContext(context) => {
                if self.context == context {
                    return false;
                }
                self.context = context;
                true
            }
            SessionAction::MergeContext(incoming) => {
                let mut merged = self.context.clone();
                merged.merge(incoming);
                if self.context == merged {
                    return false;
                }
                self.context = merged;
                true
            }
            SessionAction::SetIntent(intent) => {
                if self.intent.as_ref() == Some(&intent) {
                    return false;
                }
                self.intent = Some(intent);
                true
            }
            SessionAction::SetMode(mode) => {
                if self.mode == mode {
                    return false;
                }
                self.mode = mode;
                true
            }
            SessionAction::MarkConnected => {
                if self.connected {
                    return false;
                }
                self.connected = true;
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SessionAction, SessionState};
    use crate::intent::Intent;
    use crate::launch::Mode;
    use teller_proto::CustomerContext;

    #[test]
    fn set_context_replaces_instead_of_merging() {
        let mut state = SessionState::new(
            CustomerContext {
                customer_id: Some("cust-1".to_string()),
                email: Some("old@example.bank".to_string()),
                ..CustomerContext::default()
            },
            None,
            Mode::Context,
        );
        let replacement = CustomerContext {
            customer_id: Some("cust-2".to_string()),
            ..CustomerContext::default()
        };
        assert!(state.apply(SessionAction::SetContext(replacement.clone())));
        assert_eq!(state.context, replacement);
        assert_eq!(state.context.email, None);
        // Idempotent on identical payloads.
        assert!(!state.apply(SessionAction::SetContext(replacement)));
    }

    #[test]
    fn merge_context_keeps_absent_fields() {
        let mut state = SessionState::default();
        state.context.customer_name = Some("Ada".to_string());
        assert!(state.apply(SessionAction::MergeContext(CustomerContext {
            phone: Some("+44 20 7946 0000".to_string()),
            ..CustomerContext::default()
        })));
        assert_eq!(state.context.customer_name.as_deref(), Some("Ada"));
        assert_eq!(state.context.phone.as_deref(), Some("+44 20 7946 0000"));
        assert!(!state.apply(SessionAction::MergeContext(CustomerContext::default())));
    }

    #[test]
    fn actions_report_whether_state_changed() {
        let mut state = SessionState::default();
        assert!(state.apply(SessionAction::SetIntent(Intent::new("fraud_alert"))));
        assert!(!state.apply(SessionAction::SetIntent(Intent::new("fraud_alert"))));
        assert!(state.apply(SessionAction::SetMode(Mode::Context)));
        assert!(!state.apply(SessionAction::SetMode(Mode::Context)));
        assert!(state.apply(SessionAction::MarkConnected));
        assert!(!state.apply(SessionAction::MarkConnected));
    }
}
