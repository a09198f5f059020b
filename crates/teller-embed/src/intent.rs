//! Intent resolution: which service the console should show.
//!
//! An intent is a string key, not a closed set. Hosts ship new intents ahead
//! of the console, so unknown values stay representable and fall through to
//! placeholder views at dispatch time.

use serde::{Deserialize, Serialize};

use crate::launch::{LaunchParams, Mode};

/// Sentinel the host launcher sends when no service was picked yet. Never a
/// real intent; resolution and dispatch both treat it as "unset".
pub const MANUAL_LAUNCH: &str = "manual_launch";

/// Intent every manual-mode launch falls back to when the query names
/// nothing else.
pub const DEFAULT_MANUAL_INTENT: &str = "credit_card_transactions";

/// The string key selecting a service view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Intent(String);

impl Intent {
    pub fn new(raw: impl Into<String>) -> Self {
        Intent(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_manual_launch(&self) -> bool {
        self.0 == MANUAL_LAUNCH
    }

    /// Human-readable fallback title: underscores to spaces, each word
    /// capitalized. Used by the placeholder views for unknown intents.
    pub fn display_title(&self) -> String {
        self.0
            .split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Intent {
    fn from(raw: &str) -> Self {
        Intent::new(raw)
    }
}

/// The host app-launcher catalogue: many launcher keys map onto fewer
/// service intents. Keys absent from this table pass through verbatim so a
/// host can launch services the console has never heard of.
const APP_KEY_INTENTS: [(&str, &str); 48] = [
    // Core banking services
    ("credit_card_management", "credit_card_transactions"),
    ("fraud_alert", "fraud_alert"),
    ("business_loan", "business_loan"),
    ("mortgage_application", "mortgage_application"),
    ("account_upgrade", "account_upgrade"),
    ("international_transfer", "international_transfer"),
    ("account_balance", "account_balance"),
    ("portfolio_review", "portfolio_review"),
    ("portfolio_analysis_request", "portfolio_review"),
    ("student_loan", "student_loan"),
    ("standing_order", "standing_order"),
    ("overdraft_request", "overdraft_request"),
    ("first_credit_card", "first_credit_card"),
    ("travel_notification", "travel_notification"),
    ("personal_loan", "loan_application"),
    // Role-exclusive apps
    ("executive_banking_dashboard", "executive_banking_dashboard"),
    ("banking_operations_control", "banking_operations_control"),
    ("professional_banking_toolkit", "professional_banking_toolkit"),
    ("private_wealth_center", "private_wealth_center"),
    // Team and management apps
    ("team_performance", "team_performance"),
    ("team_performance_analytics", "team_performance_analytics"),
    ("team_overview", "team_performance"),
    // Escalation apps resolve to intents with no registered view; they land
    // on the placeholder path at dispatch time.
    ("escalation_hub", "escalation_hub"),
    ("escalation_management_hub", "escalation_hub"),
    ("supervisor_dashboard", "supervisor_dashboard"),
    ("manager_analytics", "manager_analytics"),
    // Communication and support apps
    ("chat_templates", "chat_templates"),
    ("chat_response_templates", "chat_templates"),
    ("response_templates", "chat_templates"),
    ("knowledge_base", "knowledge_base"),
    ("customer_insights", "customer_insights"),
    // Tool apps
    ("quick_balance_check", "quick_balance_check"),
    ("quick_balance", "quick_balance_check"),
    ("balance_check", "quick_balance_check"),
    ("faq_assistant", "faq_assistant"),
    ("faq", "faq_assistant"),
    ("frequently_asked_questions", "faq_assistant"),
    ("eligibility_check", "eligibility_check"),
    ("eligibility_assessment", "eligibility_check"),
    ("wealth_management", "wealth_management"),
    ("investment_planning", "wealth_management"),
    ("portfolio_management", "wealth_management"),
    ("account_management", "account_management"),
    ("account_settings", "account_management"),
    ("profile_management", "account_management"),
    ("customer_history", "customer_history"),
    ("interaction_history", "customer_history"),
    ("customer_timeline", "customer_history"),
];

/// Map a launcher app key to its service intent, or pass the key through
/// verbatim when it is not in the catalogue.
pub fn app_key_intent(app_key: &str) -> Intent {
    let mapped = APP_KEY_INTENTS
        .iter()
        .find(|(key, _)| *key == app_key)
        .map_or(app_key, |(_, intent)| intent);
    Intent::new(mapped)
}

/// Resolve the intent a fresh launch starts with. First match wins:
///
/// 1. an explicit `intent` query param, unless it is the launcher sentinel;
/// 2. an `appKey` param mapped through the catalogue;
/// 3. the manual-mode default when `mode=manual` names no service;
/// 4. nothing, which makes the shell show the launcher.
pub fn resolve_launch_intent(params: &LaunchParams) -> Option<Intent> {
    if let Some(raw) = params.intent.as_deref() {
        if raw != MANUAL_LAUNCH {
            return Some(Intent::new(raw));
        }
    }
    if let Some(app_key) = params.app_key.as_deref() {
        return Some(app_key_intent(app_key));
    }
    if params.mode == Some(Mode::Manual) && params.intent.is_none() && params.app_key.is_none() {
        return Some(Intent::new(DEFAULT_MANUAL_INTENT));
    }
    None
}
