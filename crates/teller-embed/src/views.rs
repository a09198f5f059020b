//! Service view registry and dispatch.
//!
//! Rendering lives in the host's view layer; this module only decides which
//! view an intent selects. Several intents are synonyms for the same view,
//! so the registry keys each view by the full list of intent literals it
//! answers to.

use teller_proto::CustomerContext;

use crate::intent::Intent;
use crate::launch::Mode;

/// The closed set of service views the console ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    CreditCardActions,
    FraudAlert,
    MortgageApplication,
    InternationalTransfer,
    AccountUpgrade,
    AccountBalance,
    BusinessLoan,
    TravelNotification,
    PortfolioReview,
    StudentLoan,
    StandingOrder,
    OverdraftRequest,
    FirstCreditCard,
    PersonalLoan,
    ExecutiveDashboard,
    OperationsControl,
    ProfessionalToolkit,
    PrivateWealthCenter,
    TeamOverview,
    QuickBalanceCheck,
    ChatTemplates,
    FaqAssistant,
    EligibilityCheck,
    WealthManagement,
    AccountManagement,
    CustomerHistory,
}

#[derive(Debug, Clone, Copy)]
pub struct ViewSpec {
    pub kind: ViewKind,
    pub title: &'static str,
    /// Intent literals that select this view. Each literal appears exactly
    /// once across the whole registry.
    pub intents: &'static [&'static str],
}

pub fn view_specs() -> &'static [ViewSpec] {
    &VIEW_SPECS
}

pub fn view_spec(kind: ViewKind) -> &'static ViewSpec {
    view_specs()
        .iter()
        .find(|spec| spec.kind == kind)
        .unwrap_or(&VIEW_SPECS[0])
}

pub fn view_for_intent(intent: &Intent) -> Option<ViewKind> {
    view_specs()
        .iter()
        .find(|spec| spec.intents.contains(&intent.as_str()))
        .map(|spec| spec.kind)
}

const VIEW_SPECS: [ViewSpec; 26] = [
    ViewSpec {
        kind: ViewKind::CreditCardActions,
        title: "Credit Card Actions",
        intents: &[
            "credit_card_transactions",
            "credit_card_management",
            "credit_increase",
        ],
    },
    ViewSpec {
        kind: ViewKind::FraudAlert,
        title: "Fraud Alert",
        intents: &["fraud_alert"],
    },
    ViewSpec {
        kind: ViewKind::MortgageApplication,
        title: "Mortgage Application",
        intents: &["mortgage_application"],
    },
    ViewSpec {
        kind: ViewKind::InternationalTransfer,
        title: "International Transfer",
        intents: &["international_transfer"],
    },
    ViewSpec {
        kind: ViewKind::AccountUpgrade,
        title: "Account Upgrade",
        intents: &["account_upgrade"],
    },
    ViewSpec {
        kind: ViewKind::AccountBalance,
        title: "Account Balance",
        intents: &[
            "account_balance",
            "balance_inquiry",
            "account_balance_inquiry",
            "balance_check",
        ],
    },
    ViewSpec {
        kind: ViewKind::BusinessLoan,
        title: "Business Loan",
        intents: &["business_loan"],
    },
    ViewSpec {
        kind: ViewKind::TravelNotification,
        title: "Travel Notification",
        intents: &["travel_notification"],
    },
    ViewSpec {
        kind: ViewKind::PortfolioReview,
        title: "Portfolio Review",
        intents: &[
            "portfolio_review",
            "portfolio_analysis_request",
            "investment_advice",
        ],
    },
    ViewSpec {
        kind: ViewKind::StudentLoan,
        title: "Student Loan",
        intents: &["student_loan"],
    },
    ViewSpec {
        kind: ViewKind::StandingOrder,
        title: "Standing Order",
        intents: &["standing_order"],
    },
    ViewSpec {
        kind: ViewKind::OverdraftRequest,
        title: "Overdraft Request",
        intents: &["overdraft_request", "student_overdraft"],
    },
    ViewSpec {
        kind: ViewKind::FirstCreditCard,
        title: "First Credit Card",
        intents: &["first_credit_card"],
    },
    ViewSpec {
        kind: ViewKind::PersonalLoan,
        title: "Personal Loan",
        intents: &["loan_application", "personal_loan", "loan_inquiry"],
    },
    ViewSpec {
        kind: ViewKind::ExecutiveDashboard,
        title: "Executive Banking Dashboard",
        intents: &["executive_banking_dashboard"],
    },
    ViewSpec {
        kind: ViewKind::OperationsControl,
        title: "Banking Operations Control",
        intents: &["banking_operations_control"],
    },
    ViewSpec {
        kind: ViewKind::ProfessionalToolkit,
        title: "Professional Banking Toolkit",
        intents: &["professional_banking_toolkit"],
    },
    ViewSpec {
        kind: ViewKind::PrivateWealthCenter,
        title: "Private Wealth Center",
        intents: &["private_wealth_center"],
    },
    ViewSpec {
        kind: ViewKind::TeamOverview,
        title: "Team Overview",
        intents: &["team_performance", "team_performance_analytics"],
    },
    ViewSpec {
        kind: ViewKind::QuickBalanceCheck,
        title: "Quick Balance Check",
        intents: &["quick_balance_check", "quick_balance"],
    },
    ViewSpec {
        kind: ViewKind::ChatTemplates,
        title: "Chat Templates",
        intents: &[
            "chat_templates",
            "chat_response_templates",
            "response_templates",
        ],
    },
    ViewSpec {
        kind: ViewKind::FaqAssistant,
        title: "FAQ Assistant",
        intents: &["faq_assistant", "faq", "frequently_asked_questions"],
    },
    ViewSpec {
        kind: ViewKind::EligibilityCheck,
        title: "Eligibility Check",
        intents: &["eligibility_check", "eligibility_assessment"],
    },
    ViewSpec {
        kind: ViewKind::WealthManagement,
        title: "Wealth Management",
        intents: &[
            "wealth_management",
            "investment_planning",
            "portfolio_management",
        ],
    },
    ViewSpec {
        kind: ViewKind::AccountManagement,
        title: "Account Management",
        intents: &["account_management", "account_settings", "profile_management"],
    },
    ViewSpec {
        kind: ViewKind::CustomerHistory,
        title: "Customer History",
        intents: &["customer_history", "interaction_history", "customer_timeline"],
    },
];

/// What the shell renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewSelection {
    /// No service picked yet; offer the manual-mode launcher.
    Launcher,
    /// A registered service view.
    Service(ViewKind),
    /// Unknown intent with no connected customer: a notice that the service
    /// needs customer context, titled via `Intent::display_title`.
    RequiresContext { intent: Intent },
    /// Unknown intent while a customer is connected: a "not yet
    /// implemented" notice echoing the raw intent and the customer name.
    NotImplemented {
        intent: Intent,
        customer_name: Option<String>,
    },
}

/// Dispatch an intent to a view.
///
/// The launcher only appears when no intent is set (or only the launcher
/// sentinel is) *and* the launch did not come through an app key; app-key
/// launches always land on a service or a placeholder.
pub fn select_view(
    intent: Option<&Intent>,
    app_key_present: bool,
    mode: Mode,
    context: &CustomerContext,
) -> ViewSelection {
    let effective = intent.filter(|candidate| !candidate.is_manual_launch());
    let Some(intent) = effective else {
        if app_key_present {
            // Unreachable through launch resolution (an app key always
            // yields an intent), but a host can push the sentinel later.
            if let Some(sentinel) = intent {
                return placeholder(sentinel.clone(), mode, context);
            }
        }
        return ViewSelection::Launcher;
    };
    match view_for_intent(intent) {
        Some(kind) => ViewSelection::Service(kind),
        None => placeholder(intent.clone(), mode, context),
    }
}

fn placeholder(intent: Intent, mode: Mode, context: &CustomerContext) -> ViewSelection {
    if mode == Mode::Manual || !context.has_customer() {
        ViewSelection::RequiresContext { intent }
    } else {
        ViewSelection::NotImplemented {
            intent,
            customer_name: context.customer_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ViewKind, ViewSelection, select_view, view_for_intent, view_spec, view_specs};
    use crate::intent::Intent;
    use crate::launch::Mode;
    use std::collections::BTreeSet;
    use teller_proto::CustomerContext;

    #[test]
    fn registry_intents_are_unique_across_all_views() {
        let mut seen = BTreeSet::new();
        for spec in view_specs() {
            assert!(!spec.intents.is_empty(), "{:?} has no intents", spec.kind);
            for intent in spec.intents {
                assert!(seen.insert(*intent), "duplicate intent key {intent}");
            }
        }
    }

    #[test]
    fn every_kind_resolves_back_through_its_intents() {
        for spec in view_specs() {
            assert!(!spec.title.is_empty());
            assert_eq!(view_spec(spec.kind).kind, spec.kind);
            for intent in spec.intents {
                assert_eq!(
                    view_for_intent(&Intent::new(*intent)),
                    Some(spec.kind),
                    "{intent} should select {:?}",
                    spec.kind
                );
            }
        }
    }

    #[test]
    fn balance_synonyms_share_one_view() {
        for intent in [
            "account_balance",
            "balance_inquiry",
            "account_balance_inquiry",
            "balance_check",
        ] {
            assert_eq!(
                view_for_intent(&Intent::new(intent)),
                Some(ViewKind::AccountBalance)
            );
        }
    }

    #[test]
    fn launcher_appears_only_without_intent_or_app_key() {
        let context = CustomerContext::default();
        assert_eq!(
            select_view(None, false, Mode::Manual, &context),
            ViewSelection::Launcher
        );
        let sentinel = Intent::new("manual_launch");
        assert_eq!(
            select_view(Some(&sentinel), false, Mode::Manual, &context),
            ViewSelection::Launcher
        );
        // App-key launches never fall back to the launcher.
        assert_eq!(
            select_view(Some(&sentinel), true, Mode::Manual, &context),
            ViewSelection::RequiresContext {
                intent: sentinel.clone()
            }
        );
    }

    #[test]
    fn unknown_intent_placeholder_depends_on_customer_presence() {
        let intent = Intent::new("escalation_hub");
        let no_customer = CustomerContext::default();
        assert_eq!(
            select_view(Some(&intent), true, Mode::Manual, &no_customer),
            ViewSelection::RequiresContext {
                intent: intent.clone()
            }
        );

        let customer = CustomerContext {
            customer_id: Some("cust-1".to_string()),
            customer_name: Some("Grace Hopper".to_string()),
            ..CustomerContext::default()
        };
        // Context mode still needs a non-empty customer id.
        assert_eq!(
            select_view(Some(&intent), true, Mode::Context, &no_customer),
            ViewSelection::RequiresContext {
                intent: intent.clone()
            }
        );
        assert_eq!(
            select_view(Some(&intent), true, Mode::Context, &customer),
            ViewSelection::NotImplemented {
                intent,
                customer_name: Some("Grace Hopper".to_string())
            }
        );
    }

    #[test]
    fn known_intent_selects_its_service_regardless_of_mode() {
        let intent = Intent::new("student_overdraft");
        assert_eq!(
            select_view(Some(&intent), false, Mode::Manual, &CustomerContext::default()),
            ViewSelection::Service(ViewKind::OverdraftRequest)
        );
    }
}
