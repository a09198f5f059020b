//! Launch-time inputs: query parameters and embedding surface.

use std::convert::Infallible;
use std::str::FromStr;

use teller_proto::CustomerContext;
use url::Url;

/// Operating mode of the console shell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// No connected customer; the shell offers the service launcher.
    #[default]
    Manual,
    /// A customer is attached and views render against their record.
    Context,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Manual => "manual",
            Mode::Context => "context",
        }
    }
}

impl FromStr for Mode {
    type Err = Infallible;

    /// Unknown values fall back to manual; a bad `mode` param never blocks
    /// a launch.
    fn from_str(raw: &str) -> Result<Self, Infallible> {
        Ok(match raw.trim().to_ascii_lowercase().as_str() {
            "context" => Mode::Context,
            _ => Mode::Manual,
        })
    }
}

/// Query parameters of the page URL the console was loaded at. Blank values
/// are treated as absent throughout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaunchParams {
    pub intent: Option<String>,
    pub tab_id: Option<String>,
    /// Only set when the query carried an explicit `mode` param; intent
    /// resolution distinguishes an explicit `mode=manual` from the default.
    pub mode: Option<Mode>,
    pub app_key: Option<String>,
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub account_number: Option<String>,
    pub account_type: Option<String>,
    pub customer_tier: Option<String>,
    pub cin: Option<String>,
}

impl LaunchParams {
    pub fn from_url(page: &Url) -> LaunchParams {
        let mut params = LaunchParams::default();
        for (key, value) in page.query_pairs() {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let value = value.to_string();
            match key.as_ref() {
                "intent" => params.intent = Some(value),
                "tabId" => params.tab_id = Some(value),
                "mode" => params.mode = value.parse().ok(),
                "appKey" => params.app_key = Some(value),
                "customerId" => params.customer_id = Some(value),
                "customerName" => params.customer_name = Some(value),
                "email" => params.email = Some(value),
                "phone" => params.phone = Some(value),
                "location" => params.location = Some(value),
                "accountNumber" => params.account_number = Some(value),
                "accountType" => params.account_type = Some(value),
                "customerTier" => params.customer_tier = Some(value),
                "cin" => params.cin = Some(value),
                _ => {}
            }
        }
        params
    }

    /// Effective mode for a fresh launch.
    pub fn mode(&self) -> Mode {
        self.mode.unwrap_or_default()
    }

    /// Seed context carried in the query, if any customer-identifying param
    /// is present. The raw `intent` param rides along inside the record the
    /// way hosts expect to read it back.
    pub fn initial_context(&self) -> Option<CustomerContext> {
        let identified = self.customer_id.is_some()
            || self.customer_name.is_some()
            || self.email.is_some()
            || self.phone.is_some();
        if !identified {
            return None;
        }
        Some(CustomerContext {
            customer_id: self.customer_id.clone(),
            customer_name: self.customer_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            location: self.location.clone(),
            account_number: self.account_number.clone(),
            account_type: self.account_type.clone(),
            customer_tier: self.customer_tier.clone(),
            cin: self.cin.clone(),
            intent: self.intent.clone(),
            ..CustomerContext::default()
        })
    }
}

/// How the console is embedded.
///
/// The browser probe for "am I inside an iframe" is supplied by the driver;
/// an `appKey` launch behaves embedded regardless, because the host's app
/// launcher also reaches the console through reverse proxies that strip the
/// framing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmbedSurface {
    pub framed: bool,
    pub app_key_present: bool,
}

impl EmbedSurface {
    pub fn behaves_embedded(self) -> bool {
        self.framed || self.app_key_present
    }
}

#[cfg(test)]
mod tests {
    use super::{EmbedSurface, LaunchParams, Mode};
    use url::Url;

    fn page(raw: &str) -> Url {
        match Url::parse(raw) {
            Ok(url) => url,
            Err(err) => unreachable!("test url {raw} must parse: {err}"),
        }
    }

    #[test]
    fn full_query_parses_into_params() {
        let params = LaunchParams::from_url(&page(
            "http://localhost:5173/console?intent=fraud_alert&tabId=tab-3&mode=context\
             &customerId=cust-7&customerName=Priya%20Shah&email=priya@example.bank\
             &accountNumber=GB0042&customerTier=premier&cin=CIN-55",
        ));
        assert_eq!(params.intent.as_deref(), Some("fraud_alert"));
        assert_eq!(params.tab_id.as_deref(), Some("tab-3"));
        assert_eq!(params.mode, Some(Mode::Context));
        assert_eq!(params.customer_id.as_deref(), Some("cust-7"));
        assert_eq!(params.customer_name.as_deref(), Some("Priya Shah"));
        assert_eq!(params.account_number.as_deref(), Some("GB0042"));
        assert_eq!(params.customer_tier.as_deref(), Some("premier"));
    }

    #[test]
    fn blank_and_unknown_params_are_ignored() {
        let params = LaunchParams::from_url(&page(
            "http://localhost:5173/?intent=&appKey=%20&theme=dark&mode=sideways",
        ));
        assert_eq!(params.intent, None);
        assert_eq!(params.app_key, None);
        // Unknown mode values fall back to manual rather than failing.
        assert_eq!(params.mode, Some(Mode::Manual));
        assert_eq!(params.mode(), Mode::Manual);
    }

    #[test]
    fn initial_context_requires_an_identifying_param() {
        let bare = LaunchParams::from_url(&page("http://localhost:5173/?mode=manual"));
        assert_eq!(bare.initial_context(), None);

        let with_location_only =
            LaunchParams::from_url(&page("http://localhost:5173/?location=London"));
        assert_eq!(with_location_only.initial_context(), None);

        let seeded = LaunchParams::from_url(&page(
            "http://localhost:5173/?customerName=Ada&location=London&intent=standing_order",
        ));
        let Some(context) = seeded.initial_context() else {
            unreachable!("customerName identifies the customer");
        };
        assert_eq!(context.customer_name.as_deref(), Some("Ada"));
        assert_eq!(context.location.as_deref(), Some("London"));
        assert_eq!(context.intent.as_deref(), Some("standing_order"));
        assert!(!context.has_customer());
    }

    #[test]
    fn app_key_forces_embedded_behavior() {
        assert!(
            EmbedSurface {
                framed: false,
                app_key_present: true
            }
            .behaves_embedded()
        );
        assert!(
            EmbedSurface {
                framed: true,
                app_key_present: false
            }
            .behaves_embedded()
        );
        assert!(!EmbedSurface::default().behaves_embedded());
    }
}
