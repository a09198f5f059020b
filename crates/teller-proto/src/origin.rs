//! Origin gating for inbound `postMessage` frames.
//!
//! This is a coarse trust boundary against stray frames from unrelated
//! windows, not an authentication layer. Hosts and console are expected to
//! be served from the same deployment; the permissive localhost range only
//! ever applies when the page itself is served from localhost.

use std::ops::RangeInclusive;

use url::Url;

/// Dev-server ports accepted under [`OriginPolicy::LocalDevelopment`].
pub const LOCAL_PORT_RANGE: RangeInclusive<u16> = 3000..=9999;

const LOCAL_HOSTS: [&str; 2] = ["localhost", "127.0.0.1"];

/// Which origins a session accepts frames from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginPolicy {
    /// Deployed shape: only the page's own origin.
    Exact(String),
    /// Page served from localhost: any `http://localhost:<port>` or
    /// `http://127.0.0.1:<port>` with the port in [`LOCAL_PORT_RANGE`],
    /// plus the bare forms without a port.
    LocalDevelopment,
    /// Operator-supplied allow list, overriding derivation.
    Explicit(Vec<String>),
}

impl OriginPolicy {
    /// Derive the policy from the page URL the console was loaded at.
    pub fn for_page(page: &Url) -> OriginPolicy {
        let is_local = page
            .host_str()
            .is_some_and(|host| LOCAL_HOSTS.contains(&host.to_ascii_lowercase().as_str()));
        if is_local {
            OriginPolicy::LocalDevelopment
        } else {
            OriginPolicy::Exact(page.origin().ascii_serialization())
        }
    }

    /// Build an explicit allow list. Entries are normalized; blank entries
    /// are dropped.
    pub fn explicit<I, S>(origins: I) -> OriginPolicy
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let normalized = origins
            .into_iter()
            .map(|origin| normalize_origin(origin.as_ref()))
            .filter(|origin| !origin.is_empty())
            .collect();
        OriginPolicy::Explicit(normalized)
    }

    /// Whether a frame from `origin` may reach the session.
    pub fn allows(&self, origin: &str) -> bool {
        let normalized = normalize_origin(origin);
        if normalized.is_empty() {
            return false;
        }
        match self {
            OriginPolicy::Exact(expected) => normalized == normalize_origin(expected),
            OriginPolicy::Explicit(allowed) => allowed.contains(&normalized),
            OriginPolicy::LocalDevelopment => is_local_dev_origin(&normalized),
        }
    }
}

/// Origins compare after trimming, dropping trailing slashes and
/// lowercasing. Hosts are inconsistent about all three.
fn normalize_origin(origin: &str) -> String {
    origin.trim().trim_end_matches('/').to_ascii_lowercase()
}

fn is_local_dev_origin(normalized: &str) -> bool {
    let Some(rest) = normalized.strip_prefix("http://") else {
        return false;
    };
    let (host, port) = match rest.split_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (rest, None),
    };
    if !LOCAL_HOSTS.contains(&host) {
        return false;
    }
    match port {
        None => true,
        Some(port) => port
            .parse::<u16>()
            .is_ok_and(|port| LOCAL_PORT_RANGE.contains(&port)),
    }
}
