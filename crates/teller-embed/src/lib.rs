//! Session core for the Teller embedded agent console.
//!
//! The console is a page embedded in a host desktop. This crate holds
//! everything between the wire ([`teller_proto`]) and the rendered view:
//! launch-parameter resolution, the session state store, the readiness
//! handshake timers, and intent-to-view dispatch. All of it is synchronous
//! and clock-injected; a driver (browser shim, test, or the harness binary)
//! supplies frames and `Instant`s and delivers the outbound messages.

pub mod handshake;
pub mod intent;
pub mod launch;
pub mod session;
pub mod store;
pub mod views;

pub use handshake::{AnnounceBackoff, DEMO_ACTIVATION_DELAY, Handshake};
pub use intent::{DEFAULT_MANUAL_INTENT, Intent, MANUAL_LAUNCH, app_key_intent, resolve_launch_intent};
pub use launch::{EmbedSurface, LaunchParams, Mode};
pub use session::{ConsoleSession, LaunchConfig};
pub use store::{SessionAction, SessionState};
pub use views::{ViewKind, ViewSelection, ViewSpec, select_view, view_for_intent, view_specs};
