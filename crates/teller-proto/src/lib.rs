//! Wire contracts for the Teller embedded agent console.
//!
//! The console runs inside an iframe owned by a host desktop and talks to it
//! exclusively through `postMessage` frames. This crate defines the typed
//! envelopes for both directions, the customer context record they carry,
//! and the origin policy that gates every inbound frame. No IO lives here;
//! the session loop in `teller-embed` drives these types.

pub mod context;
pub mod message;
pub mod origin;

pub use context::CustomerContext;
pub use message::{
    CONSOLE_MESSAGE_TYPES, ConsoleMessage, HOST_MESSAGE_TYPES, HostMessage, READY_LEGACY_ALIAS,
    WireError,
};
pub use origin::{LOCAL_PORT_RANGE, OriginPolicy};
