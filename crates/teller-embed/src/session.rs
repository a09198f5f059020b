//! The console session: one embedded page's worth of state and protocol.
//!
//! Sans-io by construction. The driver feeds in raw frames with their
//! origin, calls `tick` when a deadline passes, and delivers whatever
//! outbound frames come back. Outbound traffic is fire-and-forget; there
//! are no correlation ids, and a lost frame is only compensated by the
//! announce schedule.

use std::time::Instant;

use tracing::{debug, warn};
use url::Url;

use teller_proto::{ConsoleMessage, CustomerContext, HostMessage, OriginPolicy, WireError};

use crate::handshake::Handshake;
use crate::intent::{Intent, resolve_launch_intent};
use crate::launch::{EmbedSurface, LaunchParams, Mode};
use crate::store::{SessionAction, SessionState};
use crate::views::{ViewSelection, select_view};

/// Inputs for starting a session.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    /// Full page URL including the query string.
    pub page_url: Url,
    /// Whether the page is actually inside a frame. The browser probe has
    /// no sans-io equivalent, so the driver supplies it.
    pub framed: bool,
    /// Override for the derived origin policy (operator allow lists).
    pub origin_policy: Option<OriginPolicy>,
}

pub struct ConsoleSession {
    state: SessionState,
    handshake: Handshake,
    policy: OriginPolicy,
    surface: EmbedSurface,
    tab_id: Option<String>,
    last_height: Option<u32>,
}

impl ConsoleSession {
    /// Start a session from the page URL. Returns the session and the
    /// frames due immediately (the T+0 readiness announcement when the
    /// surface behaves embedded).
    pub fn launch(config: LaunchConfig, now: Instant) -> (ConsoleSession, Vec<ConsoleMessage>) {
        let params = LaunchParams::from_url(&config.page_url);
        let surface = EmbedSurface {
            framed: config.framed,
            app_key_present: params.app_key.is_some(),
        };
        let policy = config
            .origin_policy
            .unwrap_or_else(|| OriginPolicy::for_page(&config.page_url));
        let handshake = if surface.behaves_embedded() {
            Handshake::embedded(now)
        } else {
            Handshake::standalone(now)
        };
        let state = SessionState::new(
            params.initial_context().unwrap_or_default(),
            resolve_launch_intent(&params),
            params.mode(),
        );
        let mut session = ConsoleSession {
            state,
            handshake,
            policy,
            surface,
            tab_id: params.tab_id,
            last_height: None,
        };
        let outbound = session.tick(now);
        (session, outbound)
    }

    /// Handle one inbound frame. Frames from origins outside the policy
    /// and frames that fail to decode are dropped with a warning; neither
    /// is fatal to the session.
    pub fn on_message(&mut self, origin: &str, raw: &str) -> Vec<ConsoleMessage> {
        if !self.policy.allows(origin) {
            warn!(origin, "dropping frame from disallowed origin");
            return Vec::new();
        }
        let message = match HostMessage::from_json(raw) {
            Ok(message) => message,
            Err(WireError::UnrecognizedType { message_type }) => {
                warn!(message_type, "ignoring unrecognized host frame");
                return Vec::new();
            }
            Err(err) => {
                warn!(error = %err, "dropping undecodable host frame");
                return Vec::new();
            }
        };

        // Any accepted host frame proves the host is listening.
        self.handshake.mark_host_seen();
        self.handshake.cancel_demo();

        let intent_before = self.state.intent.clone();
        let connected_before = self.state.connected;
        let mut outbound = Vec::new();

        match message {
            HostMessage::HostPing { tab_id } => {
                debug!(tab_id = tab_id.as_deref(), "answering host ping");
                outbound.push(ConsoleMessage::ready(tab_id));
            }
            HostMessage::HealthPing => outbound.push(ConsoleMessage::HealthPong),
            HostMessage::HostAck { tab_id } => {
                debug!(tab_id = tab_id.as_deref(), "host acknowledged readiness");
            }
            HostMessage::HostState { context } => self.apply_host_state(context),
            HostMessage::IntentChanged { intent, context } => {
                self.state.apply(SessionAction::SetIntent(Intent::new(intent)));
                if let Some(context) = context {
                    self.state.apply(SessionAction::MergeContext(context));
                }
            }
            HostMessage::ContextUpdated { context } => {
                self.state.apply(SessionAction::MergeContext(context));
            }
        }

        self.push_remeasure(&mut outbound, &intent_before, connected_before);
        outbound
    }

    fn apply_host_state(&mut self, context: CustomerContext) {
        let incoming_intent = context.intent.clone();
        let mode = if context.has_customer() {
            Mode::Context
        } else {
            Mode::Manual
        };
        self.state.apply(SessionAction::SetContext(context));
        if let Some(raw) = incoming_intent {
            let intent = Intent::new(raw);
            if !intent.is_manual_launch() && self.state.intent.as_ref() != Some(&intent) {
                self.state.apply(SessionAction::SetIntent(intent));
            }
        }
        self.state.apply(SessionAction::SetMode(mode));
        self.state.apply(SessionAction::MarkConnected);
    }

    /// Fire any deadline that has passed: a readiness announcement or the
    /// standalone demo activation.
    pub fn tick(&mut self, now: Instant) -> Vec<ConsoleMessage> {
        let intent_before = self.state.intent.clone();
        let connected_before = self.state.connected;
        let mut outbound = Vec::new();
        if let Some(attempt) = self.handshake.poll_announce(now) {
            debug!(attempt, "announcing readiness to host");
            outbound.push(ConsoleMessage::ready(self.tab_id.clone()));
        }
        if self.handshake.poll_demo(now) {
            debug!("no host contact; activating demo customer");
            self.state.apply(SessionAction::SetContext(CustomerContext::demo()));
            self.state.apply(SessionAction::MarkConnected);
        }
        self.push_remeasure(&mut outbound, &intent_before, connected_before);
        outbound
    }

    /// Launcher selection. Embedded surfaces also tell the host which
    /// service the agent picked.
    pub fn select_intent(&mut self, intent: Intent) -> Vec<ConsoleMessage> {
        let intent_before = self.state.intent.clone();
        let connected_before = self.state.connected;
        self.state.apply(SessionAction::SetIntent(intent.clone()));
        let mut outbound = Vec::new();
        if self.surface.behaves_embedded() {
            outbound.push(ConsoleMessage::IntentSelected {
                intent: intent.as_str().to_string(),
            });
        }
        self.push_remeasure(&mut outbound, &intent_before, connected_before);
        outbound
    }

    /// Ask the host to open a knowledge-base article for the agent.
    pub fn open_article(&self, article_id: &str) -> ConsoleMessage {
        ConsoleMessage::KmsOpen {
            article_id: article_id.to_string(),
        }
    }

    /// Report a content measurement. Every measurement is forwarded
    /// unthrottled; the host does its own batching.
    pub fn content_resized(&mut self, height: u32) -> ConsoleMessage {
        self.last_height = Some(height);
        ConsoleMessage::Resize { height }
    }

    /// The view the shell should render right now.
    pub fn view(&self) -> ViewSelection {
        select_view(
            self.state.intent.as_ref(),
            self.surface.app_key_present,
            self.state.mode,
            &self.state.context,
        )
    }

    /// Next instant the driver should call [`tick`](Self::tick) at, if any
    /// timer is still armed.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.handshake.next_deadline()
    }

    pub fn is_connected(&self) -> bool {
        self.state.connected
    }

    pub fn context(&self) -> &CustomerContext {
        &self.state.context
    }

    pub fn intent(&self) -> Option<&Intent> {
        self.state.intent.as_ref()
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn tab_id(&self) -> Option<&str> {
        self.tab_id.as_deref()
    }

    // Re-report the last measured height whenever the rendered view can
    // have changed shape, so the host can resize the frame.
    fn push_remeasure(
        &self,
        outbound: &mut Vec<ConsoleMessage>,
        intent_before: &Option<Intent>,
        connected_before: bool,
    ) {
        let changed = self.state.intent != *intent_before
            || self.state.connected != connected_before;
        if !changed {
            return;
        }
        if let Some(height) = self.last_height {
            outbound.push(ConsoleMessage::Resize { height });
        }
    }
}
