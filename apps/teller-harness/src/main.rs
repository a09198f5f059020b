//! Scripted driver for the Teller console session.
//!
//! Stands in for the browser shim: the `embedded` scenario pairs the
//! session with a simulated host desktop over channels, the `standalone`
//! scenario lets the demo timer fire and walks the launcher. Useful for
//! watching the wire traffic and view transitions without a browser.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{info, warn};
use url::Url;

use teller_embed::{ConsoleSession, Intent, LaunchConfig};
use teller_proto::{ConsoleMessage, CustomerContext, HostMessage, OriginPolicy};

const HOST_ORIGIN: &str = "http://localhost:5173";
const ALLOWED_ORIGINS_ENV: &str = "TELLER_ALLOWED_ORIGINS";

#[derive(Parser, Debug)]
struct Args {
    /// Scenario to run.
    #[arg(long, value_enum, default_value = "embedded")]
    scenario: Scenario,
    /// Page URL the console pretends to be loaded at, query string included.
    #[arg(long, default_value = "http://localhost:5173/console?tabId=tab-local&mode=manual")]
    page_url: String,
    /// Explicit allowed origin (repeatable). Overrides the policy derived
    /// from the page URL; TELLER_ALLOWED_ORIGINS works as a comma list.
    #[arg(long = "allow-origin")]
    allow_origins: Vec<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Scenario {
    /// Simulated host desktop drives the session over the wire protocol.
    Embedded,
    /// No host; the demo customer activates and the launcher is walked.
    Standalone,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let page_url = Url::parse(&args.page_url)
        .with_context(|| format!("parse page url {}", args.page_url))?;
    let origin_policy = explicit_policy(&args.allow_origins);

    match args.scenario {
        Scenario::Embedded => run_embedded(page_url, origin_policy).await,
        Scenario::Standalone => run_standalone(page_url, origin_policy),
    }
}

/// Operator allow list from flags or the environment, if either is set.
fn explicit_policy(flag_origins: &[String]) -> Option<OriginPolicy> {
    let mut origins: Vec<String> = flag_origins.to_vec();
    if let Ok(env_list) = std::env::var(ALLOWED_ORIGINS_ENV) {
        origins.extend(env_list.split(',').map(str::to_string));
    }
    let origins: Vec<String> = origins
        .into_iter()
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect();
    if origins.is_empty() {
        None
    } else {
        Some(OriginPolicy::explicit(origins))
    }
}

async fn run_embedded(page_url: Url, origin_policy: Option<OriginPolicy>) -> Result<()> {
    let (to_console_tx, mut to_console_rx) = mpsc::channel::<(String, String)>(32);
    let (to_host_tx, to_host_rx) = mpsc::channel::<String>(32);
    let host = tokio::spawn(run_host(to_console_tx, to_host_rx));

    let (mut session, outbound) = ConsoleSession::launch(
        LaunchConfig {
            page_url,
            framed: true,
            origin_policy,
        },
        Instant::now(),
    );
    info!(view = ?session.view(), "console launched");
    deliver(&to_host_tx, outbound).await;

    loop {
        let deadline = session.next_deadline();
        tokio::select! {
            frame = to_console_rx.recv() => {
                let Some((origin, raw)) = frame else {
                    break;
                };
                let view_before = session.view();
                let outbound = session.on_message(&origin, &raw);
                let view = session.view();
                if view != view_before {
                    info!(?view, "view changed");
                }
                deliver(&to_host_tx, outbound).await;
            }
            () = sleep_until(deadline), if deadline.is_some() => {
                let outbound = session.tick(Instant::now());
                deliver(&to_host_tx, outbound).await;
            }
        }
    }
    drop(to_host_tx);
    host.await.context("join host task")??;

    info!(
        connected = session.is_connected(),
        mode = session.mode().as_str(),
        intent = session.intent().map(Intent::as_str),
        view = ?session.view(),
        "embedded scenario complete"
    );
    Ok(())
}

/// The simulated host desktop: ping, ack the readiness reply, push a
/// customer, switch intents, health-check, and throw in one frame from an
/// origin the console must drop.
async fn run_host(
    tx: mpsc::Sender<(String, String)>,
    mut rx: mpsc::Receiver<String>,
) -> Result<()> {
    let tab_id = uuid::Uuid::new_v4().to_string();

    // A stray window the trust boundary has to reject.
    tx.send((
        "http://rogue.example:4444".to_string(),
        json!({"type": "host.state", "context": {"customerId": "spoofed"}}).to_string(),
    ))
    .await?;

    send_host(&tx, &HostMessage::HostPing {
        tab_id: Some(tab_id.clone()),
    })
    .await?;

    // Wait for a readiness frame before acknowledging.
    while let Some(raw) = rx.recv().await {
        let frame = ConsoleMessage::from_json(&raw)?;
        info!(frame = %raw, "host received");
        if matches!(frame, ConsoleMessage::Ready { .. }) {
            break;
        }
    }
    send_host(&tx, &HostMessage::HostAck {
        tab_id: Some(tab_id.clone()),
    })
    .await?;

    send_host(&tx, &HostMessage::HostState {
        context: mock_customer(),
    })
    .await?;
    send_host(&tx, &HostMessage::IntentChanged {
        intent: "portfolio_review".to_string(),
        context: None,
    })
    .await?;
    send_host(&tx, &HostMessage::HealthPing).await?;
    drop(tx);

    // Drain the console's remaining replies until it hangs up.
    while let Some(raw) = rx.recv().await {
        info!(frame = %raw, "host received");
    }
    Ok(())
}

fn run_standalone(page_url: Url, origin_policy: Option<OriginPolicy>) -> Result<()> {
    let (mut session, outbound) = ConsoleSession::launch(
        LaunchConfig {
            page_url,
            framed: false,
            origin_policy,
        },
        Instant::now(),
    );
    if !outbound.is_empty() {
        warn!(frames = outbound.len(), "standalone launch produced outbound frames");
    }
    info!(view = ?session.view(), "console launched standalone; waiting for demo activation");

    while let Some(deadline) = session.next_deadline() {
        let outbound = session.tick(deadline);
        for frame in outbound {
            info!(frame = ?frame, "console emitted");
        }
    }
    info!(
        connected = session.is_connected(),
        customer = session.context().customer_name.as_deref(),
        view = ?session.view(),
        "demo customer active"
    );

    // Walk the launcher the way an agent would.
    for pick in ["quick_balance_check", "wealth_management"] {
        let outbound = session.select_intent(Intent::new(pick));
        info!(intent = pick, view = ?session.view(), outbound = outbound.len(), "launcher selection");
    }
    Ok(())
}

fn mock_customer() -> CustomerContext {
    CustomerContext {
        customer_id: Some("cust-4821".to_string()),
        customer_name: Some("Priya Shah".to_string()),
        email: Some("priya.shah@example.bank".to_string()),
        phone: Some("+44 20 7946 0321".to_string()),
        location: Some("London".to_string()),
        account_number: Some("GB29-0042-8217".to_string()),
        account_type: Some("current".to_string()),
        customer_tier: Some("premier".to_string()),
        cin: Some("CIN-77-4821".to_string()),
        intent: Some("fraud_alert".to_string()),
        agent_id: Some("agent-314".to_string()),
        ..CustomerContext::default()
    }
}

async fn deliver(tx: &mpsc::Sender<String>, outbound: Vec<ConsoleMessage>) {
    for frame in outbound {
        match frame.to_json() {
            Ok(raw) => {
                info!(frame = %raw, "console sent");
                if tx.send(raw).await.is_err() {
                    warn!("host hung up; dropping outbound frame");
                }
            }
            Err(err) => warn!(error = %err, "failed to encode outbound frame"),
        }
    }
}

async fn send_host(tx: &mpsc::Sender<(String, String)>, message: &HostMessage) -> Result<()> {
    let raw = message.to_json()?;
    info!(frame = %raw, "host sent");
    tx.send((HOST_ORIGIN.to_string(), raw)).await?;
    Ok(())
}

async fn sleep_until(deadline: Option<Instant>) {
    let Some(deadline) = deadline else {
        return;
    };
    tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
}
