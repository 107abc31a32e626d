//! Realtime commands: print subscribed events, or send one.

use anyhow::{Context, Result};
use serde_json::{json, Value};
use sheet_client::{RealtimeChannel, RealtimeConfig, RealtimeTransport, SocketIoTransport};
use std::future::Future;
use std::path::Path;

use crate::config::Profile;

/// Channel configuration from the stored profile.
pub fn channel_config(profile: &Profile, url: Option<&str>, events: &[String]) -> RealtimeConfig {
    let mut config = RealtimeConfig::new(profile.access_key.clone())
        .with_url(url.unwrap_or(&profile.realtime_url));
    if let Some(user_id) = &profile.user_id {
        config = config.with_user_id(user_id.clone());
    }
    for event in events {
        config = config.subscribe(event.clone());
    }
    config
}

/// One output line per received event.
pub fn event_line(name: &str, payload: &Value) -> String {
    json!({ "event": name, "payload": payload }).to_string()
}

/// Hold the channel open until `shutdown` resolves, then disconnect.
pub async fn listen<T, F>(config: RealtimeConfig, transport: T, shutdown: F) -> Result<()>
where
    T: RealtimeTransport,
    F: Future<Output = ()>,
{
    let config = config.on_message(|name, payload| println!("{}", event_line(name, payload)));
    let channel = RealtimeChannel::init(config, transport)
        .await
        .context("Failed to open realtime channel")?;

    shutdown.await;
    channel.disconnect().await?;
    Ok(())
}

/// Connect, send one event, disconnect.
pub async fn emit<T: RealtimeTransport>(
    config: RealtimeConfig,
    transport: T,
    event: &str,
    payload: Value,
) -> Result<()> {
    let channel = RealtimeChannel::init(config, transport)
        .await
        .context("Failed to open realtime channel")?;
    if !channel.is_connected() {
        channel.disconnect().await?;
        anyhow::bail!("Realtime channel did not connect; '{}' not sent.", event);
    }

    let sent = channel.emit(event, payload).await;
    channel.disconnect().await?;
    Ok(sent?)
}

/// Run the listen command until Ctrl-C.
pub async fn run_listen(data_dir: &Path, url: Option<&str>, events: &[String]) -> Result<()> {
    let profile = Profile::load(data_dir).await?;
    let config = channel_config(&profile, url, events);

    eprintln!(
        "Listening on {} for {}. Press Ctrl-C to stop.",
        config.url,
        if events.is_empty() {
            "no events (log only)".to_string()
        } else {
            events.join(", ")
        }
    );

    listen(config, SocketIoTransport::new(), async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to wait for Ctrl-C");
        }
    })
    .await
}

/// Run the emit command.
pub async fn run_emit(data_dir: &Path, url: Option<&str>, event: &str, payload: Value) -> Result<()> {
    let profile = Profile::load(data_dir).await?;
    let config = channel_config(&profile, url, &[]);
    emit(config, SocketIoTransport::new(), event, payload).await?;
    println!("Sent '{}'.", event);
    Ok(())
}
