/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use clap::Parser;
use mo_broker::{
    BrokerConfig, BrokerError, Endpoint, InboundMessage, MessageSender, MoBroker, OutboundMessage,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Parser)]
#[command(name = "configurable-broker")]
#[command(about = "Replays a JSON5 script of inbound messages through an MO broker")]
struct Cli {
    /// Broker configuration file (JSON5).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Inbound messages to replay, as a JSON5 array.
    #[arg(short, long)]
    script: PathBuf,

    /// Skip printing the index report after the replay.
    #[arg(long)]
    no_report: bool,
}

/// Writes every outbound message to stdout as one JSON line.
#[derive(Default)]
struct StdoutSender {
    handled: AtomicUsize,
    progressed: Notify,
}

impl StdoutSender {
    /// Waits until `expected` messages went through `send`, successful or not.
    async fn drained(&self, expected: usize, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, async {
            loop {
                let progressed = self.progressed.notified();
                if self.handled.load(Ordering::SeqCst) >= expected {
                    return;
                }
                progressed.await;
            }
        })
        .await
        .is_ok()
    }
}

#[async_trait]
impl MessageSender for StdoutSender {
    async fn send(&self, message: Arc<OutboundMessage>) -> mo_broker::Result<()> {
        let result = serde_json::to_string(message.as_ref())
            .map(|line| println!("{line}"))
            .map_err(|err| BrokerError::Transport(err.to_string()));
        self.handled.fetch_add(1, Ordering::SeqCst);
        self.progressed.notify_waiters();
        result
    }
}

fn load_script(path: &Path) -> Result<Vec<InboundMessage>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("unable to read script {}", path.display()))?;
    json5::from_str(&data).with_context(|| format!("unable to parse script {}", path.display()))
}

/// Feeds the script through the broker and returns how many messages were queued.
fn replay(broker: &MoBroker, script: Vec<InboundMessage>) -> usize {
    info!(messages = script.len(), "replaying script");
    script
        .into_iter()
        .map(|message| broker.receive(message))
        .sum()
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => BrokerConfig::from_file(path)
            .with_context(|| format!("unable to load config {}", path.display()))?,
        None => BrokerConfig::default(),
    };
    let script = load_script(&cli.script)?;

    let broker = MoBroker::new(config).context("unable to create broker")?;
    let stdout = Arc::new(StdoutSender::default());
    broker
        .add_endpoint(Endpoint::new("stdout", "mal", stdout.clone()))
        .await
        .context("unable to add stdout endpoint")?;

    let queued = replay(&broker, script);
    if !stdout.drained(queued, DRAIN_TIMEOUT).await {
        bail!(
            "only {} of {queued} queued messages were written within {DRAIN_TIMEOUT:?}",
            stdout.handled.load(Ordering::SeqCst)
        );
    }
    info!(sent = queued, "replay finished");

    if !cli.no_report {
        println!("{}", broker.report());
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("configurable-broker failed: {err:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{load_script, replay, StdoutSender};
    use mo_broker::{BrokerConfig, Endpoint, MoBroker};
    use std::path::Path;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use std::time::Duration;

    const DEMO_SCRIPT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/demo/script.json5");

    #[tokio::test]
    async fn replay_waits_for_every_queued_message() {
        let broker = MoBroker::new(BrokerConfig::default()).expect("broker");
        let stdout = Arc::new(StdoutSender::default());
        broker
            .add_endpoint(Endpoint::new("stdout", "mal", stdout.clone()))
            .await
            .expect("endpoint");

        let script = load_script(Path::new(DEMO_SCRIPT)).expect("demo script");
        let queued = replay(&broker, script);

        assert!(queued > 0);
        assert!(stdout.drained(queued, Duration::from_secs(5)).await);
        assert_eq!(stdout.handled.load(Ordering::SeqCst), queued);
    }

    #[tokio::test]
    async fn drain_times_out_when_messages_never_arrive() {
        let stdout = StdoutSender::default();

        assert!(!stdout.drained(1, Duration::from_millis(50)).await);
    }

    #[test]
    fn missing_script_error_names_the_path() {
        let err = load_script(Path::new("/nonexistent/script.json5")).expect_err("missing");

        let rendered = format!("{err:#}");
        assert!(rendered.starts_with("unable to read script /nonexistent/script.json5: "));
    }
}
