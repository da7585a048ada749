//! edith-daemon: voice-driven command dispatcher
//!
//! Listens on the default microphone, waits for the wake word, then turns
//! each spoken command into one of a handful of actions:
//! - open a known website in the default browser
//! - report the current time or date
//! - fetch current weather for a location
//! - read out the top web search results
//!
//! Every answer is spoken back through synthesized speech. Commands are
//! handled one at a time on a single blocking loop.

mod config;
mod events;
mod intent;
mod lifecycle;
mod speech;
mod state;
mod web;

#[cfg(test)]
mod testing;

use anyhow::{anyhow, Result};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::events::AssistantEvent;
use crate::intent::{Dispatcher, SystemClock};
use crate::lifecycle::{AssistantWorker, ShutdownSignal};
use crate::speech::{
    CpalRecorder, GoogleTranslateTts, Microphone, RodioPlayer, Voice, WhisperApiTranscriber,
};
use crate::state::StateMachine;
use crate::web::{CustomSearchClient, SystemBrowser, WeatherClient};

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "edith-daemon starting"
    );

    match dotenv {
        Ok(path) => info!(?path, "loaded .env"),
        Err(e) => debug!(error = %e, "no .env loaded"),
    }

    // Load configuration
    let config = Config::load()?;
    info!(?config, "configuration loaded");

    let shutdown = ShutdownSignal::new();

    // State machine -> event logger
    let (event_tx, event_rx) = broadcast::channel::<AssistantEvent>(64);
    tokio::spawn(log_events(event_rx));

    let worker = AssistantWorker::new();
    let finished = worker.start(move || build_state_machine(&config, event_tx))?;

    info!("daemon initialized, entering main loop");

    let outcome = tokio::select! {
        result = finished => match result {
            Ok(Ok(())) => {
                info!("assistant loop exited");
                Ok(())
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(anyhow!("assistant loop thread ended without reporting")),
        },

        signal = shutdown.wait() => match signal {
            Ok(name) => {
                info!(signal = name, "shutdown signal received");
                Ok(())
            }
            Err(e) => Err(anyhow::Error::new(e).context("failed to register signal handlers")),
        },
    };

    // An in-flight listen is not waited for
    info!("shutting down...");
    if worker.is_running() {
        debug!("asking assistant loop to stop");
        worker.stop();
    }

    if let Err(e) = &outcome {
        error!(error = %e, "edith-daemon stopped with error");
    } else {
        info!("edith-daemon stopped");
    }

    outcome
}

/// Wire real devices and remote services into a state machine
fn build_state_machine(
    config: &Config,
    event_tx: broadcast::Sender<AssistantEvent>,
) -> Result<StateMachine> {
    let microphone = Microphone::new(
        CpalRecorder::new(config.calibration, config.phrase_limit, config.onset_timeout),
        WhisperApiTranscriber::new(&config.stt)?,
    );
    let voice = Voice::new(GoogleTranslateTts::new(config.tts_lang.clone())?, RodioPlayer);

    let dispatcher = Dispatcher::new(
        Box::new(WeatherClient::new(
            config.google_api_key.clone(),
            config.openweather_api_key.clone(),
        )),
        Box::new(CustomSearchClient::new(
            config.google_api_key.clone(),
            config.google_cse_id.clone(),
        )),
        Box::new(SystemBrowser),
        Box::new(SystemClock),
    );

    Ok(StateMachine::new(
        Box::new(microphone),
        Box::new(voice),
        dispatcher,
        event_tx,
    ))
}

async fn log_events(mut event_rx: broadcast::Receiver<AssistantEvent>) {
    loop {
        match event_rx.recv().await {
            Ok(event) => info!(%event, "assistant event"),
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(skipped = n, "event receiver lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
