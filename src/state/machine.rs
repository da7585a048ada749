//! Core state machine implementation
//!
//! Owns the active/idle session flag and drives the listen → dispatch →
//! speak cycle on the calling thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::events::AssistantEvent;
use crate::intent::Dispatcher;
use crate::speech::{SpeechError, SpeechInput, SpeechOutput};

/// Phrase that starts an active session
pub const WAKE_WORD: &str = "edith";

/// Phrases that end an active session
const SLEEP_WORDS: [&str; 2] = ["sleep", "exit"];

const STARTUP_MESSAGE: &str = "EDITH initialization complete. Systems operational sir";
const ACTIVATION_MESSAGE: &str = "Yes sir, I am here. How can I assist you?";
const STANDBY_MESSAGE: &str = "Going to standby mode sir";

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Waiting for the wake word
    Idle,
    /// Treating transcripts as commands
    Active,
}

impl Default for State {
    fn default() -> Self {
        Self::Idle
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            State::Idle => write!(f, "Idle"),
            State::Active => write!(f, "Active"),
        }
    }
}

/// The state machine that owns the session and the speech adapters
pub struct StateMachine {
    /// Current state
    state: State,
    /// Time the current session started
    state_entered_at: Option<Instant>,
    input: Box<dyn SpeechInput>,
    output: Box<dyn SpeechOutput>,
    dispatcher: Dispatcher,
    /// Channel for emitting lifecycle events
    event_tx: broadcast::Sender<AssistantEvent>,
}

impl StateMachine {
    /// Create a new state machine, starting idle
    pub fn new(
        input: Box<dyn SpeechInput>,
        output: Box<dyn SpeechOutput>,
        dispatcher: Dispatcher,
        event_tx: broadcast::Sender<AssistantEvent>,
    ) -> Self {
        Self {
            state: State::Idle,
            state_entered_at: None,
            input,
            output,
            dispatcher,
            event_tx,
        }
    }

    /// Get the current state
    pub fn state(&self) -> State {
        self.state
    }

    /// Announce startup, then listen until `running` is cleared.
    ///
    /// `running` is checked between listens. Any output failure ends the
    /// loop and is returned.
    pub fn run(&mut self, running: &AtomicBool) -> Result<(), SpeechError> {
        self.output.speak(STARTUP_MESSAGE)?;
        self.emit(AssistantEvent::Initialized);
        info!("state machine started in Idle state");

        while running.load(Ordering::SeqCst) {
            self.step()?;
        }

        info!(state = %self.state(), "state machine stopped");
        Ok(())
    }

    /// Listen once and react to the transcript
    pub fn step(&mut self) -> Result<(), SpeechError> {
        let transcript = self.input.listen();

        match self.state {
            State::Idle => self.handle_idle(&transcript),
            State::Active => self.handle_active(&transcript),
        }
    }

    fn handle_idle(&mut self, transcript: &str) -> Result<(), SpeechError> {
        if !transcript.contains(WAKE_WORD) {
            return Ok(());
        }

        self.transition_to(State::Active);
        self.output.speak(ACTIVATION_MESSAGE)
    }

    fn handle_active(&mut self, transcript: &str) -> Result<(), SpeechError> {
        if transcript.is_empty() {
            return Ok(());
        }

        if SLEEP_WORDS.iter().any(|word| transcript.contains(word)) {
            self.output.speak(STANDBY_MESSAGE)?;
            self.transition_to(State::Idle);
            return Ok(());
        }

        let intent = self
            .dispatcher
            .handle_command(transcript, self.output.as_mut())?;
        self.emit(AssistantEvent::CommandHandled { intent });
        Ok(())
    }

    /// Perform a state transition
    fn transition_to(&mut self, new_state: State) {
        let old_state = self.state;
        let duration_ms = self
            .state_entered_at
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0);

        info!(
            from = %old_state,
            to = %new_state,
            duration_ms = duration_ms,
            "state transition"
        );

        self.state = new_state;
        self.state_entered_at = match new_state {
            State::Active => Some(Instant::now()),
            State::Idle => None,
        };

        self.emit(match new_state {
            State::Active => AssistantEvent::Activated,
            State::Idle => AssistantEvent::Standby,
        });
    }

    fn emit(&self, event: AssistantEvent) {
        debug!(%event, "emitting event");
        let _ = self.event_tx.send(event);
    }
}
