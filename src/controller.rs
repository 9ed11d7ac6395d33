use serde::Serialize;

use crate::{
    Messages,
    feedback::{Transition, feedback},
    session::{GameError, GameSession, GameStatus, GuessRecord, SecretSource},
    validate::{CardValue, validate},
};

/// Snapshot handed to the presentation layer after every operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    pub message: String,
    pub history: Vec<GuessRecord>,
    /// `"N / 10"`, or empty before the first submission of a session.
    pub attempts_label: String,
    pub status: GameStatus,
    pub revealed_secret: Option<CardValue>,
}

/// Owns one game session and turns raw input into view models.
#[derive(Clone, Debug)]
pub struct SessionController {
    session: GameSession,
    messages: Messages,
    last_message: String,
    touched: bool,
}

impl SessionController {
    pub fn new(source: &mut SecretSource, messages: Messages) -> Self {
        SessionController {
            session: GameSession::from_source(source),
            messages,
            last_message: String::new(),
            touched: false,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Swap the message catalog; the current session is kept.
    pub fn set_messages(&mut self, messages: Messages) {
        self.messages = messages;
    }

    /// Validate `raw`, apply it to the session and describe the result.
    ///
    /// Rejected input leaves history and attempts untouched. Input arriving
    /// after the session ended is ignored and the last view is returned.
    pub fn submit_guess(&mut self, raw: &str) -> ViewModel {
        if self.session.status().is_terminal() {
            tracing::debug!(
                "ignoring submission {:?}: {}",
                raw,
                GameError::SubmissionAfterTerminal
            );
            return self.view();
        }
        self.touched = true;

        let value = match validate(raw) {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!("rejected guess: {}", e);
                self.last_message = feedback(&self.messages, Transition::Rejected(&e));
                return self.view();
            }
        };

        match self.session.submit_guess(value) {
            Ok(record) => {
                let status = self.session.status();
                match status {
                    GameStatus::Won => tracing::info!(
                        "win: guess={} attempts={}",
                        value,
                        self.session.attempts_used()
                    ),
                    GameStatus::Lost => tracing::info!(
                        "loss: last_guess={} attempts={}",
                        value,
                        self.session.attempts_used()
                    ),
                    GameStatus::InProgress => {}
                }
                self.last_message =
                    feedback(&self.messages, Transition::Accepted { record, status });
            }
            Err(e) => tracing::debug!("guess {} not applied: {}", value, e),
        }
        self.view()
    }

    /// Throw away the current session and start a fresh one.
    pub fn reset(&mut self, source: &mut SecretSource) -> ViewModel {
        tracing::info!(
            "reset: previous status={:?} attempts={}",
            self.session.status(),
            self.session.attempts_used()
        );
        self.session = GameSession::from_source(source);
        self.last_message.clear();
        self.touched = false;
        self.view()
    }

    pub fn view(&self) -> ViewModel {
        let attempts_label = if self.touched {
            format!(
                "{} / {}",
                self.session.attempts_used(),
                self.session.max_attempts()
            )
        } else {
            String::new()
        };
        ViewModel {
            message: self.last_message.clone(),
            history: self.session.history().to_vec(),
            attempts_label,
            status: self.session.status(),
            revealed_secret: self.session.revealed_secret(),
        }
    }
}
