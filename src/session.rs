use rand::{Rng, SeedableRng, distributions::Uniform, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;

use crate::validate::{CardValue, MAX_VALUE, MIN_VALUE, ValidationError};

/// Valid guesses allowed per session.
pub const MAX_ATTEMPTS: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    /// A guess arrived after the session was won or lost. Callers treat this
    /// as a no-op and do not show it to the player.
    #[error("session already finished")]
    SubmissionAfterTerminal,
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// Where a guess landed relative to the secret.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Outcome {
    TooLow,
    TooHigh,
    Correct,
}

/// One accepted guess.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GuessRecord {
    pub value: CardValue,
    pub outcome: Outcome,
}

/// Supplies the secret for each new session.
#[derive(Clone, Debug)]
pub enum SecretSource {
    /// Always the same secret; used for reproducible sessions.
    Fixed(CardValue),
    /// Reproducible sequence of secrets from a seeded generator.
    Seeded(StdRng),
    /// Thread-local RNG.
    Random,
}

impl SecretSource {
    pub fn fixed(value: i64) -> Result<Self, GameError> {
        Ok(SecretSource::Fixed(CardValue::new(value)?))
    }

    pub fn seeded(seed: u64) -> Self {
        SecretSource::Seeded(StdRng::seed_from_u64(seed))
    }

    /// Draw the secret for the next session.
    pub fn draw(&mut self) -> CardValue {
        let distr = Uniform::new_inclusive(MIN_VALUE, MAX_VALUE);
        let value = match self {
            SecretSource::Fixed(v) => return *v,
            SecretSource::Seeded(rng) => rng.sample(distr),
            SecretSource::Random => rand::thread_rng().sample(distr),
        };
        // the distribution never leaves the card range
        CardValue::new(value).unwrap_or(CardValue::MIN)
    }
}

/// State of one playthrough.
#[derive(Clone, Debug)]
pub struct GameSession {
    secret: CardValue,
    history: Vec<GuessRecord>,
    status: GameStatus,
}

impl GameSession {
    pub fn new(secret: CardValue) -> Self {
        GameSession {
            secret,
            history: Vec::with_capacity(MAX_ATTEMPTS),
            status: GameStatus::InProgress,
        }
    }

    pub fn from_source(source: &mut SecretSource) -> Self {
        GameSession::new(source.draw())
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn history(&self) -> &[GuessRecord] {
        &self.history
    }

    pub fn attempts_used(&self) -> usize {
        self.history.len()
    }

    pub fn max_attempts(&self) -> usize {
        MAX_ATTEMPTS
    }

    /// The secret, once the session is over.
    pub fn revealed_secret(&self) -> Option<CardValue> {
        self.status.is_terminal().then_some(self.secret)
    }

    /// Record a validated guess and advance the state machine.
    ///
    /// An exact match is checked before attempt exhaustion, so the last
    /// allowed guess can still win. Once the session is terminal nothing is
    /// recorded and `SubmissionAfterTerminal` is returned.
    pub fn submit_guess(&mut self, value: CardValue) -> Result<GuessRecord, GameError> {
        if self.status.is_terminal() {
            return Err(GameError::SubmissionAfterTerminal);
        }
        let outcome = match value.cmp(&self.secret) {
            std::cmp::Ordering::Less => Outcome::TooLow,
            std::cmp::Ordering::Greater => Outcome::TooHigh,
            std::cmp::Ordering::Equal => Outcome::Correct,
        };
        let record = GuessRecord { value, outcome };
        self.history.push(record);

        if outcome == Outcome::Correct {
            self.status = GameStatus::Won;
        } else if self.history.len() == MAX_ATTEMPTS {
            self.status = GameStatus::Lost;
        }
        Ok(record)
    }
}
