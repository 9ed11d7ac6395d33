use crate::{
    Messages, format_with,
    session::{GameStatus, GuessRecord, Outcome},
    validate::{MAX_VALUE, MIN_VALUE, ValidationError},
};

/// What happened to a submission, as far as the player needs to know.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition<'a> {
    Rejected(&'a ValidationError),
    /// A guess was recorded; `status` is the session status afterwards.
    Accepted { record: GuessRecord, status: GameStatus },
}

/// Pick the player-facing message for a transition.
///
/// Both validation error kinds share the range message. A loss replaces the
/// directional hint of the guess that caused it.
pub fn feedback(messages: &Messages, transition: Transition<'_>) -> String {
    match transition {
        Transition::Rejected(_) => format_with(
            &messages.out_of_range,
            &[
                ("min", &MIN_VALUE.to_string()),
                ("max", &MAX_VALUE.to_string()),
            ],
        ),
        Transition::Accepted {
            status: GameStatus::Lost,
            ..
        } => messages.game_over.clone(),
        Transition::Accepted { record, .. } => match record.outcome {
            Outcome::Correct => messages.correct.clone(),
            Outcome::TooHigh => messages.too_high.clone(),
            Outcome::TooLow => messages.too_low.clone(),
        },
    }
}
