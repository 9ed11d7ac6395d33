use std::num::IntErrorKind;

use serde::Serialize;
use thiserror::Error;

/// Lowest value a card can hold.
pub const MIN_VALUE: i64 = 1;
/// Highest value a card can hold.
pub const MAX_VALUE: i64 = 50;

/// Why a raw guess was rejected. Both kinds are shown to the player as the
/// same range message; they stay separate for logging and tests.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("not an integer: {input:?}")]
    InvalidFormat { input: String },
    #[error("{value} is outside 1..=50")]
    OutOfRange { value: i64 },
}

/// An integer known to be in `MIN_VALUE..=MAX_VALUE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CardValue(u8);

impl CardValue {
    pub const MIN: CardValue = CardValue(MIN_VALUE as u8);
    pub const MAX: CardValue = CardValue(MAX_VALUE as u8);

    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if (MIN_VALUE..=MAX_VALUE).contains(&value) {
            Ok(CardValue(value as u8))
        } else {
            Err(ValidationError::OutOfRange { value })
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for CardValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse raw player input into a `CardValue`.
///
/// Surrounding whitespace is ignored. Anything other than an optionally signed
/// run of ASCII digits is `InvalidFormat`, so `"12a"` and `"12.0"` are
/// rejected. Integers too large to represent count as out of range.
pub fn validate(raw: &str) -> Result<CardValue, ValidationError> {
    let text = raw.trim();
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            input: raw.to_string(),
        });
    }
    match text.parse::<i64>() {
        Ok(value) => CardValue::new(value),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Err(ValidationError::OutOfRange { value: i64::MAX }),
            IntErrorKind::NegOverflow => Err(ValidationError::OutOfRange { value: i64::MIN }),
            _ => Err(ValidationError::InvalidFormat {
                input: raw.to_string(),
            }),
        },
    }
}
