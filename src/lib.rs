use anyhow::Result;
use serde::Deserialize;
use std::{collections::HashMap, fs, path::Path};

pub mod bot;
pub mod controller;
pub mod feedback;
pub mod session;
pub mod validate;

pub use bot::{AppState, SharedState, effective_lang_from_parts, handle_text, run_bot};
pub use controller::{SessionController, ViewModel};
pub use feedback::feedback;
pub use session::{
    GameError, GameSession, GameStatus, GuessRecord, MAX_ATTEMPTS, Outcome, SecretSource,
};
pub use validate::{CardValue, MAX_VALUE, MIN_VALUE, ValidationError, validate};

/// Runtime configuration (from environment with sensible defaults)
#[derive(Clone, Debug)]
pub struct Config {
    pub lang: Lang,
    pub messages: HashMap<String, Messages>,
    // fixed secret for every session (GUESS_SECRET), mainly for reproducible play
    pub secret: Option<CardValue>,
    // seed for a reproducible random secret sequence (GUESS_SEED)
    pub seed: Option<u64>,
}

impl Config {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Config> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lang = lookup("DEFAULT_LANG")
            .and_then(|v| parse_lang(v.trim()))
            .unwrap_or(Lang::En);

        let secret = match lookup("GUESS_SECRET") {
            Some(raw) => match validate(&raw) {
                Ok(v) => Some(v),
                Err(e) => anyhow::bail!(
                    "Invalid configuration: GUESS_SECRET ({}) must be an integer between {} and {}: {}",
                    raw,
                    MIN_VALUE,
                    MAX_VALUE,
                    e
                ),
            },
            None => None,
        };

        let seed = match lookup("GUESS_SEED") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(s) => Some(s),
                Err(_) => anyhow::bail!(
                    "Invalid configuration: GUESS_SEED ({}) must be a non-negative integer.",
                    raw
                ),
            },
            None => None,
        };

        let dir = lookup("MESSAGES_DIR").unwrap_or_else(|| "messages".to_string());
        let mut messages = load_all_messages(&dir);
        // Ensure at least English messages exist as a fallback
        messages
            .entry(lang_tag(&Lang::En).to_string())
            .or_insert_with(|| default_messages(Lang::En));

        Ok(Config {
            lang,
            messages,
            secret,
            seed,
        })
    }

    /// The secret source every new session draws from.
    pub fn secret_source(&self) -> SecretSource {
        match (self.secret, self.seed) {
            (Some(v), _) => SecretSource::Fixed(v),
            (None, Some(seed)) => SecretSource::seeded(seed),
            (None, None) => SecretSource::Random,
        }
    }

    /// Messages for `lang`, falling back to the default language then English.
    pub fn messages_for(&self, lang: Lang) -> Messages {
        self.messages
            .get(lang_tag(&lang))
            .or_else(|| self.messages.get(lang_tag(&self.lang)))
            .or_else(|| self.messages.get("en"))
            .cloned()
            .unwrap_or_else(|| default_messages(Lang::En))
    }
}

/// Messages container loaded from JSON files per language
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Messages {
    pub out_of_range: String,
    pub too_high: String,
    pub too_low: String,
    pub correct: String,
    pub game_over: String,
    pub intro: String,
    pub reset_done: String,
    pub attempts_label: String,
    pub guesses_label: String,
    pub secret_label: String,
    pub finished_hint: String,
    pub current_language_label: String,
    pub language_name: String,
    pub lang_set: String,
    pub lang_invalid: String,
    pub pong: String,
}

/// Load a Messages struct from a given JSON file path, falling back to defaults
pub fn load_messages_file(path: &str, lang: Lang) -> Messages {
    match fs::read_to_string(path) {
        Ok(s) => serde_json::from_str(&s).unwrap_or_else(|e| {
            tracing::warn!("failed to parse {}: {}. Falling back to defaults.", path, e);
            default_messages(lang)
        }),
        Err(e) => {
            tracing::warn!("failed to read {}: {}. Falling back to defaults.", path, e);
            default_messages(lang)
        }
    }
}

/// Return default Messages for a given language; only English is compiled in.
pub fn default_messages(lang: Lang) -> Messages {
    match lang {
        Lang::En => Messages {
            out_of_range: "ERROR: Input should be between {min} & {max}".to_string(),
            too_high: "My number is smaller. Try Again!".to_string(),
            too_low: "My number is larger. Try Again!".to_string(),
            correct: "Congratulations! You guessed the number!".to_string(),
            game_over: "Game Over! You've used all your attempts.".to_string(),
            intro: "🃏 Guess the card value! It is a number between {min} and {max}, and you have {attempts} attempts.".to_string(),
            reset_done: "New card dealt. Guess a number between {min} and {max}.".to_string(),
            attempts_label: "Attempts:".to_string(),
            guesses_label: "Guesses:".to_string(),
            secret_label: "The card was {secret}.".to_string(),
            finished_hint: "Use /reset to play again.".to_string(),
            current_language_label: "Current language:".to_string(),
            language_name: "English".to_string(),
            lang_set: "Your language preference was set.".to_string(),
            lang_invalid: "Invalid usage. Examples: `/lang en`, `/lang it`".to_string(),
            pong: "pong".to_string(),
        },
        _ => default_messages(Lang::En),
    }
}

/// Load every `*.json` file from `dir` and return a map from language tag to
/// parsed `Messages`. Files which fail to parse fall back to defaults.
pub fn load_all_messages(dir: &str) -> HashMap<String, Messages> {
    let mut map = HashMap::new();
    let p = Path::new(dir);
    if let Ok(entries) = p.read_dir() {
        for entry in entries.flatten() {
            if let Ok(fname) = entry.file_name().into_string() {
                if fname.to_lowercase().ends_with(".json") {
                    let stem = fname.trim_end_matches(".json");
                    if let Some(lang) = parse_lang(stem) {
                        let path = format!("{}/{}", dir, fname);
                        let msgs = load_messages_file(&path, lang);
                        map.insert(lang_tag(&lang).to_string(), msgs);
                    } else {
                        tracing::warn!("skipping unknown language file: {}", fname);
                    }
                }
            }
        }
    } else {
        tracing::warn!("messages directory {} not readable", dir);
    }
    map
}

/// Simple template formatter: replace `{key}` with `value` for each pair in `pairs`.
pub fn format_with(template: &str, pairs: &[(&str, &str)]) -> String {
    let mut s = template.to_string();
    for (k, v) in pairs {
        s = s.replace(&format!("{{{}}}", k), v);
    }
    s
}

/// Supported languages
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lang {
    En,
    It,
}

/// Parse a short language tag into `Lang`.
pub fn parse_lang(s: &str) -> Option<Lang> {
    match s.to_lowercase().as_str() {
        "it" => Some(Lang::It),
        "en" => Some(Lang::En),
        _ => None,
    }
}

/// Return the short tag for a Lang variant (e.g. Lang::En -> "en").
pub fn lang_tag(l: &Lang) -> &'static str {
    match l {
        Lang::En => "en",
        Lang::It => "it",
    }
}
