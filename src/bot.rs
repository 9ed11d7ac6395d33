//! Telegram front-end: one game per (chat, user), driven through
//! [`SessionController`].

use anyhow::Result;
use dotenvy::dotenv;
use std::{collections::HashMap, sync::Arc};
use teloxide::prelude::*;
use tokio::sync::RwLock;

use crate::{
    Config, Lang, Messages,
    controller::{SessionController, ViewModel},
    format_with, lang_tag, parse_lang,
    session::{MAX_ATTEMPTS, Outcome, SecretSource},
    validate::{MAX_VALUE, MIN_VALUE},
};

/// Shared application state
pub struct AppState {
    // key: (chat_id, user_id)
    pub by_user: HashMap<(i64, u64), SessionController>,
    pub user_langs: HashMap<(i64, u64), Lang>,
    // every new session draws its secret from here
    pub source: SecretSource,
}

impl AppState {
    pub fn new(source: SecretSource) -> Self {
        AppState {
            by_user: HashMap::new(),
            user_langs: HashMap::new(),
            source,
        }
    }
}

pub type SharedState = Arc<RwLock<AppState>>;
pub type SharedConfig = Arc<Config>;

/// Determine the effective language from a stored preference, then the
/// client's language code (full locales like "en-US" match on the prefix).
pub async fn effective_lang_from_parts(
    state: &SharedState,
    user_language_code: Option<&str>,
    user_id: Option<u64>,
    chat_id: i64,
    default: Lang,
) -> Lang {
    let lock = state.read().await;
    if let Some(uid) = user_id {
        if let Some(&l) = lock.user_langs.get(&(chat_id, uid)) {
            return l;
        }
    }
    drop(lock);
    if let Some(lang_code) = user_language_code {
        if let Some(parsed) = parse_lang(lang_code) {
            return parsed;
        }
        if let Some(prefix) = lang_code.get(..2) {
            if let Some(parsed) = parse_lang(prefix) {
                return parsed;
            }
        }
    }
    default
}

/// Render a view model as a chat reply.
pub fn render_view(view: &ViewModel, messages: &Messages) -> String {
    let mut lines = Vec::new();
    if !view.message.is_empty() {
        lines.push(view.message.clone());
    }
    if !view.attempts_label.is_empty() {
        lines.push(format!("{} {}", messages.attempts_label, view.attempts_label));
    }
    if !view.history.is_empty() {
        let items: Vec<String> = view
            .history
            .iter()
            .map(|r| {
                let mark = match r.outcome {
                    Outcome::TooLow => "↑",
                    Outcome::TooHigh => "↓",
                    Outcome::Correct => "✅",
                };
                format!("{}{}", r.value, mark)
            })
            .collect();
        lines.push(format!("{} {}", messages.guesses_label, items.join(" ")));
    }
    if let Some(secret) = view.revealed_secret {
        lines.push(format_with(
            &messages.secret_label,
            &[("secret", &secret.to_string())],
        ));
        lines.push(messages.finished_hint.clone());
    }
    lines.join("\n")
}

fn intro(template: &str) -> String {
    format_with(
        template,
        &[
            ("min", &MIN_VALUE.to_string()),
            ("max", &MAX_VALUE.to_string()),
            ("attempts", &MAX_ATTEMPTS.to_string()),
        ],
    )
}

/// Handle one text message from `user_id` in `chat_id`. Returns the reply, or
/// `None` for unknown commands.
pub async fn handle_text(
    state: &SharedState,
    config: &Config,
    chat_id: i64,
    user_id: u64,
    language_code: Option<&str>,
    text: &str,
) -> Option<String> {
    let text = text.trim();
    let lang =
        effective_lang_from_parts(state, language_code, Some(user_id), chat_id, config.lang).await;
    let messages = config.messages_for(lang);
    let key = (chat_id, user_id);

    let (command, rest) = match text.split_once(char::is_whitespace) {
        Some((c, r)) => (c, r.trim()),
        None => (text, ""),
    };
    // "/guess@my_bot 12" style addressing in groups
    let command = command.split('@').next().unwrap_or(command);

    let mut lock = state.write().await;
    let AppState {
        by_user,
        user_langs,
        source,
    } = &mut *lock;

    if command.eq_ignore_ascii_case("/ping") {
        return Some(messages.pong.clone());
    }

    if command.eq_ignore_ascii_case("/start") || command.eq_ignore_ascii_case("/reset") {
        match by_user.get_mut(&key) {
            Some(controller) => {
                controller.set_messages(messages.clone());
                controller.reset(source);
            }
            None => {
                by_user.insert(key, SessionController::new(source, messages.clone()));
            }
        }
        tracing::info!("new session: chat={} user={}", chat_id, user_id);
        let template = if command.eq_ignore_ascii_case("/start") {
            &messages.intro
        } else {
            &messages.reset_done
        };
        return Some(intro(template));
    }

    if command.eq_ignore_ascii_case("/lang") {
        if rest.is_empty() {
            let mut available: Vec<String> = config
                .messages
                .iter()
                .map(|(k, v)| format!("{} ({})", v.language_name, k))
                .collect();
            available.sort_unstable();
            return Some(format!(
                "{} {} ({})\nAvailable languages: {}",
                messages.current_language_label,
                messages.language_name,
                lang_tag(&lang),
                available.join(", ")
            ));
        }
        return match parse_lang(rest) {
            Some(new_lang) => {
                user_langs.insert(key, new_lang);
                let new_messages = config.messages_for(new_lang);
                if let Some(controller) = by_user.get_mut(&key) {
                    controller.set_messages(new_messages.clone());
                }
                Some(new_messages.lang_set)
            }
            None => Some(messages.lang_invalid.clone()),
        };
    }

    let raw = if command.eq_ignore_ascii_case("/guess") {
        rest
    } else if text.starts_with('/') {
        return None;
    } else {
        text
    };

    let controller = by_user
        .entry(key)
        .or_insert_with(|| SessionController::new(source, messages.clone()));
    let view = controller.submit_guess(raw);
    Some(render_view(&view, &messages))
}

/// Run the bot. Separated from `main` so tests can import the library.
pub async fn run_bot() -> Result<()> {
    tracing_subscriber::fmt::init();
    dotenv().ok();
    let config: SharedConfig = Arc::new(Config::from_env()?);
    let bot = Bot::from_env();

    let state: SharedState = Arc::new(RwLock::new(AppState::new(config.secret_source())));
    tracing::info!(
        "starting: default_lang={} languages={}",
        lang_tag(&config.lang),
        config.messages.len()
    );

    teloxide::repl(bot, move |bot: Bot, msg: Message| {
        let state = state.clone();
        let config = config.clone();
        async move {
            if let Err(err) = handle_message(&bot, &msg, &state, &config).await {
                tracing::error!("handler error: {:?}", err);
            }
            respond(())
        }
    })
    .await;

    Ok(())
}

async fn handle_message(
    bot: &Bot,
    msg: &Message,
    state: &SharedState,
    config: &Config,
) -> Result<()> {
    let (Some(text), Some(user)) = (msg.text(), msg.from.as_ref()) else {
        return Ok(());
    };
    let reply = handle_text(
        state,
        config,
        msg.chat.id.0,
        user.id.0,
        user.language_code.as_deref(),
        text,
    )
    .await;
    if let Some(reply) = reply {
        bot.send_message(msg.chat.id, reply).await?;
    }
    Ok(())
}
