use std::sync::Arc;

use guess_the_card::{
    AppState, Config, GameStatus, Lang, SecretSource, SharedState, default_messages, handle_text,
    load_all_messages,
};
use tokio::sync::RwLock;

fn config() -> Config {
    let mut messages = load_all_messages("messages");
    messages
        .entry("en".to_string())
        .or_insert_with(|| default_messages(Lang::En));
    Config {
        lang: Lang::En,
        messages,
        secret: None,
        seed: None,
    }
}

fn state_with_secret(secret: i64) -> SharedState {
    Arc::new(RwLock::new(AppState::new(
        SecretSource::fixed(secret).unwrap(),
    )))
}

#[tokio::test]
async fn plain_numbers_and_guess_command_share_one_session() {
    let state = state_with_secret(12);
    let cfg = config();

    let reply = handle_text(&state, &cfg, 1, 10, None, "5").await.unwrap();
    assert!(reply.starts_with("My number is larger. Try Again!"), "{}", reply);
    assert!(reply.contains("Attempts: 1 / 10"), "{}", reply);

    let reply = handle_text(&state, &cfg, 1, 10, None, "/guess 20").await.unwrap();
    assert!(reply.starts_with("My number is smaller. Try Again!"), "{}", reply);
    assert!(reply.contains("Guesses: 5↑ 20↓"), "{}", reply);

    let reply = handle_text(&state, &cfg, 1, 10, None, "12").await.unwrap();
    assert!(reply.starts_with("Congratulations! You guessed the number!"));
    assert!(reply.contains("The card was 12."), "{}", reply);

    let lock = state.read().await;
    let game = lock.by_user.get(&(1, 10)).expect("session");
    assert_eq!(game.view().status, GameStatus::Won);
    assert_eq!(game.session().attempts_used(), 3);
}

#[tokio::test]
async fn invalid_input_gets_range_error() {
    let state = state_with_secret(12);
    let cfg = config();
    let reply = handle_text(&state, &cfg, 1, 10, None, "abc").await.unwrap();
    assert!(reply.starts_with("ERROR: Input should be between 1 & 50"));
    assert!(reply.contains("Attempts: 0 / 10"), "{}", reply);
}

#[tokio::test]
async fn reset_after_loss_starts_a_clean_session() {
    let state = state_with_secret(12);
    let cfg = config();
    for i in 1..=9 {
        handle_text(&state, &cfg, 2, 20, None, &i.to_string()).await;
    }
    let last = handle_text(&state, &cfg, 2, 20, None, "10").await.unwrap();
    assert!(last.starts_with("Game Over! You've used all your attempts."), "{}", last);
    assert!(last.contains("10 / 10"));

    let ignored = handle_text(&state, &cfg, 2, 20, None, "12").await.unwrap();
    assert_eq!(ignored, last);

    let reply = handle_text(&state, &cfg, 2, 20, None, "/reset").await.unwrap();
    assert_eq!(reply, "New card dealt. Guess a number between 1 and 50.");
    let lock = state.read().await;
    let game = lock.by_user.get(&(2, 20)).unwrap();
    assert_eq!(game.view().status, GameStatus::InProgress);
    assert!(game.view().history.is_empty());
}

#[tokio::test]
async fn users_play_separate_sessions() {
    let state = state_with_secret(30);
    let cfg = config();
    handle_text(&state, &cfg, 3, 1, None, "30").await;
    let reply = handle_text(&state, &cfg, 3, 2, None, "10").await.unwrap();
    assert!(reply.contains("Attempts: 1 / 10"), "{}", reply);
    let lock = state.read().await;
    assert_eq!(lock.by_user.len(), 2);
    assert_eq!(lock.by_user[&(3, 1)].view().status, GameStatus::Won);
    assert_eq!(lock.by_user[&(3, 2)].view().status, GameStatus::InProgress);
}

#[tokio::test]
async fn language_switch_changes_feedback() {
    let state = state_with_secret(12);
    let cfg = config();
    let reply = handle_text(&state, &cfg, 4, 1, None, "/lang it").await.unwrap();
    assert_eq!(reply, "Preferenza di lingua impostata.");
    let reply = handle_text(&state, &cfg, 4, 1, Some("en"), "5").await.unwrap();
    assert!(reply.starts_with("Il mio numero è più grande. Riprova!"), "{}", reply);

    let reply = handle_text(&state, &cfg, 4, 1, None, "/lang").await.unwrap();
    assert!(reply.contains("Italiano (it)"), "{}", reply);
    assert!(reply.contains("English (en)"), "{}", reply);

    let reply = handle_text(&state, &cfg, 4, 1, None, "/lang xx").await.unwrap();
    assert_eq!(reply, "Uso non valido. Esempi: `/lang en`, `/lang it`");
}

#[tokio::test]
async fn start_ping_and_unknown_commands() {
    let state = state_with_secret(12);
    let cfg = config();
    let reply = handle_text(&state, &cfg, 5, 1, None, "/start").await.unwrap();
    assert!(reply.contains("between 1 and 50"), "{}", reply);
    assert!(reply.contains("10 attempts"), "{}", reply);
    assert_eq!(
        handle_text(&state, &cfg, 5, 1, None, "/ping").await.as_deref(),
        Some("pong")
    );
    assert_eq!(handle_text(&state, &cfg, 5, 1, None, "/dance").await, None);
}
