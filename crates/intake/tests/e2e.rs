// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end integration tests for the complete intake pipeline.
//!
//! Each test creates an isolated TestHarness with temp SQLite and a mock
//! channel. Tests are independent and order-insensitive.

use std::time::Duration;

use intake_config::model::StorageConfig;
use intake_core::{ApplicationStore, Keyboard, UserId};
use intake_flow::{ConversationState, CooldownDecision, Outcome};
use intake_storage::SqliteStorage;
use intake_telegram::TelegramChannel;
use intake_test_utils::{TestHarness, events};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

const ALICE: i64 = 12345;

// ---- Scenario: /start, trigger, submit, immediate second text ----

#[tokio::test(start_paused = true)]
async fn test_full_application_scenario() {
    let mut harness = TestHarness::new().await.unwrap();

    assert_eq!(
        harness.send(events::start(ALICE)).await.unwrap(),
        Outcome::Welcomed
    );
    assert_eq!(
        harness.send(events::apply_button(ALICE)).await.unwrap(),
        Outcome::Prompted {
            already_awaiting: false
        }
    );
    assert_eq!(harness.state_of(ALICE), ConversationState::AwaitingText);

    let outcome = harness
        .send(events::text(ALICE, "Need a website"))
        .await
        .unwrap();
    assert!(matches!(outcome, Outcome::Submitted { .. }));

    let apps = harness.applications().await.unwrap();
    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0].user_id, ALICE);
    assert_eq!(apps[0].application_text, "Need a website");
    assert_eq!(harness.state_of(ALICE), ConversationState::Idle);

    // Back in Idle: the second text is not an application.
    let second = harness
        .send(events::text(ALICE, "Need a website"))
        .await
        .unwrap();
    assert_eq!(second, Outcome::Guided);
    assert_eq!(harness.applications().await.unwrap().len(), 1);

    let texts = harness.mock_channel.sent_texts().await;
    let messages = &harness.config.messages;
    assert_eq!(
        texts,
        vec![
            messages.welcome.clone(),
            messages.prompt.clone(),
            messages.confirmation.clone(),
            messages.guidance.clone(),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_second_submission_inside_cooldown_reports_wait() {
    let mut harness = TestHarness::new().await.unwrap();

    harness.send(events::apply(ALICE)).await.unwrap();
    harness.send(events::text(ALICE, "first")).await.unwrap();

    tokio::time::advance(Duration::from_secs(1)).await;
    harness.send(events::apply(ALICE)).await.unwrap();
    let outcome = harness.send(events::text(ALICE, "second")).await.unwrap();
    assert_eq!(
        outcome,
        Outcome::RateLimited {
            seconds_remaining: 59
        }
    );
    assert_eq!(harness.state_of(ALICE), ConversationState::AwaitingText);

    let reply = harness.mock_channel.last_sent().await.unwrap();
    assert_eq!(reply.text, harness.config.messages.cooldown_text(59));
    assert_eq!(reply.keyboard, None);
}

#[tokio::test(start_paused = true)]
async fn test_custom_cooldown_is_honoured() {
    let mut harness = TestHarness::builder()
        .with_cooldown_secs(5)
        .build()
        .await
        .unwrap();

    harness.send(events::apply(ALICE)).await.unwrap();
    harness.send(events::text(ALICE, "first")).await.unwrap();
    assert_eq!(
        harness.flow.cooldown_for(UserId(ALICE), Instant::now()),
        CooldownDecision::Denied {
            seconds_remaining: 5
        }
    );

    tokio::time::advance(Duration::from_secs(5)).await;
    harness.send(events::apply(ALICE)).await.unwrap();
    let outcome = harness.send(events::text(ALICE, "second")).await.unwrap();
    assert!(matches!(outcome, Outcome::Submitted { .. }));
}

// ---- Loop wiring ----

#[tokio::test]
async fn test_loop_with_forwarding_and_group_noise() {
    let harness = TestHarness::builder()
        .with_forward_chat("-1001234567890")
        .build()
        .await
        .unwrap();
    let mut parts = harness.into_loop();

    for event in [
        events::group_text(ALICE, -1001234567890, "hello group"),
        events::start(ALICE),
        events::apply(ALICE),
        events::text(ALICE, "Need a website"),
    ] {
        parts.mock_channel.inject_event(event).await;
    }
    parts.mock_channel.close();

    parts
        .intake_loop
        .run(CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(parts.store.count_applications().await.unwrap(), 1);
    let forwarded = parts.mock_channel.forwarded().await;
    assert_eq!(forwarded.len(), 1);
    assert_eq!(forwarded[0].destination, "-1001234567890");
    assert!(forwarded[0].text.contains("Need a website"));

    let sent = parts.mock_channel.sent_messages().await;
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[2].keyboard, Some(Keyboard::ApplyMenu));
}

// ---- Persistence across restarts ----

#[tokio::test]
async fn test_applications_survive_restart_but_state_does_not() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("restart.db").to_string_lossy().to_string();

    {
        let mut harness = TestHarness::builder()
            .with_database_path(&db_path)
            .build()
            .await
            .unwrap();
        harness.send(events::apply(ALICE)).await.unwrap();
        harness.send(events::text(ALICE, "Need a website")).await.unwrap();
        harness.send(events::apply(ALICE)).await.unwrap();
        assert_eq!(harness.state_of(ALICE), ConversationState::AwaitingText);
        harness.store.close().await.unwrap();
    }

    // A fresh process starts with empty conversation state but the same records.
    let harness = TestHarness::builder()
        .with_database_path(&db_path)
        .build()
        .await
        .unwrap();
    assert_eq!(harness.state_of(ALICE), ConversationState::Idle);

    let apps = harness.applications().await.unwrap();
    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0].user_id, ALICE);
    assert_eq!(apps[0].application_text, "Need a website");

    let reopened = SqliteStorage::new(StorageConfig {
        database_path: db_path,
        wal_mode: true,
    });
    reopened.initialize().await.unwrap();
    assert_eq!(reopened.count_applications().await.unwrap(), 1);
}

// ---- Configuration errors ----

#[test]
fn test_missing_bot_token_is_a_configuration_error() {
    let config = intake_config::load_and_validate_str("").unwrap();
    assert!(intake_config::require_bot_token(&config).is_err());
    assert!(TelegramChannel::new(config.telegram).is_err());
}

#[test]
fn test_configured_bot_token_is_accepted() {
    let config = intake_config::load_and_validate_str(
        "[telegram]\nbot_token = \"123456:ABC-DEF\"\nforward_chat = -100123\n",
    )
    .unwrap();
    assert_eq!(
        intake_config::require_bot_token(&config).unwrap(),
        "123456:ABC-DEF"
    );
    assert_eq!(config.telegram.forward_chat.as_deref(), Some("-100123"));
    assert!(TelegramChannel::new(config.telegram).is_ok());
}
