// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! State machine tests for the intake flow, driven through the test harness.

use std::time::Duration;

use intake_core::{Keyboard, UserId};
use intake_flow::{ConversationState, CooldownDecision, Outcome};
use intake_test_utils::{TestHarness, events};
use tokio::time::Instant;

const ALICE: i64 = 12345;
const BOB: i64 = 67890;

#[tokio::test]
async fn idle_text_gets_guidance_without_write() {
    let mut harness = TestHarness::new().await.unwrap();

    let outcome = harness.send(events::text(ALICE, "hello?")).await.unwrap();
    assert_eq!(outcome, Outcome::Guided);
    assert_eq!(harness.state_of(ALICE), ConversationState::Idle);
    assert!(harness.applications().await.unwrap().is_empty());

    let reply = harness.mock_channel.last_sent().await.unwrap();
    assert_eq!(reply.text, harness.config.messages.guidance);
    assert_eq!(reply.keyboard, Some(Keyboard::ApplyMenu));
}

#[tokio::test]
async fn idle_slash_text_gets_guidance() {
    let mut harness = TestHarness::new().await.unwrap();

    let outcome = harness
        .send(events::text(ALICE, "/etc/nginx is broken, need help"))
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Guided);
    assert_eq!(harness.mock_channel.sent_count().await, 1);
    assert_eq!(
        harness.mock_channel.last_sent().await.unwrap().text,
        harness.config.messages.guidance
    );
    assert!(harness.applications().await.unwrap().is_empty());
}

#[tokio::test]
async fn start_sends_welcome_and_keeps_state() {
    let mut harness = TestHarness::new().await.unwrap();

    assert_eq!(harness.send(events::start(ALICE)).await.unwrap(), Outcome::Welcomed);
    let reply = harness.mock_channel.last_sent().await.unwrap();
    assert_eq!(reply.text, harness.config.messages.welcome);
    assert_eq!(reply.keyboard, Some(Keyboard::ApplyMenu));
    assert_eq!(harness.state_of(ALICE), ConversationState::Idle);

    harness.send(events::apply(ALICE)).await.unwrap();
    harness.send(events::start(ALICE)).await.unwrap();
    assert_eq!(harness.state_of(ALICE), ConversationState::AwaitingText);
}

#[tokio::test]
async fn trigger_enters_application_mode_idempotently() {
    let mut harness = TestHarness::new().await.unwrap();

    let first = harness.send(events::apply_button(ALICE)).await.unwrap();
    assert_eq!(first, Outcome::Prompted { already_awaiting: false });
    assert_eq!(harness.state_of(ALICE), ConversationState::AwaitingText);
    let prompt = harness.mock_channel.last_sent().await.unwrap();
    assert_eq!(prompt.text, harness.config.messages.prompt);
    assert_eq!(prompt.keyboard, Some(Keyboard::ForceReply));

    let second = harness.send(events::apply(ALICE)).await.unwrap();
    assert_eq!(second, Outcome::Prompted { already_awaiting: true });
    assert_eq!(harness.state_of(ALICE), ConversationState::AwaitingText);
    assert_eq!(
        harness.mock_channel.last_sent().await.unwrap().text,
        harness.config.messages.already_awaiting
    );
    assert_eq!(harness.flow.awaiting_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn successful_submission_persists_and_resets() {
    let mut harness = TestHarness::new().await.unwrap();

    harness.send(events::apply(ALICE)).await.unwrap();
    let outcome = harness
        .send(events::text(ALICE, "Need a website"))
        .await
        .unwrap();
    let Outcome::Submitted { application_id } = outcome else {
        panic!("expected Submitted, got {outcome:?}");
    };

    let apps = harness.applications().await.unwrap();
    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0].id, application_id);
    assert_eq!(apps[0].user_id, ALICE);
    assert_eq!(apps[0].username.as_deref(), Some("user12345"));
    assert_eq!(apps[0].application_text, "Need a website");

    assert_eq!(harness.state_of(ALICE), ConversationState::Idle);
    assert!(matches!(
        harness.flow.cooldown_for(UserId(ALICE), Instant::now()),
        CooldownDecision::Denied { .. }
    ));

    let reply = harness.mock_channel.last_sent().await.unwrap();
    assert_eq!(reply.text, harness.config.messages.confirmation);
    assert_eq!(reply.keyboard, Some(Keyboard::ApplyMenu));
}

#[tokio::test(start_paused = true)]
async fn slash_text_is_accepted_as_an_application() {
    let mut harness = TestHarness::new().await.unwrap();

    harness.send(events::apply(ALICE)).await.unwrap();
    let text = "/etc/nginx is broken, need help";
    let outcome = harness.send(events::text(ALICE, text)).await.unwrap();
    assert!(matches!(outcome, Outcome::Submitted { .. }));

    let apps = harness.applications().await.unwrap();
    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0].application_text, text);
    assert_eq!(harness.state_of(ALICE), ConversationState::Idle);
}

#[tokio::test(start_paused = true)]
async fn submissions_after_cooldown_get_increasing_ids() {
    let mut harness = TestHarness::new().await.unwrap();
    let texts = ["first", "second", "third"];

    let mut ids = Vec::new();
    for text in texts {
        harness.send(events::apply(ALICE)).await.unwrap();
        match harness.send(events::text(ALICE, text)).await.unwrap() {
            Outcome::Submitted { application_id } => ids.push(application_id),
            other => panic!("expected Submitted, got {other:?}"),
        }
        tokio::time::advance(Duration::from_secs(61)).await;
    }

    assert!(ids.windows(2).all(|w| w[0] < w[1]));
    let stored: Vec<_> = harness
        .applications()
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.application_text)
        .collect();
    assert_eq!(stored, texts);
}

#[tokio::test(start_paused = true)]
async fn submission_within_cooldown_is_rate_limited() {
    let mut harness = TestHarness::new().await.unwrap();

    harness.send(events::apply(ALICE)).await.unwrap();
    harness.send(events::text(ALICE, "first")).await.unwrap();

    tokio::time::advance(Duration::from_millis(10_500)).await;
    harness.send(events::apply(ALICE)).await.unwrap();
    let outcome = harness.send(events::text(ALICE, "second")).await.unwrap();
    assert_eq!(outcome, Outcome::RateLimited { seconds_remaining: 50 });

    assert_eq!(harness.state_of(ALICE), ConversationState::AwaitingText);
    assert_eq!(harness.applications().await.unwrap().len(), 1);
    assert_eq!(
        harness.mock_channel.last_sent().await.unwrap().text,
        "⏱ Please wait 50 s before submitting again."
    );

    // A denied retry does not restart the window.
    tokio::time::advance(Duration::from_millis(49_500)).await;
    let outcome = harness.send(events::text(ALICE, "second")).await.unwrap();
    assert!(matches!(outcome, Outcome::Submitted { .. }));
    assert_eq!(harness.applications().await.unwrap().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn cooldown_is_per_user() {
    let mut harness = TestHarness::new().await.unwrap();

    harness.send(events::apply(ALICE)).await.unwrap();
    harness.send(events::text(ALICE, "from alice")).await.unwrap();

    harness.send(events::apply(BOB)).await.unwrap();
    let outcome = harness.send(events::text(BOB, "from bob")).await.unwrap();
    assert!(matches!(outcome, Outcome::Submitted { .. }));
    assert_eq!(harness.applications().await.unwrap().len(), 2);
}

#[tokio::test]
async fn blank_text_is_rejected() {
    let mut harness = TestHarness::new().await.unwrap();

    harness.send(events::apply(ALICE)).await.unwrap();
    let outcome = harness.send(events::text(ALICE, "   \n\t")).await.unwrap();
    assert_eq!(outcome, Outcome::EmptyText);
    assert_eq!(harness.state_of(ALICE), ConversationState::AwaitingText);
    assert!(harness.applications().await.unwrap().is_empty());
    assert_eq!(
        harness.mock_channel.last_sent().await.unwrap().text,
        harness.config.messages.empty_text
    );
}

#[tokio::test]
async fn persistence_failure_keeps_awaiting_and_skips_cooldown() {
    let mut harness = TestHarness::builder()
        .with_failing_store()
        .with_forward_chat("-100123")
        .build()
        .await
        .unwrap();

    harness.send(events::apply(ALICE)).await.unwrap();
    let outcome = harness.send(events::text(ALICE, "Need a website")).await.unwrap();
    assert_eq!(outcome, Outcome::PersistenceFailed);
    assert_eq!(harness.state_of(ALICE), ConversationState::AwaitingText);
    assert_eq!(
        harness.flow.cooldown_for(UserId(ALICE), Instant::now()),
        CooldownDecision::Allowed
    );
    assert_eq!(
        harness.mock_channel.last_sent().await.unwrap().text,
        harness.config.messages.storage_failure
    );
    assert!(harness.mock_channel.forwarded().await.is_empty());

    // The user can retry once the store recovers.
    harness.failing_store.as_ref().unwrap().set_failing(false);
    let retry = harness.send(events::text(ALICE, "Need a website")).await.unwrap();
    assert!(matches!(retry, Outcome::Submitted { .. }));
    assert_eq!(harness.state_of(ALICE), ConversationState::Idle);
}

#[tokio::test]
async fn forward_copies_application_to_configured_chat() {
    let mut harness = TestHarness::builder()
        .with_forward_chat("-100123")
        .build()
        .await
        .unwrap();

    harness.send(events::apply(ALICE)).await.unwrap();
    harness.send(events::text(ALICE, "Need a website")).await.unwrap();
    harness.send(events::apply(BOB)).await.unwrap();
    harness
        .send(events::anonymous_text(BOB, "Need a bot"))
        .await
        .unwrap();

    let forwarded = harness.mock_channel.forwarded().await;
    assert_eq!(forwarded.len(), 2);
    assert_eq!(forwarded[0].destination, "-100123");
    assert_eq!(
        forwarded[0].text,
        "📨 New application from @user12345:\n\nNeed a website"
    );
    assert_eq!(forwarded[1].text, "📨 New application from @user:\n\nNeed a bot");
}

#[tokio::test]
async fn forward_failure_does_not_affect_submission() {
    let mut harness = TestHarness::builder()
        .with_forward_chat("@applications")
        .build()
        .await
        .unwrap();
    harness.mock_channel.fail_forwards(true);

    harness.send(events::apply(ALICE)).await.unwrap();
    let outcome = harness.send(events::text(ALICE, "Need a website")).await.unwrap();
    assert!(matches!(outcome, Outcome::Submitted { .. }));
    assert_eq!(harness.applications().await.unwrap().len(), 1);
    assert_eq!(
        harness.mock_channel.last_sent().await.unwrap().text,
        harness.config.messages.confirmation
    );
}

#[tokio::test]
async fn no_forward_without_destination() {
    let mut harness = TestHarness::new().await.unwrap();

    harness.send(events::apply(ALICE)).await.unwrap();
    harness.send(events::text(ALICE, "Need a website")).await.unwrap();
    assert!(harness.mock_channel.forwarded().await.is_empty());
}

#[tokio::test]
async fn group_chat_events_are_ignored() {
    let mut harness = TestHarness::new().await.unwrap();

    harness.send(events::apply(ALICE)).await.unwrap();
    harness.mock_channel.clear_sent().await;

    let outcome = harness
        .send(events::group_text(ALICE, -100555, "Need a website"))
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Ignored);
    assert_eq!(harness.mock_channel.sent_count().await, 0);
    assert!(harness.applications().await.unwrap().is_empty());
    assert_eq!(harness.state_of(ALICE), ConversationState::AwaitingText);
}

#[tokio::test]
async fn unsupported_events_are_ignored() {
    let mut harness = TestHarness::new().await.unwrap();

    harness.send(events::apply(ALICE)).await.unwrap();
    assert_eq!(harness.send(events::other(ALICE)).await.unwrap(), Outcome::Ignored);
    assert_eq!(harness.state_of(ALICE), ConversationState::AwaitingText);
}

#[tokio::test]
async fn inline_trigger_edits_the_message() {
    let mut harness = TestHarness::new().await.unwrap();

    let outcome = harness.send(events::apply_inline(ALICE, "77")).await.unwrap();
    assert_eq!(outcome, Outcome::Prompted { already_awaiting: false });
    assert_eq!(harness.state_of(ALICE), ConversationState::AwaitingText);

    let edits = harness.mock_channel.edits().await;
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].message_id.0, "77");
    assert_eq!(edits[0].text, harness.config.messages.prompt);
    assert_eq!(harness.mock_channel.sent_count().await, 0);
}

#[tokio::test]
async fn inline_trigger_falls_back_to_reply_when_edit_fails() {
    let mut harness = TestHarness::new().await.unwrap();
    harness.mock_channel.fail_edits(true);

    harness.send(events::apply_inline(ALICE, "77")).await.unwrap();
    assert_eq!(harness.state_of(ALICE), ConversationState::AwaitingText);
    let reply = harness.mock_channel.last_sent().await.unwrap();
    assert_eq!(reply.text, harness.config.messages.prompt);
    assert_eq!(reply.keyboard, Some(Keyboard::ForceReply));
}
