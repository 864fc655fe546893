// SPDX-FileCopyrightText: 2026 Mailshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the campaign send loop.
//!
//! Each test writes an isolated campaign folder with a real contacts CSV and
//! drives the runner through a scripted transport. Tests are independent and
//! order-insensitive.

use mailshot_campaign::{RowState, RunOptions};
use mailshot_config::{SavePolicy, TransientPolicy};
use mailshot_core::{Device, Language, MailshotError, SkipReason};
use mailshot_test_utils::{
    CampaignFixture, CrashingContactStore, MemoryContactStore, MockOutcome, MockTransport,
};

fn beta(contacts: &[&str]) -> CampaignFixture {
    let mut builder = CampaignFixture::builder("beta_invitation")
        .with_name("Beta Invitation")
        .with_template(
            Language::Es,
            "Invitación a la beta",
            r#"<p>Hola {{nombre}}</p><img src="images/logo.png">"#,
        )
        .with_template(
            Language::En,
            "Beta invitation",
            r#"<p>Hi {{nombre}}</p><img src="images/logo.png">"#,
        )
        .with_image("logo.png", &[0x89, 0x50, 0x4e, 0x47]);
    for line in contacts {
        builder = builder.with_contact(line);
    }
    builder.build().unwrap()
}

// ---- Scenarios ----

#[tokio::test]
async fn test_spanish_contact_is_rendered_sent_and_marked() {
    let fixture = beta(&["Juan García,juan@email.com,ios,es,no"]);
    let transport = MockTransport::new();

    let summary = fixture.run(&transport, RunOptions::default()).await.unwrap();

    assert_eq!(summary.sent, 1);
    let sent = transport.sent_messages().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "juan@email.com");
    assert_eq!(sent[0].subject, "Invitación a la beta");
    assert!(sent[0].html_body.contains("Juan García"));
    assert!(sent[0].html_body.contains(r#"src="cid:logo_png""#));
    assert_eq!(sent[0].inline_images.len(), 1);
    assert_eq!(fixture.csv_rows(), vec!["Juan García,juan@email.com,ios,es,si"]);
}

#[tokio::test]
async fn test_android_contact_is_never_dispatched() {
    let fixture = beta(&["Ana,ana@email.com,android,en,no"]);
    let transport = MockTransport::new();

    let summary = fixture.run(&transport, RunOptions::default()).await.unwrap();

    assert!(transport.attempts().await.is_empty());
    assert_eq!(transport.verify_calls().await, 0);
    assert_eq!(summary.skipped, 1);
    assert_eq!(
        summary.outcomes[0].state,
        RowState::Skipped(SkipReason::UnsupportedDevice(Device::Android))
    );
    assert_eq!(fixture.csv_rows(), vec!["Ana,ana@email.com,android,en,no"]);
}

#[tokio::test]
async fn test_english_template_selected_by_language() {
    let fixture = beta(&["Jane Doe,jane@email.com,ios,en,no"]);
    let transport = MockTransport::new();

    fixture.run(&transport, RunOptions::default()).await.unwrap();

    let sent = transport.sent_messages().await;
    assert_eq!(sent[0].subject, "Beta invitation");
    assert!(sent[0].html_body.starts_with("<p>Hi Jane Doe</p>"));
}

// ---- Idempotent resume ----

#[tokio::test]
async fn test_second_run_sends_nothing_new() {
    let fixture = beta(&[
        "Juan García,juan@email.com,ios,es,no",
        "Jane Doe,jane@email.com,ios,en,no",
        "Luis,luis@email.com,ios,es,si",
    ]);
    let transport = MockTransport::new();

    let first = fixture.run(&transport, RunOptions::default()).await.unwrap();
    assert_eq!(first.already_sent, 1);
    assert_eq!(first.sent, 2);

    let second = fixture.run(&transport, RunOptions::default()).await.unwrap();
    assert_eq!(second.already_sent, 3);
    assert_eq!(second.sent, 0);
    assert!(second.outcomes.is_empty());

    assert_eq!(
        transport.sent_to().await,
        vec!["juan@email.com", "jane@email.com"]
    );
}

#[tokio::test]
async fn test_transient_failure_stays_pending_and_resumes() {
    let fixture = beta(&[
        "Juan García,juan@email.com,ios,es,no",
        "Jane Doe,jane@email.com,ios,en,no",
    ]);
    let transport = MockTransport::new();
    transport.script("juan@email.com", MockOutcome::Transient).await;

    let first = fixture.run(&transport, RunOptions::default()).await.unwrap();
    assert_eq!(first.failed, 1);
    assert_eq!(first.sent, 1);
    assert!(matches!(
        first.outcomes[0].state,
        RowState::Failed { retryable: true, .. }
    ));
    assert!(fixture.csv_rows()[0].ends_with(",no"));

    let second = fixture.run(&transport, RunOptions::default()).await.unwrap();
    assert_eq!(second.sent, 1);
    assert_eq!(
        transport.sent_to().await,
        vec!["jane@email.com", "juan@email.com"]
    );
    assert!(fixture.csv_rows().iter().all(|row| row.ends_with(",si")));
}

// ---- Row order preservation ----

#[tokio::test]
async fn test_only_sent_column_changes_and_order_is_kept() {
    let input = [
        "Zoe,zoe@email.com,ios,en,no",
        "Ana,ana@email.com,android,en,no",
        "Bob,bob@email.com,ios,fr,no",
        "Carla,carla@email.com,ios,es,si",
        "Dan,dan@email.com,ios,es,no",
    ];
    let fixture = beta(&input);
    let transport = MockTransport::new();
    transport.script("dan@email.com", MockOutcome::Reject).await;

    fixture.run(&transport, RunOptions::default()).await.unwrap();

    let expected = vec![
        "Zoe,zoe@email.com,ios,en,si",
        "Ana,ana@email.com,android,en,no",
        "Bob,bob@email.com,ios,fr,no",
        "Carla,carla@email.com,ios,es,si",
        "Dan,dan@email.com,ios,es,no",
    ];
    assert_eq!(fixture.csv_rows(), expected);
}

// ---- Crash safety ----

#[tokio::test]
async fn test_rerun_after_crash_sends_exactly_the_unrecorded_rows() {
    let fixture = beta(&[]);
    let prepared = fixture.prepare().unwrap();
    let contacts = MemoryContactStore::new(vec![
        mailshot_core::ContactRecord::new("A", "a@email.com", "ios", "es", false),
        mailshot_core::ContactRecord::new("B", "b@email.com", "ios", "en", false),
        mailshot_core::ContactRecord::new("C", "c@email.com", "ios", "es", false),
        mailshot_core::ContactRecord::new("D", "d@email.com", "ios", "en", false),
    ]);

    // Two saves succeed, the third "crashes" after C was dispatched.
    let transport = MockTransport::new();
    let mut crashing = CrashingContactStore::new(contacts.clone(), 2);
    let err = prepared
        .runner(&transport)
        .run(&mut crashing)
        .await
        .unwrap_err();
    assert!(matches!(err, MailshotError::Storage { .. }));
    assert_eq!(
        transport.sent_to().await,
        vec!["a@email.com", "b@email.com", "c@email.com"]
    );
    assert_eq!(contacts.sent_addresses(), vec!["a@email.com", "b@email.com"]);

    let rerun = MockTransport::new();
    let mut store = contacts.clone();
    let summary = prepared.runner(&rerun).run(&mut store).await.unwrap();

    assert_eq!(summary.sent, 2);
    assert_eq!(rerun.sent_to().await, vec!["c@email.com", "d@email.com"]);
    assert_eq!(contacts.sent_addresses().len(), 4);
    assert_eq!(contacts.rows().len(), 4);
}

// ---- Fatal abort semantics ----

#[tokio::test]
async fn test_bad_credentials_mark_nothing_sent() {
    let fixture = beta(&[
        "Juan García,juan@email.com,ios,es,no",
        "Jane Doe,jane@email.com,ios,en,no",
    ]);
    let transport = MockTransport::new();
    transport.fail_all_with(MockOutcome::AuthFailure).await;

    let err = fixture
        .run(&transport, RunOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, MailshotError::Auth { .. }));
    assert!(err.is_fatal());
    assert_eq!(transport.attempts().await, vec!["juan@email.com"]);
    assert!(fixture.csv_rows().iter().all(|row| row.ends_with(",no")));
}

#[tokio::test]
async fn test_auth_rejected_at_verify_sends_nothing() {
    let fixture = beta(&["Juan García,juan@email.com,ios,es,no"]);
    let transport = MockTransport::new();
    transport.fail_verify_with(MockOutcome::AuthFailure).await;

    let err = fixture
        .run(&transport, RunOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, MailshotError::Auth { .. }));
    assert!(transport.attempts().await.is_empty());
    assert_eq!(fixture.csv_rows(), vec!["Juan García,juan@email.com,ios,es,no"]);
}

#[tokio::test]
async fn test_auth_failure_mid_run_keeps_earlier_progress() {
    let fixture = beta(&[
        "Juan García,juan@email.com,ios,es,no",
        "Jane Doe,jane@email.com,ios,en,no",
        "Luis,luis@email.com,ios,es,no",
    ]);
    let transport = MockTransport::new();
    transport.script("jane@email.com", MockOutcome::AuthFailure).await;

    let err = fixture
        .run(&transport, RunOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_fatal());
    assert_eq!(
        fixture.csv_rows(),
        vec![
            "Juan García,juan@email.com,ios,es,si",
            "Jane Doe,jane@email.com,ios,en,no",
            "Luis,luis@email.com,ios,es,no",
        ]
    );
    assert_eq!(transport.attempts().await.len(), 2);
}

#[tokio::test]
async fn test_end_of_run_policy_flushes_on_abort() {
    let fixture = beta(&[
        "Juan García,juan@email.com,ios,es,no",
        "Jane Doe,jane@email.com,ios,en,no",
    ]);
    let transport = MockTransport::new();
    transport.script("jane@email.com", MockOutcome::AuthFailure).await;
    let options = RunOptions {
        save_policy: SavePolicy::EndOfRun,
        ..RunOptions::default()
    };

    fixture.run(&transport, options).await.unwrap_err();

    assert_eq!(
        fixture.csv_rows(),
        vec![
            "Juan García,juan@email.com,ios,es,si",
            "Jane Doe,jane@email.com,ios,en,no",
        ]
    );
}

// ---- Per-row failures ----

#[tokio::test]
async fn test_rejected_recipient_does_not_stop_the_run() {
    let fixture = beta(&[
        "Juan García,juan@email.com,ios,es,no",
        "Jane Doe,jane@email.com,ios,en,no",
    ]);
    let transport = MockTransport::new();
    transport.script("juan@email.com", MockOutcome::Reject).await;

    let summary = fixture.run(&transport, RunOptions::default()).await.unwrap();

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.sent, 1);
    let failure = summary.failures().next().unwrap();
    assert_eq!(failure.email, "juan@email.com");
    assert!(matches!(
        failure.state,
        RowState::Failed { retryable: false, .. }
    ));
    assert_eq!(
        fixture.csv_rows(),
        vec![
            "Juan García,juan@email.com,ios,es,no",
            "Jane Doe,jane@email.com,ios,en,si",
        ]
    );
}

#[tokio::test]
async fn test_timeout_is_transient() {
    let fixture = beta(&["Juan García,juan@email.com,ios,es,no"]);
    let transport = MockTransport::new();
    transport.script("juan@email.com", MockOutcome::Timeout).await;

    let summary = fixture.run(&transport, RunOptions::default()).await.unwrap();

    assert!(matches!(
        summary.outcomes[0].state,
        RowState::Failed { retryable: true, .. }
    ));
    assert!(fixture.csv_rows()[0].ends_with(",no"));
}

#[tokio::test]
async fn test_abort_on_transient_policy() {
    let fixture = beta(&[
        "Juan García,juan@email.com,ios,es,no",
        "Jane Doe,jane@email.com,ios,en,no",
    ]);
    let transport = MockTransport::new();
    transport.script("juan@email.com", MockOutcome::Transient).await;
    let options = RunOptions {
        on_transient: TransientPolicy::Abort,
        ..RunOptions::default()
    };

    let err = fixture.run(&transport, options).await.unwrap_err();

    assert!(err.is_retryable());
    assert_eq!(transport.attempts().await, vec!["juan@email.com"]);
    assert!(fixture.csv_rows().iter().all(|row| row.ends_with(",no")));
}

#[tokio::test]
async fn test_unknown_placeholder_fails_only_that_row() {
    let fixture = CampaignFixture::builder("typo")
        .with_template(Language::Es, "Hola", "<p>{{nombre}} {{empresa}}</p>")
        .with_contact("Juan García,juan@email.com,ios,es,no")
        .build()
        .unwrap();
    let transport = MockTransport::new();

    let summary = fixture.run(&transport, RunOptions::default()).await.unwrap();

    assert_eq!(summary.failed, 1);
    assert!(transport.attempts().await.is_empty());
    assert!(fixture.csv_rows()[0].ends_with(",no"));
}

// ---- Pre-flight ----

#[tokio::test]
async fn test_missing_language_template_aborts_before_sending() {
    let fixture = CampaignFixture::builder("spanish_only")
        .with_template(Language::Es, "Hola", "<p>{{nombre}}</p>")
        .with_contact("Juan García,juan@email.com,ios,es,no")
        .with_contact("Jane Doe,jane@email.com,ios,en,no")
        .build()
        .unwrap();
    let transport = MockTransport::new();

    let err = fixture
        .run(&transport, RunOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, MailshotError::Config(_)));
    assert!(transport.attempts().await.is_empty());
    assert_eq!(transport.verify_calls().await, 0);
}

#[tokio::test]
async fn test_malformed_csv_is_format_error() {
    let fixture = beta(&["Juan García,juan@email.com,ios,es,maybe"]);
    let transport = MockTransport::new();

    let err = fixture
        .run(&transport, RunOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, MailshotError::Format { .. }));
    assert!(transport.attempts().await.is_empty());
}

#[tokio::test]
async fn test_unknown_device_and_language_are_skipped() {
    let fixture = beta(&[
        "Web User,web@email.com,web,es,no",
        "Pierre,pierre@email.com,ios,fr,no",
        ",blank@email.com,ios,es,no",
    ]);
    let transport = MockTransport::new();

    let summary = fixture.run(&transport, RunOptions::default()).await.unwrap();

    assert_eq!(summary.skipped, 3);
    let states: Vec<_> = summary.outcomes.iter().map(|o| o.state.clone()).collect();
    assert_eq!(
        states,
        vec![
            RowState::Skipped(SkipReason::UnknownDevice("web".into())),
            RowState::Skipped(SkipReason::UnknownLanguage("fr".into())),
            RowState::Skipped(SkipReason::IncompleteContact),
        ]
    );
    assert!(transport.attempts().await.is_empty());
}

// ---- Dry run ----

#[tokio::test]
async fn test_dry_run_leaves_csv_untouched() {
    let fixture = beta(&["Juan García,juan@email.com,ios,es,no"]);
    let before = fixture.read_csv();
    let transport = MockTransport::new();
    let options = RunOptions {
        dry_run: true,
        ..RunOptions::default()
    };

    let summary = fixture.run(&transport, options).await.unwrap();

    assert_eq!(summary.would_send, 1);
    assert!(transport.attempts().await.is_empty());
    assert_eq!(transport.verify_calls().await, 0);
    assert_eq!(fixture.read_csv(), before);
}
