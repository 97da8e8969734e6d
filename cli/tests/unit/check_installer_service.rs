//! Tests for the `check_installer` application service.

#![allow(clippy::expect_used)]

use steamgr_cli::application::services::check_installer::check_installer;
use tokio_util::sync::CancellationToken;

use crate::mocks::{Journal, NoopReporter, RecordingFactory, RecordingReporter};

#[tokio::test]
async fn starts_logs_in_and_quits() {
    let journal = Journal::default();
    let factory = RecordingFactory::new(&journal);

    check_installer(&factory, &NoopReporter, &CancellationToken::new())
        .await
        .expect("check");

    assert_eq!(journal.entries(), vec!["start", "login anonymous", "close"]);
}

#[tokio::test]
async fn failed_login_is_reported_and_session_closed() {
    let journal = Journal::default();
    let factory = RecordingFactory {
        principal: Some("someone".to_string()),
        ..RecordingFactory::failing_on(&journal, "login")
    };

    let err = check_installer(&factory, &NoopReporter, &CancellationToken::new())
        .await
        .expect_err("should fail");

    assert!(format!("{err:#}").contains("login rejected"), "got: {err:#}");
    assert_eq!(journal.count("close"), 1);
}

#[tokio::test]
async fn missing_installer_is_reported() {
    let journal = Journal::default();
    let factory = RecordingFactory {
        fail_start: true,
        ..RecordingFactory::new(&journal)
    };

    let err = check_installer(&factory, &NoopReporter, &CancellationToken::new())
        .await
        .expect_err("should fail");

    assert!(format!("{err:#}").contains("program not found"), "got: {err:#}");
}

#[tokio::test]
async fn close_failure_after_rejected_login_is_warned() {
    let journal = Journal::default();
    let factory = RecordingFactory {
        fail_close: true,
        ..RecordingFactory::failing_on(&journal, "login")
    };
    let reporter = RecordingReporter::default();

    let err = check_installer(&factory, &reporter, &CancellationToken::new())
        .await
        .expect_err("should fail");

    assert!(format!("{err:#}").contains("login rejected"), "got: {err:#}");
    assert_eq!(reporter.warnings().len(), 1);
}
