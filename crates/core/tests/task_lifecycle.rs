//! Task creation lifecycle integration tests.
//!
//! These tests run the whole pipeline with a mock deal sender and a mock
//! Swan connector:
//! - configuration failures leave no manifests behind
//! - task identity is shared within a run and fresh across runs
//! - public tasks skip distribution, private tasks require it
//! - offline and online submission branches

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use dealtask_core::{
    testing::{fixtures, MockDealSender, MockSwanConnector},
    BidMode, DealConfig, DistributionError, ErrorCategory, FileDescriptor, StorageServerType,
    SubmitError, SubmitOutcome, SwanResponse, TaskConfig, TaskCreator, TaskError,
};

/// Test helper wiring a task creator to mocks and scratch directories.
struct TestHarness {
    creator: TaskCreator<MockDealSender, MockSwanConnector>,
    deal_sender: MockDealSender,
    connector: MockSwanConnector,
    input_dir: TempDir,
    output_dir: TempDir,
}

impl TestHarness {
    fn new(file_count: usize) -> Self {
        let input_dir = TempDir::new().expect("Failed to create input dir");
        let output_dir = TempDir::new().expect("Failed to create output dir");
        fixtures::write_upload_manifest(input_dir.path(), file_count);

        let deal_sender = MockDealSender::new();
        let connector = MockSwanConnector::new();
        let creator = TaskCreator::new(deal_sender.clone(), connector.clone());

        Self {
            creator,
            deal_sender,
            connector,
            input_dir,
            output_dir,
        }
    }

    fn config(&self) -> TaskConfig {
        fixtures::task_config(self.input_dir.path(), self.output_dir.path())
    }

    fn private_config(&self) -> TaskConfig {
        let mut config = self.config();
        config.public_deal = false;
        config.bid_mode = BidMode::Manual;
        config.miner_fid = Some("f01234".to_string());
        config
    }

    fn output_path(&self, name: &str) -> PathBuf {
        self.output_dir.path().join(name)
    }

    fn output_files(&self) -> Vec<String> {
        list_files(self.output_dir.path())
    }
}

fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .flatten()
                .map(|e| e.file_name().to_string_lossy().to_string())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

fn shared_uuid(descs: &[FileDescriptor]) -> String {
    let uuids: HashSet<_> = descs.iter().map(|d| d.uuid.clone()).collect();
    assert_eq!(uuids.len(), 1, "descriptors disagree on task identity");
    uuids
        .into_iter()
        .next()
        .flatten()
        .expect("descriptors carry a uuid")
}

// ============================================================================
// Configuration failures
// ============================================================================

#[tokio::test]
async fn test_private_task_without_miner_writes_nothing() {
    let harness = TestHarness::new(2);
    let mut config = harness.config();
    config.public_deal = false;
    config.miner_fid = None;

    let err = harness
        .creator
        .create_task(&config, &DealConfig::default())
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Config);
    assert!(err.to_string().contains("miner_fid"));
    assert!(harness.output_files().is_empty());
    assert_eq!(harness.deal_sender.call_count().await, 0);
}

#[tokio::test]
async fn test_unparsable_max_price_writes_nothing() {
    for price in ["", "abc", "1.2.3", "0x10", "-1"] {
        let harness = TestHarness::new(2);
        let mut config = harness.config();
        config.max_price = price.to_string();
        // Output directory that does not exist yet stays uncreated
        config.output_dir = harness.output_path("fresh");

        let err = harness
            .creator
            .create_task(&config, &DealConfig::default())
            .await
            .unwrap_err();

        assert!(
            matches!(err, TaskError::InvalidMaxPrice { .. }),
            "{price:?} gave {err}"
        );
        assert!(harness.output_files().is_empty());
        assert_eq!(harness.connector.connect_count().await, 0);
    }
}

#[tokio::test]
async fn test_missing_input_dir_fails() {
    let harness = TestHarness::new(1);
    let mut config = harness.config();
    config.input_dir = harness.input_dir.path().join("missing");

    let err = harness
        .creator
        .create_task(&config, &DealConfig::default())
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Io);
    assert!(err.to_string().contains("missing"));
}

// ============================================================================
// Task identity
// ============================================================================

#[tokio::test]
async fn test_runs_generate_distinct_uuids() {
    let harness = TestHarness::new(3);
    let mut config = harness.config();
    config.offline_mode = true;

    config.task_name = Some("first".to_string());
    let first = harness
        .creator
        .create_task(&config, &DealConfig::default())
        .await
        .unwrap();

    config.task_name = Some("second".to_string());
    let second = harness
        .creator
        .create_task(&config, &DealConfig::default())
        .await
        .unwrap();

    let first_uuid = shared_uuid(&first.file_descs);
    let second_uuid = shared_uuid(&second.file_descs);
    assert_eq!(first_uuid, first.task.uuid);
    assert_eq!(second_uuid, second.task.uuid);
    assert_ne!(first_uuid, second_uuid);
}

#[tokio::test]
async fn test_default_task_name_used_for_all_files() {
    let harness = TestHarness::new(1);
    let mut config = harness.config();
    config.offline_mode = true;

    let outcome = harness
        .creator
        .create_task(&config, &DealConfig::default())
        .await
        .unwrap();

    let name = &outcome.task.task_name;
    assert!(name.starts_with("task_"));
    assert_eq!(outcome.json_file_name, format!("{}-metadata.json", name));
    assert!(harness.output_path(&format!("{}-metadata.json", name)).is_file());
    assert!(harness.output_path(&format!("{}-metadata.csv", name)).is_file());
    assert!(harness.output_path(&format!("{}.csv", name)).is_file());
}

// ============================================================================
// Enrichment
// ============================================================================

#[tokio::test]
async fn test_web_server_urls() {
    let harness = TestHarness::new(3);
    let mut config = harness.config();
    config.offline_mode = true;
    config.storage_server_type = StorageServerType::WebServer;
    config.web_server_download_url_prefix = "https://cars.example.org/task1".to_string();

    let outcome = harness
        .creator
        .create_task(&config, &DealConfig::default())
        .await
        .unwrap();

    for desc in &outcome.file_descs {
        assert_eq!(
            desc.car_file_url.as_deref(),
            Some(format!("https://cars.example.org/task1/{}", desc.car_file_name).as_str())
        );
    }
}

#[tokio::test]
async fn test_ipfs_server_leaves_urls_absent() {
    let harness = TestHarness::new(2);
    let mut config = harness.config();
    config.offline_mode = true;

    let outcome = harness
        .creator
        .create_task(&config, &DealConfig::default())
        .await
        .unwrap();

    assert!(outcome.file_descs.iter().all(|d| d.car_file_url.is_none()));
}

#[tokio::test]
async fn test_auto_bid_with_miner_succeeds() {
    let harness = TestHarness::new(1);
    let mut config = harness.config();
    config.offline_mode = true;
    config.bid_mode = BidMode::Auto;
    config.miner_fid = Some("f09999".to_string());

    let outcome = harness
        .creator
        .create_task(&config, &DealConfig::default())
        .await
        .unwrap();

    assert_eq!(outcome.task.bid_mode, BidMode::Auto);
    assert_eq!(harness.deal_sender.call_count().await, 0);
}

// ============================================================================
// Distribution
// ============================================================================

#[tokio::test]
async fn test_private_task_sends_deals_before_persisting() {
    let harness = TestHarness::new(2);
    let mut config = harness.private_config();
    config.task_name = Some("private".to_string());
    config.offline_mode = true;

    let outcome = harness
        .creator
        .create_task(&config, &DealConfig::default())
        .await
        .unwrap();

    let calls = harness.deal_sender.recorded_calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].task_name, "private");
    assert_eq!(calls[0].output_dir, harness.output_dir.path());
    // Descriptors are already stamped when deals are sent
    assert_eq!(shared_uuid(&calls[0].file_descs), outcome.task.uuid);

    // Deal CIDs assigned by the sender are persisted
    let json = std::fs::read_to_string(harness.output_path("private-metadata.json")).unwrap();
    let persisted: Vec<FileDescriptor> = serde_json::from_str(&json).unwrap();
    assert_eq!(persisted[0].deal_cid.as_deref(), Some("bafydeal0"));
    assert!(persisted
        .iter()
        .all(|d| d.miner_fid.as_deref() == Some("f01234")));
}

#[tokio::test]
async fn test_distribution_failure_aborts_before_persistence() {
    let harness = TestHarness::new(2);
    let mut config = harness.private_config();
    config.task_name = Some("doomed".to_string());
    harness
        .deal_sender
        .set_next_error(DistributionError::ConnectionFailed("lotus down".to_string()))
        .await;

    let err = harness
        .creator
        .create_task(&config, &DealConfig::default())
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Distribution);
    assert!(err.to_string().contains("lotus down"));
    assert!(harness.output_files().is_empty());
    assert_eq!(harness.connector.connect_count().await, 0);
}

// ============================================================================
// Submission
// ============================================================================

#[tokio::test]
async fn test_offline_mode_skips_remote() {
    let harness = TestHarness::new(2);
    let mut config = harness.config();
    config.task_name = Some("offline".to_string());
    config.offline_mode = true;

    let outcome = harness
        .creator
        .create_task(&config, &DealConfig::default())
        .await
        .unwrap();

    assert_eq!(
        outcome.submission,
        SubmitOutcome::Offline {
            csv_path: harness.output_path("offline.csv")
        }
    );
    assert!(harness.output_path("offline.csv").is_file());
    assert_eq!(harness.connector.connect_count().await, 0);
}

#[tokio::test]
async fn test_public_online_success() {
    let harness = TestHarness::new(3);
    let mut config = harness.config();
    config.task_name = Some("public".to_string());
    config.storage_server_type = StorageServerType::WebServer;
    config.web_server_download_url_prefix = "https://cars.example.org".to_string();

    let outcome = harness
        .creator
        .create_task(&config, &DealConfig::default())
        .await
        .unwrap();

    assert_eq!(outcome.json_file_name, "public-metadata.json");
    assert_eq!(outcome.file_descs.len(), 3);
    let uuid = shared_uuid(&outcome.file_descs);
    for desc in &outcome.file_descs {
        assert_eq!(desc.start_epoch, Some(config.start_epoch));
        assert!(desc
            .car_file_url
            .as_deref()
            .unwrap()
            .starts_with("https://cars.example.org/"));
    }

    assert_eq!(harness.deal_sender.call_count().await, 0);

    let submitted = harness.connector.submitted_tasks().await;
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].task.uuid, uuid);
    assert_eq!(submitted[0].task.is_public, 1);
    assert_eq!(submitted[0].csv_path, harness.output_path("public.csv"));
    assert!(submitted[0].csv_content.contains(&uuid));
    assert_eq!(submitted[0].csv_content.lines().count(), 4);

    match outcome.submission {
        SubmitOutcome::Submitted {
            status, message, ..
        } => {
            assert_eq!(status, "success");
            assert_eq!(message, "ok");
        }
        other => panic!("unexpected submission outcome: {other:?}"),
    }
}

#[tokio::test]
async fn test_online_rejection_keeps_manifests() {
    let harness = TestHarness::new(2);
    let mut config = harness.config();
    config.task_name = Some("rejected".to_string());
    harness
        .connector
        .set_response(SwanResponse {
            status: "fail".to_string(),
            message: "miner f01234 is not accepting deals".to_string(),
        })
        .await;

    let err = harness
        .creator
        .create_task(&config, &DealConfig::default())
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Rejected);
    let text = err.to_string();
    assert!(text.contains("fail"));
    assert!(text.contains("miner f01234 is not accepting deals"));

    assert_eq!(
        harness.output_files(),
        vec![
            "rejected-metadata.csv".to_string(),
            "rejected-metadata.json".to_string(),
            "rejected.csv".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_session_failure_is_fatal() {
    let harness = TestHarness::new(1);
    let config = harness.config();
    harness
        .connector
        .set_connect_error(SubmitError::AuthenticationFailed("bad key".to_string()))
        .await;

    let err = harness
        .creator
        .create_task(&config, &DealConfig::default())
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Session);
    assert!(harness.connector.submitted_tasks().await.is_empty());
}

#[tokio::test]
async fn test_submit_transport_failure_is_session_error() {
    let harness = TestHarness::new(1);
    let config = harness.config();
    harness.connector.set_submit_error(SubmitError::Timeout).await;

    let err = harness
        .creator
        .create_task(&config, &DealConfig::default())
        .await
        .unwrap_err();

    assert!(matches!(err, TaskError::Session(SubmitError::Timeout)));
}
