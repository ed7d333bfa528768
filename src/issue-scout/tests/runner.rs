use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use issue_scout::{
    run_pipeline, ActivityLog, DiscoveryError, IssueAnalyzer, IssueCandidate, IssueDiscovery,
    Ledger, LedgerKey, Outcome, RepositoryId, RunContext, RunnerError, SelectionPipeline,
};
use std::collections::HashMap;
use std::sync::Mutex;
use tempfile::TempDir;

fn date(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
}

fn repo(name: &str) -> RepositoryId {
    name.parse().unwrap()
}

fn candidate(repo_name: &str, number: u64, label: &str, day: u32) -> IssueCandidate {
    let repository = repo(repo_name);
    IssueCandidate {
        url: format!("https://github.com/{repository}/issues/{number}"),
        repository,
        number,
        labels: vec![label.to_string()],
        title: format!("Issue {number}"),
        body: "A reasonably detailed description of the problem at hand.".to_string(),
        created_at: date(day),
        comments: 0,
    }
}

enum Listing {
    Issues(Vec<IssueCandidate>),
    RateLimited,
    NotFound,
}

/// Serves canned listings and records which repositories were asked for.
#[derive(Default)]
struct MockDiscovery {
    listings: HashMap<RepositoryId, Listing>,
    calls: Mutex<Vec<RepositoryId>>,
}

impl MockDiscovery {
    fn with(mut self, repository: &str, listing: Listing) -> Self {
        self.listings.insert(repo(repository), listing);
        self
    }

    fn calls(&self) -> Vec<RepositoryId> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IssueDiscovery for MockDiscovery {
    async fn discover(
        &self,
        repository: &RepositoryId,
        _labels: &[String],
    ) -> Result<Vec<IssueCandidate>, DiscoveryError> {
        self.calls.lock().unwrap().push(repository.clone());
        match self.listings.get(repository) {
            Some(Listing::Issues(issues)) => Ok(issues.clone()),
            Some(Listing::RateLimited) => Err(DiscoveryError::RateLimited {
                repository: repository.clone(),
                message: "API rate limit exceeded".to_string(),
            }),
            Some(Listing::NotFound) | None => Err(DiscoveryError::NotFound {
                repository: repository.clone(),
            }),
        }
    }
}

/// Returns a fixed live outcome per issue and records every call.
struct MockAnalyzer {
    live_outcome: Outcome,
    failing: Vec<LedgerKey>,
    calls: Mutex<Vec<(LedgerKey, bool)>>,
}

impl MockAnalyzer {
    fn new(live_outcome: Outcome) -> Self {
        Self {
            live_outcome,
            failing: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing_on(mut self, key: LedgerKey) -> Self {
        self.failing.push(key);
        self
    }

    fn calls(&self) -> Vec<(LedgerKey, bool)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IssueAnalyzer for MockAnalyzer {
    async fn analyze_and_post(&self, candidate: &IssueCandidate, dry_run: bool) -> Outcome {
        self.calls.lock().unwrap().push((candidate.key(), dry_run));
        if dry_run {
            Outcome::SkippedDryRun
        } else if self.failing.contains(&candidate.key()) {
            Outcome::Failed
        } else {
            self.live_outcome
        }
    }
}

fn scenario_discovery() -> MockDiscovery {
    MockDiscovery::default()
        .with(
            "a/repo1",
            Listing::Issues(vec![
                candidate("a/repo1", 1, "help wanted", 10),
                candidate("a/repo1", 2, "good first issue", 5),
            ]),
        )
        .with(
            "b/repo2",
            Listing::Issues(vec![candidate("b/repo2", 10, "good first issue", 1)]),
        )
}

fn context(max: usize, dry_run: bool) -> RunContext {
    RunContext::new(["good first issue", "help wanted"], max, dry_run).unwrap()
}

#[tokio::test]
async fn processes_scenario_in_rank_order() {
    let repositories = vec![repo("a/repo1"), repo("b/repo2")];
    let discovery = scenario_discovery();
    let analyzer = MockAnalyzer::new(Outcome::Commented);
    let mut pipeline = SelectionPipeline::new(Ledger::in_memory());

    let summary = run_pipeline(
        &repositories,
        &discovery,
        &analyzer,
        &mut pipeline,
        &context(2, false),
        None,
    )
    .await
    .unwrap();

    let processed: Vec<_> = analyzer.calls().into_iter().map(|(k, _)| k.to_string()).collect();
    assert_eq!(processed, vec!["b/repo2#10", "a/repo1#2"]);
    assert_eq!(discovery.calls(), repositories);

    assert_eq!(summary.repositories_scanned, 2);
    assert_eq!(summary.issues_discovered, 3);
    assert_eq!(summary.issues_eligible, 3);
    assert_eq!(summary.issues_selected, 2);
    assert_eq!(summary.succeeded, 2);
    assert!(!summary.dry_run);

    assert_eq!(pipeline.ledger().len(), 2);
    assert!(pipeline.ledger().blocks(&LedgerKey::new(repo("b/repo2"), 10)));
    assert!(pipeline.ledger().get(&LedgerKey::new(repo("a/repo1"), 1)).is_none());
}

#[tokio::test]
async fn skips_rate_limited_and_missing_repositories() {
    let repositories = vec![repo("a/repo1"), repo("c/limited"), repo("d/gone")];
    let discovery = scenario_discovery()
        .with("c/limited", Listing::RateLimited)
        .with("d/gone", Listing::NotFound);
    let analyzer = MockAnalyzer::new(Outcome::Commented);
    let mut pipeline = SelectionPipeline::new(Ledger::in_memory());

    let summary = run_pipeline(
        &repositories,
        &discovery,
        &analyzer,
        &mut pipeline,
        &context(10, false),
        None,
    )
    .await
    .unwrap();

    assert_eq!(discovery.calls().len(), 3);
    assert_eq!(summary.repositories_scanned, 1);
    assert_eq!(summary.repositories_skipped, 2);
    assert_eq!(summary.succeeded, 2);
}

#[tokio::test]
async fn dry_run_records_skipped_and_stays_eligible() {
    let repositories = vec![repo("a/repo1"), repo("b/repo2")];
    let discovery = scenario_discovery();
    let analyzer = MockAnalyzer::new(Outcome::Commented);
    let mut pipeline = SelectionPipeline::new(Ledger::in_memory());

    let summary = run_pipeline(
        &repositories,
        &discovery,
        &analyzer,
        &mut pipeline,
        &context(2, true),
        None,
    )
    .await
    .unwrap();

    assert!(summary.dry_run);
    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.succeeded, 0);
    assert!(analyzer.calls().iter().all(|(_, dry_run)| *dry_run));
    assert!(pipeline
        .ledger()
        .iter()
        .all(|(_, entry)| entry.outcome == Outcome::SkippedDryRun));

    // A later live run picks the same issues again.
    let live = MockAnalyzer::new(Outcome::Commented);
    let summary = run_pipeline(
        &repositories,
        &discovery,
        &live,
        &mut pipeline,
        &context(2, false),
        None,
    )
    .await
    .unwrap();
    assert_eq!(summary.succeeded, 2);
    assert_eq!(live.calls().len(), 2);
}

#[tokio::test]
async fn second_run_moves_on_to_remaining_issues() {
    let temp = TempDir::new().unwrap();
    let ledger_path = temp.path().join("state/ledger.json");
    let repositories = vec![repo("a/repo1"), repo("b/repo2")];
    let discovery = scenario_discovery();

    for _ in 0..2 {
        let analyzer = MockAnalyzer::new(Outcome::AssignmentRequested);
        let mut pipeline = SelectionPipeline::new(Ledger::open(&ledger_path).unwrap());
        run_pipeline(
            &repositories,
            &discovery,
            &analyzer,
            &mut pipeline,
            &context(2, false),
            None,
        )
        .await
        .unwrap();
    }

    let ledger = Ledger::open(&ledger_path).unwrap();
    assert_eq!(ledger.len(), 3);
    assert!(ledger
        .iter()
        .all(|(_, entry)| entry.outcome == Outcome::AssignmentRequested));

    let analyzer = MockAnalyzer::new(Outcome::Commented);
    let mut pipeline = SelectionPipeline::new(ledger);
    let summary = run_pipeline(
        &repositories,
        &discovery,
        &analyzer,
        &mut pipeline,
        &context(2, false),
        None,
    )
    .await
    .unwrap();
    assert_eq!(summary.issues_selected, 0);
    assert!(analyzer.calls().is_empty());
}

#[tokio::test]
async fn failed_issues_are_retried_next_run() {
    let repositories = vec![repo("b/repo2")];
    let discovery = scenario_discovery();
    let failing = MockAnalyzer::new(Outcome::Commented)
        .failing_on(LedgerKey::new(repo("b/repo2"), 10));
    let mut pipeline = SelectionPipeline::new(Ledger::in_memory());

    let summary = run_pipeline(
        &repositories,
        &discovery,
        &failing,
        &mut pipeline,
        &context(5, false),
        None,
    )
    .await
    .unwrap();
    assert_eq!(summary.failed, 1);

    let analyzer = MockAnalyzer::new(Outcome::Commented);
    let summary = run_pipeline(
        &repositories,
        &discovery,
        &analyzer,
        &mut pipeline,
        &context(5, false),
        None,
    )
    .await
    .unwrap();
    assert_eq!(summary.succeeded, 1);
}

#[tokio::test]
async fn writes_activity_log() {
    let temp = TempDir::new().unwrap();
    let activity = ActivityLog::new(temp.path().join("logs"));
    let repositories = vec![repo("b/repo2")];
    let discovery = scenario_discovery();
    let analyzer = MockAnalyzer::new(Outcome::Commented);
    let mut pipeline = SelectionPipeline::new(Ledger::in_memory());

    run_pipeline(
        &repositories,
        &discovery,
        &analyzer,
        &mut pipeline,
        &context(5, false),
        Some(&activity),
    )
    .await
    .unwrap();

    let entry = pipeline
        .ledger()
        .get(&LedgerKey::new(repo("b/repo2"), 10))
        .unwrap();
    let contents = std::fs::read_to_string(activity.file_for(entry.processed_at)).unwrap();
    assert!(contents.contains("| b/repo2 | Issue #10 | commented"));
}

#[tokio::test]
async fn ledger_write_failure_aborts_run() {
    let temp = TempDir::new().unwrap();
    // The ledger's parent is a regular file, so every write fails.
    let blocked = temp.path().join("blocked");
    std::fs::write(&blocked, "not a directory").unwrap();
    let mut pipeline =
        SelectionPipeline::new(Ledger::open(&blocked.join("ledger.json")).unwrap());

    let repositories = vec![repo("a/repo1"), repo("b/repo2")];
    let discovery = scenario_discovery();
    let analyzer = MockAnalyzer::new(Outcome::Commented);

    let result = run_pipeline(
        &repositories,
        &discovery,
        &analyzer,
        &mut pipeline,
        &context(2, false),
        None,
    )
    .await;

    assert!(matches!(result, Err(RunnerError::Ledger(_))));
    assert_eq!(analyzer.calls().len(), 1);
}
