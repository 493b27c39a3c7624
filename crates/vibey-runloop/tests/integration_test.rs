//! End-to-end tests of the engagement loop against stub backends.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use vibey_config::{EngagementConfig, PacingConfig};
use vibey_protocols::{
    AnalysisResult, Post, PostSource, ProviderError, RawPost, RelevanceService, ReplyGenerator,
    SourceError, Vibe,
};
use vibey_runloop::{
    EngagementLoop, LoopSettings, NoopSleeper, Pacer, RecordingSleeper, RunOutcome, Sleeper,
};
use vibey_store::{MemoryStateRepository, QuotaStore};

// ============================================================================
// Test Helpers
// ============================================================================

/// Feed that serves scripted batches, then cancels the run once exhausted.
struct StubSource {
    posts: Vec<Post>,
    batches: Mutex<VecDeque<Vec<String>>>,
    submit_script: Mutex<VecDeque<bool>>,
    discovery_errors: AtomicU32,
    on_exhausted: CancellationToken,
    finds: AtomicU32,
    scrolls: AtomicU32,
    refreshes: AtomicU32,
    likes: AtomicU32,
    retweets: AtomicU32,
    composes: AtomicU32,
    submits: Mutex<Vec<String>>,
    closed: AtomicU32,
}

impl StubSource {
    fn new(posts: Vec<Post>, batches: Vec<Vec<&str>>, on_exhausted: CancellationToken) -> Self {
        Self {
            posts,
            batches: Mutex::new(
                batches
                    .into_iter()
                    .map(|b| b.into_iter().map(String::from).collect())
                    .collect(),
            ),
            submit_script: Mutex::new(VecDeque::new()),
            discovery_errors: AtomicU32::new(0),
            on_exhausted,
            finds: AtomicU32::new(0),
            scrolls: AtomicU32::new(0),
            refreshes: AtomicU32::new(0),
            likes: AtomicU32::new(0),
            retweets: AtomicU32::new(0),
            composes: AtomicU32::new(0),
            submits: Mutex::new(Vec::new()),
            closed: AtomicU32::new(0),
        }
    }

    fn with_submit_script(self, script: &[bool]) -> Self {
        *self.submit_script.lock() = script.iter().copied().collect();
        self
    }

    fn with_discovery_errors(self, n: u32) -> Self {
        self.discovery_errors.store(n, Ordering::SeqCst);
        self
    }

    fn submitted(&self) -> Vec<String> {
        self.submits.lock().clone()
    }
}

#[async_trait]
impl PostSource for StubSource {
    fn id(&self) -> &str {
        "stub"
    }

    async fn find_candidates(&self) -> Result<Vec<RawPost>, SourceError> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        if self.discovery_errors.load(Ordering::SeqCst) > 0 {
            self.discovery_errors.fetch_sub(1, Ordering::SeqCst);
            return Err(SourceError::NotConnected("page crashed".to_string()));
        }
        let batch = self.batches.lock().pop_front().unwrap_or_default();
        Ok(batch.into_iter().map(RawPost::new).collect())
    }

    async fn extract(&self, raw: &RawPost) -> Result<Option<Post>, SourceError> {
        Ok(self.posts.iter().find(|p| p.handle == raw.handle).cloned())
    }

    async fn scroll(&self, _pixels: u32) -> Result<(), SourceError> {
        self.scrolls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn refresh(&self) -> Result<(), SourceError> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        if self.batches.lock().is_empty() {
            self.on_exhausted.cancel();
        }
        Ok(())
    }

    async fn like(&self, _post: &Post) -> Result<(), SourceError> {
        self.likes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn retweet(&self, _post: &Post) -> Result<(), SourceError> {
        self.retweets.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn open_reply_compose(&self, _post: &Post) -> Result<(), SourceError> {
        self.composes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn type_text(&self, _text: &str) -> Result<(), SourceError> {
        Ok(())
    }

    async fn submit_reply(&self, post: &Post, _text: &str) -> Result<bool, SourceError> {
        self.submits.lock().push(post.id.clone());
        Ok(self.submit_script.lock().pop_front().unwrap_or(true))
    }

    async fn close(&self) -> Result<(), SourceError> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Relevance stub rejecting a fixed set of ids.
struct StubRelevance {
    reject: HashSet<String>,
    fail: bool,
    calls: Arc<AtomicU32>,
}

impl StubRelevance {
    fn accepting() -> Self {
        Self {
            reject: HashSet::new(),
            fail: false,
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    fn rejecting(ids: &[&str]) -> Self {
        Self {
            reject: ids.iter().map(|s| s.to_string()).collect(),
            ..Self::accepting()
        }
    }
}

#[async_trait]
impl RelevanceService for StubRelevance {
    async fn analyze(&self, post: &Post) -> Result<AnalysisResult, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ProviderError::Timeout(60));
        }
        let worth = !self.reject.contains(&post.id);
        Ok(AnalysisResult::new(worth, "startups", Vibe::Casual))
    }
}

/// Generator stub returning nothing for a fixed set of ids.
struct StubGenerator {
    empty_for: HashSet<String>,
    calls: Arc<AtomicU32>,
}

impl StubGenerator {
    fn new() -> Self {
        Self {
            empty_for: HashSet::new(),
            calls: Arc::new(AtomicU32::new(0)),
        }
    }
}

#[async_trait]
impl ReplyGenerator for StubGenerator {
    async fn generate(
        &self,
        post: &Post,
        _analysis: &AnalysisResult,
    ) -> Result<Option<String>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.empty_for.contains(&post.id) {
            return Ok(Some("   ".to_string()));
        }
        Ok(Some(format!("reply to {}", post.id)))
    }
}

fn post(id: &str) -> Post {
    Post::new(id, format!("post number {id}"), format!("https://x.com/u/status/{id}"))
        .with_handle(id)
}

fn posts(ids: &[&str]) -> Vec<Post> {
    ids.iter().map(|id| post(id)).collect()
}

/// Settings with every random branch pinned.
fn settings(max_per_day: u32) -> LoopSettings {
    LoopSettings {
        max_comments_per_day: max_per_day,
        max_consecutive_failures: 5,
        error_backoff: Duration::from_secs(5),
        refresh_interval: None,
        engagement: EngagementConfig {
            like_probability: 0.0,
            retweet_probability: 0.0,
            engagement_only_probability: 0.0,
            engagement_only_like_probability: 1.0,
            engagement_only_retweet_probability: 1.0,
        },
        keywords: vec!["startup".to_string()],
        text_preview_chars: 100,
    }
}

struct Harness {
    source: Arc<StubSource>,
    store: Arc<QuotaStore>,
    repo: Arc<MemoryStateRepository>,
    token: CancellationToken,
}

fn build(
    source: StubSource,
    token: CancellationToken,
    relevance: StubRelevance,
    generator: StubGenerator,
    settings: LoopSettings,
    sleeper: Arc<dyn Sleeper>,
) -> (EngagementLoop, Harness) {
    let source = Arc::new(source);
    let repo = Arc::new(MemoryStateRepository::new());
    let store = Arc::new(QuotaStore::new(repo.clone()));
    let pacer = Arc::new(Pacer::with_seed(PacingConfig::instant(), sleeper, 99));
    let run_loop = EngagementLoop::new(
        source.clone(),
        Arc::new(relevance),
        Arc::new(generator),
        store.clone(),
        pacer,
        settings,
    )
    .with_cancellation(token.clone());
    (
        run_loop,
        Harness {
            source,
            store,
            repo,
            token,
        },
    )
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_quota_reached_after_two_of_three_posts() {
    let token = CancellationToken::new();
    let source = StubSource::new(posts(&["1", "2", "3"]), vec![vec!["1", "2", "3"]], token.clone());
    let relevance = StubRelevance::accepting();
    let analyses = relevance.calls.clone();
    let (run_loop, h) = build(
        source,
        token,
        relevance,
        StubGenerator::new(),
        settings(2),
        Arc::new(NoopSleeper),
    );

    let report = run_loop.run().await;

    assert_eq!(report.outcome, RunOutcome::GoalReached);
    assert_eq!(report.today_count, 2);
    assert_eq!(report.stats.comments_posted, 2);
    assert_eq!(h.source.submitted(), vec!["1", "2"]);
    assert_eq!(analyses.load(Ordering::SeqCst), 2);
    assert!(!h.store.has_engaged("3").await);

    let state = h.store.state().await;
    assert_eq!(state.count, 2);
    assert_eq!(state.posts.len(), 2);
    assert_eq!(state.posts[1].comment, "reply to 2");
    assert_eq!(h.source.closed.load(Ordering::SeqCst), 1);

    let messages: Vec<_> = h
        .store
        .log_entries()
        .await
        .into_iter()
        .map(|e| e.message)
        .collect();
    assert_eq!(
        messages,
        vec!["Bot initialized", "Comment posted", "Comment posted", "Daily goal reached"]
    );
}

#[tokio::test]
async fn test_goal_already_reached_does_nothing() {
    let token = CancellationToken::new();
    let source = StubSource::new(posts(&["1"]), vec![vec!["1"]], token.clone());
    let (run_loop, h) = build(
        source,
        token,
        StubRelevance::accepting(),
        StubGenerator::new(),
        settings(1),
        Arc::new(NoopSleeper),
    );
    h.store.save_record("0", "earlier", "done").await;

    let report = run_loop.run().await;
    assert_eq!(report.outcome, RunOutcome::GoalReached);
    assert_eq!(h.source.finds.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_consecutive_failures_reset_by_success() {
    let ids = ["1", "2", "3", "4", "5", "6", "7", "8", "9"];
    let token = CancellationToken::new();
    let source = StubSource::new(posts(&ids), vec![ids.to_vec()], token.clone())
        .with_submit_script(&[false, false, true, false, false, false, false, false]);
    let (run_loop, h) = build(
        source,
        token,
        StubRelevance::accepting(),
        StubGenerator::new(),
        settings(100),
        Arc::new(NoopSleeper),
    );

    let report = run_loop.run().await;

    assert_eq!(report.outcome, RunOutcome::Aborted);
    assert!(!report.outcome.is_success());
    assert_eq!(report.stats.failures, 7);
    assert_eq!(report.stats.comments_posted, 1);
    // Post 9 is never attempted: the threshold is hit after post 8.
    assert_eq!(h.source.submitted().len(), 8);
    assert!(h.store.has_engaged("3").await);
    assert_eq!(h.store.today_count().await, 1);

    let last = h.store.log_entries().await.pop().unwrap();
    assert_eq!(last.message, "Stopped due to errors");
}

#[tokio::test]
async fn test_filtered_out_posts_never_generate_or_count() {
    let ids = ["1", "2", "3", "4", "5", "6", "7"];
    let token = CancellationToken::new();
    let source = StubSource::new(posts(&ids), vec![ids.to_vec()], token.clone());
    let generator = StubGenerator::new();
    let generations = generator.calls.clone();
    let (run_loop, h) = build(
        source,
        token,
        StubRelevance::rejecting(&ids),
        generator,
        settings(100),
        Arc::new(NoopSleeper),
    );

    let report = run_loop.run().await;

    // Seven rejections exceed the failure threshold yet the loop only stops
    // when the feed runs out.
    assert_eq!(report.outcome, RunOutcome::Interrupted);
    assert_eq!(report.stats.filtered_out, 7);
    assert_eq!(report.stats.failures, 0);
    assert_eq!(generations.load(Ordering::SeqCst), 0);
    assert_eq!(h.source.composes.load(Ordering::SeqCst), 0);
    assert!(h.source.submitted().is_empty());
}

#[tokio::test]
async fn test_analysis_errors_filter_without_counting() {
    let ids = ["1", "2", "3", "4", "5", "6"];
    let token = CancellationToken::new();
    let source = StubSource::new(posts(&ids), vec![ids.to_vec()], token.clone());
    let relevance = StubRelevance {
        fail: true,
        ..StubRelevance::accepting()
    };
    let (run_loop, h) = build(
        source,
        token,
        relevance,
        StubGenerator::new(),
        settings(100),
        Arc::new(NoopSleeper),
    );

    let report = run_loop.run().await;
    assert_eq!(report.outcome, RunOutcome::Interrupted);
    assert_eq!(report.stats.filtered_out, 6);
    assert_eq!(report.stats.failures, 0);
    assert!(h.source.submitted().is_empty());
}

#[tokio::test]
async fn test_empty_generation_does_not_count() {
    let ids = ["1", "2", "3", "4", "5", "6"];
    let token = CancellationToken::new();
    let source = StubSource::new(posts(&ids), vec![ids.to_vec()], token.clone());
    let generator = StubGenerator {
        empty_for: ids.iter().map(|s| s.to_string()).collect(),
        calls: Arc::new(AtomicU32::new(0)),
    };
    let (run_loop, h) = build(
        source,
        token,
        StubRelevance::accepting(),
        generator,
        settings(100),
        Arc::new(NoopSleeper),
    );

    let report = run_loop.run().await;
    assert_eq!(report.outcome, RunOutcome::Interrupted);
    assert_eq!(report.stats.generation_failures, 6);
    assert_eq!(report.stats.failures, 0);
    assert_eq!(h.source.composes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_engaged_posts_are_never_reattempted() {
    let token = CancellationToken::new();
    let source = StubSource::new(
        posts(&["1", "2"]),
        vec![vec!["1", "2"], vec!["1", "2"]],
        token.clone(),
    );
    let relevance = StubRelevance::accepting();
    let analyses = relevance.calls.clone();
    let (run_loop, h) = build(
        source,
        token,
        relevance,
        StubGenerator::new(),
        settings(10),
        Arc::new(NoopSleeper),
    );
    h.store.save_record("1", "post number 1", "old reply").await;

    let report = run_loop.run().await;

    assert_eq!(report.outcome, RunOutcome::Interrupted);
    assert_eq!(h.source.submitted(), vec!["2"]);
    assert_eq!(analyses.load(Ordering::SeqCst), 1);
    assert_eq!(report.stats.skipped, 3);
    assert_eq!(h.repo_records().await, 2);
}

#[tokio::test]
async fn test_posts_without_text_are_skipped() {
    let token = CancellationToken::new();
    // "ghost" has no extractable post behind it.
    let source = StubSource::new(posts(&["1"]), vec![vec!["ghost", "1"]], token.clone());
    let (run_loop, h) = build(
        source,
        token,
        StubRelevance::accepting(),
        StubGenerator::new(),
        settings(1),
        Arc::new(NoopSleeper),
    );

    let report = run_loop.run().await;
    assert_eq!(report.outcome, RunOutcome::GoalReached);
    assert_eq!(report.stats.skipped, 1);
    assert_eq!(report.stats.failures, 0);
    assert_eq!(h.source.submitted(), vec!["1"]);
}

#[tokio::test]
async fn test_engagement_only_branch_skips_analysis() {
    let token = CancellationToken::new();
    let source = StubSource::new(posts(&["1", "2"]), vec![vec!["1", "2"]], token.clone());
    let relevance = StubRelevance::accepting();
    let analyses = relevance.calls.clone();
    let mut settings = settings(10);
    settings.engagement.engagement_only_probability = 1.0;
    let (run_loop, h) = build(
        source,
        token,
        relevance,
        StubGenerator::new(),
        settings,
        Arc::new(NoopSleeper),
    );

    let report = run_loop.run().await;

    assert_eq!(report.stats.engagement_only, 2);
    assert_eq!(analyses.load(Ordering::SeqCst), 0);
    assert_eq!(h.source.likes.load(Ordering::SeqCst), 2);
    assert_eq!(h.source.retweets.load(Ordering::SeqCst), 2);
    assert!(h.source.submitted().is_empty());
    assert_eq!(h.store.today_count().await, 0);
}

#[tokio::test]
async fn test_empty_feed_scrolls_then_refreshes() {
    let token = CancellationToken::new();
    let source = StubSource::new(Vec::new(), Vec::new(), token.clone());
    let (run_loop, h) = build(
        source,
        token,
        StubRelevance::accepting(),
        StubGenerator::new(),
        settings(10),
        Arc::new(NoopSleeper),
    );

    let report = run_loop.run().await;

    assert_eq!(report.outcome, RunOutcome::Interrupted);
    assert_eq!(h.source.finds.load(Ordering::SeqCst), 2);
    assert_eq!(h.source.scrolls.load(Ordering::SeqCst), 1);
    assert_eq!(h.source.refreshes.load(Ordering::SeqCst), 1);
    assert_eq!(report.stats.refreshes, 1);
}

#[tokio::test]
async fn test_discovery_errors_back_off_and_abort() {
    let token = CancellationToken::new();
    let source = StubSource::new(Vec::new(), Vec::new(), token.clone()).with_discovery_errors(10);
    let sleeper = Arc::new(RecordingSleeper::new());
    let (run_loop, h) = build(
        source,
        token,
        StubRelevance::accepting(),
        StubGenerator::new(),
        settings(10),
        sleeper.clone(),
    );

    let report = run_loop.run().await;

    assert_eq!(report.outcome, RunOutcome::Aborted);
    assert_eq!(report.stats.failures, 5);
    assert_eq!(h.source.finds.load(Ordering::SeqCst), 5);
    let backoffs = sleeper
        .recorded()
        .into_iter()
        .filter(|d| *d == Duration::from_secs(5))
        .count();
    assert_eq!(backoffs, 5);
}

#[tokio::test]
async fn test_interrupt_before_start() {
    let token = CancellationToken::new();
    let source = StubSource::new(posts(&["1"]), vec![vec!["1"]], token.clone());
    let (run_loop, h) = build(
        source,
        token,
        StubRelevance::accepting(),
        StubGenerator::new(),
        settings(10),
        Arc::new(NoopSleeper),
    );
    h.token.cancel();

    let report = run_loop.run().await;
    assert_eq!(report.outcome, RunOutcome::Interrupted);
    assert!(report.outcome.is_success());
    assert!(h.source.submitted().is_empty());
    assert_eq!(h.source.closed.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_interrupt_during_inter_comment_wait() {
    let token = CancellationToken::new();
    let source = StubSource::new(posts(&["1", "2"]), vec![vec!["1", "2"]], token.clone());
    let repo = Arc::new(MemoryStateRepository::new());
    let store = Arc::new(QuotaStore::new(repo));
    let pacer = Arc::new(Pacer::with_seed(
        PacingConfig {
            thinking_probability: 0.0,
            ..PacingConfig::instant()
        }
        .with_inter_comment_minutes(10),
        Arc::new(vibey_runloop::TokioSleeper),
        1,
    ));
    let source = Arc::new(source);
    let run_loop = EngagementLoop::new(
        source.clone(),
        Arc::new(StubRelevance::accepting()),
        Arc::new(StubGenerator::new()),
        store.clone(),
        pacer,
        settings(10),
    )
    .with_cancellation(token.clone());

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(60)).await;
        token.cancel();
    });
    let report = run_loop.run().await;
    canceller.await.unwrap();

    assert_eq!(report.outcome, RunOutcome::Interrupted);
    assert_eq!(source.submitted(), vec!["1"]);
    assert_eq!(store.today_count().await, 1);
}

impl Harness {
    async fn repo_records(&self) -> usize {
        use vibey_protocols::StateRepository;
        self.repo
            .load_quota()
            .await
            .unwrap()
            .map(|s| s.posts.len())
            .unwrap_or(0)
    }
}

trait InterComment {
    fn with_inter_comment_minutes(self, minutes: u64) -> Self;
}

impl InterComment for PacingConfig {
    fn with_inter_comment_minutes(mut self, minutes: u64) -> Self {
        self.inter_comment = vibey_config::DelayRange::fixed(minutes * 60 * 1000);
        self
    }
}
