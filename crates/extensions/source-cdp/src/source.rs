//! [`PostSource`] over a CDP-attached X/Twitter tab.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tracing::{debug, info, warn};

use vibey_config::{BrowserConfig, ConnectStrategy};
use vibey_protocols::{Post, PostSource, RawPost, Snapshot, SourceError};

use crate::cdp::{CdpClient, CdpError, PageSession, ScreenshotFormat};
use crate::feed::{self, ExtractedArticle};

const HOME_SETTLE: Duration = Duration::from_secs(3);
const FEED_SETTLE: Duration = Duration::from_secs(5);
const COMPOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// X/Twitter live search feed in a Chrome tab.
pub struct XFeedSource {
    client: CdpClient,
    page: PageSession,
    owns_page: bool,
    config: BrowserConfig,
}

impl XFeedSource {
    /// Connect to the browser and pick the tab to drive.
    ///
    /// With [`ConnectStrategy::Attach`] the first open tab is reused so the
    /// profile's logged-in session carries over; a new tab is opened only
    /// when none exists.
    pub async fn connect(config: BrowserConfig) -> Result<Self, CdpError> {
        let client = CdpClient::connect_with_retry(
            &config.endpoint,
            config.connect_attempts,
            Duration::from_secs(config.connect_retry_secs),
        )
        .await?;

        let existing = match config.strategy {
            ConnectStrategy::Attach => client.list_pages().await?.into_iter().find(|p| p.is_page()),
            ConnectStrategy::NewPage => None,
        };
        let (page, owns_page) = match existing {
            Some(info) => {
                debug!("Attaching to existing tab {} ({})", info.id, info.url);
                (client.attach_page(&info.id).await?, false)
            }
            None => (client.new_page(None).await?, true),
        };

        Ok(Self {
            client,
            page,
            owns_page,
            config,
        })
    }

    /// Open the home page, wait out a manual login if needed, then load the feed.
    pub async fn open_feed(&self) -> Result<(), CdpError> {
        let home = home_url(&self.config);
        info!("Opening {}", home);
        self.page.navigate(&home).await?;
        tokio::time::sleep(HOME_SETTLE).await;

        let current = self.page.url().await?;
        if feed::is_login_url(&current) {
            warn!(
                "Not logged in; log in from the Chrome window. Waiting {}s...",
                self.config.login_wait_secs
            );
            tokio::time::sleep(Duration::from_secs(self.config.login_wait_secs)).await;
        }

        let target = feed_url(&self.config);
        info!("Navigating to feed {}", target);
        self.page.navigate(&target).await?;
        tokio::time::sleep(FEED_SETTLE).await;
        Ok(())
    }

    async fn snapshot(&self, article: &ExtractedArticle) -> Option<Snapshot> {
        if !self.config.capture_snapshots {
            return None;
        }
        let clip = article.rect.as_ref().filter(|r| !r.is_empty())?;
        match self.page.screenshot(ScreenshotFormat::Png, Some(clip)).await {
            Ok(data) => Some(Snapshot::png(data)),
            Err(e) => {
                debug!("Snapshot failed: {}", e);
                None
            }
        }
    }

    async fn click_within(&self, post: &Post, selector: &str) -> Result<(), SourceError> {
        self.page
            .click_selector(&feed::within(&post.handle, selector))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl PostSource for XFeedSource {
    fn id(&self) -> &str {
        "cdp-x"
    }

    async fn find_candidates(&self) -> Result<Vec<RawPost>, SourceError> {
        let keys = self.page.evaluate(&feed::tag_articles_script()).await?;
        let keys: Vec<String> = serde_json::from_value(keys)
            .map_err(|e| SourceError::Backend(format!("article keys: {}", e)))?;
        Ok(keys.into_iter().map(RawPost::new).collect())
    }

    async fn extract(&self, raw: &RawPost) -> Result<Option<Post>, SourceError> {
        let value = self
            .page
            .evaluate(&feed::extract_script(&raw.handle))
            .await?;
        if value.is_null() {
            return Ok(None);
        }
        let article: ExtractedArticle = serde_json::from_value(value)
            .map_err(|e| SourceError::Backend(format!("article data: {}", e)))?;
        let snapshot = self.snapshot(&article).await;

        Ok(article.into_post(&raw.handle).map(|post| match snapshot {
            Some(s) => post.with_snapshot(s),
            None => post,
        }))
    }

    async fn scroll(&self, pixels: u32) -> Result<(), SourceError> {
        self.page.evaluate(&feed::scroll_script(pixels)).await?;
        Ok(())
    }

    async fn refresh(&self) -> Result<(), SourceError> {
        self.page.reload().await?;
        Ok(())
    }

    async fn like(&self, post: &Post) -> Result<(), SourceError> {
        self.click_within(post, feed::LIKE).await
    }

    async fn retweet(&self, post: &Post) -> Result<(), SourceError> {
        self.click_within(post, feed::RETWEET).await?;
        let menu_wait = rand::thread_rng().gen_range(500..=1000);
        tokio::time::sleep(Duration::from_millis(menu_wait)).await;
        self.page.click_selector(feed::RETWEET_CONFIRM).await?;
        Ok(())
    }

    async fn open_reply_compose(&self, post: &Post) -> Result<(), SourceError> {
        self.click_within(post, feed::REPLY).await?;
        let compose = self
            .page
            .wait_for_selector(feed::COMPOSE, COMPOSE_TIMEOUT)
            .await?;
        self.page.click_node(compose, feed::COMPOSE).await?;
        Ok(())
    }

    async fn type_text(&self, text: &str) -> Result<(), SourceError> {
        self.page.insert_text(text).await?;
        Ok(())
    }

    async fn submit_reply(&self, post: &Post, _text: &str) -> Result<bool, SourceError> {
        let Some(button) = self.page.query_selector(feed::SUBMIT).await? else {
            debug!("Submit button missing for post {}", post.id);
            return Ok(false);
        };
        self.page.click_node(button, feed::SUBMIT).await?;
        Ok(true)
    }

    async fn close(&self) -> Result<(), SourceError> {
        if self.owns_page {
            if let Err(e) = self.client.close_page(self.page.target_id()).await {
                warn!("Failed to close tab: {}", e);
            }
        }
        self.client.disconnect().await;
        info!("Browser session released");
        Ok(())
    }
}

fn home_url(config: &BrowserConfig) -> String {
    config
        .home_url
        .clone()
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| feed::DEFAULT_HOME_URL.to_string())
}

/// Live search for the configured keywords, else the home timeline.
fn feed_url(config: &BrowserConfig) -> String {
    feed::search_url(&config.search_keywords).unwrap_or_else(|| home_url(config))
}
