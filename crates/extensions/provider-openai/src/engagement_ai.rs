//! Relevance and reply services backed by one chat model.

use async_trait::async_trait;
use tracing::{debug, warn};

use vibey_config::ProviderConfig;
use vibey_protocols::{
    AnalysisResult, Post, ProviderError, RelevanceService, ReplyGenerator,
};

use crate::api::{ApiMessage, ApiRequest};
use crate::client::ChatClient;
use crate::parse::{clean_reply, parse_analysis};
use crate::prompts::{analysis_prompt, reply_system_prompt};

/// Implements both [`RelevanceService`] and [`ReplyGenerator`].
///
/// Without an API key every analysis is "unknown" and no reply is produced.
pub struct OpenAIEngagementAi {
    client: Option<ChatClient>,
    config: ProviderConfig,
}

impl OpenAIEngagementAi {
    pub fn new(config: ProviderConfig) -> Self {
        let client = match ChatClient::from_config(&config) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!("Language model disabled: {}", e);
                None
            }
        };
        Self { client, config }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    fn analysis_request(&self, post: &Post) -> ApiRequest {
        let prompt = analysis_prompt(&post.text);
        let message = match (&post.snapshot, self.config.vision) {
            (Some(snapshot), true) => ApiMessage::user_with_image(prompt, snapshot.data_url()),
            _ => ApiMessage::user(prompt),
        };
        ApiRequest {
            model: self.config.model.clone(),
            messages: vec![message],
            max_tokens: Some(self.config.analysis_max_tokens),
            temperature: Some(self.config.analysis_temperature),
        }
    }

    fn reply_request(&self, post: &Post, analysis: &AnalysisResult) -> ApiRequest {
        ApiRequest {
            model: self.config.model.clone(),
            messages: vec![
                ApiMessage::system(reply_system_prompt(&post.text, analysis)),
                ApiMessage::user(post.text.clone()),
            ],
            max_tokens: Some(self.config.reply_max_tokens),
            temperature: Some(self.config.reply_temperature),
        }
    }
}

#[async_trait]
impl RelevanceService for OpenAIEngagementAi {
    async fn analyze(&self, post: &Post) -> Result<AnalysisResult, ProviderError> {
        let Some(client) = &self.client else {
            return Ok(AnalysisResult::unknown());
        };
        let content = client.complete(&self.analysis_request(post)).await?;
        let result = parse_analysis(&content);
        debug!(
            "Analysis of {}: worth={} topic={} vibe={}",
            post.id, result.worth_commenting, result.topic, result.vibe
        );
        Ok(result)
    }
}

#[async_trait]
impl ReplyGenerator for OpenAIEngagementAi {
    async fn generate(
        &self,
        post: &Post,
        analysis: &AnalysisResult,
    ) -> Result<Option<String>, ProviderError> {
        let Some(client) = &self.client else {
            return Ok(None);
        };
        let content = client.complete(&self.reply_request(post, analysis)).await?;
        Ok(clean_reply(&content))
    }
}

#[cfg(test)]
#[path = "engagement_ai_tests.rs"]
mod tests;
