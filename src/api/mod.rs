use std::sync::Arc;

use crate::config::Config;
use crate::extractors::TranscriptListFetcher;
use crate::http::{HttpTransport, ReqwestTransport, TransportError};
use crate::transcript::{FetchedTranscript, TranscriptList};
use crate::Result;

const DEFAULT_LANGUAGE: &str = "en";

/// Entry point for listing and fetching YouTube transcripts.
///
/// One instance owns one transport. Consent cookies negotiated for one video
/// stay on that transport, so concurrent first-time fetches should each use
/// their own instance.
pub struct YouTubeTranscriptApi {
    http: Arc<dyn HttpTransport>,
    fetcher: TranscriptListFetcher,
}

impl YouTubeTranscriptApi {
    /// Build an instance with a reqwest transport configured from `config`
    pub fn new(config: &Config) -> std::result::Result<Self, TransportError> {
        let transport = ReqwestTransport::new(
            &config.http,
            config.proxy.as_ref(),
            config.retries_when_blocked,
        )?;
        Ok(Self::with_transport(Arc::new(transport), config.retries_when_blocked))
    }

    /// Build an instance over any transport
    pub fn with_transport(http: Arc<dyn HttpTransport>, retries_when_blocked: u32) -> Self {
        Self {
            fetcher: TranscriptListFetcher::new(Arc::clone(&http), retries_when_blocked),
            http,
        }
    }

    pub fn transport(&self) -> &Arc<dyn HttpTransport> {
        &self.http
    }

    /// Every transcript available for a video
    pub async fn list(&self, video_id: &str) -> Result<TranscriptList> {
        self.fetcher.fetch(video_id).await
    }

    /// Fetch the best transcript for the language codes, in priority order.
    ///
    /// An empty `languages` slice means English.
    pub async fn fetch<S: AsRef<str>>(
        &self,
        video_id: &str,
        languages: &[S],
        preserve_formatting: bool,
    ) -> Result<FetchedTranscript> {
        let list = self.list(video_id).await?;
        let transcript = if languages.is_empty() {
            list.find_transcript(&[DEFAULT_LANGUAGE])?
        } else {
            list.find_transcript(languages)?
        };
        transcript.fetch(preserve_formatting).await
    }
}
