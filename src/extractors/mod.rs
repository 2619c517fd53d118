use std::sync::Arc;

pub mod api_key;
pub mod captions;
pub mod innertube;
pub mod page;
pub mod playability;

use crate::errors::ErrorKind;
use crate::http::HttpTransport;
use crate::transcript::TranscriptList;
use crate::Result;

pub use innertube::{InnertubeClient, InnertubeData};
pub use page::PageFetcher;
pub use playability::PlayabilityStatus;

/// Runs the watch page -> API key -> player data -> catalog pipeline
pub struct TranscriptListFetcher {
    http: Arc<dyn HttpTransport>,
    page: PageFetcher,
    innertube: InnertubeClient,
    retries_when_blocked: u32,
}

impl TranscriptListFetcher {
    pub fn new(http: Arc<dyn HttpTransport>, retries_when_blocked: u32) -> Self {
        Self {
            page: PageFetcher::new(Arc::clone(&http)),
            innertube: InnertubeClient::new(Arc::clone(&http)),
            http,
            retries_when_blocked,
        }
    }

    /// Fetch every transcript available for a video.
    ///
    /// The whole pipeline is re-run while YouTube answers with a bot check, for
    /// at most `retries_when_blocked` attempts in total (always at least one);
    /// every other failure is returned as is.
    pub async fn fetch(&self, video_id: &str) -> Result<TranscriptList> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(video_id).await {
                Err(err)
                    if err.kind == ErrorKind::RequestBlocked
                        && attempt + 1 < self.retries_when_blocked =>
                {
                    attempt += 1;
                    tracing::warn!(
                        "Request for {} was blocked, retrying (attempt {}/{})",
                        video_id,
                        attempt + 1,
                        self.retries_when_blocked
                    );
                }
                result => return result,
            }
        }
    }

    async fn fetch_once(&self, video_id: &str) -> Result<TranscriptList> {
        let html = self.page.fetch_video_html(video_id).await?;
        let api_key = api_key::extract_innertube_api_key(&html, video_id)?;
        let data = self.innertube.fetch_innertube_data(video_id, &api_key).await?;
        let captions = captions::extract_captions_json(data, video_id)?;

        let list = captions::build_transcript_list(Arc::clone(&self.http), video_id, captions);
        tracing::info!(
            "Found {} transcripts and {} translation languages for {}",
            list.len(),
            list.translation_languages().len(),
            video_id
        );
        Ok(list)
    }
}
