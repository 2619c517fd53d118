use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::errors::{check_response, ErrorKind, TranscriptError};
use crate::http::HttpTransport;
use crate::Result;

/// Player endpoint, `{api_key}` is substituted
pub const INNERTUBE_API_URL: &str = "https://www.youtube.com/youtubei/v1/player?key={api_key}";

/// Client identity the player endpoint is called as
pub const CLIENT_NAME: &str = "ANDROID";
pub const CLIENT_VERSION: &str = "20.10.38";

/// Subset of the player response the pipeline reads
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InnertubeData {
    pub playability_status: Option<PlayabilityStatusData>,
    pub captions: Option<Captions>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Captions {
    pub player_captions_tracklist_renderer: Option<CaptionsJson>,
}

/// The caption catalog of a video
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaptionsJson {
    pub caption_tracks: Vec<CaptionTrack>,
    pub translation_languages: Vec<RawTranslationLanguage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: String,
    #[serde(default)]
    pub name: TextRuns,
    pub language_code: String,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub is_translatable: bool,
}

impl CaptionTrack {
    /// Automatic speech recognition tracks are the generated ones
    pub fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTranslationLanguage {
    pub language_code: String,
    #[serde(default)]
    pub language_name: TextRuns,
}

/// YouTube's formatted-text shape: either `simpleText` or a list of runs
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextRuns {
    pub runs: Vec<TextRun>,
    pub simple_text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TextRun {
    pub text: String,
}

impl TextRuns {
    /// Text of the first run, or the simple text
    pub fn text(&self) -> Option<&str> {
        self.runs
            .first()
            .map(|run| run.text.as_str())
            .or(self.simple_text.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayabilityStatusData {
    pub status: Option<String>,
    pub reason: Option<String>,
    pub error_screen: Option<ErrorScreen>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ErrorScreen {
    pub player_error_message_renderer: Option<PlayerErrorMessageRenderer>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PlayerErrorMessageRenderer {
    pub subreason: Option<TextRuns>,
}

impl PlayabilityStatusData {
    /// Text fragments of the error screen's sub-reason, empty when absent
    pub fn sub_reasons(&self) -> Vec<String> {
        self.error_screen
            .as_ref()
            .and_then(|screen| screen.player_error_message_renderer.as_ref())
            .and_then(|renderer| renderer.subreason.as_ref())
            .map(|subreason| subreason.runs.iter().map(|run| run.text.clone()).collect())
            .unwrap_or_default()
    }
}

/// Calls the InnerTube player endpoint with a spoofed Android client identity
pub struct InnertubeClient {
    http: Arc<dyn HttpTransport>,
}

impl InnertubeClient {
    pub fn new(http: Arc<dyn HttpTransport>) -> Self {
        Self { http }
    }

    pub async fn fetch_innertube_data(&self, video_id: &str, api_key: &str) -> Result<InnertubeData> {
        let url = INNERTUBE_API_URL.replace("{api_key}", &urlencoding::encode(api_key));
        let body = json!({
            "context": {
                "client": {
                    "clientName": CLIENT_NAME,
                    "clientVersion": CLIENT_VERSION
                }
            },
            "videoId": video_id
        });

        tracing::debug!("Requesting player data for {}", video_id);

        let response = self
            .http
            .post_json(&url, &body)
            .await
            .map_err(|e| TranscriptError::request_failed(video_id, e))?;
        check_response(video_id, &response)?;

        serde_json::from_str(&response.body).map_err(|e| {
            tracing::debug!("Player response for {} is not parsable: {}", video_id, e);
            TranscriptError::new(video_id, ErrorKind::YouTubeDataUnparsable)
        })
    }
}
