use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use crate::errors::{check_response, ErrorKind, TranscriptError};
use crate::http::HttpTransport;
use crate::utils::WATCH_URL;
use crate::Result;

/// Form action of the cookie consent interstitial
const CONSENT_FORM_MARKER: &str = r#"action="https://consent.youtube.com/s""#;

static CONSENT_VALUE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"name="v" value="(.*?)""#).unwrap());

/// Downloads watch pages, getting past the cookie consent interstitial
pub struct PageFetcher {
    http: Arc<dyn HttpTransport>,
}

impl PageFetcher {
    pub fn new(http: Arc<dyn HttpTransport>) -> Self {
        Self { http }
    }

    /// Fetch the HTML-unescaped watch page for a video.
    ///
    /// When the consent form comes back instead, a consent cookie is installed on
    /// the transport and the page is requested exactly once more.
    pub async fn fetch_video_html(&self, video_id: &str) -> Result<String> {
        let html = self.fetch_html(video_id).await?;
        if !html.contains(CONSENT_FORM_MARKER) {
            return Ok(html);
        }

        tracing::warn!("Consent form served for {}, accepting cookies", video_id);
        self.create_consent_cookie(&html, video_id)?;

        let html = self.fetch_html(video_id).await?;
        if html.contains(CONSENT_FORM_MARKER) {
            return Err(TranscriptError::new(video_id, ErrorKind::FailedToCreateConsentCookie));
        }
        Ok(html)
    }

    fn create_consent_cookie(&self, html: &str, video_id: &str) -> Result<()> {
        let consent_failed = || TranscriptError::new(video_id, ErrorKind::FailedToCreateConsentCookie);

        let value = CONSENT_VALUE
            .captures(html)
            .and_then(|caps| caps.get(1))
            .ok_or_else(consent_failed)?;

        self.http
            .set_header("Cookie", &format!("CONSENT=YES+{}", value.as_str()))
            .map_err(|e| {
                tracing::debug!("Could not install consent cookie: {}", e);
                consent_failed()
            })
    }

    async fn fetch_html(&self, video_id: &str) -> Result<String> {
        let url = WATCH_URL.replace("{video_id}", &urlencoding::encode(video_id));
        tracing::debug!("Fetching watch page {}", url);

        let response = self
            .http
            .get(&url)
            .await
            .map_err(|e| TranscriptError::request_failed(video_id, e))?;
        check_response(video_id, &response)?;

        Ok(html_escape::decode_html_entities(&response.body).into_owned())
    }
}
