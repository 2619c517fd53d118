use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{ErrorKind, TranscriptError};
use crate::Result;

static INNERTUBE_API_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).unwrap());

/// Served in place of the page when YouTube wants a captcha solved
const RECAPTCHA_MARKER: &str = r#"class="g-recaptcha""#;

/// Pull the InnerTube API key out of the watch page markup
pub fn extract_innertube_api_key(html: &str, video_id: &str) -> Result<String> {
    if let Some(key) = INNERTUBE_API_KEY.captures(html).and_then(|caps| caps.get(1)) {
        return Ok(key.as_str().to_string());
    }

    if html.contains(RECAPTCHA_MARKER) {
        return Err(TranscriptError::new(video_id, ErrorKind::IpBlocked));
    }

    Err(TranscriptError::new(video_id, ErrorKind::YouTubeDataUnparsable))
}
