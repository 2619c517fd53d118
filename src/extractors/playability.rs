use super::innertube::PlayabilityStatusData;
use crate::errors::{ErrorKind, TranscriptError};
use crate::utils::looks_like_url;
use crate::Result;

const BOT_DETECTED: &str = "Sign in to confirm you're not a bot";
const AGE_RESTRICTED: &str = "This video may be inappropriate for some users.";
const VIDEO_UNAVAILABLE: &str = "This video is unavailable";

/// Playability status values the player API reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayabilityStatus {
    Ok,
    Error,
    LoginRequired,
    Other(String),
}

impl From<&str> for PlayabilityStatus {
    fn from(status: &str) -> Self {
        match status {
            "OK" => PlayabilityStatus::Ok,
            "ERROR" => PlayabilityStatus::Error,
            "LOGIN_REQUIRED" => PlayabilityStatus::LoginRequired,
            other => PlayabilityStatus::Other(other.to_string()),
        }
    }
}

/// Fail unless the player response says the video can be played.
///
/// A missing status block, or one without a status, counts as playable.
pub fn assert_playability(data: Option<&PlayabilityStatusData>, video_id: &str) -> Result<()> {
    let Some(data) = data else {
        return Ok(());
    };

    let status = match data.status.as_deref() {
        None | Some("") => return Ok(()),
        Some(status) => PlayabilityStatus::from(status),
    };
    let reason = data.reason.as_deref().unwrap_or_default();

    let kind = match (status, reason) {
        (PlayabilityStatus::Ok, _) => return Ok(()),
        (PlayabilityStatus::LoginRequired, BOT_DETECTED) => ErrorKind::RequestBlocked,
        (PlayabilityStatus::LoginRequired, AGE_RESTRICTED) => ErrorKind::AgeRestricted,
        (PlayabilityStatus::Error, VIDEO_UNAVAILABLE) if looks_like_url(video_id) => {
            ErrorKind::InvalidVideoId
        }
        (PlayabilityStatus::Error, VIDEO_UNAVAILABLE) => ErrorKind::VideoUnavailable,
        _ => ErrorKind::VideoUnplayable {
            reason: reason.to_string(),
            sub_reasons: data.sub_reasons(),
        },
    };

    Err(TranscriptError::new(video_id, kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(json: serde_json::Value) -> PlayabilityStatusData {
        serde_json::from_value(json).unwrap()
    }

    fn kind_of(data: &PlayabilityStatusData, video_id: &str) -> ErrorKind {
        assert_playability(Some(data), video_id).unwrap_err().kind
    }

    #[test]
    fn test_ok_or_absent_status_passes() {
        assert!(assert_playability(None, "vid").is_ok());
        assert!(assert_playability(Some(&status(serde_json::json!({}))), "vid").is_ok());
        assert!(assert_playability(Some(&status(serde_json::json!({"status": "OK"}))), "vid").is_ok());
        let ok_with_reason = status(serde_json::json!({"status": "OK", "reason": "whatever"}));
        assert!(assert_playability(Some(&ok_with_reason), "vid").is_ok());
    }

    #[test]
    fn test_login_required_reasons() {
        let bot = status(serde_json::json!({"status": "LOGIN_REQUIRED", "reason": BOT_DETECTED}));
        assert_eq!(kind_of(&bot, "vid"), ErrorKind::RequestBlocked);

        let age = status(serde_json::json!({"status": "LOGIN_REQUIRED", "reason": AGE_RESTRICTED}));
        assert_eq!(kind_of(&age, "vid"), ErrorKind::AgeRestricted);
    }

    #[test]
    fn test_unavailable_disambiguates_urls() {
        let unavailable = status(serde_json::json!({"status": "ERROR", "reason": VIDEO_UNAVAILABLE}));
        assert_eq!(kind_of(&unavailable, "dQw4w9WgXcQ"), ErrorKind::VideoUnavailable);
        assert_eq!(kind_of(&unavailable, "http://x"), ErrorKind::InvalidVideoId);
        assert_eq!(
            kind_of(&unavailable, "https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            ErrorKind::InvalidVideoId
        );
    }

    #[test]
    fn test_other_status_is_unplayable_with_sub_reasons() {
        let private = status(serde_json::json!({
            "status": "LOGIN_REQUIRED",
            "reason": "This video is private",
            "errorScreen": {
                "playerErrorMessageRenderer": {
                    "subreason": {"runs": [{"text": "Sign in"}, {"text": " if you've been granted access"}]}
                }
            }
        }));
        assert_eq!(
            kind_of(&private, "vid"),
            ErrorKind::VideoUnplayable {
                reason: "This video is private".to_string(),
                sub_reasons: vec!["Sign in".to_string(), " if you've been granted access".to_string()],
            }
        );

        let unknown = status(serde_json::json!({"status": "UNPLAYABLE"}));
        assert_eq!(
            kind_of(&unknown, "vid"),
            ErrorKind::VideoUnplayable {
                reason: String::new(),
                sub_reasons: vec![],
            }
        );
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(PlayabilityStatus::from("OK"), PlayabilityStatus::Ok);
        assert_eq!(PlayabilityStatus::from("LOGIN_REQUIRED"), PlayabilityStatus::LoginRequired);
        assert_eq!(
            PlayabilityStatus::from("LIVE_STREAM_OFFLINE"),
            PlayabilityStatus::Other("LIVE_STREAM_OFFLINE".to_string())
        );
    }
}
