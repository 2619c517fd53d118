//! Error types for transcript retrieval.
//!
//! Every failure names the video it happened for and an [`ErrorKind`] that
//! says why. The kind decides whether a retry can help, see
//! [`ErrorKind::category`].

use crate::http::HttpResponse;
use crate::utils::watch_url;

const ISSUE_REFERRAL: &str = "\n\nIf you are sure that the described cause is not responsible for this error \
and that a transcript should be retrievable, please create an issue at \
https://github.com/yourusername/yt-transcript/issues. \
Please add which version of yt-transcript you are using \
and provide the information needed to replicate the error. \
Also make sure that there are no open issues which already describe your problem!";

/// Failure to retrieve a transcript for a particular video
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error(
    "Could not retrieve a transcript for the video {}! This is most likely caused by:\n\n{kind}{}",
    watch_url(.video_id),
    referral(.kind)
)]
pub struct TranscriptError {
    /// The video id exactly as the caller passed it
    pub video_id: String,

    /// Why retrieval failed
    pub kind: ErrorKind,
}

/// The reason a retrieval failed, with any payload the reason carries
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ErrorKind {
    #[error("Your IP address is being blocked by YouTube. Please consider using a proxy.")]
    IpBlocked,

    #[error("The request to YouTube was blocked.")]
    RequestBlocked,

    #[error("The video is unavailable")]
    VideoUnavailable,

    #[error("You provided an invalid video id. Make sure you are using the video id and NOT the url!")]
    InvalidVideoId,

    #[error("The video is age restricted")]
    AgeRestricted,

    #[error("The video is unplayable for the following reason: {reason}{}", details(.sub_reasons))]
    VideoUnplayable {
        reason: String,
        sub_reasons: Vec<String>,
    },

    #[error("Transcripts are disabled for this video")]
    TranscriptsDisabled,

    #[error(
        "The data required to fetch the transcript is not parsable. This should not happen, \
         please open an issue (make sure to include the video ID)!"
    )]
    YouTubeDataUnparsable,

    #[error(
        "No transcripts were found for any of the requested language codes: {}\n\nAvailable transcripts:\n{available}",
        .requested_language_codes.join(", ")
    )]
    NoTranscriptFound {
        requested_language_codes: Vec<String>,
        /// Rendering of every transcript and translation language of the video
        available: String,
    },

    #[error("The requested translation language is not available")]
    TranslationLanguageNotAvailable,

    #[error("The transcript is not translatable")]
    NotTranslatable,

    #[error("Failed to automatically give consent to saving cookies")]
    FailedToCreateConsentCookie,

    #[error("YouTube requires a proof of origin token for this request")]
    PoTokenRequired,

    #[error("Request to YouTube failed: {reason}")]
    YouTubeRequestFailed { reason: String },
}

/// Broad nature of a failure, used to pick a handling policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Platform-side blocking; retrying later or through a proxy may help
    Blocking,
    /// The video itself cannot yield transcripts
    ContentState,
    /// The platform's page or API structure changed
    DataDrift,
    /// The requested language does not exist for this video
    LanguageMismatch,
    /// Cookie consent or token negotiation failed
    Negotiation,
    /// Generic transport failure
    Transport,
}

impl ErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorKind::IpBlocked | ErrorKind::RequestBlocked => ErrorCategory::Blocking,
            ErrorKind::VideoUnavailable
            | ErrorKind::InvalidVideoId
            | ErrorKind::AgeRestricted
            | ErrorKind::VideoUnplayable { .. }
            | ErrorKind::TranscriptsDisabled => ErrorCategory::ContentState,
            ErrorKind::YouTubeDataUnparsable => ErrorCategory::DataDrift,
            ErrorKind::NoTranscriptFound { .. }
            | ErrorKind::TranslationLanguageNotAvailable
            | ErrorKind::NotTranslatable => ErrorCategory::LanguageMismatch,
            ErrorKind::FailedToCreateConsentCookie | ErrorKind::PoTokenRequired => {
                ErrorCategory::Negotiation
            }
            ErrorKind::YouTubeRequestFailed { .. } => ErrorCategory::Transport,
        }
    }

    /// Short stable name of the kind, handy for logs and CLI output
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::IpBlocked => "IpBlocked",
            ErrorKind::RequestBlocked => "RequestBlocked",
            ErrorKind::VideoUnavailable => "VideoUnavailable",
            ErrorKind::InvalidVideoId => "InvalidVideoId",
            ErrorKind::AgeRestricted => "AgeRestricted",
            ErrorKind::VideoUnplayable { .. } => "VideoUnplayable",
            ErrorKind::TranscriptsDisabled => "TranscriptsDisabled",
            ErrorKind::YouTubeDataUnparsable => "YouTubeDataUnparsable",
            ErrorKind::NoTranscriptFound { .. } => "NoTranscriptFound",
            ErrorKind::TranslationLanguageNotAvailable => "TranslationLanguageNotAvailable",
            ErrorKind::NotTranslatable => "NotTranslatable",
            ErrorKind::FailedToCreateConsentCookie => "FailedToCreateConsentCookie",
            ErrorKind::PoTokenRequired => "PoTokenRequired",
            ErrorKind::YouTubeRequestFailed { .. } => "YouTubeRequestFailed",
        }
    }
}

impl TranscriptError {
    pub fn new(video_id: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            video_id: video_id.into(),
            kind,
        }
    }

    /// Wrap an underlying transport failure
    pub fn request_failed(video_id: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Self::new(
            video_id,
            ErrorKind::YouTubeRequestFailed {
                reason: cause.to_string(),
            },
        )
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// Whether a caller-configured retry policy may re-attempt the request
    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::Blocking
    }

    /// The human-readable cause on its own, without the video header
    pub fn cause(&self) -> String {
        self.kind.to_string()
    }
}

/// Map a non-success HTTP status to the matching failure
pub(crate) fn check_response(video_id: &str, response: &HttpResponse) -> Result<(), TranscriptError> {
    if response.is_too_many_requests() {
        return Err(TranscriptError::new(video_id, ErrorKind::IpBlocked));
    }
    if !response.is_success() {
        return Err(TranscriptError::request_failed(
            video_id,
            format!("HTTP {}", response.status),
        ));
    }
    Ok(())
}

fn referral(kind: &ErrorKind) -> &'static str {
    match kind {
        ErrorKind::YouTubeDataUnparsable => ISSUE_REFERRAL,
        _ => "",
    }
}

fn details(sub_reasons: &[String]) -> String {
    if sub_reasons.is_empty() {
        String::new()
    } else {
        format!("\n\nAdditional Details:\n{}", sub_reasons.join("\n"))
    }
}
