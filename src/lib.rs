//! yt-transcript - retrieve the caption transcripts of YouTube videos
//!
//! This library lists the caption tracks of a video, manually created and
//! automatically generated, fetches their timed text and can have YouTube
//! machine-translate a track into another language. No API key or browser is
//! needed; everything goes through the public watch page and player endpoint.

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod output;
pub mod transcript;
pub mod utils;

pub use api::YouTubeTranscriptApi;
pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use errors::{ErrorCategory, ErrorKind, TranscriptError};
pub use http::{HttpResponse, HttpTransport, ReqwestTransport, TransportError};
pub use transcript::{
    FetchedTranscript, FetchedTranscriptSnippet, Transcript, TranscriptList, TranslationLanguage,
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, TranscriptError>;
