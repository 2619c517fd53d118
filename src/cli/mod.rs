use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "yt-transcript",
    about = "Retrieve YouTube transcripts, including auto-generated and translated ones",
    version,
    long_about = "A CLI tool for retrieving the caption transcripts of YouTube videos. Works for manually created and automatically generated captions, and can have them translated by YouTube."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Route requests through this proxy host (overrides the config file)
    #[arg(long, global = true, value_name = "HOST", env = "YT_TRANSCRIPT_PROXY_HOST")]
    pub proxy_host: Option<String>,

    /// Port of the proxy given with --proxy-host
    #[arg(long, global = true, value_name = "PORT", default_value = "8080")]
    pub proxy_port: u16,

    /// Attempts when YouTube blocks a request (429 retries are extra on top)
    #[arg(long, global = true, value_name = "COUNT")]
    pub retries: Option<u32>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch transcripts for one or more videos
    Fetch {
        /// Video ids (not URLs) to fetch transcripts for
        #[arg(value_name = "VIDEO_ID", required = true)]
        video_ids: Vec<String>,

        /// Language codes in descending priority (defaults to the configured languages)
        #[arg(short, long, value_name = "LANG", num_args = 1..)]
        languages: Vec<String>,

        /// Output format (defaults to the configured format)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Translate the transcript into this language
        #[arg(long, value_name = "LANG")]
        translate: Option<String>,

        /// Keep caption text exactly as YouTube serves it
        #[arg(long)]
        preserve_formatting: bool,

        /// Only consider manually created transcripts
        #[arg(long, conflicts_with = "exclude_manually_created")]
        exclude_generated: bool,

        /// Only consider automatically generated transcripts
        #[arg(long)]
        exclude_manually_created: bool,

        /// Output file path, the format extension is added when missing (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// List the transcripts available for a video
    List {
        /// Video id (not URL) to list transcripts for
        #[arg(value_name = "VIDEO_ID")]
        video_id: String,
    },

    /// Show or initialize the configuration
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,

        /// Write the default configuration file
        #[arg(long)]
        init: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text
    #[default]
    Text,
    /// Compact JSON
    Json,
    /// Indented JSON
    Pretty,
    /// WebVTT format
    Webvtt,
    /// SRT subtitle format
    Srt,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Pretty => write!(f, "pretty"),
            OutputFormat::Webvtt => write!(f, "webvtt"),
            OutputFormat::Srt => write!(f, "srt"),
        }
    }
}
