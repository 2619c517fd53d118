use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yt_transcript::cli::{Cli, Commands};
use yt_transcript::config::{Config, ProxyConfig};
use yt_transcript::output;
use yt_transcript::utils::format_duration;
use yt_transcript::{FetchedTranscript, TranscriptList, YouTubeTranscriptApi};

/// Which kinds of transcript a fetch may pick from
#[derive(Clone, Copy)]
enum Selection {
    Any,
    ManuallyCreated,
    Generated,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "yt_transcript=debug"
    } else {
        "yt_transcript=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::load().await?;
    apply_overrides(&mut config, &cli);

    match cli.command {
        Commands::Fetch {
            video_ids,
            languages,
            format,
            translate,
            preserve_formatting,
            exclude_generated,
            exclude_manually_created,
            output,
        } => {
            let api = YouTubeTranscriptApi::new(&config).context("Failed to set up HTTP client")?;
            let languages = if languages.is_empty() {
                config.defaults.languages.clone()
            } else {
                languages
            };
            let format = format.unwrap_or(config.defaults.output_format);
            let preserve_formatting = preserve_formatting || config.defaults.preserve_formatting;
            let selection = if exclude_generated {
                Selection::ManuallyCreated
            } else if exclude_manually_created {
                Selection::Generated
            } else {
                Selection::Any
            };

            let progress = spinner(cli.quiet)?;
            let mut transcripts = Vec::new();
            let mut failures = 0;

            for video_id in &video_ids {
                progress.set_message(format!("Fetching transcript for {}...", video_id));

                match fetch_one(&api, video_id, &languages, selection, translate.as_deref(), preserve_formatting).await {
                    Ok(transcript) => {
                        tracing::info!(
                            "Fetched {} snippets ({}) of {} for {}",
                            transcript.len(),
                            format_duration(transcript.total_duration()),
                            transcript.language_code(),
                            video_id
                        );
                        transcripts.push(transcript);
                    }
                    Err(err) => {
                        failures += 1;
                        progress.suspend(|| eprintln!("{} {}\n", style("error:").red().bold(), err));
                    }
                }
            }
            progress.finish_and_clear();

            if !transcripts.is_empty() {
                match output {
                    Some(path) => {
                        let path = output::save_to_file(&transcripts, &path, format).await?;
                        println!("Transcripts saved to: {}", path.display());
                    }
                    None => output::print_to_console(&transcripts, format)?,
                }
            }

            if failures > 0 {
                anyhow::bail!("{} of {} videos failed", failures, video_ids.len());
            }
        }
        Commands::List { video_id } => {
            let api = YouTubeTranscriptApi::new(&config).context("Failed to set up HTTP client")?;
            let list: TranscriptList = api.list(&video_id).await?;
            println!(
                "For this video ({}) transcripts are available in the following languages:\n\n{}",
                style(list.video_id()).bold(),
                list
            );
        }
        Commands::Config { show, init } => {
            if init {
                let path = Config::default().save().await?;
                println!("Default configuration written to: {}", path.display());
            }
            if show || !init {
                config.display();
            }
        }
    }

    Ok(())
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(host) = &cli.proxy_host {
        config.proxy = Some(ProxyConfig {
            host: host.clone(),
            port: cli.proxy_port,
            auth: None,
        });
    }
    if let Some(retries) = cli.retries {
        config.retries_when_blocked = retries;
    }
}

fn spinner(quiet: bool) -> Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    Ok(progress)
}

async fn fetch_one(
    api: &YouTubeTranscriptApi,
    video_id: &str,
    languages: &[String],
    selection: Selection,
    translate: Option<&str>,
    preserve_formatting: bool,
) -> yt_transcript::Result<FetchedTranscript> {
    let list = api.list(video_id).await?;
    let transcript = match selection {
        Selection::Any => list.find_transcript(languages)?,
        Selection::ManuallyCreated => list.find_manually_created_transcript(languages)?,
        Selection::Generated => list.find_generated_transcript(languages)?,
    };

    match translate {
        Some(code) => transcript.translate(code)?.fetch(preserve_formatting).await,
        None => transcript.fetch(preserve_formatting).await,
    }
}
