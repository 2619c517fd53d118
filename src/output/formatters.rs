use anyhow::Result;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::cli::OutputFormat;
use crate::transcript::FetchedTranscript;
use crate::utils::format_timestamp;

/// Renders fetched transcripts into a textual format
pub trait Formatter: Send + Sync {
    fn format_transcript(&self, transcript: &FetchedTranscript) -> Result<String>;

    fn format_transcripts(&self, transcripts: &[FetchedTranscript]) -> Result<String>;

    /// Extension used when writing the output to a file
    fn file_extension(&self) -> &'static str;
}

/// Formatter matching an output format
pub fn formatter_for(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter::default()),
        OutputFormat::Pretty => Box::new(PrettyPrintFormatter),
        OutputFormat::Webvtt => Box::new(WebVttFormatter),
        OutputFormat::Srt => Box::new(SrtFormatter),
    }
}

/// Plain caption text, one snippet per line
#[derive(Debug, Default, Clone, Copy)]
pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_transcript(&self, transcript: &FetchedTranscript) -> Result<String> {
        Ok(transcript
            .iter()
            .map(|snippet| snippet.text.as_str())
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn format_transcripts(&self, transcripts: &[FetchedTranscript]) -> Result<String> {
        let rendered = transcripts
            .iter()
            .map(|transcript| self.format_transcript(transcript))
            .collect::<Result<Vec<_>>>()?;
        Ok(rendered.join("\n\n\n"))
    }

    fn file_extension(&self) -> &'static str {
        "txt"
    }
}

/// JSON array of `{text, start, duration}` objects
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonFormatter {
    /// Spaces per nesting level; compact output when unset
    pub indent: Option<usize>,
}

impl JsonFormatter {
    pub fn with_indent(indent: usize) -> Self {
        Self {
            indent: Some(indent),
        }
    }

    fn render<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        match self.indent {
            None => Ok(serde_json::to_string(value)?),
            Some(width) => {
                let indent = " ".repeat(width);
                let mut buffer = Vec::new();
                let mut serializer =
                    Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(indent.as_bytes()));
                value.serialize(&mut serializer)?;
                Ok(String::from_utf8(buffer)?)
            }
        }
    }
}

impl Formatter for JsonFormatter {
    fn format_transcript(&self, transcript: &FetchedTranscript) -> Result<String> {
        self.render(transcript.snippets())
    }

    fn format_transcripts(&self, transcripts: &[FetchedTranscript]) -> Result<String> {
        let all: Vec<_> = transcripts.iter().map(FetchedTranscript::snippets).collect();
        self.render(&all)
    }

    fn file_extension(&self) -> &'static str {
        "json"
    }
}

/// Indented JSON meant for reading
#[derive(Debug, Default, Clone, Copy)]
pub struct PrettyPrintFormatter;

impl Formatter for PrettyPrintFormatter {
    fn format_transcript(&self, transcript: &FetchedTranscript) -> Result<String> {
        JsonFormatter::with_indent(2).format_transcript(transcript)
    }

    fn format_transcripts(&self, transcripts: &[FetchedTranscript]) -> Result<String> {
        JsonFormatter::with_indent(2).format_transcripts(transcripts)
    }

    fn file_extension(&self) -> &'static str {
        "json"
    }
}

/// WebVTT subtitles
#[derive(Debug, Default, Clone, Copy)]
pub struct WebVttFormatter;

impl Formatter for WebVttFormatter {
    fn format_transcript(&self, transcript: &FetchedTranscript) -> Result<String> {
        let cues = transcript
            .iter()
            .map(|snippet| {
                format!(
                    "{} --> {}\n{}",
                    format_timestamp(snippet.start, '.'),
                    format_timestamp(snippet.end(), '.'),
                    snippet.text
                )
            })
            .collect::<Vec<_>>();

        Ok(format!("WEBVTT\n\n{}\n", cues.join("\n\n")))
    }

    fn format_transcripts(&self, transcripts: &[FetchedTranscript]) -> Result<String> {
        let rendered = transcripts
            .iter()
            .map(|transcript| self.format_transcript(transcript))
            .collect::<Result<Vec<_>>>()?;
        Ok(rendered.join("\n"))
    }

    fn file_extension(&self) -> &'static str {
        "vtt"
    }
}

/// SubRip subtitles
#[derive(Debug, Default, Clone, Copy)]
pub struct SrtFormatter;

impl Formatter for SrtFormatter {
    fn format_transcript(&self, transcript: &FetchedTranscript) -> Result<String> {
        let mut srt = String::new();

        for (i, snippet) in transcript.iter().enumerate() {
            srt.push_str(&format!(
                "{}\n{} --> {}\n{}\n\n",
                i + 1,
                format_timestamp(snippet.start, ','),
                format_timestamp(snippet.end(), ','),
                snippet.text
            ));
        }

        Ok(srt)
    }

    fn format_transcripts(&self, transcripts: &[FetchedTranscript]) -> Result<String> {
        let rendered = transcripts
            .iter()
            .map(|transcript| self.format_transcript(transcript))
            .collect::<Result<Vec<_>>>()?;
        Ok(rendered.join("\n"))
    }

    fn file_extension(&self) -> &'static str {
        "srt"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::FetchedTranscriptSnippet;

    fn sample() -> FetchedTranscript {
        FetchedTranscript::new(
            vec![
                FetchedTranscriptSnippet::new("Hello there", 0.0, 1.5),
                FetchedTranscriptSnippet::new("General Kenobi", 1.5, 2.25),
            ],
            "vid",
            "English",
            "en",
            false,
        )
    }

    #[test]
    fn test_text_formatter() {
        let text = TextFormatter.format_transcript(&sample()).unwrap();
        assert_eq!(text, "Hello there\nGeneral Kenobi");

        let both = TextFormatter.format_transcripts(&[sample(), sample()]).unwrap();
        assert_eq!(both, "Hello there\nGeneral Kenobi\n\n\nHello there\nGeneral Kenobi");
    }

    #[test]
    fn test_json_formatter() {
        let json = JsonFormatter::default().format_transcript(&sample()).unwrap();
        assert_eq!(
            json,
            r#"[{"text":"Hello there","start":0.0,"duration":1.5},{"text":"General Kenobi","start":1.5,"duration":2.25}]"#
        );

        let many = JsonFormatter::default().format_transcripts(&[sample(), sample()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&many).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[1][1]["text"], "General Kenobi");
    }

    #[test]
    fn test_pretty_formatter_indents() {
        let pretty = PrettyPrintFormatter.format_transcript(&sample()).unwrap();
        assert!(pretty.starts_with("[\n  {\n    \"text\": \"Hello there\""));

        let wide = JsonFormatter::with_indent(4).format_transcript(&sample()).unwrap();
        assert!(wide.starts_with("[\n    {\n        \"text\""));
    }

    #[test]
    fn test_webvtt_formatter() {
        let vtt = WebVttFormatter.format_transcript(&sample()).unwrap();
        assert_eq!(
            vtt,
            "WEBVTT\n\n00:00:00.000 --> 00:00:01.500\nHello there\n\n00:00:01.500 --> 00:00:03.750\nGeneral Kenobi\n"
        );
    }

    #[test]
    fn test_srt_formatter() {
        let srt = SrtFormatter.format_transcript(&sample()).unwrap();
        assert_eq!(
            srt,
            "1\n00:00:00,000 --> 00:00:01,500\nHello there\n\n2\n00:00:01,500 --> 00:00:03,750\nGeneral Kenobi\n\n"
        );
    }

    #[test]
    fn test_formatter_for() {
        assert_eq!(formatter_for(OutputFormat::Srt).file_extension(), "srt");
        assert_eq!(formatter_for(OutputFormat::Webvtt).file_extension(), "vtt");
        assert_eq!(formatter_for(OutputFormat::Pretty).file_extension(), "json");
        assert_eq!(formatter_for(OutputFormat::Text).file_extension(), "txt");
    }
}
