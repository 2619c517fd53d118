use serde::{Deserialize, Serialize};

/// A single caption cue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchedTranscriptSnippet {
    /// Caption text
    pub text: String,

    /// Start time in seconds
    pub start: f64,

    /// Duration in seconds
    pub duration: f64,
}

impl FetchedTranscriptSnippet {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }

    /// End time in seconds
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Transcript content fetched for one language of a video.
///
/// Snippets keep the order of the timed-text document, which is chronological.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchedTranscript {
    video_id: String,
    language: String,
    language_code: String,
    is_generated: bool,
    snippets: Vec<FetchedTranscriptSnippet>,
}

impl FetchedTranscript {
    pub fn new(
        snippets: Vec<FetchedTranscriptSnippet>,
        video_id: impl Into<String>,
        language: impl Into<String>,
        language_code: impl Into<String>,
        is_generated: bool,
    ) -> Self {
        Self {
            video_id: video_id.into(),
            language: language.into(),
            language_code: language_code.into(),
            is_generated,
            snippets,
        }
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn language_code(&self) -> &str {
        &self.language_code
    }

    pub fn is_generated(&self) -> bool {
        self.is_generated
    }

    pub fn snippets(&self) -> &[FetchedTranscriptSnippet] {
        &self.snippets
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FetchedTranscriptSnippet> {
        self.snippets.iter()
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    /// Flat `{text, start, duration}` records for formatters
    pub fn to_raw_data(&self) -> Vec<FetchedTranscriptSnippet> {
        self.snippets.clone()
    }

    /// Time from zero to the end of the last snippet
    pub fn total_duration(&self) -> f64 {
        self.snippets
            .iter()
            .map(FetchedTranscriptSnippet::end)
            .fold(0.0, f64::max)
    }
}

impl<'a> IntoIterator for &'a FetchedTranscript {
    type Item = &'a FetchedTranscriptSnippet;
    type IntoIter = std::slice::Iter<'a, FetchedTranscriptSnippet>;

    fn into_iter(self) -> Self::IntoIter {
        self.snippets.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FetchedTranscript {
        FetchedTranscript::new(
            vec![
                FetchedTranscriptSnippet::new("Hello world", 0.0, 1.5),
                FetchedTranscriptSnippet::new("This is a test", 1.5, 2.0),
            ],
            "test123",
            "English",
            "en",
            false,
        )
    }

    #[test]
    fn test_iteration_is_restartable() {
        let transcript = sample();
        let first: Vec<&str> = transcript.iter().map(|s| s.text.as_str()).collect();
        let second: Vec<&str> = (&transcript).into_iter().map(|s| s.text.as_str()).collect();
        assert_eq!(first, vec!["Hello world", "This is a test"]);
        assert_eq!(first, second);
        assert_eq!(transcript.len(), 2);
    }

    #[test]
    fn test_raw_data_serializes_flat_records() {
        let raw = serde_json::to_value(sample().to_raw_data()).unwrap();
        assert_eq!(
            raw,
            serde_json::json!([
                {"text": "Hello world", "start": 0.0, "duration": 1.5},
                {"text": "This is a test", "start": 1.5, "duration": 2.0}
            ])
        );
    }

    #[test]
    fn test_total_duration() {
        assert_eq!(sample().total_duration(), 3.5);
        let empty = FetchedTranscript::new(vec![], "x", "English", "en", true);
        assert!(empty.is_empty());
        assert_eq!(empty.total_duration(), 0.0);
    }
}
