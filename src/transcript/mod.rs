use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::errors::{check_response, ErrorKind, TranscriptError};
use crate::http::HttpTransport;
use crate::Result;

pub mod fetched;
pub mod parser;

pub use fetched::{FetchedTranscript, FetchedTranscriptSnippet};

/// Marks timed-text URLs of an experimental format that needs a PO token
const EXPERIMENTAL_FORMAT_MARKER: &str = "&exp=xpe";

/// Language a caption track can be machine-translated into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationLanguage {
    /// Display name, e.g. "German"
    pub language: String,

    /// Language code, e.g. "de"
    pub language_code: String,
}

/// Handle on one caption track of a video.
///
/// Holding a `Transcript` costs no network traffic; [`Transcript::fetch`]
/// downloads and parses the timed-text document.
#[derive(Clone)]
pub struct Transcript {
    http: Arc<dyn HttpTransport>,
    video_id: String,
    url: String,
    language: String,
    language_code: String,
    is_generated: bool,
    translation_languages: Arc<[TranslationLanguage]>,
    translation_lookup: HashMap<String, String>,
}

impl Transcript {
    pub fn new(
        http: Arc<dyn HttpTransport>,
        video_id: impl Into<String>,
        url: impl Into<String>,
        language: impl Into<String>,
        language_code: impl Into<String>,
        is_generated: bool,
        translation_languages: Arc<[TranslationLanguage]>,
    ) -> Self {
        let translation_lookup = translation_languages
            .iter()
            .map(|lang| (lang.language_code.clone(), lang.language.clone()))
            .collect();

        Self {
            http,
            video_id: video_id.into(),
            url: url.into(),
            language: language.into(),
            language_code: language_code.into(),
            is_generated,
            translation_languages,
            translation_lookup,
        }
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    /// Timed-text URL this transcript is fetched from
    pub fn url(&self) -> &str {
        &self.url
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

    pub fn translation_languages(&self) -> &[TranslationLanguage] {
        &self.translation_languages
    }

    pub fn is_translatable(&self) -> bool {
        !self.translation_languages.is_empty()
    }

    /// Download and parse the timed-text document
    pub async fn fetch(&self, preserve_formatting: bool) -> Result<FetchedTranscript> {
        if self.url.contains(EXPERIMENTAL_FORMAT_MARKER) {
            return Err(TranscriptError::new(&self.video_id, ErrorKind::PoTokenRequired));
        }

        tracing::debug!("Fetching {} transcript for {}", self.language_code, self.video_id);

        let response = self
            .http
            .get(&self.url)
            .await
            .map_err(|e| TranscriptError::request_failed(&self.video_id, e))?;
        check_response(&self.video_id, &response)?;

        let snippets = parser::parse_timed_text(&response.body, preserve_formatting).map_err(|e| {
            tracing::debug!("Timed-text parse failed for {}: {}", self.video_id, e);
            TranscriptError::new(&self.video_id, ErrorKind::YouTubeDataUnparsable)
        })?;

        Ok(FetchedTranscript::new(
            snippets,
            &self.video_id,
            &self.language,
            &self.language_code,
            self.is_generated,
        ))
    }

    /// Derive a transcript machine-translated into `language_code`.
    ///
    /// The result is always generated and never translatable itself.
    pub fn translate(&self, language_code: &str) -> Result<Transcript> {
        if !self.is_translatable() {
            return Err(TranscriptError::new(&self.video_id, ErrorKind::NotTranslatable));
        }

        let language = self.translation_lookup.get(language_code).ok_or_else(|| {
            TranscriptError::new(&self.video_id, ErrorKind::TranslationLanguageNotAvailable)
        })?;

        Ok(Transcript::new(
            Arc::clone(&self.http),
            &self.video_id,
            format!("{}&tlang={}", self.url, urlencoding::encode(language_code)),
            language,
            language_code,
            true,
            Vec::new().into(),
        ))
    }
}

impl fmt::Debug for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transcript")
            .field("video_id", &self.video_id)
            .field("url", &self.url)
            .field("language", &self.language)
            .field("language_code", &self.language_code)
            .field("is_generated", &self.is_generated)
            .field("translation_languages", &self.translation_languages.len())
            .finish()
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (\"{}\")", self.language_code, self.language)?;
        if self.is_translatable() {
            write!(f, "[TRANSLATABLE]")?;
        }
        Ok(())
    }
}

/// Every transcript available for one video
#[derive(Debug, Clone)]
pub struct TranscriptList {
    video_id: String,
    manually_created: BTreeMap<String, Transcript>,
    generated: BTreeMap<String, Transcript>,
    translation_languages: Arc<[TranslationLanguage]>,
}

impl TranscriptList {
    pub fn new(
        video_id: impl Into<String>,
        manually_created: BTreeMap<String, Transcript>,
        generated: BTreeMap<String, Transcript>,
        translation_languages: Arc<[TranslationLanguage]>,
    ) -> Self {
        Self {
            video_id: video_id.into(),
            manually_created,
            generated,
            translation_languages,
        }
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    /// Languages any translatable track of this video can be translated into
    pub fn translation_languages(&self) -> &[TranslationLanguage] {
        &self.translation_languages
    }

    /// Manually created transcripts, then generated ones
    pub fn iter(&self) -> impl Iterator<Item = &Transcript> {
        self.manually_created.values().chain(self.generated.values())
    }

    pub fn len(&self) -> usize {
        self.manually_created.len() + self.generated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First transcript matching the language codes in priority order.
    ///
    /// For each code a manually created transcript wins over a generated one.
    pub fn find_transcript<S: AsRef<str>>(&self, language_codes: &[S]) -> Result<&Transcript> {
        self.find_in(language_codes, &[&self.manually_created, &self.generated])
    }

    pub fn find_generated_transcript<S: AsRef<str>>(
        &self,
        language_codes: &[S],
    ) -> Result<&Transcript> {
        self.find_in(language_codes, &[&self.generated])
    }

    pub fn find_manually_created_transcript<S: AsRef<str>>(
        &self,
        language_codes: &[S],
    ) -> Result<&Transcript> {
        self.find_in(language_codes, &[&self.manually_created])
    }

    fn find_in<'a, S: AsRef<str>>(
        &'a self,
        language_codes: &[S],
        sources: &[&'a BTreeMap<String, Transcript>],
    ) -> Result<&'a Transcript> {
        language_codes
            .iter()
            .find_map(|code| sources.iter().find_map(|source| source.get(code.as_ref())))
            .ok_or_else(|| {
                TranscriptError::new(
                    &self.video_id,
                    ErrorKind::NoTranscriptFound {
                        requested_language_codes: language_codes
                            .iter()
                            .map(|code| code.as_ref().to_string())
                            .collect(),
                        available: self.to_string(),
                    },
                )
            })
    }
}

impl<'a> IntoIterator for &'a TranscriptList {
    type Item = &'a Transcript;
    type IntoIter = std::iter::Chain<
        std::collections::btree_map::Values<'a, String, Transcript>,
        std::collections::btree_map::Values<'a, String, Transcript>,
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.manually_created.values().chain(self.generated.values())
    }
}

impl fmt::Display for TranscriptList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sections = Vec::new();

        if !self.manually_created.is_empty() {
            sections.push(render_section("Manually created", self.manually_created.values()));
        }
        if !self.generated.is_empty() {
            sections.push(render_section("Generated", self.generated.values()));
        }
        if !self.translation_languages.is_empty() {
            sections.push(render_section(
                "Translation languages",
                self.translation_languages
                    .iter()
                    .map(|lang| format!("{} ({})", lang.language, lang.language_code)),
            ));
        }

        write!(f, "{}", sections.join("\n\n"))
    }
}

fn render_section<T: fmt::Display>(title: &str, items: impl Iterator<Item = T>) -> String {
    let mut section = format!("{}:", title);
    for item in items {
        section.push_str(&format!("\n - {}", item));
    }
    section
}
