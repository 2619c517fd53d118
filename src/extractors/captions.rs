use std::collections::BTreeMap;
use std::sync::Arc;

use super::innertube::{CaptionsJson, InnertubeData};
use super::playability::assert_playability;
use crate::errors::{ErrorKind, TranscriptError};
use crate::http::HttpTransport;
use crate::transcript::{Transcript, TranscriptList, TranslationLanguage};
use crate::Result;

/// Format selector YouTube appends to track URLs; the plain format is wanted
const SRV3_FORMAT: &str = "&fmt=srv3";

/// Validate playability and pull the caption catalog out of the player data
pub fn extract_captions_json(data: InnertubeData, video_id: &str) -> Result<CaptionsJson> {
    assert_playability(data.playability_status.as_ref(), video_id)?;

    data.captions
        .and_then(|captions| captions.player_captions_tracklist_renderer)
        .filter(|renderer| !renderer.caption_tracks.is_empty())
        .ok_or_else(|| TranscriptError::new(video_id, ErrorKind::TranscriptsDisabled))
}

/// Turn the caption catalog into a [`TranscriptList`].
///
/// Tracks of kind `asr` are filed as generated, all others as manually created.
/// Only translatable tracks carry the video's translation languages.
pub fn build_transcript_list(
    http: Arc<dyn HttpTransport>,
    video_id: &str,
    captions: CaptionsJson,
) -> TranscriptList {
    let translation_languages: Arc<[TranslationLanguage]> = captions
        .translation_languages
        .into_iter()
        .map(|lang| TranslationLanguage {
            language: lang
                .language_name
                .text()
                .unwrap_or(&lang.language_code)
                .to_string(),
            language_code: lang.language_code,
        })
        .collect();
    let untranslatable: Arc<[TranslationLanguage]> = Vec::new().into();

    let mut manually_created = BTreeMap::new();
    let mut generated = BTreeMap::new();

    for track in captions.caption_tracks {
        let languages = if track.is_translatable {
            Arc::clone(&translation_languages)
        } else {
            Arc::clone(&untranslatable)
        };
        let transcript = Transcript::new(
            Arc::clone(&http),
            video_id,
            track.base_url.replace(SRV3_FORMAT, ""),
            track.name.text().unwrap_or(&track.language_code),
            &track.language_code,
            track.is_generated(),
            languages,
        );

        let target = if track.is_generated() {
            &mut generated
        } else {
            &mut manually_created
        };
        target.insert(track.language_code, transcript);
    }

    TranscriptList::new(video_id, manually_created, generated, translation_languages)
}
