//! Timed-text document parsing.
//!
//! The document is `<transcript>` holding one `<text start=".." dur="..">` element
//! per cue. Times are non-negative decimal seconds and `dur` may be absent.

use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::FetchedTranscriptSnippet;
use crate::utils::normalize_whitespace;

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("Malformed timed-text XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed attribute in timed-text XML: {0}")]
    Attribute(#[from] AttrError),

    #[error("Text element without a start attribute")]
    MissingStart,

    #[error("Invalid {name} value {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

struct PendingSnippet {
    start: f64,
    duration: f64,
    text: String,
}

impl PendingSnippet {
    fn from_element(element: &BytesStart<'_>) -> Result<Self, ParseError> {
        let mut start = None;
        let mut duration = 0.0;

        for attr in element.attributes() {
            let attr = attr?;
            match attr.key.as_ref() {
                b"start" => start = Some(parse_seconds("start", &attr.unescape_value()?)?),
                b"dur" => duration = parse_seconds("dur", &attr.unescape_value()?)?,
                _ => {}
            }
        }

        Ok(Self {
            start: start.ok_or(ParseError::MissingStart)?,
            duration,
            text: String::new(),
        })
    }

    fn finish(self, preserve_formatting: bool) -> FetchedTranscriptSnippet {
        let text = if preserve_formatting {
            self.text
        } else {
            normalize_whitespace(&html_escape::decode_html_entities(&self.text))
        };
        FetchedTranscriptSnippet::new(text, self.start, self.duration)
    }
}

/// Parse a timed-text document into snippets in document order.
///
/// Unless `preserve_formatting` is set, HTML entities left in the text are
/// decoded and whitespace runs collapsed.
pub fn parse_timed_text(
    xml: &str,
    preserve_formatting: bool,
) -> Result<Vec<FetchedTranscriptSnippet>, ParseError> {
    let mut reader = Reader::from_str(xml);
    let mut snippets = Vec::new();
    let mut current: Option<PendingSnippet> = None;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) if e.name().as_ref() == b"text" => {
                current = Some(PendingSnippet::from_element(e)?);
            }
            Event::Empty(ref e) if e.name().as_ref() == b"text" => {
                snippets.push(PendingSnippet::from_element(e)?.finish(preserve_formatting));
            }
            Event::Text(e) => {
                if let Some(pending) = current.as_mut() {
                    // entities XML does not know (e.g. &nbsp;) are left for the HTML decode
                    match e.unescape() {
                        Ok(text) => pending.text.push_str(&text),
                        Err(_) => pending.text.push_str(&String::from_utf8_lossy(&e)),
                    }
                }
            }
            Event::CData(e) => {
                if let Some(pending) = current.as_mut() {
                    pending.text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::End(ref e) if e.name().as_ref() == b"text" => {
                if let Some(pending) = current.take() {
                    snippets.push(pending.finish(preserve_formatting));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(snippets)
}

fn parse_seconds(name: &'static str, value: &str) -> Result<f64, ParseError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|seconds| seconds.is_finite() && *seconds >= 0.0)
        .ok_or_else(|| ParseError::InvalidNumber {
            name,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"<?xml version="1.0" encoding="utf-8" ?>
<transcript>
    <text start="0.21" dur="2.34">Hello world</text>
    <text start="2.55" dur="1.50">it&amp;#39;s a &amp;quot;test&amp;quot;</text>
    <text start="4.05">no duration</text>
</transcript>"#;

    #[test]
    fn test_parse_basic_document() {
        let snippets = parse_timed_text(DOCUMENT, false).unwrap();
        assert_eq!(snippets.len(), 3);
        assert_eq!(snippets[0], FetchedTranscriptSnippet::new("Hello world", 0.21, 2.34));
        assert_eq!(snippets[1].text, "it's a \"test\"");
        assert_eq!(snippets[2].duration, 0.0);
        assert_eq!(snippets[2].start, 4.05);
    }

    #[test]
    fn test_entities_and_whitespace_are_normalized() {
        let xml = r#"<transcript><text start="1.5" dur="2">Hello  &amp;  world</text></transcript>"#;
        let snippets = parse_timed_text(xml, false).unwrap();
        assert_eq!(snippets, vec![FetchedTranscriptSnippet::new("Hello & world", 1.5, 2.0)]);
    }

    #[test]
    fn test_preserve_formatting_keeps_text_content() {
        let xml = r#"<transcript><text start="1.5" dur="2">Hello  &amp;  world</text></transcript>"#;
        let snippets = parse_timed_text(xml, true).unwrap();
        assert_eq!(snippets[0].text, "Hello  &  world");

        let xml = "<transcript><text start=\"0\" dur=\"1\">  it&amp;#39;s\n  here </text></transcript>";
        let snippets = parse_timed_text(xml, true).unwrap();
        assert_eq!(snippets[0].text, "  it&#39;s\n  here ");
    }

    #[test]
    fn test_document_order_is_kept() {
        let xml = r#"<transcript>
            <text start="5" dur="1">second in time, first in file</text>
            <text start="1" dur="1">first in time</text>
        </transcript>"#;
        let texts: Vec<String> = parse_timed_text(xml, false)
            .unwrap()
            .into_iter()
            .map(|s| s.text)
            .collect();
        assert_eq!(texts, vec!["second in time, first in file", "first in time"]);
    }

    #[test]
    fn test_empty_and_self_closing_elements() {
        let xml = r#"<transcript><text start="1" dur="1"/><text start="2" dur="1"></text></transcript>"#;
        let snippets = parse_timed_text(xml, false).unwrap();
        assert_eq!(snippets.len(), 2);
        assert!(snippets.iter().all(|s| s.text.is_empty()));

        assert!(parse_timed_text("<transcript></transcript>", false).unwrap().is_empty());
    }

    #[test]
    fn test_html_only_entities() {
        let xml = r#"<transcript><text start="0" dur="1">a&nbsp;b</text></transcript>"#;
        let snippets = parse_timed_text(xml, false).unwrap();
        assert_eq!(snippets[0].text, "a b");
    }

    #[test]
    fn test_rejects_bad_attributes() {
        let missing = r#"<transcript><text dur="1">x</text></transcript>"#;
        assert!(matches!(parse_timed_text(missing, false), Err(ParseError::MissingStart)));

        let invalid = r#"<transcript><text start="soon">x</text></transcript>"#;
        assert!(matches!(
            parse_timed_text(invalid, false),
            Err(ParseError::InvalidNumber { name: "start", .. })
        ));

        let negative_start = r#"<transcript><text start="-3" dur="1">x</text></transcript>"#;
        assert!(matches!(
            parse_timed_text(negative_start, false),
            Err(ParseError::InvalidNumber { name: "start", .. })
        ));

        let negative_dur = r#"<transcript><text start="3" dur="-1">x</text></transcript>"#;
        assert!(matches!(
            parse_timed_text(negative_dur, false),
            Err(ParseError::InvalidNumber { name: "dur", .. })
        ));
    }
}
