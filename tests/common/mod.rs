#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use std::collections::{HashMap, VecDeque};

use yt_transcript::{HttpResponse, HttpTransport, TransportError};

pub const WATCH_PAGE: &str =
    r#"<html><script>ytcfg.set({"INNERTUBE_API_KEY": "test-key","INNERTUBE_CLIENT_NAME":"WEB"});</script></html>"#;

pub const CONSENT_PAGE: &str = r#"<form action="https://consent.youtube.com/s" method="POST"><input type="hidden" name="v" value="cb.20210328-17-p0.en+FX+100"></form>"#;

pub const TIMED_TEXT: &str = r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0.0" dur="1.54">Hey, this is just a test</text><text start="1.54" dur="4.16">this is &lt;i&gt;not&lt;/i&gt; the original transcript</text><text start="5.7" dur="3.239">just something shorter, I made up for testing</text></transcript>"#;

/// A request the scripted transport received
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: &'static str,
    pub url: String,
    pub body: Option<serde_json::Value>,
    pub headers: HashMap<String, String>,
}

/// In-memory transport answering from queued responses keyed by URL prefix.
///
/// The last queued response for a prefix is repeated once the queue drains.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<Vec<(String, VecDeque<HttpResponse>)>>,
    headers: Mutex<HashMap<String, String>>,
    requests: Mutex<Vec<Recorded>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, prefix: &str, response: HttpResponse) -> Self {
        {
            let mut routes = self.routes.lock();
            match routes.iter_mut().find(|(p, _)| p == prefix) {
                Some((_, queue)) => queue.push_back(response),
                None => routes.push((prefix.to_string(), VecDeque::from([response]))),
            }
        }
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().clone()
    }

    pub fn count(&self, method: &str, prefix: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.method == method && r.url.starts_with(prefix))
            .count()
    }

    fn respond(&self, method: &'static str, url: &str, body: Option<serde_json::Value>) -> HttpResponse {
        self.requests.lock().push(Recorded {
            method,
            url: url.to_string(),
            body,
            headers: self.headers.lock().clone(),
        });

        let mut routes = self.routes.lock();
        let route = routes
            .iter_mut()
            .filter(|(prefix, _)| url.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len());

        match route {
            Some((_, queue)) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some((_, queue)) => queue.front().cloned().unwrap(),
            None => HttpResponse::new(404, ""),
        }
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        Ok(self.respond("GET", url, None))
    }

    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<HttpResponse, TransportError> {
        Ok(self.respond("POST", url, Some(body.clone())))
    }

    fn set_header(&self, name: &str, value: &str) -> Result<(), TransportError> {
        self.headers.lock().insert(name.to_lowercase(), value.to_string());
        Ok(())
    }

    fn header(&self, name: &str) -> Option<String> {
        self.headers.lock().get(&name.to_lowercase()).cloned()
    }
}

pub const WATCH: &str = "https://www.youtube.com/watch?v=";
pub const PLAYER: &str = "https://www.youtube.com/youtubei/v1/player";
pub const TIMED_TEXT_URL: &str = "https://www.youtube.com/api/timedtext";

/// Player response with a manual English track, a generated English track and a
/// non-translatable manual German track
pub fn player_response() -> HttpResponse {
    let body = json!({
        "playabilityStatus": {"status": "OK"},
        "captions": {
            "playerCaptionsTracklistRenderer": {
                "captionTracks": [
                    {
                        "baseUrl": "https://www.youtube.com/api/timedtext?v=GJLlxj_dtq8&lang=en&fmt=srv3",
                        "name": {"runs": [{"text": "English"}]},
                        "languageCode": "en",
                        "isTranslatable": true
                    },
                    {
                        "baseUrl": "https://www.youtube.com/api/timedtext?v=GJLlxj_dtq8&lang=en&kind=asr",
                        "name": {"runs": [{"text": "English (auto-generated)"}]},
                        "languageCode": "en",
                        "kind": "asr",
                        "isTranslatable": true
                    },
                    {
                        "baseUrl": "https://www.youtube.com/api/timedtext?v=GJLlxj_dtq8&lang=de",
                        "name": {"runs": [{"text": "Deutsch"}]},
                        "languageCode": "de",
                        "isTranslatable": false
                    }
                ],
                "translationLanguages": [
                    {"languageCode": "af", "languageName": {"runs": [{"text": "Afrikaans"}]}},
                    {"languageCode": "fr", "languageName": {"runs": [{"text": "French"}]}}
                ]
            }
        }
    });
    HttpResponse::ok(body.to_string())
}

pub fn playability(status: &str, reason: &str) -> HttpResponse {
    HttpResponse::ok(json!({"playabilityStatus": {"status": status, "reason": reason}}).to_string())
}
