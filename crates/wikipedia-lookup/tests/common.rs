#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use url::Url;
use wikipedia_lookup::{HttpError, Transport, WikipediaClient, WikipediaClientConfig};

pub const POTATO_INFO: &str = include_str!("fixtures/potato-info.json");
pub const MISSING_INFO: &str = include_str!("fixtures/missing-info.json");
pub const POTATO_SECTIONS: &str = include_str!("fixtures/potato-sections.json");
pub const POTATO_SECTION_3: &str = include_str!("fixtures/potato-section-3.json");
pub const POTATO_SECTION_5: &str = include_str!("fixtures/potato-section-5.json");
pub const POTATO_CATEGORIES: &str = include_str!("fixtures/potato-categories.json");
pub const POTATO_SUMMARY: &str = include_str!("fixtures/potato-summary.json");
pub const POTATO_LANGLINKS: &str = include_str!("fixtures/potato-langlinks.json");
pub const POTATO_ALL_PAGES: &str = include_str!("fixtures/potato-all-pages.json");
pub const TUBER_MEMBERS: &str = include_str!("fixtures/tuber-members.json");
pub const MISSING_TITLE: &str = include_str!("fixtures/missing-title.json");
pub const ICELANDIC_ALPHABET_INFO: &str = include_str!("fixtures/icelandic-alphabet-info.json");
pub const EMPTY_SECTIONS: &str = include_str!("fixtures/empty-sections.json");
pub const POTATO_HTML: &str = include_str!("fixtures/potato.html");
pub const REDIRECTED_HTML: &str = include_str!("fixtures/redirected.html");

pub const POTATO_URL: &str = "https://en.wikipedia.org/wiki/Potato";

enum Matcher {
    /// Every pair must be in the query string
    Query(Vec<(String, String)>),
    Url(String),
}

impl Matcher {
    fn matches(&self, url: &Url) -> bool {
        match self {
            Matcher::Query(pairs) => pairs.iter().all(|(key, value)| {
                url.query_pairs()
                    .any(|(name, found)| name == key.as_str() && found == value.as_str())
            }),
            Matcher::Url(expected) => url.as_str() == expected,
        }
    }
}

#[derive(Default)]
struct Recorded {
    routes: Vec<(Matcher, Vec<u8>)>,
    requests: Vec<Url>,
}

/// Serves canned bodies and remembers every URL it was asked for.
/// Anything without a route is a 404.
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<Recorded>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn recorded(&self) -> MutexGuard<'_, Recorded> {
        self.inner.lock().expect("Mock transport lock is poisoned")
    }

    /// Routes are tried in the order they were added
    pub fn on_query(self, pairs: &[(&str, &str)], body: impl Into<Vec<u8>>) -> Self {
        let pairs = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        self.recorded()
            .routes
            .push((Matcher::Query(pairs), body.into()));
        self
    }

    pub fn on_url(self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.recorded()
            .routes
            .push((Matcher::Url(url.to_string()), body.into()));
        self
    }

    pub fn requests(&self) -> Vec<Url> {
        self.recorded().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.recorded().requests.len()
    }

    /// How many requests carried every one of `pairs`
    pub fn count_matching(&self, pairs: &[(&str, &str)]) -> usize {
        let matcher = Matcher::Query(
            pairs
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        );

        self.recorded()
            .requests
            .iter()
            .filter(|url| matcher.matches(url))
            .count()
    }

    pub fn count_url(&self, url: &str) -> usize {
        self.recorded()
            .requests
            .iter()
            .filter(|requested| requested.as_str() == url)
            .count()
    }
}

impl Transport for MockTransport {
    fn get(&self, url: &Url) -> Result<Vec<u8>, HttpError> {
        let mut recorded = self.recorded();

        recorded.requests.push(url.clone());

        recorded
            .routes
            .iter()
            .find(|(matcher, _)| matcher.matches(url))
            .map(|(_, body)| body.clone())
            .ok_or(HttpError::Status(404))
    }
}

pub fn client(transport: &MockTransport) -> WikipediaClient {
    WikipediaClient::with_transport(WikipediaClientConfig::default(), transport.clone())
        .expect("Default configuration is invalid")
}

/// A transport that knows the Potato page and nothing else
pub fn potato_transport() -> MockTransport {
    MockTransport::new()
        .on_query(
            &[("titles", "Potato"), ("prop", "info|redirects")],
            POTATO_INFO,
        )
        .on_query(
            &[("page", "Potato"), ("prop", "text"), ("section", "3")],
            POTATO_SECTION_3,
        )
        .on_query(
            &[("page", "Potato"), ("prop", "text"), ("section", "5")],
            POTATO_SECTION_5,
        )
        .on_query(&[("page", "Potato"), ("prop", "sections")], POTATO_SECTIONS)
        .on_query(
            &[("titles", "Potato"), ("prop", "categories")],
            POTATO_CATEGORIES,
        )
        .on_query(&[("titles", "Potato"), ("prop", "extracts")], POTATO_SUMMARY)
        .on_query(
            &[("titles", "Potato"), ("prop", "langlinks")],
            POTATO_LANGLINKS,
        )
        .on_query(
            &[("list", "categorymembers"), ("cmtitle", "Category:Tubers")],
            TUBER_MEMBERS,
        )
        .on_query(&[("list", "allpages"), ("apfrom", "Potato")], POTATO_ALL_PAGES)
        .on_url(POTATO_URL, POTATO_HTML)
}
