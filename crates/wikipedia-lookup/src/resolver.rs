use regex::Regex;
use url::Url;

use crate::client::WikipediaClient;
use crate::error::LookupError;
use crate::page::EntryDetail;

/// The title to query for `input`, which is either a title or a page URL
///
/// For a URL that is the last path segment, percent-decoded. Anything else
/// is used verbatim.
pub fn canonical_key(input: &str) -> String {
    let scheme = Regex::new(r"[A-Za-z][A-Za-z0-9+.\-]*://").expect("Failed to compile scheme regex");

    if !scheme.is_match(input) {
        return input.to_string();
    }

    let segment = match Url::parse(input.trim()) {
        Ok(url) => url
            .path_segments()
            .and_then(|segments| segments.filter(|segment| !segment.is_empty()).last())
            .map(str::to_string),
        Err(e) => {
            log::warn!("'{input}' looks like a URL but failed to parse ({e}), using its last segment");
            input.rsplit('/').find(|segment| !segment.is_empty()).map(str::to_string)
        }
    }
    .unwrap_or_default();

    match urlencoding::decode(&segment) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => segment,
    }
}

/// Every entry resolved so far, in lookup order
#[derive(Debug, Default)]
pub struct Encyclopedia {
    entries: Vec<EntryDetail>,
}

impl Encyclopedia {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a title or page URL, appending every match to the history
    ///
    /// Returns the newly appended entries; an empty slice means no page
    /// matched. Nothing is cached between calls.
    pub fn find(
        &mut self,
        client: &WikipediaClient,
        input: &str,
    ) -> Result<&mut [EntryDetail], LookupError> {
        let key = canonical_key(input);

        let found = client.resolve_entries(&key)?;

        if found.is_empty() {
            log::warn!("No results found for '{input}' (looked up as '{key}')");
        }

        let start = self.entries.len();
        self.entries.extend(found);

        Ok(&mut self.entries[start..])
    }

    pub fn history(&self) -> &[EntryDetail] {
        &self.entries
    }

    pub fn last(&self) -> Option<&EntryDetail> {
        self.entries.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut EntryDetail> {
        self.entries.last_mut()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut EntryDetail> {
        self.entries.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
