//! Serde shapes of the action API responses and their mapping onto the
//! page records.

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use url::Url;

use crate::error::LookupError;
use crate::listing::Listing;
use crate::page::{Entry, EntryDetail, EntryWithId, PageInfo, Section};

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(string) => Ok(string),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a string or a number, found '{other}'"
        ))),
    }
}

fn number_in_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    string_or_number(deserializer)?
        .parse()
        .map_err(D::Error::custom)
}

// `fromtitle` is `false` when the section doesn't come from a page
fn title_or_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(title) => Some(title),
        _ => None,
    })
}

/// The `{"query": ..., "continue": ...}` envelope
#[derive(Debug, Deserialize)]
pub(crate) struct QueryResponse<T> {
    query: Option<T>,
    #[serde(rename = "continue", default)]
    continuation: BTreeMap<String, Value>,
}

impl<T> QueryResponse<T> {
    pub(crate) fn into_body(self) -> Option<T> {
        self.query
    }

    fn continue_token(&self, key: &str) -> Option<String> {
        self.continuation
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PagesBody {
    #[serde(default)]
    pages: BTreeMap<String, RawPage>,
}

impl PagesBody {
    /// Pages that exist, skipping the "no such page" entries
    pub(crate) fn resolved(self) -> impl Iterator<Item = RawPage> {
        self.pages
            .into_iter()
            .filter(|(key, page)| !key.starts_with('-') && !page.is_missing())
            .map(|(_, page)| page)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawListed {
    pageid: u64,
    #[serde(default)]
    ns: i64,
    title: String,
}

impl From<RawListed> for EntryWithId {
    fn from(raw: RawListed) -> Self {
        EntryWithId::new(raw.ns, raw.title, raw.pageid)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawEntry {
    #[serde(default)]
    ns: i64,
    title: String,
}

impl From<RawEntry> for Entry {
    fn from(raw: RawEntry) -> Self {
        Entry::new(raw.ns, raw.title)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawLanguageLink {
    pub(crate) lang: String,
    #[serde(rename = "*")]
    pub(crate) title: String,
}

/// One entry of `query.pages`, with the union of every `prop` this crate asks for
#[derive(Debug, Deserialize)]
pub(crate) struct RawPage {
    pageid: Option<u64>,
    #[serde(default)]
    ns: i64,
    title: String,
    missing: Option<Value>,
    invalid: Option<Value>,

    // prop=info
    contentmodel: Option<String>,
    pagelanguage: Option<String>,
    pagelanguagehtmlcode: Option<String>,
    pagelanguagedir: Option<String>,
    touched: Option<String>,
    lastrevid: Option<u64>,
    length: Option<u64>,
    talkid: Option<u64>,
    fullurl: Option<Url>,
    editurl: Option<Url>,
    canonicalurl: Option<Url>,

    // prop=redirects
    #[serde(default)]
    redirects: Vec<RawListed>,

    // prop=categories
    #[serde(default)]
    categories: Vec<RawEntry>,

    // prop=extracts
    extract: Option<String>,

    // prop=langlinks
    #[serde(default)]
    langlinks: Vec<RawLanguageLink>,
}

impl RawPage {
    fn is_missing(&self) -> bool {
        self.missing.is_some() || self.invalid.is_some()
    }

    pub(crate) fn into_categories(self) -> Vec<Entry> {
        self.categories.into_iter().map(Entry::from).collect()
    }

    pub(crate) fn into_extract(self) -> String {
        self.extract.unwrap_or_default().trim().to_string()
    }

    pub(crate) fn into_language_links(self) -> Vec<RawLanguageLink> {
        self.langlinks
    }

    pub(crate) fn into_detail(self) -> Result<EntryDetail, LookupError> {
        let title = self.title;

        let missing = |field: &'static str| LookupError::MissingField {
            title: title.clone(),
            field,
        };

        let page_id = self.pageid.ok_or_else(|| missing("pageid"))?;

        let info = PageInfo {
            content_model: self.contentmodel.ok_or_else(|| missing("contentmodel"))?,
            language: self.pagelanguage.ok_or_else(|| missing("pagelanguage"))?,
            language_html_code: self
                .pagelanguagehtmlcode
                .ok_or_else(|| missing("pagelanguagehtmlcode"))?,
            language_dir: self.pagelanguagedir.ok_or_else(|| missing("pagelanguagedir"))?,
            touched: self.touched.ok_or_else(|| missing("touched"))?,
            last_revision_id: self.lastrevid.ok_or_else(|| missing("lastrevid"))?,
            length: self.length.ok_or_else(|| missing("length"))?,
            talk_id: self.talkid,
            full_url: self.fullurl.ok_or_else(|| missing("fullurl"))?,
            edit_url: self.editurl.ok_or_else(|| missing("editurl"))?,
            canonical_url: self.canonicalurl.ok_or_else(|| missing("canonicalurl"))?,
        };

        let redirect_sources = self.redirects.into_iter().map(EntryWithId::from).collect();

        Ok(EntryDetail::new(
            EntryWithId::new(self.ns, title, page_id),
            info,
            redirect_sources,
        ))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoryMembersBody {
    #[serde(default)]
    categorymembers: Vec<RawListed>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AllPagesBody {
    #[serde(default)]
    allpages: Vec<RawListed>,
}

impl QueryResponse<CategoryMembersBody> {
    pub(crate) fn into_listing(self) -> Listing<EntryWithId> {
        let next = self.continue_token("cmcontinue");

        Listing {
            entries: self
                .query
                .map(|body| body.categorymembers.into_iter().map(EntryWithId::from).collect())
                .unwrap_or_default(),
            next,
        }
    }
}

impl QueryResponse<AllPagesBody> {
    pub(crate) fn into_listing(self) -> Listing<EntryWithId> {
        let next = self.continue_token("apcontinue");

        Listing {
            entries: self
                .query
                .map(|body| body.allpages.into_iter().map(EntryWithId::from).collect())
                .unwrap_or_default(),
            next,
        }
    }
}

/// The `{"parse": ...}` envelope
#[derive(Debug, Deserialize)]
pub(crate) struct ParseResponse {
    pub(crate) parse: ParseBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Content {
    #[serde(rename = "*")]
    pub(crate) content: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ParseBody {
    pub(crate) title: String,
    #[serde(default)]
    sections: Vec<RawSection>,
    pub(crate) text: Option<Content>,
    pub(crate) wikitext: Option<Content>,
}

impl ParseBody {
    pub(crate) fn into_sections(self) -> Vec<Section> {
        let page = self.title;

        self.sections
            .into_iter()
            .map(|raw| Section {
                toc_level: raw.toclevel,
                level: raw.level,
                line: raw.line,
                number: raw.number,
                index: raw.index,
                from_title: raw.fromtitle.unwrap_or_else(|| page.clone()),
                byte_offset: raw.byteoffset,
                anchor: raw.anchor,
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct RawSection {
    toclevel: u32,
    #[serde(deserialize_with = "number_in_string")]
    level: u32,
    line: String,
    #[serde(deserialize_with = "string_or_number")]
    number: String,
    #[serde(deserialize_with = "string_or_number")]
    index: String,
    #[serde(default, deserialize_with = "title_or_false")]
    fromtitle: Option<String>,
    byteoffset: Option<u64>,
    #[serde(default)]
    anchor: String,
}
