use std::fmt::Display;
use std::str::FromStr;

use url::Url;

use crate::cache::Cached;
use crate::client::WikipediaClient;
use crate::document::{PageDocument, detect_redirect_target};
use crate::error::LookupError;
use crate::query::Query;

/// Namespace prefix every category title starts with
pub const CATEGORY_PREFIX: &str = "Category:";

/// Whether `title` names a category. Categories are ordinary pages, this is
/// only a naming convention.
pub fn is_category_title(title: &str) -> bool {
    title.starts_with(CATEGORY_PREFIX)
}

/// Anything with a title the API can be queried with
pub trait PageTitle {
    fn title(&self) -> &str;

    fn namespace(&self) -> i64;

    fn is_category(&self) -> bool {
        is_category_title(self.title())
    }
}

/// How the parse API should render text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextFormat {
    /// Rendered HTML
    #[default]
    Text,
    /// The wiki source
    Wikitext,
}

impl TextFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Wikitext => "wikitext",
        }
    }
}

impl FromStr for TextFormat {
    type Err = LookupError;

    fn from_str(format: &str) -> Result<Self, Self::Err> {
        match format {
            "text" => Ok(Self::Text),
            "wikitext" => Ok(Self::Wikitext),
            other => Err(LookupError::InvalidFormat(other.to_string())),
        }
    }
}

impl Display for TextFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something whose text can be rendered by the parse API
pub trait TextSource {
    fn text_query(&self, format: TextFormat) -> Query;
}

/// A page reference with no metadata
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    namespace: i64,
    title: String,
}

impl Entry {
    pub fn new(namespace: i64, title: impl Into<String>) -> Self {
        Entry {
            namespace,
            title: title.into(),
        }
    }
}

impl PageTitle for Entry {
    fn title(&self) -> &str {
        &self.title
    }

    fn namespace(&self) -> i64 {
        self.namespace
    }
}

/// A page reference from a listing
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryWithId {
    namespace: i64,
    title: String,
    page_id: u64,
}

impl EntryWithId {
    pub fn new(namespace: i64, title: impl Into<String>, page_id: u64) -> Self {
        EntryWithId {
            namespace,
            title: title.into(),
            page_id,
        }
    }

    pub fn page_id(&self) -> u64 {
        self.page_id
    }

    pub fn to_entry(&self) -> Entry {
        Entry::new(self.namespace, self.title.clone())
    }
}

impl PageTitle for EntryWithId {
    fn title(&self) -> &str {
        &self.title
    }

    fn namespace(&self) -> i64 {
        self.namespace
    }
}

/// Everything `prop=info` reports about a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    pub content_model: String,
    pub language: String,
    /// Language code for the HTML `lang` attribute, e.g. `sr-ec` for Serbian in Cyrillic
    pub language_html_code: String,
    pub language_dir: String,
    /// Last modified, as the ISO 8601 timestamp the API sends
    pub touched: String,
    pub last_revision_id: u64,
    pub length: u64,
    pub talk_id: Option<u64>,
    pub full_url: Url,
    pub edit_url: Url,
    pub canonical_url: Url,
}

/// A fully resolved page
///
/// The identity never changes. The document, sections and categories are
/// fetched on first access and reused afterwards.
#[derive(Debug)]
pub struct EntryDetail {
    namespace: i64,
    title: String,
    page_id: u64,
    info: PageInfo,
    redirect_sources: Vec<EntryWithId>,
    document: Cached<PageDocument>,
    sections: Cached<Vec<Section>>,
    categories: Cached<Vec<Entry>>,
}

impl PageTitle for EntryDetail {
    fn title(&self) -> &str {
        &self.title
    }

    fn namespace(&self) -> i64 {
        self.namespace
    }
}

impl EntryDetail {
    pub fn new(identity: EntryWithId, info: PageInfo, redirect_sources: Vec<EntryWithId>) -> Self {
        EntryDetail {
            namespace: identity.namespace,
            title: identity.title,
            page_id: identity.page_id,
            info,
            redirect_sources,
            document: Cached::default(),
            sections: Cached::default(),
            categories: Cached::default(),
        }
    }

    pub fn page_id(&self) -> u64 {
        self.page_id
    }

    pub fn info(&self) -> &PageInfo {
        &self.info
    }

    pub fn full_url(&self) -> &Url {
        &self.info.full_url
    }

    /// Titles that redirect to this page, as reported by the lookup
    pub fn redirect_sources(&self) -> &[EntryWithId] {
        &self.redirect_sources
    }

    pub fn to_entry_with_id(&self) -> EntryWithId {
        EntryWithId::new(self.namespace, self.title.clone(), self.page_id)
    }

    // All the 'try_...' functions mean is that they don't make any requests
    pub fn try_get_document(&self) -> Option<&PageDocument> {
        self.document.get()
    }

    pub fn try_get_sections(&self) -> Option<&[Section]> {
        self.sections.get().map(Vec::as_slice)
    }

    pub fn try_get_categories(&self) -> Option<&[Entry]> {
        self.categories.get().map(Vec::as_slice)
    }

    /// Drop every cached field; the next accessor call fetches again
    pub fn clear_cache(&mut self) -> &mut Self {
        self.document.clear();
        self.sections.clear();
        self.categories.clear();

        self
    }

    /// The rendered page, requested from the full URL on first access
    pub fn document(&mut self, client: &WikipediaClient) -> Result<&PageDocument, LookupError> {
        if self.document.is_fetched() {
            log::debug!(
                "Document of '{}' was already retrieved, reusing it",
                self.title
            );
        }

        let url = &self.info.full_url;

        self.document.get_or_try_init(|| client.fetch_document(url))
    }

    /// The title this page redirects to, if the rendered page says so
    pub fn redirect_target(&mut self, client: &WikipediaClient) -> Result<Option<String>, LookupError> {
        Ok(detect_redirect_target(self.document(client)?))
    }

    /// The ordered table of contents. `None` when the page no longer exists.
    pub fn sections(&mut self, client: &WikipediaClient) -> Result<Option<&[Section]>, LookupError> {
        if self.sections.is_fetched() {
            log::debug!(
                "Sections of '{}' were already retrieved, not requesting them again",
                self.title
            );
        } else {
            let Some(sections) = client.fetch_sections(&self.title)? else {
                return Ok(None);
            };

            if sections.is_empty() {
                self.report_empty_sections(client);
            }

            self.sections.insert(sections);
        }

        Ok(self.try_get_sections())
    }

    /// The categories this page is in. `None` when the page no longer exists.
    pub fn categories(&mut self, client: &WikipediaClient) -> Result<Option<&[Entry]>, LookupError> {
        if self.categories.is_fetched() {
            log::debug!(
                "Categories of '{}' were already retrieved, not requesting them again",
                self.title
            );
        }

        let title = &self.title;

        Ok(self
            .categories
            .get_or_try_fetch(|| client.fetch_categories(title))?
            .map(Vec::as_slice))
    }

    fn report_empty_sections(&mut self, client: &WikipediaClient) {
        match self.redirect_target(client) {
            Ok(Some(target)) => log::warn!(
                "'{}' has no sections of its own, it redirects to '{target}'",
                self.title
            ),
            Ok(None) => log::warn!(
                "'{}' has no sections ({})",
                self.title,
                self.info.full_url
            ),
            Err(e) => log::warn!(
                "'{}' has no sections and checking for a redirect failed: {e}",
                self.title
            ),
        }
    }
}

/// One heading of a page's table of contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub toc_level: u32,
    pub level: u32,
    pub line: String,
    pub number: String,
    /// Selects the section in parse queries. Transcluded sections look like `T-1`.
    pub index: String,
    /// Title of the page the section belongs to
    pub from_title: String,
    pub byte_offset: Option<u64>,
    pub anchor: String,
}

impl TextSource for Section {
    fn text_query(&self, format: TextFormat) -> Query {
        Query::parse_section(&self.from_title, &self.index, format)
    }
}

impl TextSource for Entry {
    fn text_query(&self, format: TextFormat) -> Query {
        Query::parse_text(&self.title, format)
    }
}

impl TextSource for EntryWithId {
    fn text_query(&self, format: TextFormat) -> Query {
        Query::parse_text(&self.title, format)
    }
}

impl TextSource for EntryDetail {
    fn text_query(&self, format: TextFormat) -> Query {
        Query::parse_text(&self.title, format)
    }
}

#[cfg(test)]
mod test {
    use super::{Entry, PageTitle, Section, TextFormat, TextSource, is_category_title};
    use crate::error::LookupError;

    #[test]
    fn category_is_a_prefix() {
        assert!(is_category_title("Category:Tubers"));
        assert!(!is_category_title("Potato"));
        assert!(!is_category_title("Talk:Category:Tubers"));
        assert!(Entry::new(14, "Category:Root vegetables").is_category());
    }

    #[test]
    fn text_formats() {
        assert_eq!("text".parse::<TextFormat>().unwrap(), TextFormat::Text);
        assert_eq!("wikitext".parse::<TextFormat>().unwrap(), TextFormat::Wikitext);
        assert!(matches!(
            "html".parse::<TextFormat>(),
            Err(LookupError::InvalidFormat(format)) if format == "html"
        ));
    }

    #[test]
    fn entries_render_by_title_and_sections_by_index() {
        let entry = Entry::new(0, "Potato");
        let section = Section {
            toc_level: 1,
            level: 2,
            line: "History".to_string(),
            number: "2".to_string(),
            index: "4".to_string(),
            from_title: "Potato".to_string(),
            byte_offset: Some(1200),
            anchor: "History".to_string(),
        };

        let entry_query = entry.text_query(TextFormat::Text);
        assert_eq!(entry_query.get("page"), Some("Potato"));
        assert_eq!(entry_query.get("section"), None);

        let section_query = section.text_query(TextFormat::Wikitext);
        assert_eq!(section_query.get("page"), Some("Potato"));
        assert_eq!(section_query.get("section"), Some("4"));
        assert_eq!(section_query.get("prop"), Some("wikitext"));
    }
}
