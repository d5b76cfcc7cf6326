//! Filters for the two list queries, category members and all pages.
//!
//! Every option left as `None` (or empty) stays off the wire.

/// One page of results from a list query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing<T> {
    pub entries: Vec<T>,
    /// Continuation token; pass it back as `continue_from` for the next page
    pub next: Option<String>,
}

impl<T> Listing<T> {
    pub fn empty() -> Self {
        Listing {
            entries: Vec::new(),
            next: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<T> IntoIterator for Listing<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    // allpages only takes the long spelling
    pub(crate) fn as_all_pages_str(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    SortKey,
    Timestamp,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SortKey => "sortkey",
            Self::Timestamp => "timestamp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberProperty {
    Ids,
    Title,
    SortKey,
    SortKeyPrefix,
    Type,
    Timestamp,
}

impl MemberProperty {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ids => "ids",
            Self::Title => "title",
            Self::SortKey => "sortkey",
            Self::SortKeyPrefix => "sortkeyprefix",
            Self::Type => "type",
            Self::Timestamp => "timestamp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberType {
    Page,
    Subcat,
    File,
}

impl MemberType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Subcat => "subcat",
            Self::File => "file",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectFilter {
    All,
    Redirects,
    NonRedirects,
}

impl RedirectFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Redirects => "redirects",
            Self::NonRedirects => "nonredirects",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectionType {
    Edit,
    Move,
    Upload,
}

impl ProtectionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Move => "move",
            Self::Upload => "upload",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectionLevel {
    Autoconfirmed,
    ExtendedConfirmed,
    TemplateEditor,
    Sysop,
}

impl ProtectionLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Autoconfirmed => "autoconfirmed",
            Self::ExtendedConfirmed => "extendedconfirmed",
            Self::TemplateEditor => "templateeditor",
            Self::Sysop => "sysop",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeFilter {
    All,
    Cascading,
    NonCascading,
}

impl CascadeFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Cascading => "cascading",
            Self::NonCascading => "noncascading",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageLinksFilter {
    All,
    WithLanguageLinks,
    WithoutLanguageLinks,
}

impl LanguageLinksFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::WithLanguageLinks => "withlanglinks",
            Self::WithoutLanguageLinks => "withoutlanglinks",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectionExpiry {
    All,
    Definite,
    Indefinite,
}

impl ProtectionExpiry {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Definite => "definite",
            Self::Indefinite => "indefinite",
        }
    }
}

/// Filters for `list=categorymembers`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMembersOptions {
    pub limit: u32,
    pub properties: Vec<MemberProperty>,
    pub sort: Option<SortField>,
    pub direction: Option<Direction>,
    pub member_types: Vec<MemberType>,
    pub namespaces: Vec<i64>,
    /// Only sent when `sort` is [`SortField::SortKey`]
    pub start_hex: Option<String>,
    pub end_hex: Option<String>,
    pub start_prefix: Option<String>,
    pub end_prefix: Option<String>,
    pub continue_from: Option<String>,
}

impl Default for CategoryMembersOptions {
    fn default() -> Self {
        CategoryMembersOptions {
            limit: 20,
            properties: Vec::new(),
            sort: None,
            direction: None,
            member_types: Vec::new(),
            namespaces: Vec::new(),
            start_hex: None,
            end_hex: None,
            start_prefix: None,
            end_prefix: None,
            continue_from: None,
        }
    }
}

impl CategoryMembersOptions {
    /// The requested properties, always including the ones an `EntryWithId` needs
    pub(crate) fn properties_on_wire(&self) -> Vec<&'static str> {
        if self.properties.is_empty() {
            return Vec::new();
        }

        let mut properties = self.properties.clone();

        for required in [MemberProperty::Ids, MemberProperty::Title] {
            if !properties.contains(&required) {
                properties.push(required);
            }
        }

        properties.into_iter().map(MemberProperty::as_str).collect()
    }
}

/// Filters for `list=allpages`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllPagesOptions {
    pub limit: u32,
    pub direction: Option<Direction>,
    pub continue_from: Option<String>,
    pub to: Option<String>,
    pub prefix: Option<String>,
    pub namespace: Option<i64>,
    pub redirects: Option<RedirectFilter>,
    pub min_size: Option<u64>,
    pub max_size: Option<u64>,
    pub protection_types: Vec<ProtectionType>,
    pub protection_levels: Vec<ProtectionLevel>,
    pub protection_cascade: Option<CascadeFilter>,
    pub language_links: Option<LanguageLinksFilter>,
    pub protection_expiry: Option<ProtectionExpiry>,
}

impl Default for AllPagesOptions {
    fn default() -> Self {
        AllPagesOptions {
            limit: 10,
            direction: None,
            continue_from: None,
            to: None,
            prefix: None,
            namespace: None,
            redirects: None,
            min_size: None,
            max_size: None,
            protection_types: Vec::new(),
            protection_levels: Vec::new(),
            protection_cascade: None,
            language_links: None,
            protection_expiry: None,
        }
    }
}
