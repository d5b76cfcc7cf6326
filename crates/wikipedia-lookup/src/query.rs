use itertools::Itertools;
use url::form_urlencoded::byte_serialize;

use crate::listing::{AllPagesOptions, CategoryMembersOptions, SortField};
use crate::page::TextFormat;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Param {
    Pair(&'static str, String),
    /// Serialised as the bare name, no `=`
    Flag(&'static str),
}

/// The query string of one request to the action API
///
/// Parameters keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: Vec<Param>,
}

fn encode(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}

impl Query {
    fn action(action: &str) -> Self {
        Self::default().param("action", action).param("format", "json")
    }

    pub fn param(mut self, key: &'static str, value: impl ToString) -> Self {
        self.params.push(Param::Pair(key, value.to_string()));
        self
    }

    pub fn flag(mut self, key: &'static str) -> Self {
        self.params.push(Param::Flag(key));
        self
    }

    /// Add `key=value` only when there is a value
    pub fn optional(self, key: &'static str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    /// Add `key=a|b|c` only when `values` isn't empty
    pub fn piped<T: AsRef<str>>(self, key: &'static str, values: &[T]) -> Self {
        if values.is_empty() {
            return self;
        }

        let joined = values.iter().map(AsRef::as_ref).join("|");
        self.param(key, joined)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.iter().find_map(|param| match param {
            Param::Pair(name, value) if *name == key => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn has_flag(&self, key: &str) -> bool {
        self.params
            .iter()
            .any(|param| matches!(param, Param::Flag(name) if *name == key))
    }

    pub fn encode(&self) -> String {
        self.params
            .iter()
            .map(|param| match param {
                Param::Pair(key, value) => format!("{key}={}", encode(value)),
                Param::Flag(key) => (*key).to_string(),
            })
            .join("&")
    }

    pub fn entry_info(key: &str) -> Self {
        Self::action("query")
            .param("titles", key)
            .param("prop", "info|redirects")
            .param("inprop", "url|talkid")
            .param("rdlimit", "max")
    }

    pub fn summary(title: &str) -> Self {
        Self::action("query")
            .param("titles", title)
            .param("prop", "extracts")
            .flag("exintro")
            .flag("explaintext")
    }

    pub fn parse_text(title: &str, format: TextFormat) -> Self {
        Self::action("parse")
            .param("page", title)
            .param("prop", format.as_str())
    }

    pub fn parse_section(title: &str, index: &str, format: TextFormat) -> Self {
        Self::parse_text(title, format).param("section", index)
    }

    pub fn sections(title: &str) -> Self {
        Self::action("parse")
            .param("page", title)
            .param("prop", "sections")
    }

    pub fn language_links(title: &str) -> Self {
        Self::action("query")
            .param("titles", title)
            .param("prop", "langlinks")
            .param("lllimit", "max")
    }

    pub fn categories(title: &str) -> Self {
        Self::action("query")
            .param("titles", title)
            .param("prop", "categories")
            .param("cllimit", "max")
    }

    pub fn category_members(category: &str, options: &CategoryMembersOptions) -> Self {
        let mut query = Self::action("query")
            .param("list", "categorymembers")
            .param("cmtitle", category)
            .param("cmlimit", options.limit)
            .piped("cmprop", &options.properties_on_wire())
            .optional("cmsort", options.sort.map(SortField::as_str));

        // The sort key range only means something when sorting by sort key
        if options.sort == Some(SortField::SortKey) {
            query = query
                .optional("cmstarthexsortkey", options.start_hex.as_deref())
                .optional("cmendhexsortkey", options.end_hex.as_deref())
                .optional("cmstartsortkeyprefix", options.start_prefix.as_deref())
                .optional("cmendsortkeyprefix", options.end_prefix.as_deref());
        }

        query
            .optional("cmdir", options.direction.map(|dir| dir.as_str()))
            .piped(
                "cmtype",
                &options.member_types.iter().map(|kind| kind.as_str()).collect_vec(),
            )
            .piped(
                "cmnamespace",
                &options.namespaces.iter().map(ToString::to_string).collect_vec(),
            )
            .optional("cmcontinue", options.continue_from.as_deref())
    }

    pub fn all_pages(from: &str, options: &AllPagesOptions) -> Self {
        Self::action("query")
            .param("list", "allpages")
            .param("apfrom", from)
            .param("aplimit", options.limit)
            .optional("apdir", options.direction.map(|dir| dir.as_all_pages_str()))
            .optional("apcontinue", options.continue_from.as_deref())
            .optional("apto", options.to.as_deref())
            .optional("apprefix", options.prefix.as_deref())
            .optional("apnamespace", options.namespace)
            .optional("apfilterredir", options.redirects.map(|filter| filter.as_str()))
            .optional("apminsize", options.min_size)
            .optional("apmaxsize", options.max_size)
            .piped(
                "apprtype",
                &options.protection_types.iter().map(|kind| kind.as_str()).collect_vec(),
            )
            .piped(
                "apprlevel",
                &options.protection_levels.iter().map(|level| level.as_str()).collect_vec(),
            )
            .optional(
                "apprfiltercascade",
                options.protection_cascade.map(|filter| filter.as_str()),
            )
            .optional(
                "apfilterlanglinks",
                options.language_links.map(|filter| filter.as_str()),
            )
            .optional(
                "apprexpiry",
                options.protection_expiry.map(|expiry| expiry.as_str()),
            )
    }
}
