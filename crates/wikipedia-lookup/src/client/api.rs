use url::Url;

use super::WikipediaClient;
use crate::document::PageDocument;
use crate::error::{LookupError, not_found_as_none};
use crate::listing::{AllPagesOptions, CategoryMembersOptions, Listing};
use crate::page::{Entry, EntryDetail, EntryWithId, PageTitle, Section, TextFormat, TextSource};
use crate::query::Query;
use crate::response::{
    AllPagesBody, CategoryMembersBody, PagesBody, ParseResponse, QueryResponse, RawPage,
};

/// `https://<code>.wikipedia.org/wiki/<escaped title>`
pub fn language_link(code: &str, title: &str) -> Result<Url, LookupError> {
    let mut url = Url::parse(format!("https://{code}.wikipedia.org/wiki/").as_str())?;

    url.path_segments_mut()
        .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .push(title);

    Ok(url)
}

impl WikipediaClient {
    fn log_missing(&self, title: &str, query: &Query) {
        log::error!(
            "No page titled '{title}' was found ({})",
            self.query_url(query)
        );
    }

    /// Existing pages matching `query`, with the sentinel entries dropped
    fn resolved_pages(&self, query: &Query) -> Result<Vec<RawPage>, LookupError> {
        let response: QueryResponse<PagesBody> = self.get_json(query)?;

        Ok(response
            .into_body()
            .map(|body| body.resolved().collect())
            .unwrap_or_default())
    }

    /// The first existing page for a single-title query, logging when there is none
    fn resolved_page(&self, title: &str, query: &Query) -> Result<Option<RawPage>, LookupError> {
        let page = self.resolved_pages(query)?.into_iter().next();

        if page.is_none() {
            self.log_missing(title, query);
        }

        Ok(page)
    }

    /// Full info and redirects for `key`. An empty result means nothing matched.
    pub fn resolve_entries(&self, key: &str) -> Result<Vec<EntryDetail>, LookupError> {
        self.resolved_pages(&Query::entry_info(key))?
            .into_iter()
            .map(RawPage::into_detail)
            .collect()
    }

    /// The plain text introduction of a page
    pub fn summary(&self, page: &impl PageTitle) -> Result<Option<String>, LookupError> {
        let query = Query::summary(page.title());

        Ok(self
            .resolved_page(page.title(), &query)?
            .map(RawPage::into_extract))
    }

    /// Links to the same page on other language editions
    pub fn other_languages(&self, page: &impl PageTitle) -> Result<Option<Vec<Url>>, LookupError> {
        let query = Query::language_links(page.title());

        let Some(page) = self.resolved_page(page.title(), &query)? else {
            return Ok(None);
        };

        page.into_language_links()
            .into_iter()
            .map(|link| language_link(&link.lang, &link.title))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    /// Render a page or a single section. `None` when the page doesn't exist.
    pub fn text(
        &self,
        source: &impl TextSource,
        format: TextFormat,
    ) -> Result<Option<String>, LookupError> {
        let query = source.text_query(format);

        let Some(response) = not_found_as_none(self.get_json::<ParseResponse>(&query))? else {
            self.log_missing(query.get("page").unwrap_or_default(), &query);
            return Ok(None);
        };

        let parse = response.parse;

        let content = match format {
            TextFormat::Text => parse.text,
            TextFormat::Wikitext => parse.wikitext,
        };

        content
            .map(|content| Some(content.content))
            .ok_or(LookupError::MissingField {
                title: parse.title,
                field: format.as_str(),
            })
    }

    pub fn fetch_sections(&self, title: &str) -> Result<Option<Vec<Section>>, LookupError> {
        let query = Query::sections(title);

        let sections = not_found_as_none(self.get_json::<ParseResponse>(&query))?
            .map(|response| response.parse.into_sections());

        if sections.is_none() {
            self.log_missing(title, &query);
        }

        Ok(sections)
    }

    pub fn fetch_categories(&self, title: &str) -> Result<Option<Vec<Entry>>, LookupError> {
        let query = Query::categories(title);

        Ok(self
            .resolved_page(title, &query)?
            .map(RawPage::into_categories))
    }

    pub fn fetch_document(&self, url: &Url) -> Result<PageDocument, LookupError> {
        let source = self.get_text(url)?;

        Ok(PageDocument::parse(url.clone(), &source))
    }

    /// Pages in a category. A subject that isn't a category gets an empty
    /// listing without any request being made.
    pub fn category_members(
        &self,
        category: &impl PageTitle,
        options: &CategoryMembersOptions,
    ) -> Result<Listing<EntryWithId>, LookupError> {
        if !category.is_category() {
            log::error!("The page '{}' is not a category", category.title());
            return Ok(Listing::empty());
        }

        let query = Query::category_members(category.title(), options);

        Ok(self
            .get_json::<QueryResponse<CategoryMembersBody>>(&query)?
            .into_listing())
    }

    /// Pages that follow `page` in title order
    pub fn all_pages(
        &self,
        page: &impl PageTitle,
        options: &AllPagesOptions,
    ) -> Result<Listing<EntryWithId>, LookupError> {
        let query = Query::all_pages(page.title(), options);

        Ok(self
            .get_json::<QueryResponse<AllPagesBody>>(&query)?
            .into_listing())
    }
}

#[cfg(test)]
mod test {
    use super::language_link;

    #[test]
    fn language_links_are_escaped() {
        assert_eq!(
            language_link("fr", "Pomme de terre").unwrap().as_str(),
            "https://fr.wikipedia.org/wiki/Pomme%20de%20terre"
        );
        assert_eq!(
            language_link("de", "Kartoffel").unwrap().as_str(),
            "https://de.wikipedia.org/wiki/Kartoffel"
        );
    }
}
