use scraper::{Html, Selector};
use url::Url;

/// Class of the "(Redirected from ...)" note MediaWiki renders under the heading
const REDIRECT_MARKER: &str = "span.mw-redirectedfrom";

const FIRST_HEADING: &str = "h1#firstHeading";

/// A rendered page, as served from the entry's full URL
#[derive(Debug)]
pub struct PageDocument {
    url: Url,
    html: Html,
}

impl PageDocument {
    pub fn parse(url: Url, source: &str) -> Self {
        PageDocument {
            url,
            html: Html::parse_document(source),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    /// The `src` of every `<img>`, in document order. Images without one
    /// are kept as `None` so they still count.
    pub fn image_sources(&self) -> Vec<Option<String>> {
        let selector = Selector::parse("img").expect("Failed to compile image selector");

        self.html
            .select(&selector)
            .map(|image| image.value().attr("src").map(str::to_string))
            .collect()
    }

    pub fn first_heading(&self) -> Option<String> {
        let selector = Selector::parse(FIRST_HEADING).expect("Failed to compile heading selector");

        self.html
            .select(&selector)
            .next()
            .map(|heading| heading.text().collect::<String>().trim().to_string())
            .filter(|heading| !heading.is_empty())
    }
}

/// The title a rendered page was redirected to, if it carries the redirect
/// marker. A page without the marker is not redirecting.
pub fn detect_redirect_target(document: &PageDocument) -> Option<String> {
    let marker = Selector::parse(REDIRECT_MARKER).expect("Failed to compile redirect selector");

    document.html.select(&marker).next()?;

    document.first_heading()
}
