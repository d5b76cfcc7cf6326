use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{str::FromStr, time::Duration};
use thiserror::Error;
use ureq::http::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::error::LookupError;
use crate::query::Query;

mod api;
mod native;

pub use api::language_link;
pub use native::UreqTransport;

const CLIENT_REDIRECTS: u32 = 2;

const USER_AGENT: &str = concat!(
    std::env!("CARGO_PKG_NAME"),
    "/",
    std::env!("CARGO_PKG_VERSION")
);

#[derive(Error, Debug)]
#[error("Language has no valid iso 639-1 specification")]
pub struct LanguageInvalidError;

#[derive(Error, Debug)]
pub enum HeaderError {
    #[error("{0}")]
    InvalidHeaderName(#[from] http::header::InvalidHeaderName),
    #[error("{0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),
    #[error("{0}")]
    HeaderMapMaxSizeReached(#[from] http::header::MaxSizeReached),
}

/// The errors that may occur while talking to the remote host
#[derive(Debug, Error)]
pub enum HttpError {
    /// An error from the HTTP backend (ureq)
    #[error("Error with HTTP backend: {0}")]
    Backend(#[from] ureq::Error),
    /// The request did not complete before the configured timeout
    #[error("Failed to get response before timeout")]
    Timeout,
    /// The server answered with a non-success status
    #[error("Unexpected response code: '{0}'")]
    Status(u16),
    /// Only http and https URLs are fetched
    #[error("Refusing to fetch '{0}': scheme is not http or https")]
    DisallowedScheme(Url),
    #[error("Language Invalid: {0}")]
    LanguageInvalid(#[from] LanguageInvalidError),
    #[error("Error parsing URL: {0}")]
    UrlParseError(#[from] url::ParseError),
}

impl HttpError {
    /// Whether sending the same request again could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout => true,
            Self::Status(code) => *code == 429 || (500..600).contains(code),
            Self::Backend(ureq::Error::Io(_)) => true,
            _ => false,
        }
    }
}

/// Something that can GET a URL and hand back the body
///
/// [`UreqTransport`] is the real one. Tests swap in a double through
/// [`WikipediaClient::with_transport`].
pub trait Transport: Send + Sync {
    fn get(&self, url: &Url) -> Result<Vec<u8>, HttpError>;
}

pub struct WikipediaClientConfig {
    timeout: Option<Duration>,
    // Only non defaults
    headers: HeaderMap<HeaderValue>,
    language: isolang::Language,
    api_url: Option<Url>,
}

impl WikipediaClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_agent(self, user_agent: impl std::fmt::Display) -> Result<Self, HeaderError> {
        self.add_header(http::header::USER_AGENT, user_agent)
    }

    pub fn timeout(self, timeout: Option<Duration>) -> Self {
        Self { timeout, ..self }
    }

    pub fn language(self, language: isolang::Language) -> Self {
        Self { language, ..self }
    }

    /// Use a fixed endpoint instead of the one derived from the language
    pub fn api_url(self, api_url: Url) -> Self {
        Self {
            api_url: Some(api_url),
            ..self
        }
    }

    pub fn add_header(
        mut self,
        name: impl std::fmt::Display,
        value: impl std::fmt::Display,
    ) -> Result<Self, HeaderError> {
        self.headers.try_insert(
            HeaderName::from_str(name.to_string().as_str())?,
            HeaderValue::from_str(value.to_string().as_str())?,
        )?;

        Ok(self)
    }

    fn endpoint(&self) -> Result<Url, LanguageInvalidError> {
        match &self.api_url {
            Some(url) => Ok(url.clone()),
            None => wikipedia_api_with_language(self.language),
        }
    }
}

impl Default for WikipediaClientConfig {
    fn default() -> Self {
        WikipediaClientConfig {
            language: isolang::Language::Eng,
            timeout: Some(Duration::from_secs(5)),
            headers: HeaderMap::new(),
            api_url: None,
        }
        .user_agent(USER_AGENT)
        .expect("Default headers are invalid")
    }
}

// Some langs don't have an iso 639-1
pub fn wikipedia_api_with_language(language: isolang::Language) -> Result<Url, LanguageInvalidError> {
    let code = language.to_639_1().ok_or(LanguageInvalidError)?;

    Url::parse(format!("https://{code}.wikipedia.org/w/api.php").as_str())
        .map_err(|_| LanguageInvalidError)
}

/// A blocking client for the MediaWiki action API of one wiki
pub struct WikipediaClient {
    transport: Box<dyn Transport>,
    api_url: Url,
}

impl WikipediaClient {
    pub fn from_config(config: WikipediaClientConfig) -> Result<Self, HttpError> {
        let api_url = config.endpoint()?;

        Ok(WikipediaClient {
            transport: Box::new(UreqTransport::new(config.timeout, config.headers)),
            api_url,
        })
    }

    /// Build a client that sends every request through `transport`
    pub fn with_transport(
        config: WikipediaClientConfig,
        transport: impl Transport + 'static,
    ) -> Result<Self, HttpError> {
        Ok(WikipediaClient {
            transport: Box::new(transport),
            api_url: config.endpoint()?,
        })
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// The full request URL for `query` against this client's endpoint
    pub fn query_url(&self, query: &Query) -> Url {
        let mut url = self.api_url.clone();
        url.set_query(Some(query.encode().as_str()));
        url
    }

    /// GET `url`, refusing anything that isn't http(s)
    pub fn get_bytes(&self, url: &Url) -> Result<Vec<u8>, HttpError> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(HttpError::DisallowedScheme(url.clone()));
        }

        log::info!("Request URL: {url}");

        self.transport.get(url)
    }

    pub fn get_text(&self, url: &Url) -> Result<String, LookupError> {
        let bytes = self.get_bytes(url)?;

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Send `query` and deserialise the response, surfacing the API's own
    /// error envelope as [`LookupError::Api`]
    pub(crate) fn get_json<T: DeserializeOwned>(&self, query: &Query) -> Result<T, LookupError> {
        let url = self.query_url(query);

        let value: Value = serde_json::from_slice(&self.get_bytes(&url)?)?;

        if let Some(error) = value.get("error") {
            let field = |name: &str| {
                error
                    .get(name)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };

            return Err(LookupError::Api {
                code: field("code"),
                info: field("info"),
            });
        }

        Ok(serde_json::from_value(value)?)
    }
}

impl Default for WikipediaClient {
    fn default() -> Self {
        Self::from_config(WikipediaClientConfig::default())
            .expect("Default ureq client is not valid")
    }
}

#[cfg(test)]
mod test {
    use crate::{WikipediaClient, WikipediaClientConfig};
    use url::Url;

    #[test]
    fn default_client_config_is_valid() {
        let config = WikipediaClientConfig::default();

        let client = WikipediaClient::from_config(config).expect("Default configuration is invalid");

        assert_eq!(client.api_url().as_str(), "https://en.wikipedia.org/w/api.php");
    }

    #[test]
    fn api_url_overrides_language() {
        let config = WikipediaClientConfig::default()
            .language(isolang::Language::from_639_1("de").expect("'de' is a valid iso code"))
            .api_url(Url::parse("http://localhost:8080/w/api.php").unwrap());

        let client = WikipediaClient::from_config(config).unwrap();

        assert_eq!(client.api_url().host_str(), Some("localhost"));
    }

    #[test]
    fn bad_header_is_rejected() {
        assert!(WikipediaClientConfig::default()
            .add_header("bad header", "value")
            .is_err());
    }

    #[test]
    fn data_urls_are_refused() {
        let client = WikipediaClient::default();
        let url = Url::parse("data:image/png;base64,AAAA").unwrap();

        assert!(matches!(
            client.get_bytes(&url),
            Err(crate::HttpError::DisallowedScheme(_))
        ));
    }

    #[test]
    fn client_can_be_shared_between_threads() {
        fn shareable<T: Send + Sync>() {}

        shareable::<WikipediaClient>();
    }

    #[test]
    fn retryable_errors() {
        use crate::HttpError;

        assert!(HttpError::Timeout.is_retryable());
        assert!(HttpError::Status(429).is_retryable());
        assert!(HttpError::Status(503).is_retryable());
        assert!(
            HttpError::Backend(ureq::Error::Io(std::io::Error::other("connection reset")))
                .is_retryable()
        );

        assert!(!HttpError::Status(404).is_retryable());
        assert!(!HttpError::Status(400).is_retryable());
        assert!(
            !HttpError::DisallowedScheme(Url::parse("data:,x").unwrap()).is_retryable()
        );
    }

    mod language {
        use isolang::Language;

        use crate::client::wikipedia_api_with_language;

        const TEST_LANGUAGES: [(&str, &str); 20] = [
            ("ar", "Arabic"),
            ("da", "Danish"),
            ("de", "German"),
            ("el", "Greek"),
            ("en", "English"),
            ("eo", "Esperanto"),
            ("es", "Spanish"),
            ("fr", "French"),
            ("he", "Hebrew"),
            ("hi", "Hindi"),
            ("is", "Icelandic"),
            ("it", "Italian"),
            ("ko", "Korean"),
            ("la", "Latin"),
            ("nv", "Navajo"),
            ("pt", "Portuguese"),
            ("ru", "Russian"),
            ("sv", "Swedish"),
            ("to", "Tongan"),
            ("zh", "Chinese"),
        ];

        #[test]
        fn languages_are_valid() {
            for (iso, name) in TEST_LANGUAGES {
                let url = wikipedia_api_with_language(
                    Language::from_639_1(iso)
                        .unwrap_or_else(|| panic!("Iso code '{iso}' is invalid")),
                )
                .unwrap_or_else(|_| panic!("Language '{name}' has no iso 639-1 code"));

                assert!(
                    url.host_str().is_some_and(|host| {
                        host.starts_with(iso) && host.ends_with("wikipedia.org")
                    }),
                    "Url does not start with the respective iso code"
                );
                assert_eq!(url.path(), "/w/api.php");
            }
        }
    }
}
