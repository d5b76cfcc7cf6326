use super::{HttpError, Transport};
use std::time::Duration;
use ureq::Agent;
use ureq::http::{HeaderMap, HeaderValue};
use url::Url;

type InnerClient = ureq::Agent;

/// [`Transport`] backed by a blocking ureq agent
pub struct UreqTransport {
    client: InnerClient,
    headers: HeaderMap<HeaderValue>,
}

impl UreqTransport {
    pub fn new(timeout: Option<Duration>, headers: HeaderMap<HeaderValue>) -> Self {
        let config = ureq::config::Config::builder()
            .max_redirects(super::CLIENT_REDIRECTS)
            .timeout_global(timeout)
            .build();

        UreqTransport {
            client: Agent::new_with_config(config),
            headers,
        }
    }
}

impl Transport for UreqTransport {
    fn get(&self, url: &Url) -> Result<Vec<u8>, HttpError> {
        let mut request = self.client.get(url.as_str());

        for (name, value) in &self.headers {
            request = request.header(name.clone(), value.clone());
        }

        request
            .call()
            .and_then(|response| response.into_body().read_to_vec())
            .map_err(|err| match err {
                ureq::Error::StatusCode(code) => HttpError::Status(code),
                ureq::Error::Timeout(_) => HttpError::Timeout,
                other => HttpError::Backend(other),
            })
    }
}
