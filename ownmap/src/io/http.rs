use bytes::Bytes;
use reqwest::header::USER_AGENT;

use super::{Fetch, FetchError};

pub use reqwest::header::HeaderValue;

/// Controls how [`HttpFetch`] uses the HTTP protocol.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// User agent to be sent to the servers.
    ///
    /// This should be set only on native targets. The browser sets its own user agent on wasm
    /// targets, and trying to set a different one may upset some servers.
    pub user_agent: Option<HeaderValue>,
}

impl Default for HttpOptions {
    fn default() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        let user_agent = Some(HeaderValue::from_static(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION"),
        )));

        #[cfg(target_arch = "wasm32")]
        let user_agent = None;

        Self { user_agent }
    }
}

/// Downloads map data over HTTP. Any status other than success is an error.
#[derive(Debug, Clone)]
pub struct HttpFetch {
    client: reqwest::Client,
    options: HttpOptions,
}

impl HttpFetch {
    pub fn new(options: HttpOptions) -> Self {
        Self {
            client: reqwest::Client::new(),
            options,
        }
    }
}

impl Default for HttpFetch {
    fn default() -> Self {
        Self::new(HttpOptions::default())
    }
}

impl Fetch for HttpFetch {
    type Error = FetchError;

    async fn fetch(&self, location: &str) -> Result<Bytes, Self::Error> {
        log::debug!("Downloading '{location}'.");

        let mut request = self.client.get(location);
        if let Some(user_agent) = &self.options.user_agent {
            request = request.header(USER_AGENT, user_agent.clone());
        }

        let response = request.send().await?.error_for_status()?;
        Ok(response.bytes().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hypermocker::{Bytes, Mock, StatusCode, hyper::header};

    #[tokio::test]
    async fn downloading_with_default_user_agent() {
        let _ = env_logger::try_init();

        let mock = Mock::bind().await.unwrap();
        let expectation = mock.expect("/countries.json").await;
        let fetch = HttpFetch::default();

        let (result, request) = futures::future::join(
            fetch.fetch(&mock.url("/countries.json")),
            expectation.respond(Bytes::from_static(b"{}")),
        )
        .await;

        assert_eq!(&result.unwrap()[..], b"{}");
        assert_eq!(
            request.headers().get(header::USER_AGENT),
            Some(&HeaderValue::from_static(concat!(
                "ownmap/",
                env!("CARGO_PKG_VERSION")
            )))
        );
    }

    #[tokio::test]
    async fn custom_user_agent_header() {
        let _ = env_logger::try_init();

        let mock = Mock::bind().await.unwrap();
        let expectation = mock.expect("/countries.json").await;
        let fetch = HttpFetch::new(HttpOptions {
            user_agent: Some(HeaderValue::from_static("MyApp")),
        });

        let (_, request) = futures::future::join(
            fetch.fetch(&mock.url("/countries.json")),
            expectation.respond(Bytes::from_static(b"{}")),
        )
        .await;

        assert_eq!(
            request.headers().get(header::USER_AGENT),
            Some(&HeaderValue::from_static("MyApp"))
        );
    }

    #[tokio::test]
    async fn http_error_is_a_fetch_error() {
        let _ = env_logger::try_init();

        let mock = Mock::bind().await.unwrap();
        mock.serve("/gone.json", StatusCode::NOT_FOUND, "gone");

        let result = HttpFetch::default().fetch(&mock.url("/gone.json")).await;
        match result {
            Err(FetchError::Http(error)) => {
                assert_eq!(error.status(), Some(StatusCode::NOT_FOUND));
            }
            other => panic!("expected an HTTP error, got {other:?}"),
        }
    }
}
