use bytes::Bytes;

use super::{Fetch, FetchError, HttpFetch, HttpOptions};

/// Fetches `http://` and `https://` locations with [`HttpFetch`] and everything else from the
/// local filesystem. In the browser, everything goes through HTTP.
#[derive(Debug, Clone, Default)]
pub struct ResourceFetch {
    http: HttpFetch,
    #[cfg(not(target_arch = "wasm32"))]
    local: super::LocalFetch,
}

impl ResourceFetch {
    pub fn new(http_options: HttpOptions) -> Self {
        Self {
            http: HttpFetch::new(http_options),
            #[cfg(not(target_arch = "wasm32"))]
            local: super::LocalFetch::default(),
        }
    }
}

fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

impl Fetch for ResourceFetch {
    type Error = FetchError;

    #[cfg(not(target_arch = "wasm32"))]
    async fn fetch(&self, location: &str) -> Result<Bytes, Self::Error> {
        if is_url(location) {
            self.http.fetch(location).await
        } else {
            self.local.fetch(location).await
        }
    }

    #[cfg(target_arch = "wasm32")]
    async fn fetch(&self, location: &str) -> Result<Bytes, Self::Error> {
        if !is_url(location) {
            log::debug!("'{location}' is not a URL, fetching it relative to the page.");
        }
        self.http.fetch(location).await
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use hypermocker::{Mock, StatusCode};

    #[test]
    fn recognizing_urls() {
        assert!(is_url("https://cdn.jsdelivr.net/npm/world-atlas@2/countries-110m.json"));
        assert!(is_url("http://localhost:8080/countries.json"));
        assert!(!is_url("assets/countries.topo.json"));
        assert!(!is_url("/usr/share/ownmap/countries.json"));
    }

    #[tokio::test]
    async fn dispatching_by_scheme() {
        let _ = env_logger::try_init();

        let mock = Mock::bind().await.unwrap();
        mock.serve("/countries.json", StatusCode::OK, "remote");

        let fetch = ResourceFetch::default();
        let remote = fetch.fetch(&mock.url("/countries.json")).await.unwrap();
        assert_eq!(&remote[..], b"remote");

        let local = fetch
            .fetch(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/countries.meta.json"))
            .await
            .unwrap();
        assert!(local.starts_with(b"{"));
    }
}
