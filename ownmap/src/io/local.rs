use std::path::{Path, PathBuf};

use bytes::Bytes;

use super::{Fetch, FetchError};

/// Reads map data from the local filesystem. Relative locations are resolved against `root`.
#[derive(Debug, Clone, Default)]
pub struct LocalFetch {
    root: PathBuf,
}

impl LocalFetch {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().into(),
        }
    }
}

impl Fetch for LocalFetch {
    type Error = FetchError;

    async fn fetch(&self, location: &str) -> Result<Bytes, Self::Error> {
        let path = self.root.join(location);
        log::debug!("Reading '{}'.", path.display());

        match tokio::fs::read(&path).await {
            Ok(data) => Ok(data.into()),
            Err(source) => Err(FetchError::Io { path, source }),
        }
    }
}
