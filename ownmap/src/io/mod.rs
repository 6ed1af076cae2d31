mod fetch;
pub mod http;
#[cfg(not(target_arch = "wasm32"))]
mod local;
mod resource;
pub(crate) mod runtime;

pub use fetch::{Fetch, FetchError};
pub use http::{HeaderValue, HttpFetch, HttpOptions};
#[cfg(not(target_arch = "wasm32"))]
pub use local::LocalFetch;
pub use resource::ResourceFetch;
