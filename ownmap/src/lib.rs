#![doc = include_str!("../README.md")]
#![deny(clippy::unwrap_used, rustdoc::broken_intra_doc_links)]

mod camera;
mod io;
mod loader;
mod map;
mod mercator;
pub mod metadata;
mod options;
mod position;
mod render;
mod session;
mod shapes;
pub mod tiling;
pub mod topology;
mod transform;
mod world;
mod zoom;

pub use camera::Camera;
pub use io::{Fetch, FetchError, HeaderValue, HttpFetch, HttpOptions, ResourceFetch};
#[cfg(not(target_arch = "wasm32"))]
pub use io::LocalFetch;
pub use loader::{LoadError, LoadState, Sources, WorldLoader, load};
pub use map::Map;
pub use mercator::{DEFAULT_SCALE_DIVISOR, MAX_LATITUDE, Projection, Viewport};
pub use options::{InvalidOptions, MapOptions};
pub use position::{Pixels, PixelsExt, Position, lat_lon, lon_lat};
pub use render::{Highlight, MapStyle, Paint, draw};
pub use session::MapSession;
pub use shapes::{CountryShape, Fill, ProjectedWorld};
pub use tiling::{MapCopy, TilePlan};
pub use transform::CameraTransform;
pub use world::{Country, CountryFeature, WorldData};
pub use zoom::{InvalidScale, ScaleExtent};
