//! nominatim-search - Async client for the Nominatim geocoding search API
//!
//! ```no_run
//! use nominatim_search::{Location, NominatimSearch};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let nominatim = NominatimSearch::new("my-app/1.0 (ops@example.org)")?;
//! let cafes = nominatim.search("cafe, Kreuzberg, Berlin").await?;
//!
//! let here = Location::at(52.4990, 13.4180)?;
//! let nearest = NominatimSearch::sort_by_distance(&cafes, &here);
//! let spread_out = NominatimSearch::reduce_locations(&nearest, 250.0);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod geometry;

pub use api::{NominatimSearch, PolygonOutput, Query, SearchParams, Viewbox};
pub use config::ClientConfig;
pub use domain::{BoundingBox, Location, OsmType, PlaceGeometry};
pub use error::{ConfigError, ErrorKind, SearchError};
