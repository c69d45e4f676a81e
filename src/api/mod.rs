pub mod params;
pub mod response;
pub mod search;

pub use params::{PolygonOutput, Query, SearchParams, Viewbox};
pub use response::parse_search_response;
pub use search::NominatimSearch;
