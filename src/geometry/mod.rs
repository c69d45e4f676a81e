pub mod distance;
pub mod reduce;

pub use distance::{MEAN_EARTH_RADIUS_M, haversine_m, lat_lon_box_area_km2};
pub use reduce::{reduce_locations, sort_by_distance, sort_by_importance};
