use geo::{ChamberlainDuquetteArea, Distance, Haversine};

/// Mean Earth radius in meters, the one geo's haversine uses
pub const MEAN_EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Great-circle distance in meters between two points (x = lon, y = lat)
///
/// Haversine on a sphere of radius [`MEAN_EARTH_RADIUS_M`]. NaN in either
/// input yields NaN.
pub fn haversine_m(from: geo::Point<f64>, to: geo::Point<f64>) -> f64 {
    Haversine::distance(from, to)
}

/// Surface area in km² of the lat/lon box bounded by the given edges
///
/// A box whose `east` edge is numerically smaller than `west` is taken to
/// cross the antimeridian; its east edge is shifted by 360° first.
/// Spherical area from geo's Chamberlain-Duquette algorithm, which uses the
/// equatorial radius.
pub fn lat_lon_box_area_km2(south: f64, north: f64, west: f64, east: f64) -> f64 {
    let east = if east < west { east + 360.0 } else { east };

    let rect = geo::Rect::new(
        geo::coord! { x: west, y: south },
        geo::coord! { x: east, y: north },
    );

    rect.to_polygon().chamberlain_duquette_unsigned_area() / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> geo::Point<f64> {
        geo::Point::new(lon, lat)
    }

    fn new_york() -> geo::Point<f64> {
        point(40.7128, -74.0060)
    }

    fn los_angeles() -> geo::Point<f64> {
        point(34.0522, -118.2437)
    }

    #[test]
    fn test_haversine_known_distance() {
        let km = haversine_m(new_york(), los_angeles()) / 1000.0;
        assert!((km - 3936.0).abs() < 39.36, "got {km} km");
    }

    #[test]
    fn test_haversine_symmetric() {
        let a = haversine_m(new_york(), los_angeles());
        let b = haversine_m(los_angeles(), new_york());
        assert!((a - b).abs() < 1e-6);
    }

    #[test]
    fn test_haversine_zero_for_same_point() {
        assert_eq!(haversine_m(new_york(), new_york()), 0.0);
    }

    #[test]
    fn test_haversine_uses_mean_radius() {
        // A quarter of the equator
        let d = haversine_m(point(0.0, 0.0), point(0.0, 90.0));
        let quarter = std::f64::consts::FRAC_PI_2 * MEAN_EARTH_RADIUS_M;
        assert!((d - quarter).abs() < 1.0, "got {d} m");
    }

    #[test]
    fn test_haversine_nan_propagates() {
        assert!(haversine_m(point(f64::NAN, 0.0), point(1.0, 1.0)).is_nan());
    }

    #[test]
    fn test_box_area_one_degree_at_equator() {
        // 1° x 1° at the equator ≈ 111.3 km x 110.6 km
        let area = lat_lon_box_area_km2(0.0, 1.0, 0.0, 1.0);
        assert!((area - 12_391.0).abs() < 25.0, "got {area} km²");
    }

    #[test]
    fn test_box_area_across_antimeridian() {
        let wrapped = lat_lon_box_area_km2(0.0, 1.0, 179.5, -179.5);
        let plain = lat_lon_box_area_km2(0.0, 1.0, 0.0, 1.0);
        assert!((wrapped - plain).abs() / plain < 1e-6);
    }
}
