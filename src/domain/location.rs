use geo::Intersects;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::SearchError;
use crate::geometry::{haversine_m, lat_lon_box_area_km2};

/// OpenStreetMap element kind behind a geocoding result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsmType {
    #[serde(alias = "N")]
    Node,
    #[serde(alias = "W")]
    Way,
    #[serde(alias = "R")]
    Relation,
}

impl OsmType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OsmType::Node => "node",
            OsmType::Way => "way",
            OsmType::Relation => "relation",
        }
    }

    /// Single-letter prefix Nominatim uses in OSM id lists (`N123`)
    pub fn prefix(&self) -> char {
        match self {
            OsmType::Node => 'N',
            OsmType::Way => 'W',
            OsmType::Relation => 'R',
        }
    }
}

impl fmt::Display for OsmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OsmType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "node" | "N" => Ok(OsmType::Node),
            "way" | "W" => Ok(OsmType::Way),
            "relation" | "R" => Ok(OsmType::Relation),
            other => Err(format!("unknown OSM type: {other}")),
        }
    }
}

/// Lat/lon extent of a result, in Nominatim's native order
///
/// Serialized as `[south, north, west, east]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

impl From<[f64; 4]> for BoundingBox {
    fn from([south, north, west, east]: [f64; 4]) -> Self {
        Self {
            south,
            north,
            west,
            east,
        }
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.south, b.north, b.west, b.east]
    }
}

impl BoundingBox {
    pub fn crosses_antimeridian(&self) -> bool {
        self.east < self.west
    }

    /// Surface area of the box in km²
    pub fn area_km2(&self) -> f64 {
        lat_lon_box_area_km2(self.south, self.north, self.west, self.east)
    }

    /// Whether (lat, lon) lies inside the box, edges included
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        if self.crosses_antimeridian() {
            return (self.south..=self.north).contains(&lat)
                && (lon >= self.west || lon <= self.east);
        }
        self.to_rect().intersects(&geo::coord! { x: lon, y: lat })
    }

    /// Convert to a `geo::Rect` with x = lon, y = lat
    pub fn to_rect(&self) -> geo::Rect<f64> {
        geo::Rect::new(
            geo::coord! { x: self.west, y: self.south },
            geo::coord! { x: self.east, y: self.north },
        )
    }
}

/// Outline of a place, in whichever polygon format the search asked for
///
/// Serialized under the key Nominatim uses for that format, e.g.
/// `{"geojson": {...}}` or `{"geotext": "POLYGON(...)"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaceGeometry {
    #[serde(rename = "geojson")]
    GeoJson(geojson::Geometry),
    #[serde(rename = "geokml")]
    Kml(String),
    #[serde(rename = "svg")]
    Svg(String),
    #[serde(rename = "geotext")]
    Text(String),
}

/// One geocoding match returned by Nominatim
///
/// Built once per result object (or directly, e.g. as an origin for
/// distance sorting) and not mutated afterwards. Deserializing goes through
/// the same coordinate check as [`Location::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LocationRecord")]
pub struct Location {
    pub place_id: u64,
    pub osm_type: Option<OsmType>,
    pub osm_id: u64,
    pub lat: f64,
    pub lon: f64,
    pub display_name: String,
    pub address: BTreeMap<String, String>,
    pub boundingbox: Option<BoundingBox>,
    pub class_: String,
    pub type_: String,
    pub importance: f64,
    pub icon: Option<String>,
    pub extratags: BTreeMap<String, String>,
    pub namedetails: BTreeMap<String, String>,
    /// Only present when a `polygon_*` output was requested
    pub geometry: Option<PlaceGeometry>,
}

/// Unchecked shape of a serialized [`Location`]
#[derive(Deserialize)]
struct LocationRecord {
    place_id: u64,
    #[serde(default)]
    osm_type: Option<OsmType>,
    #[serde(default)]
    osm_id: u64,
    lat: f64,
    lon: f64,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    address: BTreeMap<String, String>,
    #[serde(default)]
    boundingbox: Option<BoundingBox>,
    #[serde(default)]
    class_: String,
    #[serde(default)]
    type_: String,
    #[serde(default)]
    importance: f64,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    extratags: BTreeMap<String, String>,
    #[serde(default)]
    namedetails: BTreeMap<String, String>,
    #[serde(default)]
    geometry: Option<PlaceGeometry>,
}

impl TryFrom<LocationRecord> for Location {
    type Error = SearchError;

    fn try_from(record: LocationRecord) -> Result<Self, Self::Error> {
        let mut location = Location::new(record.place_id, record.lat, record.lon)?;
        location.osm_type = record.osm_type;
        location.osm_id = record.osm_id;
        location.display_name = record.display_name;
        location.address = record.address;
        location.boundingbox = record.boundingbox;
        location.class_ = record.class_;
        location.type_ = record.type_;
        location.importance = record.importance;
        location.icon = record.icon;
        location.extratags = record.extratags;
        location.namedetails = record.namedetails;
        location.geometry = record.geometry;
        Ok(location)
    }
}

/// Latitude within ±90°, longitude within ±180°, both finite
pub fn valid_coordinates(lat: f64, lon: f64) -> bool {
    lat.is_finite()
        && lon.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lon)
}

impl Location {
    /// Create a location with the given id and coordinates; everything else empty
    pub fn new(place_id: u64, lat: f64, lon: f64) -> Result<Self, SearchError> {
        if !valid_coordinates(lat, lon) {
            return Err(SearchError::InvalidLocation { lat, lon });
        }

        Ok(Self {
            place_id,
            osm_type: None,
            osm_id: 0,
            lat,
            lon,
            display_name: String::new(),
            address: BTreeMap::new(),
            boundingbox: None,
            class_: String::new(),
            type_: String::new(),
            importance: 0.0,
            icon: None,
            extratags: BTreeMap::new(),
            namedetails: BTreeMap::new(),
            geometry: None,
        })
    }

    /// A bare coordinate, typically used as the origin for [`sort_by_distance`](crate::geometry::sort_by_distance)
    pub fn at(lat: f64, lon: f64) -> Result<Self, SearchError> {
        Self::new(0, lat, lon)
    }

    /// Great-circle distance to `other` in meters
    ///
    /// Haversine on a sphere of radius 6,371,008.8 m, geo's mean Earth
    /// radius. NaN coordinates, only reachable by mutating the public
    /// fields, give NaN.
    pub fn distance_to(&self, other: &Location) -> f64 {
        haversine_m(self.point(), other.point())
    }

    /// Area of the bounding box in km², if the result carried one
    pub fn area_km2(&self) -> Option<f64> {
        self.boundingbox.as_ref().map(BoundingBox::area_km2)
    }

    pub fn point(&self) -> geo::Point<f64> {
        geo::Point::new(self.lon, self.lat)
    }

    /// All attributes as a flat JSON object with stable key names
    pub fn to_dict(&self) -> Map<String, Value> {
        let mut dict = Map::new();
        dict.insert("place_id".into(), self.place_id.into());
        dict.insert(
            "osm_type".into(),
            self.osm_type.map_or(Value::Null, |t| t.as_str().into()),
        );
        dict.insert("osm_id".into(), self.osm_id.into());
        dict.insert("lat".into(), self.lat.into());
        dict.insert("lon".into(), self.lon.into());
        dict.insert("display_name".into(), self.display_name.clone().into());
        dict.insert("address".into(), string_map(&self.address));
        dict.insert(
            "boundingbox".into(),
            self.boundingbox
                .map_or(Value::Null, |b| <[f64; 4]>::from(b).to_vec().into()),
        );
        dict.insert("class_".into(), self.class_.clone().into());
        dict.insert("type_".into(), self.type_.clone().into());
        dict.insert("importance".into(), self.importance.into());
        dict.insert("icon".into(), self.icon.clone().into());
        dict.insert("extratags".into(), string_map(&self.extratags));
        dict.insert("namedetails".into(), string_map(&self.namedetails));
        dict.insert(
            "geometry".into(),
            self.geometry
                .as_ref()
                .and_then(|g| serde_json::to_value(g).ok())
                .unwrap_or(Value::Null),
        );
        dict
    }
}

fn string_map(map: &BTreeMap<String, String>) -> Value {
    Value::Object(
        map.iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect(),
    )
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.to_dict()).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
