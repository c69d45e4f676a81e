use serde::Deserialize;
use std::collections::BTreeMap;

use crate::domain::{BoundingBox, Location, OsmType, PlaceGeometry, valid_coordinates};
use crate::error::SearchError;

/// Nominatim sends coordinates as strings; accept plain numbers as well
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    fn value(&self) -> Option<f64> {
        match self {
            Coordinate::Number(n) => Some(*n),
            Coordinate::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// One element of the JSON array returned by `/search`
///
/// Field names follow the wire format. `class` (or `category` in `jsonv2`)
/// and `type` are mapped onto `Location::class_` / `Location::type_`.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    #[serde(default)]
    place_id: u64,
    #[serde(default)]
    osm_type: Option<OsmType>,
    #[serde(default)]
    osm_id: u64,
    lat: Option<Coordinate>,
    lon: Option<Coordinate>,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    address: Option<BTreeMap<String, String>>,
    #[serde(default)]
    boundingbox: Option<[Coordinate; 4]>,
    #[serde(default, rename = "class", alias = "category")]
    class_: Option<String>,
    #[serde(default, rename = "type")]
    type_: Option<String>,
    #[serde(default)]
    importance: Option<f64>,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    extratags: Option<BTreeMap<String, String>>,
    #[serde(default)]
    namedetails: Option<BTreeMap<String, String>>,
    #[serde(default)]
    geojson: Option<geojson::Geometry>,
    #[serde(default)]
    geokml: Option<String>,
    #[serde(default)]
    svg: Option<String>,
    #[serde(default)]
    geotext: Option<String>,
}

impl NominatimPlace {
    /// Nominatim answers with at most one of the polygon outputs
    fn take_geometry(&mut self) -> Option<PlaceGeometry> {
        if let Some(geojson) = self.geojson.take() {
            return Some(PlaceGeometry::GeoJson(geojson));
        }
        self.geokml
            .take()
            .map(PlaceGeometry::Kml)
            .or_else(|| self.svg.take().map(PlaceGeometry::Svg))
            .or_else(|| self.geotext.take().map(PlaceGeometry::Text))
    }
}

impl TryFrom<NominatimPlace> for Location {
    type Error = SearchError;

    fn try_from(mut place: NominatimPlace) -> Result<Self, Self::Error> {
        let geometry = place.take_geometry();
        let invalid = |reason: String| SearchError::InvalidPlace {
            place_id: place.place_id,
            reason,
        };

        let lat = place
            .lat
            .as_ref()
            .and_then(Coordinate::value)
            .ok_or_else(|| invalid("missing or non-numeric lat".to_string()))?;
        let lon = place
            .lon
            .as_ref()
            .and_then(Coordinate::value)
            .ok_or_else(|| invalid("missing or non-numeric lon".to_string()))?;
        if !valid_coordinates(lat, lon) {
            return Err(invalid(format!("coordinates out of range: {lat}, {lon}")));
        }

        let boundingbox = match &place.boundingbox {
            Some([s, n, w, e]) => match (s.value(), n.value(), w.value(), e.value()) {
                (Some(south), Some(north), Some(west), Some(east)) => Some(BoundingBox {
                    south,
                    north,
                    west,
                    east,
                }),
                _ => return Err(invalid("non-numeric boundingbox".to_string())),
            },
            None => None,
        };

        Ok(Location {
            place_id: place.place_id,
            osm_type: place.osm_type,
            osm_id: place.osm_id,
            lat,
            lon,
            display_name: place.display_name,
            address: place.address.unwrap_or_default(),
            boundingbox,
            class_: place.class_.unwrap_or_default(),
            type_: place.type_.unwrap_or_default(),
            importance: place.importance.unwrap_or_default(),
            icon: place.icon,
            extratags: place.extratags.unwrap_or_default(),
            namedetails: place.namedetails.unwrap_or_default(),
            geometry,
        })
    }
}

/// Parse a `/search` response body into locations, keeping the server's order
pub fn parse_search_response(url: &str, body: &[u8]) -> Result<Vec<Location>, SearchError> {
    let places: Vec<NominatimPlace> =
        serde_json::from_slice(body).map_err(|source| SearchError::Parse {
            url: url.to_string(),
            source,
        })?;

    places.into_iter().map(Location::try_from).collect()
}
