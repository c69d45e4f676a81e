use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::error::SearchError;

/// Output format requested from Nominatim. Responses are always parsed as JSON.
pub const OUTPUT_FORMAT: &str = "jsonv2";
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 40;

/// Outline format requested through one of the `polygon_*` parameters
///
/// The response stays a JSON array; each place gains the matching key
/// (`geojson`, `geokml`, `svg` or `geotext`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonOutput {
    GeoJson,
    Kml,
    Svg,
    Text,
}

impl PolygonOutput {
    pub fn param_name(&self) -> &'static str {
        match self {
            PolygonOutput::GeoJson => "polygon_geojson",
            PolygonOutput::Kml => "polygon_kml",
            PolygonOutput::Svg => "polygon_svg",
            PolygonOutput::Text => "polygon_text",
        }
    }

    fn from_param_name(name: &str) -> Option<Self> {
        match name {
            "polygon_geojson" => Some(PolygonOutput::GeoJson),
            "polygon_kml" => Some(PolygonOutput::Kml),
            "polygon_svg" => Some(PolygonOutput::Svg),
            "polygon_text" => Some(PolygonOutput::Text),
            _ => None,
        }
    }
}

/// Preferred search area as two corner points (lon1, lat1, lon2, lat2)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewbox {
    pub lon1: f64,
    pub lat1: f64,
    pub lon2: f64,
    pub lat2: f64,
}

impl FromStr for Viewbox {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let coords: Vec<f64> = s
            .split(',')
            .map(|c| c.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|_| {
                SearchError::Validation(format!(
                    "viewbox coordinates must be numbers, got \"{s}\""
                ))
            })?;

        match coords.as_slice() {
            &[lon1, lat1, lon2, lat2] => Ok(Self {
                lon1,
                lat1,
                lon2,
                lat2,
            }),
            _ => Err(SearchError::Validation(format!(
                "viewbox needs four comma-separated values, got {}",
                coords.len()
            ))),
        }
    }
}

impl fmt::Display for Viewbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.lon1, self.lat1, self.lon2, self.lat2)
    }
}

/// Query parameters for the Nominatim `/search` endpoint
///
/// Either `q` (free-form) or any of the structured address fields is set,
/// never both. Everything else shapes or restricts the output.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub q: Option<String>,
    pub amenity: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postalcode: Option<String>,

    pub addressdetails: bool,
    pub extratags: bool,
    pub namedetails: bool,
    pub accept_language: Option<String>,

    pub limit: u32,
    pub countrycodes: Vec<String>,
    pub layer: Vec<String>,
    pub feature_type: Option<String>,
    pub exclude_place_ids: Vec<u64>,
    pub viewbox: Option<Viewbox>,
    pub bounded: bool,
    pub dedupe: bool,

    /// Nominatim returns at most one outline format per request
    pub polygon: Option<PolygonOutput>,
    /// Simplification tolerance for returned outlines, in degrees
    pub polygon_threshold: Option<f64>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            q: None,
            amenity: None,
            street: None,
            city: None,
            county: None,
            state: None,
            country: None,
            postalcode: None,
            addressdetails: false,
            extratags: false,
            namedetails: false,
            accept_language: None,
            limit: DEFAULT_LIMIT,
            countrycodes: Vec::new(),
            layer: Vec::new(),
            feature_type: None,
            exclude_place_ids: Vec::new(),
            viewbox: None,
            bounded: false,
            dedupe: true,
            polygon: None,
            polygon_threshold: None,
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_flag(key: &str, value: &str) -> Result<bool, SearchError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(SearchError::Validation(format!(
            "{key} must be 0 or 1, got \"{other}\""
        ))),
    }
}

fn parse_list(value: &str) -> Vec<String> {
    trimmed_entries(value.split(','))
}

fn trimmed_entries<I, S>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    entries
        .into_iter()
        .filter_map(|e| {
            let e = e.as_ref().trim();
            (!e.is_empty()).then(|| e.to_string())
        })
        .collect()
}

impl SearchParams {
    /// Free-form query, e.g. `"Brandenburger Tor, Berlin"`
    pub fn free_text(q: impl Into<String>) -> Self {
        Self {
            q: Some(q.into()),
            ..Self::default()
        }
    }

    pub fn with_amenity(mut self, amenity: impl Into<String>) -> Self {
        self.amenity = Some(amenity.into());
        self
    }

    pub fn with_street(mut self, street: impl Into<String>) -> Self {
        self.street = Some(street.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_county(mut self, county: impl Into<String>) -> Self {
        self.county = Some(county.into());
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_postalcode(mut self, postalcode: impl Into<String>) -> Self {
        self.postalcode = Some(postalcode.into());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_addressdetails(mut self, enabled: bool) -> Self {
        self.addressdetails = enabled;
        self
    }

    pub fn with_extratags(mut self, enabled: bool) -> Self {
        self.extratags = enabled;
        self
    }

    pub fn with_namedetails(mut self, enabled: bool) -> Self {
        self.namedetails = enabled;
        self
    }

    pub fn with_accept_language(mut self, languages: impl Into<String>) -> Self {
        self.accept_language = Some(languages.into());
        self
    }

    /// Restrict results to ISO 3166-1 alpha-2 country codes
    ///
    /// Entries are trimmed and blank ones dropped.
    pub fn with_countrycodes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.countrycodes = trimmed_entries(codes);
        self
    }

    pub fn with_layer<I, S>(mut self, layers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.layer = trimmed_entries(layers);
        self
    }

    pub fn with_feature_type(mut self, feature_type: impl Into<String>) -> Self {
        self.feature_type = Some(feature_type.into());
        self
    }

    pub fn with_exclude_place_ids(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
        self.exclude_place_ids = ids.into_iter().collect();
        self
    }

    /// Prefer results inside `viewbox`; with `bounded`, only return those
    pub fn with_viewbox(mut self, viewbox: Viewbox, bounded: bool) -> Self {
        self.viewbox = Some(viewbox);
        self.bounded = bounded;
        self
    }

    pub fn with_dedupe(mut self, enabled: bool) -> Self {
        self.dedupe = enabled;
        self
    }

    /// Ask for each place's outline, returned in [`Location::geometry`](crate::Location::geometry)
    pub fn with_polygon(mut self, output: PolygonOutput) -> Self {
        self.polygon = Some(output);
        self
    }

    pub fn with_polygon_threshold(mut self, degrees: f64) -> Self {
        self.polygon_threshold = Some(degrees);
        self
    }

    fn structured_fields(&self) -> [(&'static str, &Option<String>); 7] {
        [
            ("amenity", &self.amenity),
            ("street", &self.street),
            ("city", &self.city),
            ("county", &self.county),
            ("state", &self.state),
            ("country", &self.country),
            ("postalcode", &self.postalcode),
        ]
    }

    pub fn is_structured(&self) -> bool {
        self.structured_fields()
            .iter()
            .any(|(_, v)| non_blank(v).is_some())
    }

    /// Reject queries Nominatim cannot answer meaningfully
    pub fn validate(&self) -> Result<(), SearchError> {
        let free_text = non_blank(&self.q).is_some();
        let structured = self.is_structured();

        if !free_text && !structured {
            return Err(SearchError::Validation(
                "query has no search terms".to_string(),
            ));
        }
        if free_text && structured {
            return Err(SearchError::Validation(
                "free-form q cannot be combined with structured fields".to_string(),
            ));
        }
        if !(1..=MAX_LIMIT).contains(&self.limit) {
            return Err(SearchError::Validation(format!(
                "limit must be between 1 and {MAX_LIMIT}, got {}",
                self.limit
            )));
        }
        if self.bounded && self.viewbox.is_none() {
            return Err(SearchError::Validation(
                "bounded requires a viewbox".to_string(),
            ));
        }
        if let Some(threshold) = self.polygon_threshold {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(SearchError::Validation(format!(
                    "polygon_threshold must be a non-negative number, got {threshold}"
                )));
            }
        }
        if let Some(code) = self
            .countrycodes
            .iter()
            .find(|c| c.len() != 2 || !c.chars().all(|ch| ch.is_ascii_alphabetic()))
        {
            return Err(SearchError::Validation(format!(
                "country code \"{code}\" is not ISO 3166-1 alpha-2"
            )));
        }
        Ok(())
    }

    /// Set one field by its Nominatim parameter name
    ///
    /// Field table used when a query arrives as a plain mapping.
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<(), SearchError> {
        let text = || Some(value.to_string());
        match key {
            "q" => self.q = text(),
            "amenity" => self.amenity = text(),
            "street" => self.street = text(),
            "city" => self.city = text(),
            "county" => self.county = text(),
            "state" => self.state = text(),
            "country" => self.country = text(),
            "postalcode" => self.postalcode = text(),
            "addressdetails" => self.addressdetails = parse_flag(key, value)?,
            "extratags" => self.extratags = parse_flag(key, value)?,
            "namedetails" => self.namedetails = parse_flag(key, value)?,
            "accept-language" | "accept_language" => self.accept_language = text(),
            "limit" => {
                self.limit = value.trim().parse().map_err(|_| {
                    SearchError::Validation(format!(
                        "limit must be a non-negative integer, got \"{value}\""
                    ))
                })?
            }
            "countrycodes" => self.countrycodes = parse_list(value),
            "layer" => self.layer = parse_list(value),
            "featureType" | "featuretype" | "feature_type" => self.feature_type = text(),
            "exclude_place_ids" => {
                self.exclude_place_ids = parse_list(value)
                    .iter()
                    .map(|id| id.parse::<u64>())
                    .collect::<Result<_, _>>()
                    .map_err(|_| {
                        SearchError::Validation(format!(
                            "exclude_place_ids must be comma-separated integers, got \"{value}\""
                        ))
                    })?
            }
            "viewbox" => self.viewbox = Some(value.parse()?),
            "bounded" => self.bounded = parse_flag(key, value)?,
            "dedupe" => self.dedupe = parse_flag(key, value)?,
            "polygon_geojson" | "polygon_kml" | "polygon_svg" | "polygon_text" => {
                let output = PolygonOutput::from_param_name(key);
                if parse_flag(key, value)? {
                    if self.polygon.is_some() && self.polygon != output {
                        return Err(SearchError::Validation(
                            "only one polygon output can be requested".to_string(),
                        ));
                    }
                    self.polygon = output;
                } else if self.polygon == output {
                    self.polygon = None;
                }
            }
            "polygon_threshold" => {
                self.polygon_threshold = Some(value.trim().parse().map_err(|_| {
                    SearchError::Validation(format!(
                        "polygon_threshold must be a number, got \"{value}\""
                    ))
                })?)
            }
            "json_callback" | "debug" => {
                return Err(SearchError::Validation(format!(
                    "{key} changes the response away from a JSON array and is not supported"
                )));
            }
            "format" => {
                if !matches!(value, "json" | "jsonv2") {
                    return Err(SearchError::Validation(format!(
                        "only JSON output can be parsed, got format \"{value}\""
                    )));
                }
            }
            other => {
                return Err(SearchError::Validation(format!(
                    "unknown search parameter \"{other}\""
                )));
            }
        }
        Ok(())
    }

    /// Build from `(parameter name, value)` pairs, then validate
    pub fn from_fields<I, K, V>(fields: I) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params = Self::default();
        for (key, value) in fields {
            params.set_field(key.as_ref(), value.as_ref())?;
        }
        params.validate()?;
        Ok(params)
    }

    /// Query-string pairs for the request, `format=jsonv2` included
    ///
    /// Only fields that differ from Nominatim's own defaults are emitted,
    /// except `limit`, which is always sent.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(q) = non_blank(&self.q) {
            pairs.push(("q", q.to_string()));
        }
        for (name, value) in self.structured_fields() {
            if let Some(v) = non_blank(value) {
                pairs.push((name, v.to_string()));
            }
        }

        pairs.push(("format", OUTPUT_FORMAT.to_string()));

        for (name, enabled) in [
            ("addressdetails", self.addressdetails),
            ("extratags", self.extratags),
            ("namedetails", self.namedetails),
        ] {
            if enabled {
                pairs.push((name, "1".to_string()));
            }
        }
        if let Some(lang) = non_blank(&self.accept_language) {
            pairs.push(("accept-language", lang.to_string()));
        }

        pairs.push(("limit", self.limit.to_string()));

        if !self.countrycodes.is_empty() {
            pairs.push(("countrycodes", self.countrycodes.join(",").to_lowercase()));
        }
        if !self.layer.is_empty() {
            pairs.push(("layer", self.layer.join(",")));
        }
        if let Some(feature_type) = non_blank(&self.feature_type) {
            pairs.push(("featureType", feature_type.to_string()));
        }
        if !self.exclude_place_ids.is_empty() {
            let ids: Vec<String> = self
                .exclude_place_ids
                .iter()
                .map(u64::to_string)
                .collect();
            pairs.push(("exclude_place_ids", ids.join(",")));
        }
        if let Some(viewbox) = &self.viewbox {
            pairs.push(("viewbox", viewbox.to_string()));
        }
        if self.bounded {
            pairs.push(("bounded", "1".to_string()));
        }
        if !self.dedupe {
            pairs.push(("dedupe", "0".to_string()));
        }
        if let Some(output) = self.polygon {
            pairs.push((output.param_name(), "1".to_string()));
        }
        if let Some(threshold) = self.polygon_threshold {
            pairs.push(("polygon_threshold", threshold.to_string()));
        }

        pairs
    }
}

/// Anything `search` accepts: a free-form string, a mapping of Nominatim
/// parameter names to values, or prepared [`SearchParams`]
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Text(String),
    Fields(BTreeMap<String, String>),
    Params(SearchParams),
}

impl From<&str> for Query {
    fn from(q: &str) -> Self {
        Query::Text(q.to_string())
    }
}

impl From<String> for Query {
    fn from(q: String) -> Self {
        Query::Text(q)
    }
}

impl From<&String> for Query {
    fn from(q: &String) -> Self {
        Query::Text(q.clone())
    }
}

impl From<BTreeMap<String, String>> for Query {
    fn from(fields: BTreeMap<String, String>) -> Self {
        Query::Fields(fields)
    }
}

impl From<HashMap<String, String>> for Query {
    fn from(fields: HashMap<String, String>) -> Self {
        Query::Fields(fields.into_iter().collect())
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Query {
    fn from(fields: [(&str, &str); N]) -> Self {
        Query::Fields(
            fields
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

impl From<SearchParams> for Query {
    fn from(params: SearchParams) -> Self {
        Query::Params(params)
    }
}

impl TryFrom<Query> for SearchParams {
    type Error = SearchError;

    fn try_from(query: Query) -> Result<Self, Self::Error> {
        let params = match query {
            Query::Text(q) => SearchParams::free_text(q),
            Query::Fields(fields) => return SearchParams::from_fields(fields),
            Query::Params(params) => params,
        };
        params.validate()?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn pair<'a>(pairs: &'a [(&'static str, String)], name: &str) -> Option<&'a str> {
        pairs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_free_text_pairs() {
        let pairs = SearchParams::free_text("Berlin").to_query_pairs();
        assert_eq!(pair(&pairs, "q"), Some("Berlin"));
        assert_eq!(pair(&pairs, "format"), Some("jsonv2"));
        assert_eq!(pair(&pairs, "limit"), Some("10"));
        assert_eq!(pair(&pairs, "addressdetails"), None);
        assert_eq!(pair(&pairs, "dedupe"), None);
    }

    #[test]
    fn test_structured_pairs() {
        let params = SearchParams::default()
            .with_street("Unter den Linden 1")
            .with_city("Berlin")
            .with_country("Germany")
            .with_addressdetails(true)
            .with_countrycodes(["DE", "at"])
            .with_viewbox("13.0,52.3,13.8,52.7".parse().unwrap(), true)
            .with_exclude_place_ids([1, 2])
            .with_dedupe(false)
            .with_limit(5);
        params.validate().unwrap();

        let pairs = params.to_query_pairs();
        assert_eq!(pair(&pairs, "q"), None);
        assert_eq!(pair(&pairs, "street"), Some("Unter den Linden 1"));
        assert_eq!(pair(&pairs, "city"), Some("Berlin"));
        assert_eq!(pair(&pairs, "addressdetails"), Some("1"));
        assert_eq!(pair(&pairs, "countrycodes"), Some("de,at"));
        assert_eq!(pair(&pairs, "viewbox"), Some("13,52.3,13.8,52.7"));
        assert_eq!(pair(&pairs, "bounded"), Some("1"));
        assert_eq!(pair(&pairs, "exclude_place_ids"), Some("1,2"));
        assert_eq!(pair(&pairs, "dedupe"), Some("0"));
        assert_eq!(pair(&pairs, "limit"), Some("5"));
    }

    #[test]
    fn test_validate_rejects_empty_query() {
        let err = SearchParams::default().validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = SearchParams::free_text("   ").validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_validate_rejects_mixed_query() {
        let params = SearchParams::free_text("Berlin").with_country("Germany");
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_validate_limit_range() {
        assert!(SearchParams::free_text("x").with_limit(0).validate().is_err());
        assert!(SearchParams::free_text("x").with_limit(41).validate().is_err());
        assert!(SearchParams::free_text("x").with_limit(40).validate().is_ok());
    }

    #[test]
    fn test_validate_bounded_needs_viewbox() {
        let mut params = SearchParams::free_text("cafe");
        params.bounded = true;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_validate_country_codes() {
        let params = SearchParams::free_text("Paris").with_countrycodes(["FRA"]);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_viewbox_parse() {
        let vb: Viewbox = "-0.5, 51.3, 0.3, 51.7".parse().unwrap();
        assert_eq!(vb.lon1, -0.5);
        assert_eq!(vb.lat2, 51.7);
        assert!("1,2,3".parse::<Viewbox>().is_err());
        assert!("1,2,3,north".parse::<Viewbox>().is_err());
    }

    #[test]
    fn test_query_normalization() {
        let from_text = SearchParams::try_from(Query::from("Lisbon")).unwrap();
        assert_eq!(from_text.q.as_deref(), Some("Lisbon"));

        let from_fields =
            SearchParams::try_from(Query::from([("city", "Lisbon"), ("limit", "3")])).unwrap();
        assert_eq!(from_fields.city.as_deref(), Some("Lisbon"));
        assert_eq!(from_fields.limit, 3);

        let prepared = SearchParams::default().with_postalcode("1100-148");
        let from_params = SearchParams::try_from(Query::from(prepared.clone())).unwrap();
        assert_eq!(from_params, prepared);
    }

    #[test]
    fn test_fields_reject_unknown_key_and_bad_values() {
        let err = SearchParams::from_fields([("town", "Lisbon")]).unwrap_err();
        assert!(err.to_string().contains("town"));

        assert!(SearchParams::from_fields([("q", "x"), ("addressdetails", "2")]).is_err());
        assert!(SearchParams::from_fields([("q", "x"), ("limit", "ten")]).is_err());
        assert!(SearchParams::from_fields([("q", "x"), ("format", "xml")]).is_err());
        assert!(SearchParams::from_fields([("q", "x"), ("format", "json")]).is_ok());
    }

    #[test]
    fn test_fields_flags_and_lists() {
        let params = SearchParams::from_fields([
            ("q", "pharmacy"),
            ("extratags", "true"),
            ("featureType", "city"),
            ("exclude_place_ids", "10, 20"),
            ("layer", "poi,address"),
        ])
        .unwrap();
        assert!(params.extratags);
        assert_eq!(params.feature_type.as_deref(), Some("city"));
        assert_eq!(params.exclude_place_ids, vec![10, 20]);
        assert_eq!(params.layer, vec!["poi", "address"]);
    }

    #[test]
    fn test_countrycodes_are_trimmed() {
        let params = SearchParams::free_text("Salzburg").with_countrycodes(["at", " de", " ", "ch "]);
        assert_eq!(params.countrycodes, vec!["at", "de", "ch"]);
        params.validate().unwrap();
        assert_eq!(pair(&params.to_query_pairs(), "countrycodes"), Some("at,de,ch"));
    }

    #[test]
    fn test_fields_limit_out_of_range_reports_range() {
        let err = SearchParams::from_fields([("q", "x"), ("limit", "300")]).unwrap_err();
        assert!(err.to_string().contains("between 1 and 40"), "got: {err}");

        let err = SearchParams::from_fields([("q", "x"), ("limit", "0")]).unwrap_err();
        assert!(err.to_string().contains("between 1 and 40"), "got: {err}");

        let err = SearchParams::from_fields([("q", "x"), ("limit", "-1")]).unwrap_err();
        assert!(err.to_string().contains("non-negative integer"), "got: {err}");
    }

    #[test]
    fn test_polygon_outputs() {
        let params = SearchParams::from_fields([
            ("q", "Graz"),
            ("polygon_geojson", "1"),
            ("polygon_threshold", "0.005"),
        ])
        .unwrap();
        assert_eq!(params.polygon, Some(PolygonOutput::GeoJson));

        let pairs = params.to_query_pairs();
        assert_eq!(pair(&pairs, "polygon_geojson"), Some("1"));
        assert_eq!(pair(&pairs, "polygon_threshold"), Some("0.005"));
        assert_eq!(pair(&pairs, "format"), Some("jsonv2"));

        let params = SearchParams::from_fields([("q", "Graz"), ("polygon_text", "0")]).unwrap();
        assert_eq!(params.polygon, None);
        assert_eq!(pair(&params.to_query_pairs(), "polygon_text"), None);

        let err = SearchParams::from_fields([
            ("q", "Graz"),
            ("polygon_kml", "1"),
            ("polygon_svg", "1"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("only one polygon output"));

        let params = SearchParams::free_text("Graz").with_polygon_threshold(-1.0);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_fields_reject_non_array_outputs() {
        assert!(SearchParams::from_fields([("q", "x"), ("json_callback", "cb")]).is_err());
        assert!(SearchParams::from_fields([("q", "x"), ("debug", "1")]).is_err());
        assert!(SearchParams::from_fields([("q", "x"), ("format", "geojson")]).is_err());
    }
}
