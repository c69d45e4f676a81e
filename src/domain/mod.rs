pub mod location;

pub use location::{BoundingBox, Location, OsmType, PlaceGeometry, valid_coordinates};
