//! Resource identifiers as exposed over the API (`/api/properties/42`).
//!
//! Relationship fields in request bodies carry IRIs that must point into the
//! right collection. The upload form only looks at the trailing segment.

pub const PROPERTIES: &str = "/api/properties";
pub const OPTIONS: &str = "/api/options";
pub const MEDIA_OBJECTS: &str = "/api/media_objects";

pub fn property(id: i32) -> String {
    format!("{PROPERTIES}/{id}")
}

pub fn options(id: i32) -> String {
    format!("{OPTIONS}/{id}")
}

pub fn media_object(id: i32) -> String {
    format!("{MEDIA_OBJECTS}/{id}")
}

/// Last `/`-separated segment of an IRI, e.g. `"42"` for `/api/properties/42`.
///
/// A bare id (`"42"`) is its own trailing segment.
pub fn trailing_segment(iri: &str) -> &str {
    iri.rsplit('/').next().unwrap_or(iri)
}

/// Resolve an IRI into `collection` (e.g. [`OPTIONS`]) to its id.
///
/// A bare id is accepted as-is; anything with a path must sit directly under
/// `collection`, so `/api/properties/3` does not name option 3.
pub fn parse_in(collection: &str, iri: &str) -> Option<i32> {
    let iri = iri.trim();
    match iri.rsplit_once('/') {
        None => iri.parse().ok(),
        Some((prefix, id)) if prefix.ends_with(collection) => id.parse().ok(),
        Some(_) => None,
    }
}
