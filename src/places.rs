//! Route endpoints and their query-string encoding.

use crate::configuration::{FieldError, ValidationErrorKind, ValidationErrors};
use crate::{Error, Result};
use std::fmt;

/// Separator between places in the `origins` / `destinations` parameters.
pub const DELIMITER: &str = "|";

/// A route endpoint: a free-form address or a coordinate pair.
#[derive(Debug, Clone, PartialEq)]
pub enum Place {
    Address(String),
    LatLng { lat: f64, lng: f64 },
}

impl Place {
    pub fn address(address: impl Into<String>) -> Self {
        Place::Address(address.into())
    }

    pub fn lat_lng(lat: f64, lng: f64) -> Self {
        Place::LatLng { lat, lng }
    }

    /// Whether a coordinate pair is finite and on the globe. Addresses always are.
    pub fn is_valid(&self) -> bool {
        match self {
            Place::Address(_) => true,
            Place::LatLng { lat, lng } => {
                (-90.0..=90.0).contains(lat) && (-180.0..=180.0).contains(lng)
            }
        }
    }

    /// Render for the query string, rounding coordinates to `scale` decimals.
    pub fn to_param(&self, scale: u32) -> String {
        match self {
            Place::Address(address) => address.clone(),
            Place::LatLng { lat, lng } => format!("{},{}", round(*lat, scale), round(*lng, scale)),
        }
    }
}

impl From<&str> for Place {
    fn from(address: &str) -> Self {
        Place::Address(address.to_string())
    }
}

impl From<String> for Place {
    fn from(address: String) -> Self {
        Place::Address(address)
    }
}

impl From<(f64, f64)> for Place {
    fn from((lat, lng): (f64, f64)) -> Self {
        Place::LatLng { lat, lng }
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Place::Address(address) => f.write_str(address),
            Place::LatLng { lat, lng } => write!(f, "{},{}", lat, lng),
        }
    }
}

fn round(value: f64, scale: u32) -> f64 {
    let factor = 10f64.powi(scale.min(15) as i32);
    (value * factor).round() / factor
}

/// Encode one endpoint list for the parameter named `field`.
///
/// With `encoded_polylines` every place must be a coordinate pair and the
/// list becomes `enc:<polyline>:`; otherwise places are joined with `|`.
pub fn encode_places(
    field: &str,
    places: &[Place],
    scale: u32,
    encoded_polylines: bool,
) -> Result<String> {
    if places.is_empty() {
        return Err(invalid(field, ValidationErrorKind::MissingPlaces, None));
    }
    if let Some(place) = places.iter().find(|p| !p.is_valid()) {
        return Err(invalid(
            field,
            ValidationErrorKind::InvalidCoordinate,
            Some(place.to_string()),
        ));
    }

    if !encoded_polylines {
        let parts: Vec<String> = places.iter().map(|p| p.to_param(scale)).collect();
        return Ok(parts.join(DELIMITER));
    }

    let mut points = Vec::with_capacity(places.len());
    for place in places {
        match place {
            Place::LatLng { lat, lng } => points.push((*lat, *lng)),
            Place::Address(address) => {
                return Err(invalid(
                    field,
                    ValidationErrorKind::AddressNotEncodable,
                    Some(address.clone()),
                ))
            }
        }
    }
    Ok(format!("enc:{}:", encode_polyline(&points)))
}

fn invalid(field: &str, kind: ValidationErrorKind, value: Option<String>) -> Error {
    let mut errors = ValidationErrors::new();
    errors.push(FieldError::new(field, kind, value));
    Error::Validation(errors)
}

/// Encode coordinates with the polyline algorithm (precision 1e5).
///
/// Points are expected to be valid coordinates; anything else encodes to
/// garbage but never panics.
pub fn encode_polyline(points: &[(f64, f64)]) -> String {
    let mut out = String::new();
    let (mut prev_lat, mut prev_lng) = (0i64, 0i64);
    for (lat, lng) in points {
        let lat = (lat * 1e5).round() as i64;
        let lng = (lng * 1e5).round() as i64;
        encode_value(lat.wrapping_sub(prev_lat), &mut out);
        encode_value(lng.wrapping_sub(prev_lng), &mut out);
        prev_lat = lat;
        prev_lng = lng;
    }
    out
}

fn encode_value(value: i64, out: &mut String) {
    // Zigzag: sign moves to the lowest bit.
    let mut v = ((value << 1) ^ (value >> 63)) as u64;
    while v >= 0x20 {
        out.push(char::from((0x20 | (v & 0x1f)) as u8 + 63));
        v >>= 5;
    }
    out.push(char::from(v as u8 + 63));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_are_rounded_to_scale() {
        let place = Place::lat_lng(59.9138204, 10.7387413);
        assert_eq!(place.to_param(5), "59.91382,10.73874");
        assert_eq!(place.to_param(2), "59.91,10.74");
        assert_eq!(Place::lat_lng(10.0, -3.5).to_param(5), "10,-3.5");
    }

    #[test]
    fn addresses_are_rendered_verbatim() {
        assert_eq!(Place::from("Karl Johans gate, Oslo").to_param(5), "Karl Johans gate, Oslo");
    }

    #[test]
    fn plain_places_are_joined_with_delimiter() {
        let places = vec![Place::from("Oslo"), Place::lat_lng(1.0, 2.0)];
        assert_eq!(encode_places("origins", &places, 5, false).unwrap(), "Oslo|1,2");
    }

    #[test]
    fn polyline_reference_example() {
        let points = [(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)];
        assert_eq!(encode_polyline(&points), "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
    }

    #[test]
    fn encoded_places_are_wrapped() {
        let places = vec![Place::lat_lng(38.5, -120.2)];
        assert_eq!(encode_places("origins", &places, 5, true).unwrap(), "enc:_p~iF~ps|U:");
    }

    #[test]
    fn addresses_cannot_be_polyline_encoded() {
        let places = vec![Place::lat_lng(38.5, -120.2), Place::from("Oslo")];
        match encode_places("destinations", &places, 5, true) {
            Err(Error::Validation(errors)) => {
                let error = errors.iter().next().unwrap();
                assert_eq!(error.field, "destinations");
                assert_eq!(error.kind, ValidationErrorKind::AddressNotEncodable);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn off_globe_coordinates_are_rejected() {
        let bad = [
            Place::lat_lng(f64::INFINITY, 0.0),
            Place::lat_lng(f64::NAN, 10.0),
            Place::lat_lng(90.5, 0.0),
            Place::lat_lng(0.0, -180.01),
        ];
        for place in bad {
            for encoded in [false, true] {
                match encode_places("origins", &[Place::from((1.0, 2.0)), place.clone()], 5, encoded) {
                    Err(Error::Validation(errors)) => {
                        let error = errors.iter().next().unwrap();
                        assert_eq!(error.kind, ValidationErrorKind::InvalidCoordinate);
                        assert_eq!(error.value, Some(place.to_string()));
                    }
                    other => panic!("{place} (encoded: {encoded}): {:?}", other),
                }
            }
        }
        assert!(Place::lat_lng(-90.0, 180.0).is_valid());
    }

    #[test]
    fn polyline_encoding_never_panics() {
        let extremes = [
            (f64::INFINITY, f64::NEG_INFINITY),
            (f64::NEG_INFINITY, f64::NAN),
            (1e300, -1e300),
        ];
        assert!(!encode_polyline(&extremes).is_empty());
    }

    #[test]
    fn empty_lists_are_rejected() {
        assert!(matches!(
            encode_places("origins", &[], 5, false),
            Err(Error::Validation(_))
        ));
    }
}
