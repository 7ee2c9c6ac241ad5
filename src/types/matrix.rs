use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixData {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub origin_addresses: Vec<String>,
    #[serde(default)]
    pub destination_addresses: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl MatrixData {
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Element for the `origin`-th origin and `destination`-th destination.
    pub fn element(&self, origin: usize, destination: usize) -> Option<&Element> {
        self.rows.get(origin)?.elements.get(destination)
    }

    /// Iterate `(origin address, destination address, element)` triples.
    ///
    /// Addresses are empty strings when the response omits them.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str, &Element)> + '_ {
        self.rows.iter().enumerate().flat_map(move |(i, row)| {
            let origin = self.origin_addresses.get(i).map(String::as_str).unwrap_or("");
            row.elements.iter().enumerate().map(move |(j, element)| {
                let destination = self
                    .destination_addresses
                    .get(j)
                    .map(String::as_str)
                    .unwrap_or("");
                (origin, destination, element)
            })
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    #[serde(default)]
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub status: ElementStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<TextValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<TextValue>,
    /// Only present for driving requests with a departure time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_in_traffic: Option<TextValue>,
    /// Only present for some transit routes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fare: Option<Fare>,
}

impl Element {
    pub fn is_ok(&self) -> bool {
        self.status == ElementStatus::Ok
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElementStatus {
    Ok,
    NotFound,
    ZeroResults,
    MaxRouteLengthExceeded,
    #[serde(other)]
    Unknown,
}

/// A human-readable rendering plus its value in base units
/// (meters for distances, seconds for durations).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextValue {
    pub text: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fare {
    pub currency: String,
    pub value: f64,
    pub text: String,
}
