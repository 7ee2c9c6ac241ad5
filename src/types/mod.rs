//! Typed view of a successful distance matrix response.
//!
//! The client hands back the raw JSON body; [`MatrixData`] is the
//! deserialized form for callers who want field access. Element-level
//! statuses such as `ZERO_RESULTS` describe individual origin/destination
//! pairs and are data here, never errors.
//!
//! ```rust
//! use distance_matrix::types::{ElementStatus, MatrixData};
//!
//! let body = serde_json::json!({
//!     "status": "OK",
//!     "origin_addresses": ["Oslo, Norway"],
//!     "destination_addresses": ["Bergen, Norway"],
//!     "rows": [{"elements": [{
//!         "status": "OK",
//!         "distance": {"text": "463 km", "value": 463000},
//!         "duration": {"text": "6 hours 51 mins", "value": 24660}
//!     }]}]
//! });
//! let data = MatrixData::from_value(body).unwrap();
//! let element = data.element(0, 0).unwrap();
//! assert_eq!(element.status, ElementStatus::Ok);
//! assert_eq!(element.distance.as_ref().unwrap().value, 463000);
//! ```

pub mod matrix;

pub use matrix::{Element, ElementStatus, Fare, MatrixData, Row, TextValue};
