//! Request configuration: validated options with defaults and an API-ready projection.
//!
//! A [`Configuration`] holds every option that shapes an outbound request.
//! Typed builder methods (`with_mode`, `with_departure_time`, ...) are for
//! callers that already hold typed values. The string entry point
//! [`Configuration::set`] parses raw values (environment variables, config
//! files, user input) and records a [`FieldError`] instead of failing, so a
//! caller can inspect every problem at once through [`Configuration::errors`].
//!
//! Validation is query based: nothing here returns an error on assignment.
//! The URL builder refuses to build a request from an invalid configuration.
//!
//! ## Example
//!
//! ```rust
//! use distance_matrix::configuration::{Configuration, Mode};
//!
//! let mut config = Configuration::default().with_mode(Mode::Walking);
//! config.set("departure_time", Some("now"));
//! config.set("units", Some("furlongs"));
//!
//! assert!(!config.is_valid());
//! assert_eq!(config.errors().for_field("units").count(), 1);
//! assert_eq!(config.to_param().get("mode").map(String::as_str), Some("walking"));
//! ```

mod options;
mod validation;

pub use options::{
    Avoid, Mode, Protocol, TimeValue, TrafficModel, TransitMode, TransitRoutingPreference,
    Units, UnknownVariant,
};
pub use validation::{FieldError, ValidationErrorKind, ValidationErrors};

use crate::cache::{default_cache_key_transform, CacheBackend, CacheKeyTransform};
use crate::request::signer;
use crate::telemetry::InstrumentationSink;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Prefix of the environment variables read by [`Configuration::from_env`].
pub const ENV_PREFIX: &str = "DISTANCE_MATRIX_";

/// Default upstream host.
pub const DEFAULT_HOST: &str = "maps.googleapis.com";

/// Request attributes serialized by [`Configuration::to_param`].
pub const ATTRIBUTES: &[&str] = &[
    "mode",
    "avoid",
    "units",
    "language",
    "departure_time",
    "arrival_time",
    "transit_mode",
    "transit_routing_preference",
    "traffic_model",
];

/// Values the upstream service assumes when a parameter is omitted.
pub const API_DEFAULTS: &[(&str, &str)] = &[
    ("mode", "driving"),
    ("units", "metric"),
    ("traffic_model", "best_guess"),
];

/// Every attribute accepted by [`Configuration::set`].
pub const SETTABLE_ATTRIBUTES: &[&str] = &[
    "mode",
    "avoid",
    "units",
    "protocol",
    "language",
    "departure_time",
    "arrival_time",
    "transit_mode",
    "transit_routing_preference",
    "traffic_model",
    "http_open_timeout",
    "http_read_timeout",
    "http_ssl_timeout",
    "google_business_api_client_id",
    "google_business_api_private_key",
    "google_api_key",
    "lat_lng_scale",
    "use_encoded_polylines",
    "host",
    "filter_parameters_in_logged_url",
];

const FILTERED: &str = "[FILTERED]";

/// Options for requests against the Distance Matrix API.
#[derive(Clone)]
pub struct Configuration {
    pub mode: Option<Mode>,
    pub avoid: Option<Avoid>,
    pub units: Option<Units>,
    pub protocol: Protocol,
    pub language: Option<String>,
    pub departure_time: Option<TimeValue>,
    /// Seconds since the Unix epoch. `now` is not accepted for arrivals.
    pub arrival_time: Option<u64>,
    pub transit_mode: Option<TransitMode>,
    pub transit_routing_preference: Option<TransitRoutingPreference>,
    pub traffic_model: Option<TrafficModel>,

    /// Seconds allowed for opening the TCP connection.
    pub http_open_timeout: Option<f64>,
    /// Seconds allowed for reading the response.
    pub http_read_timeout: Option<f64>,
    /// Seconds allowed for the TLS handshake.
    pub http_ssl_timeout: Option<f64>,

    pub google_business_api_client_id: Option<String>,
    /// URL-safe base64 key used to sign business requests.
    pub google_business_api_private_key: Option<String>,
    pub google_api_key: Option<String>,

    /// Decimal places kept when rendering coordinates.
    pub lat_lng_scale: u32,
    pub use_encoded_polylines: bool,

    pub host: String,
    /// Query parameters whose values are masked whenever a URL is logged.
    pub filter_parameters_in_logged_url: Vec<String>,

    pub cache_key_transform: CacheKeyTransform,
    pub cache: Option<Arc<dyn CacheBackend>>,
    pub instrumentation: Option<Arc<dyn InstrumentationSink>>,

    rejected: BTreeMap<String, FieldError>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            mode: Some(Mode::Driving),
            avoid: None,
            units: Some(Units::Metric),
            protocol: Protocol::Https,
            language: None,
            departure_time: None,
            arrival_time: None,
            transit_mode: None,
            transit_routing_preference: None,
            traffic_model: Some(TrafficModel::BestGuess),
            http_open_timeout: None,
            http_read_timeout: None,
            http_ssl_timeout: None,
            google_business_api_client_id: None,
            google_business_api_private_key: None,
            google_api_key: None,
            lat_lng_scale: 5,
            use_encoded_polylines: false,
            host: DEFAULT_HOST.to_string(),
            filter_parameters_in_logged_url: vec!["key".to_string(), "signature".to_string()],
            cache_key_transform: default_cache_key_transform(),
            cache: None,
            instrumentation: None,
            rejected: BTreeMap::new(),
        }
    }
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load attributes from `DISTANCE_MATRIX_<ATTRIBUTE>` environment variables.
    ///
    /// Values go through [`Configuration::set`], so malformed variables show up in
    /// [`Configuration::errors`] rather than aborting the load.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        for attribute in SETTABLE_ATTRIBUTES {
            let var = format!("{}{}", ENV_PREFIX, attribute.to_uppercase());
            if let Ok(value) = std::env::var(&var) {
                config.set(attribute, Some(value.as_str()));
            }
        }
        config
    }

    /// Build from `(attribute, value)` pairs on top of the defaults.
    pub fn from_params<'a, I>(params: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = Self::default();
        for (attribute, value) in params {
            config.set(attribute, Some(value));
        }
        config
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_avoid(mut self, avoid: Avoid) -> Self {
        self.avoid = Some(avoid);
        self
    }

    pub fn with_units(mut self, units: Units) -> Self {
        self.units = Some(units);
        self
    }

    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_departure_time(mut self, time: TimeValue) -> Self {
        self.departure_time = Some(time);
        self
    }

    pub fn with_arrival_time(mut self, timestamp: u64) -> Self {
        self.arrival_time = Some(timestamp);
        self
    }

    pub fn with_transit_mode(mut self, transit_mode: TransitMode) -> Self {
        self.transit_mode = Some(transit_mode);
        self
    }

    pub fn with_transit_routing_preference(mut self, pref: TransitRoutingPreference) -> Self {
        self.transit_routing_preference = Some(pref);
        self
    }

    pub fn with_traffic_model(mut self, model: TrafficModel) -> Self {
        self.traffic_model = Some(model);
        self
    }

    /// Set open, read and TLS timeouts in seconds. `None` keeps the transport default.
    pub fn with_timeouts(mut self, open: Option<f64>, read: Option<f64>, ssl: Option<f64>) -> Self {
        self.http_open_timeout = open;
        self.http_read_timeout = read;
        self.http_ssl_timeout = ssl;
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.google_api_key = Some(key.into());
        self
    }

    /// Authenticate as a business client; requests are signed with `private_key`.
    pub fn with_business_credentials(
        mut self,
        client_id: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Self {
        self.google_business_api_client_id = Some(client_id.into());
        self.google_business_api_private_key = Some(private_key.into());
        self
    }

    pub fn with_lat_lng_scale(mut self, scale: u32) -> Self {
        self.lat_lng_scale = scale;
        self
    }

    pub fn with_encoded_polylines(mut self, enabled: bool) -> Self {
        self.use_encoded_polylines = enabled;
        self
    }

    /// Override the upstream host, e.g. `127.0.0.1:8080` for a local mock.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_cache_key_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.cache_key_transform = Arc::new(transform);
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn CacheBackend>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_instrumentation(mut self, sink: Arc<dyn InstrumentationSink>) -> Self {
        self.instrumentation = Some(sink);
        self
    }

    /// Assign an attribute from its textual form.
    ///
    /// `None` unsets the attribute (attributes with a default fall back to it).
    /// A value that cannot be represented is recorded as a [`FieldError`] and the
    /// previous value is kept; a later successful assignment clears the error.
    pub fn set(&mut self, attribute: &str, value: Option<&str>) {
        let outcome = self.assign(attribute, value);
        match outcome {
            Ok(()) => {
                self.rejected.remove(attribute);
            }
            Err(kind) => {
                self.rejected.insert(
                    attribute.to_string(),
                    FieldError::new(attribute, kind, value.map(str::to_string)),
                );
            }
        }
    }

    fn assign(&mut self, attribute: &str, value: Option<&str>) -> Result<(), ValidationErrorKind> {
        use ValidationErrorKind::*;

        match attribute {
            "mode" => self.mode = parse_option(value)?,
            "avoid" => self.avoid = parse_option(value)?,
            "units" => self.units = parse_option(value)?,
            "protocol" => self.protocol = parse_option(value)?.unwrap_or(Protocol::Https),
            "transit_mode" => self.transit_mode = parse_option(value)?,
            "transit_routing_preference" => self.transit_routing_preference = parse_option(value)?,
            "traffic_model" => self.traffic_model = parse_option(value)?,
            "language" => self.language = value.map(str::to_string),
            "departure_time" => {
                self.departure_time = match value {
                    None => None,
                    Some(v) => Some(v.parse::<TimeValue>().map_err(|_| InvalidTimeValue)?),
                }
            }
            "arrival_time" => {
                self.arrival_time = match value.map(str::parse::<TimeValue>) {
                    None => None,
                    Some(Ok(TimeValue::Timestamp(ts))) => Some(ts),
                    Some(_) => return Err(InvalidTimeValue),
                }
            }
            "http_open_timeout" => self.http_open_timeout = parse_timeout(value)?,
            "http_read_timeout" => self.http_read_timeout = parse_timeout(value)?,
            "http_ssl_timeout" => self.http_ssl_timeout = parse_timeout(value)?,
            "google_business_api_client_id" => {
                self.google_business_api_client_id = value.map(str::to_string)
            }
            "google_business_api_private_key" => {
                self.google_business_api_private_key = value.map(str::to_string)
            }
            "google_api_key" => self.google_api_key = value.map(str::to_string),
            "lat_lng_scale" => {
                self.lat_lng_scale = match value {
                    None => 5,
                    Some(v) => v.trim().parse::<u32>().map_err(|_| InvalidNumber)?,
                }
            }
            "use_encoded_polylines" => {
                self.use_encoded_polylines = match value.map(str::trim) {
                    None => false,
                    Some("true") | Some("1") => true,
                    Some("false") | Some("0") => false,
                    Some(_) => return Err(InvalidBoolean),
                }
            }
            "host" => {
                self.host = value
                    .map(str::to_string)
                    .unwrap_or_else(|| DEFAULT_HOST.to_string())
            }
            "filter_parameters_in_logged_url" => {
                self.filter_parameters_in_logged_url = value
                    .map(|v| {
                        v.split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default()
            }
            _ => return Err(UnknownAttribute),
        }
        Ok(())
    }

    /// Run the validation pass and return every failure.
    pub fn errors(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for error in self.rejected.values() {
            errors.push(error.clone());
        }

        let timeouts = [
            ("http_open_timeout", self.http_open_timeout),
            ("http_read_timeout", self.http_read_timeout),
            ("http_ssl_timeout", self.http_ssl_timeout),
        ];
        for (field, timeout) in timeouts {
            if self.rejected.contains_key(field) {
                continue;
            }
            if let Some(t) = timeout {
                // Must also fit a `Duration`.
                if !(t > 0.0 && Duration::try_from_secs_f64(t).is_ok()) {
                    errors.push(FieldError::new(
                        field,
                        ValidationErrorKind::InvalidTimeout,
                        Some(t.to_string()),
                    ));
                }
            }
        }

        if !self.rejected.contains_key("google_business_api_private_key") {
            if let Some(key) = non_blank(&self.google_business_api_private_key) {
                if signer::decode_private_key(key).is_err() {
                    errors.push(FieldError::new(
                        "google_business_api_private_key",
                        ValidationErrorKind::InvalidPrivateKey,
                        Some(FILTERED.to_string()),
                    ));
                }
            }
        }

        errors
    }

    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let errors = self.errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Project the configuration onto API query parameters.
    ///
    /// Includes a request attribute only when it is set, non-blank, and differs
    /// from the value the API assumes when the parameter is absent. Credentials
    /// are added as `client` and `key`.
    pub fn to_param(&self) -> BTreeMap<String, String> {
        let candidates: [(&str, Option<String>); 9] = [
            ("mode", self.mode.map(|v| v.as_str().to_string())),
            ("avoid", self.avoid.map(|v| v.as_str().to_string())),
            ("units", self.units.map(|v| v.as_str().to_string())),
            ("language", self.language.clone()),
            ("departure_time", self.departure_time.map(|v| v.to_param())),
            ("arrival_time", self.arrival_time.map(|v| v.to_string())),
            ("transit_mode", self.transit_mode.map(|v| v.as_str().to_string())),
            (
                "transit_routing_preference",
                self.transit_routing_preference.map(|v| v.as_str().to_string()),
            ),
            ("traffic_model", self.traffic_model.map(|v| v.as_str().to_string())),
        ];

        let mut params = BTreeMap::new();
        for (name, value) in candidates {
            let value = match value {
                Some(v) if !v.trim().is_empty() => v,
                _ => continue,
            };
            if api_default(name) == Some(value.as_str()) {
                continue;
            }
            params.insert(name.to_string(), value);
        }

        if let Some(client) = non_blank(&self.google_business_api_client_id) {
            params.insert("client".to_string(), client.to_string());
        }
        if let Some(key) = non_blank(&self.google_api_key) {
            params.insert("key".to_string(), key.to_string());
        }
        params
    }

    /// Private key to sign with, if any.
    ///
    /// Requests are signed only when both the client id and the private key are set.
    pub(crate) fn signing_key(&self) -> Option<&str> {
        non_blank(&self.google_business_api_client_id)?;
        non_blank(&self.google_business_api_private_key)
    }

    /// Replace the values of filtered query parameters with a placeholder.
    pub fn filter_url(&self, url: &str) -> String {
        let Some((base, query)) = url.split_once('?') else {
            return url.to_string();
        };
        let filtered: Vec<String> = query
            .split('&')
            .map(|pair| match pair.split_once('=') {
                Some((name, _))
                    if self
                        .filter_parameters_in_logged_url
                        .iter()
                        .any(|f| f == name) =>
                {
                    format!("{}={}", name, FILTERED)
                }
                _ => pair.to_string(),
            })
            .collect();
        format!("{}?{}", base, filtered.join("&"))
    }
}

fn parse_option<T>(value: Option<&str>) -> Result<Option<T>, ValidationErrorKind>
where
    T: std::str::FromStr,
{
    match value {
        None => Ok(None),
        Some(v) => v
            .parse::<T>()
            .map(Some)
            .map_err(|_| ValidationErrorKind::InvalidEnumValue),
    }
}

// Range is checked by the validation pass; only the syntax is checked here.
fn parse_timeout(value: Option<&str>) -> Result<Option<f64>, ValidationErrorKind> {
    match value {
        None => Ok(None),
        Some(v) => v
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| ValidationErrorKind::InvalidTimeout),
    }
}

fn api_default(attribute: &str) -> Option<&'static str> {
    API_DEFAULTS
        .iter()
        .find(|(name, _)| *name == attribute)
        .map(|(_, default)| *default)
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn mask(value: &Option<String>) -> Option<&'static str> {
    value.as_ref().map(|_| FILTERED)
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("mode", &self.mode)
            .field("avoid", &self.avoid)
            .field("units", &self.units)
            .field("protocol", &self.protocol)
            .field("language", &self.language)
            .field("departure_time", &self.departure_time)
            .field("arrival_time", &self.arrival_time)
            .field("transit_mode", &self.transit_mode)
            .field("transit_routing_preference", &self.transit_routing_preference)
            .field("traffic_model", &self.traffic_model)
            .field("http_open_timeout", &self.http_open_timeout)
            .field("http_read_timeout", &self.http_read_timeout)
            .field("http_ssl_timeout", &self.http_ssl_timeout)
            .field("google_business_api_client_id", &self.google_business_api_client_id)
            .field(
                "google_business_api_private_key",
                &mask(&self.google_business_api_private_key),
            )
            .field("google_api_key", &mask(&self.google_api_key))
            .field("lat_lng_scale", &self.lat_lng_scale)
            .field("use_encoded_polylines", &self.use_encoded_polylines)
            .field("host", &self.host)
            .field("cache", &self.cache.as_ref().map(|c| c.name()))
            .field("instrumentation", &self.instrumentation.is_some())
            .finish()
    }
}
