//! Enumerated request options understood by the Distance Matrix API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a string is not a member of an option enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub value: String,
    pub allowed: &'static [&'static str],
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' is not one of [{}]",
            self.value,
            self.allowed.join(", ")
        )
    }
}

impl std::error::Error for UnknownVariant {}

macro_rules! api_option {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every accepted wire value, in declaration order.
            pub const ALLOWED: &'static [&'static str] = &[$($wire),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(UnknownVariant {
                        value: other.to_string(),
                        allowed: Self::ALLOWED,
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

api_option! {
    /// Travel mode used when calculating distances.
    Mode {
        Driving => "driving",
        Walking => "walking",
        Bicycling => "bicycling",
        Transit => "transit",
    }
}

api_option! {
    /// Route feature the upstream service should avoid.
    Avoid {
        Tolls => "tolls",
        Highways => "highways",
        Ferries => "ferries",
        Indoor => "indoor",
    }
}

api_option! {
    /// Unit system for the human readable `text` fields of the response.
    Units {
        Metric => "metric",
        Imperial => "imperial",
    }
}

api_option! {
    /// URL scheme of the outbound request.
    Protocol {
        Http => "http",
        Https => "https",
    }
}

api_option! {
    TransitMode {
        Bus => "bus",
        Subway => "subway",
        Train => "train",
        Tram => "tram",
        Rail => "rail",
    }
}

api_option! {
    TransitRoutingPreference {
        LessWalking => "less_walking",
        FewerTransfers => "fewer_transfers",
    }
}

api_option! {
    /// Assumption used when calculating time in traffic.
    TrafficModel {
        BestGuess => "best_guess",
        Pessimistic => "pessimistic",
        Optimistic => "optimistic",
    }
}

/// A departure or arrival time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeValue {
    /// The literal `now`, only meaningful for departures.
    Now,
    /// Seconds since the Unix epoch.
    Timestamp(u64),
}

impl TimeValue {
    pub fn to_param(&self) -> String {
        match self {
            TimeValue::Now => "now".to_string(),
            TimeValue::Timestamp(ts) => ts.to_string(),
        }
    }
}

impl FromStr for TimeValue {
    type Err = ();

    /// Accepts `now` or a string made only of ASCII digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "now" {
            return Ok(TimeValue::Now);
        }
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(());
        }
        s.parse::<u64>().map(TimeValue::Timestamp).map_err(|_| ())
    }
}

impl From<u64> for TimeValue {
    fn from(ts: u64) -> Self {
        TimeValue::Timestamp(ts)
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_param())
    }
}
