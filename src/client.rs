//! Client facade: configuration, cache and transport behind one call.
//!
//! Implementation details are split into submodules under `src/client/`.

mod core;

pub use self::core::DistanceMatrixClient;
