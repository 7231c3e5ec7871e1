/// Data layer: measurement types, loading, and selection queries.
///
/// Architecture:
/// ```text
///     sensor CSV
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + rename columns → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │   Dataset     │  Vec<Measurement> sorted by time, DeviceCatalog
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  query    │  device + parameter + date range → (time, value) series
///   └──────────┘
/// ```

pub mod error;
pub mod loader;
pub mod model;
pub mod query;
