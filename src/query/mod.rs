//! Query-string handling: the ordered multi-map view over `search` and the
//! merge used by `LocationService::partial`.

mod merge;
mod params;

pub use merge::{QueryPatch, QueryValue, merge};
pub use params::QueryParams;
