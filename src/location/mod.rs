mod core;

pub use self::core::{Location, LocationDescriptor};
