//! Engine configuration
//!
//! Loaded from YAML; see [`ValidationConfig`] for the schema.

mod io;

pub use io::{ValidationConfig, SUPPORTED_VERSIONS};
