//! Configuration for the runpad server
//!
//! Settings come from an optional YAML file. Every field has a default, so an
//! empty file (or no file at all) yields a working configuration that talks to
//! the public Piston instance.

pub mod loader;
pub mod types;

pub use loader::*;
pub use types::*;
