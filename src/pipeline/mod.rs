//! Pipeline module - cleaning, collapsing, partitioning and transforming

pub mod clean;
pub mod collapse;
pub mod config;
pub mod dataset;
pub mod error;
pub mod loader;
pub mod partition;
pub mod schema;
pub mod target;
pub mod transform;

pub use clean::*;
pub use collapse::*;
pub use config::*;
pub use dataset::*;
pub use error::{PrepError, Result};
pub use loader::*;
pub use partition::*;
pub use schema::*;
pub use target::*;
pub use transform::*;
