//! Tool catalog and agent directory built from configuration

mod agents;
mod builder;

pub use agents::StaticAgentDirectory;
pub use builder::{CatalogBuilder, CatalogError};
