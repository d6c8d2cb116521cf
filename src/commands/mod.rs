//! CLI commands for tagy
//!
//! - **release**: Resolve the configuration and run one release workflow

pub mod release;

pub use release::run_release;
