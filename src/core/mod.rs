//! Core building blocks shared by every tagy run
//!
//! - **config**: CLI flags merged with manifest settings
//! - **error**: Error types with contextual help messages and exit codes
//! - **vcs**: Git operations abstraction (SystemGit)

pub mod config;
pub mod error;
pub mod vcs;
