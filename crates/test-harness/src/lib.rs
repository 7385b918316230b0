//! Test harness for scripted carcass design sessions.
//!
//! Provides programmatic tools for driving multi-step cabinet workflows
//! through the real bridge, verifying the space tree at every step, and
//! generating diagnostic output.
//!
//! # Key Components
//!
//! - [`CabinetBuilder`]: Fluent API for building and verifying carcasses
//! - [`oracle`]: Verification functions returning pass/fail verdicts
//! - [`report`]: Structured text carcass descriptions and cut lists
//! - [`helpers`]: Error type, preset cabinets, small geometry helpers
//! - [`assertions`]: Rich assertion helpers with diagnostics

pub mod assertions;
pub mod helpers;
pub mod oracle;
pub mod report;
pub mod workflow;

pub use helpers::{HarnessError, Preset};
pub use oracle::OracleVerdict;
pub use report::CarcassReport;
pub use workflow::CabinetBuilder;
