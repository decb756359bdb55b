//! # spar_core - Front Spar Margin-of-Safety Engine
//!
//! `spar_core` checks the front spar of a light-aircraft wing, segment by
//! segment, for the margin of safety of its shear web, compression flange,
//! stiffeners and web-to-flange rivets. Allowables come from digitized
//! handbook charts and thickness tables. All inputs and outputs are
//! JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: elements are immutable; every check is a pure function
//!   of geometry and loads
//! - **No silent NaN**: a lookup outside a chart is an `Err` until the report
//!   row, where it becomes a `NaN` cell with a visible status
//! - **Rich Errors**: structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use spar_core::analysis::analyze;
//! use spar_core::model::SparModel;
//!
//! let report = analyze(&SparModel::sample()).unwrap();
//! let governing = report.summary.governing.unwrap();
//! assert!(governing.margin > 0.0);
//! ```
//!
//! ## Modules
//!
//! - [`curve`] - breakpoint tables with linear or step interpolation
//! - [`charts`] - built-in handbook charts
//! - [`materials`] - thickness-banded allowables and material constants
//! - [`crippling`] - crippling stress curve
//! - [`elements`] - web, compression flange, stiffener, rivet
//! - [`loads`] - station loads and front-spar load factors
//! - [`report`] - report rows and CSV output
//! - [`model`] - the JSON input document
//! - [`analysis`] - runs a model into a report
//! - [`units`] - unit conversions and type-safe wrappers
//! - [`errors`] - structured error types
//! - [`file_io`] - model loading and atomic report saves

pub mod analysis;
pub mod charts;
pub mod crippling;
pub mod curve;
pub mod elements;
pub mod errors;
pub mod file_io;
pub mod loads;
pub mod materials;
pub mod model;
pub mod report;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use analysis::{analyze, SparReport};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_model, save_report, write_report_csv};
pub use model::SparModel;
