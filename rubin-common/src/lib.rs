//! # Rubin Common Library
//!
//! Shared code for the Rubin mix-analysis tools including:
//! - Analysis records produced by the feature extractor
//! - Frequency band definitions
//! - Style profiles and their target ranges
//! - Evaluation and audition result types
//! - Configuration loading and root folder resolution

pub mod analysis;
pub mod bands;
pub mod config;
pub mod error;
pub mod profile;
pub mod results;

pub use bands::Band;
pub use error::{Error, Result};
pub use profile::{Range, StyleProfile};
pub use results::{AuditionResult, EvaluationResult, Issue, Role, Severity};
