//! Style evaluation and track audition

pub mod audition;
pub mod evaluator;
pub mod tables;

pub use audition::{audition, classify_role, dominant_bands, frequency_profile};
pub use evaluator::evaluate;
