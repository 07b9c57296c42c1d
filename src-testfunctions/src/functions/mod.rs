//! Test function implementations organized by category
//!
//! - `unimodal`: single-optimum functions (bowl- and valley-shaped)
//! - `multimodal`: functions with many local minima

pub mod multimodal;
pub mod unimodal;

pub use multimodal::*;
pub use unimodal::*;
