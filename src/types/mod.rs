//! Type definitions for leadtrack

mod error;
mod record;

pub use error::*;
pub use record::*;
