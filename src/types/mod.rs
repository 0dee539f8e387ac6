//! Type definitions for shopmix

mod error;
mod product;

pub use error::*;
pub use product::*;
