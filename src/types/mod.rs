//! Type definitions for movieheat

mod error;
mod movie;
mod rating;

pub use error::*;
pub use movie::*;
pub use rating::*;
