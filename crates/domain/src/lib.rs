#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod catalog;
mod error;
mod exercise;
mod history;
mod routine;
mod service;
mod split;

pub use catalog::ExerciseDefinition;
pub use error::*;
pub use exercise::*;
pub use history::*;
pub use routine::*;
pub use service::*;
pub use split::*;
