#![doc = include_str!("../README.md")]

pub mod buckets;
pub mod cli;
pub mod driver;
pub mod engine;
pub mod error;
pub mod extract;
pub mod pacing;
pub mod page;
pub mod runtime;
pub mod selectors;
pub mod sink;
pub mod types;

#[cfg(test)]
pub(crate) mod testutil;

pub use engine::*;
pub use error::*;
pub use types::*;
