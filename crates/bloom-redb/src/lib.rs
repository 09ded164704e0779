//! Bloom Redb
//!
//! Garden storage in a single redb file.

#![warn(missing_docs)]
#![warn(rustdoc::bare_urls)]

pub mod error;
mod garden;

pub use garden::GardenRedbDatabase;
