//! Command-line surface of the `clothing-catalog` binary.
//!
//! `serve` runs the catalog API, `migrate` manages the Postgres schema.

pub mod args;

pub use args::{Cli, Commands};
