//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`ring`] - Print the candidate ring used by the search
//! - [`run`] - Run a search against a simulated elevation field

pub mod ring;
pub mod run;
