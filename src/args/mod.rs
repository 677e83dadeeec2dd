//! CLI argument types and parsing helpers.
mod cli;
mod parsers;
mod types;


pub use cli::{CheckArgs, Command, ConvertArgs, RunArgs, VolleyArgs};
pub use types::{OutputFormat, PositiveU64};
