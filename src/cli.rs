//! CLI domain: parse, route, output, and presentation only.
//! Building and persisting the tree lives in the domain modules; route wires them together.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::Cli;
pub use presentation::{format_build_summary_json, format_build_summary_text};
pub use route::{BuildSummary, RunContext};
