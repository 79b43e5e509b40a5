//! Output paths and the `.ana` / `.json` writers.

pub mod paths;
pub mod writer;

pub use paths::OutputPaths;
pub use writer::{confirmation_message, render_json, render_text, OutputWriter};
