//! Report rendering

mod json;
mod plaintext;
mod table;

pub use json::render as render_json;
pub use plaintext::render as render_plaintext;
pub use table::{Table, MAX_RULE_WIDTH};
