pub mod search;

pub use search::{run_web_search, ToolOutcome, WebSearchArgs};
