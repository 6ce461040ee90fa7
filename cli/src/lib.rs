pub mod literal;
pub mod output;
pub mod stdin_source;

pub use literal::{parse_byte, LiteralError};
pub use stdin_source::{feed_lines, FeedStats};
