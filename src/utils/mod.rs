pub mod logging;
pub mod text;

pub use text::{truncate_text, word_count, word_count_of};
