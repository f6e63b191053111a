pub mod article_ctx;
pub mod shortening_loop;

pub use article_ctx::ArticleCtx;
pub use shortening_loop::{ShorteningLoop, ShorteningOutcome};
