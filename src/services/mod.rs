pub mod llm_service;
pub mod report_shortener;
pub mod submission_writer;

pub use llm_service::{LlmService, StructuredOutput};
pub use report_shortener::{LlmReportShortener, ReportShortener, ShortenedSentences};
pub use submission_writer::SubmissionWriter;
