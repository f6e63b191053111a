pub mod article;
pub mod loaders;
pub mod submission;
pub mod topic;

pub use article::{ArticleRecord, ReportSentence, TrackingRecord};
pub use loaders::{load_inputs, load_topic_ids, load_tracking_data, SubmissionInput};
pub use submission::{ReportResponse, Task1Line, Task2Metadata, Task2Record, RUN_TYPE_AUTOMATIC};
pub use topic::Topic;
