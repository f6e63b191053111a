pub mod topic_loader;
pub mod tracking_loader;

pub use topic_loader::load_topic_ids;
pub use tracking_loader::{load_inputs, load_tracking_data, SubmissionInput};
