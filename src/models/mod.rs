mod collab_type;
mod submission;

pub mod types;

pub use collab_type::CollabType;
pub use submission::{NewSubmission, Submission, SubmissionFields, SubmissionId};
