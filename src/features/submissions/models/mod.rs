mod submission;

pub use submission::{PhotoAttachment, PhotoContent, SubmissionForm, SubmissionPhase};
