mod submission_service;

pub use submission_service::{SubmissionError, SubmissionReceipt, SubmissionService};
