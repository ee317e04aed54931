mod report;
mod report_collection;

pub use report::{
    display_timestamp, CreateReport, Report, ReportStatus, SeedRecord, Severity, StoredPhoto,
};
pub use report_collection::ReportCollection;
