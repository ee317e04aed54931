mod report_service;
mod seed_loader;

pub use report_service::ReportService;
pub use seed_loader::{parse_seed, SeedLoadError, SeedLoader};
