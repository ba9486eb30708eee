//! Business logic services for the application layer.

pub mod analyzer;
pub mod ingest_service;
pub mod registration_service;
pub mod report_service;

pub use analyzer::{AnalysisReport, MailAnalyzer};
pub use ingest_service::IngestService;
pub use registration_service::RegistrationService;
pub use report_service::ReportService;
