//! Application layer services implementing the pipeline's use cases.
//!
//! Services consume repository traits and the detection core, and provide a
//! small API for HTTP handlers and the mail front-end.
//!
//! # Available Services
//!
//! - [`services::analyzer::MailAnalyzer`] - Per-message leak analysis
//! - [`services::ingest_service::IngestService`] - Recipient gating and message intake
//! - [`services::registration_service::RegistrationService`] - Address issuing
//! - [`services::report_service::ReportService`] - Link groups and browser reports

pub mod services;
