//! Domain layer containing business entities and logic.
//!
//! Defines entities, repository interfaces, the leak-detection core and the
//! probe worker, independent of the HTTP front-end.
//!
//! # Architecture
//!
//! - [`entities`] - Core data structures
//! - [`repositories`] - Persistence collaborator traits
//! - [`detection`] - Encoding catalog, extraction, selection and classification
//! - [`leak_recorder`] - Labeling and storing leaks
//! - [`probe_task`] - Probe task model
//! - [`probe_worker`] - Delayed, bounded probe execution
//!
//! # Probe Flow
//!
//! 1. The analyzer selects images with [`detection::select_probes`]
//! 2. Each becomes a [`probe_task::ProbeTask`] sent through [`probe_worker::ProbeScheduler`]
//! 3. [`probe_worker::run_probe_worker`] fetches it after a fixed delay
//! 4. Redirect chains and leaks found in them are persisted

pub mod detection;
pub mod entities;
pub mod leak_recorder;
pub mod probe_task;
pub mod probe_worker;
pub mod repositories;
