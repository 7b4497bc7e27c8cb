//! Recall Watch - food recall monitoring for rappel.conso.gouv.fr
//!
//! Ingests published recall announcements, keeps those inside a date
//! window, enriches them with their sales zone, scores each one with a
//! language model and reduces the scores to a single safety index.

// Module declarations
pub mod application;
pub mod commands;
pub mod domain;
pub mod infrastructure;

pub use commands::run;
