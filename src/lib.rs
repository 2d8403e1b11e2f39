pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod service;

pub use config::AppConfig;
pub use error::ReconError;
pub use service::{reconcile, summarize, FieldMapper, RecordStandardizer, ReconcileService};
