pub mod field_mapper;
pub mod pipeline;
pub mod reconciler;
pub mod standardizer;
pub mod summary;

pub use field_mapper::{normalize_header, FieldMapper};
pub use pipeline::{MappingReport, ReconcileService};
pub use reconciler::{reconcile, ReconcileOutput};
pub use standardizer::{clean_money, clean_order_id, RecordStandardizer, StandardizeOutput};
pub use summary::summarize;
