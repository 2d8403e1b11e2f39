pub mod canonical;
pub mod raw;
pub mod result;
pub mod warning;

pub use canonical::{CanonicalKey, CanonicalRecord, ColumnMapping, MappingResult, ResolvedMapping};
pub use raw::{RawDataset, RawRow, RawValue};
pub use result::{ReconcileReport, ReconciledRecord, StatusFlag, SummaryMetrics, LOSS_SUFFIX};
pub use warning::Warnings;
