// formsift - fillable-field extraction for PDF forms
pub mod config;
pub mod pdf_extraction;
pub mod report;
pub mod source;
pub mod types;

pub use config::ExtractorConfig;
pub use pdf_extraction::{ExtractionMethod, ExtractionOutcome, FieldExtractor};
pub use report::{run_batch, BatchReport, FormRecord};
pub use source::{DocumentSource, ScopedDocument};
pub use types::{FieldDescriptor, FieldFlags, FieldKind, FormsiftError, Result};
