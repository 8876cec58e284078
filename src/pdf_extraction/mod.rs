// PDF form field extraction
//
// Each method is a `FieldStrategy`. The router runs them in a fixed order and
// merges what they find; a strategy error only ever means "no fields from me".
pub mod acroform;
pub mod extraction_router;
pub mod lopdf_helper;
pub mod pdfium_fields;
pub mod text_patterns;
pub mod widgets;

use anyhow::Result;
use lopdf::Document;
use serde::{Deserialize, Serialize};

use crate::types::FieldDescriptor;

pub use acroform::AcroFormStrategy;
pub use extraction_router::{dedup_fields, ExtractionOutcome, FieldExtractor, MethodContribution};
pub use pdfium_fields::PdfiumStrategy;
pub use text_patterns::{LabelScanner, TextPatternStrategy};
pub use widgets::WidgetStrategy;

/// Extraction methods, in the order the router runs them
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    #[serde(rename = "acroform")]
    AcroForm,
    Widgets,
    Pdfium,
    TextPatterns,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::AcroForm => "acroform",
            ExtractionMethod::Widgets => "widgets",
            ExtractionMethod::Pdfium => "pdfium",
            ExtractionMethod::TextPatterns => "text_patterns",
        }
    }
}

/// A document that opened successfully: raw bytes plus the parsed lopdf tree
pub struct PdfInput<'a> {
    pub bytes: &'a [u8],
    pub document: &'a Document,
}

pub trait FieldStrategy {
    fn method(&self) -> ExtractionMethod;

    fn extract(&self, input: &PdfInput<'_>) -> Result<Vec<FieldDescriptor>>;
}

/// Synthetic name for a field that carries none
pub(crate) fn placeholder_name(index: usize) -> String {
    format!("field_{}", index)
}
