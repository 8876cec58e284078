// Field listing through pdfium, when the crate is built with `pdfium` and the
// shared library can be bound at runtime. pdfium's listing carries names only,
// so everything comes back as an optional text field.
use anyhow::Result;

use super::{ExtractionMethod, FieldStrategy, PdfInput};
use crate::types::{FieldDescriptor, FieldKind, FormsiftError};

pub struct PdfiumStrategy;

impl PdfiumStrategy {
    pub fn new() -> Self {
        Self
    }

    /// Whether this build can use pdfium at all
    pub fn compiled_in() -> bool {
        cfg!(feature = "pdfium")
    }
}

impl Default for PdfiumStrategy {
    fn default() -> Self {
        Self::new()
    }
}

fn descriptors_from_names(mut names: Vec<String>) -> Vec<FieldDescriptor> {
    // pdfium hands back a map; sort so output is stable between runs
    names.sort();
    names.dedup();
    names
        .into_iter()
        .map(|name| FieldDescriptor::new(name, FieldKind::Text, false))
        .collect()
}

#[cfg(feature = "pdfium")]
fn list_field_names(bytes: &[u8]) -> Result<Vec<String>> {
    use pdfium_render::prelude::*;

    // Fresh binding per document, nothing shared between calls
    let lib_path = crate::config::pdfium_library_path();
    let pdfium = Pdfium::new(
        Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&lib_path))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|_| FormsiftError::MethodUnavailable("pdfium library"))?,
    );
    let document = pdfium.load_pdf_from_byte_slice(bytes, None)?;
    let names = match document.form() {
        Some(form) => form.field_values(document.pages()).into_keys().collect(),
        None => Vec::new(),
    };
    Ok(names)
}

#[cfg(not(feature = "pdfium"))]
fn list_field_names(_bytes: &[u8]) -> Result<Vec<String>> {
    Err(FormsiftError::MethodUnavailable("pdfium support").into())
}

impl FieldStrategy for PdfiumStrategy {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Pdfium
    }

    fn extract(&self, input: &PdfInput<'_>) -> Result<Vec<FieldDescriptor>> {
        Ok(descriptors_from_names(list_field_names(input.bytes)?))
    }
}
