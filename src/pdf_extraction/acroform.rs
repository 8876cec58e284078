// Interactive form dictionary walk (/Root /AcroForm /Fields)
use anyhow::{bail, Result};
use lopdf::{Dictionary, Document, Object};

use super::lopdf_helper as helper;
use super::{placeholder_name, ExtractionMethod, FieldStrategy, PdfInput};
use crate::config::{AcroFormTypes, ExtractorConfig};
use crate::types::{FieldDescriptor, FieldFlags};

const MAX_FIELD_DEPTH: usize = 32;

/// Reads the document-level field list. A document without a form
/// dictionary simply has no fields here.
pub struct AcroFormStrategy {
    types: AcroFormTypes,
}

impl AcroFormStrategy {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            types: config.acroform_types.clone(),
        }
    }

    fn visit(
        &self,
        doc: &Document,
        field: &Object,
        depth: usize,
        out: &mut Vec<FieldDescriptor>,
    ) -> Result<()> {
        if depth > MAX_FIELD_DEPTH {
            bail!("field hierarchy deeper than {}", MAX_FIELD_DEPTH);
        }
        let Ok(dict) = helper::resolve(doc, field)?.as_dict() else {
            return Ok(());
        };

        // Kids with their own /T are child fields; kids without are just widgets
        let child_fields: Vec<&Object> = helper::get(doc, dict, b"Kids")
            .and_then(|kids| kids.as_array().ok())
            .map(|kids| {
                kids.iter()
                    .filter(|kid| {
                        helper::resolve_dict(doc, kid)
                            .map(|kid| kid.has(b"T"))
                            .unwrap_or(false)
                    })
                    .collect()
            })
            .unwrap_or_default();

        if child_fields.is_empty() {
            let descriptor = self.describe(doc, dict, out.len());
            out.push(descriptor);
            return Ok(());
        }
        for child in child_fields {
            self.visit(doc, child, depth + 1, out)?;
        }
        Ok(())
    }

    fn describe(&self, doc: &Document, dict: &Dictionary, index: usize) -> FieldDescriptor {
        let name = helper::qualified_name(doc, dict).unwrap_or_else(|| placeholder_name(index));
        let field_type = helper::inherited_name(doc, dict, b"FT");
        let flags = helper::inherited_int(doc, dict, b"Ff")
            .map(FieldFlags::from_raw)
            .unwrap_or_else(FieldFlags::empty);

        let kind = self.types.kind_for(field_type.as_deref());
        let descriptor = FieldDescriptor::new(name, kind, flags.is_required());
        match helper::text_value(doc, dict, b"TU") {
            Some(tooltip) if !tooltip.trim().is_empty() => descriptor.with_label(tooltip.trim()),
            _ => descriptor,
        }
    }
}

impl FieldStrategy for AcroFormStrategy {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::AcroForm
    }

    fn extract(&self, input: &PdfInput<'_>) -> Result<Vec<FieldDescriptor>> {
        let doc = input.document;
        let catalog = helper::catalog(doc)?;
        let Some(acroform) = helper::get(doc, catalog, b"AcroForm") else {
            return Ok(Vec::new());
        };
        let Some(fields) = helper::get(doc, acroform.as_dict()?, b"Fields") else {
            return Ok(Vec::new());
        };

        let mut out = Vec::new();
        for field in fields.as_array()? {
            self.visit(doc, field, 0, &mut out)?;
        }
        Ok(out)
    }
}
