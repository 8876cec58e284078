// Page-level widget annotation walk
//
// Independent of the form dictionary: every /Annots entry with
// /Subtype /Widget counts, even when the catalog has no /AcroForm.
use anyhow::Result;
use lopdf::{Dictionary, Document};

use super::lopdf_helper as helper;
use super::{placeholder_name, ExtractionMethod, FieldStrategy, PdfInput};
use crate::config::{ExtractorConfig, WidgetTypes};
use crate::types::{FieldDescriptor, FieldFlags, FieldKind};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WidgetClass {
    Text,
    Checkbox,
    Radio,
    ListBox,
    ComboBox,
    Signature,
    PushButton,
    Other,
}

impl WidgetClass {
    pub fn classify(field_type: Option<&str>, flags: FieldFlags) -> Self {
        match field_type {
            None | Some("Tx") => WidgetClass::Text,
            Some("Btn") if flags.contains(FieldFlags::PUSH_BUTTON) => WidgetClass::PushButton,
            Some("Btn") if flags.contains(FieldFlags::RADIO) => WidgetClass::Radio,
            Some("Btn") => WidgetClass::Checkbox,
            Some("Ch") if flags.contains(FieldFlags::COMBO) => WidgetClass::ComboBox,
            Some("Ch") => WidgetClass::ListBox,
            Some("Sig") => WidgetClass::Signature,
            Some(_) => WidgetClass::Other,
        }
    }
}

pub struct WidgetStrategy {
    types: WidgetTypes,
}

impl WidgetStrategy {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            types: config.widget_types.clone(),
        }
    }

    fn kind_for(&self, class: WidgetClass) -> FieldKind {
        match class {
            WidgetClass::Text => self.types.text,
            WidgetClass::Checkbox => self.types.checkbox,
            WidgetClass::Radio => self.types.radio,
            WidgetClass::ListBox => self.types.list_box,
            WidgetClass::ComboBox => self.types.combo_box,
            WidgetClass::Signature => self.types.signature,
            WidgetClass::PushButton => self.types.push_button,
            WidgetClass::Other => FieldKind::Unknown,
        }
    }

    fn describe(&self, doc: &Document, widget: &Dictionary, index: usize) -> FieldDescriptor {
        let name = helper::qualified_name(doc, widget).unwrap_or_else(|| placeholder_name(index));
        let field_type = helper::inherited_name(doc, widget, b"FT");
        let flags = helper::inherited_int(doc, widget, b"Ff")
            .map(FieldFlags::from_raw)
            .unwrap_or_else(FieldFlags::empty);
        let class = WidgetClass::classify(field_type.as_deref(), flags);
        FieldDescriptor::new(name, self.kind_for(class), flags.is_required())
    }
}

impl FieldStrategy for WidgetStrategy {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Widgets
    }

    fn extract(&self, input: &PdfInput<'_>) -> Result<Vec<FieldDescriptor>> {
        let doc = input.document;
        let mut out = Vec::new();

        for (page_number, page_id) in doc.get_pages() {
            let page = doc.get_dictionary(page_id)?;
            let Some(annots) = helper::get(doc, page, b"Annots").and_then(|a| a.as_array().ok()) else {
                continue;
            };
            for annot in annots {
                let Ok(annot) = helper::resolve_dict(doc, annot) else {
                    log::debug!("page {}: skipping non-dictionary annotation", page_number);
                    continue;
                };
                if helper::name_value(doc, annot, b"Subtype").as_deref() != Some("Widget") {
                    continue;
                }
                let descriptor = self.describe(doc, annot, out.len());
                out.push(descriptor);
            }
        }
        Ok(out)
    }
}
