// In-memory PDF fixtures built with lopdf
#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Default)]
pub struct FixturePdf {
    lines: Vec<String>,
    fields: Vec<Dictionary>,
    widgets_on_page: bool,
}

impl FixturePdf {
    pub fn new() -> Self {
        Self::default()
    }

    /// A printed line of page text
    pub fn line(mut self, text: &str) -> Self {
        self.lines.push(text.to_string());
        self
    }

    /// A field in /AcroForm /Fields
    pub fn field(mut self, field: Dictionary) -> Self {
        self.fields.push(field);
        self
    }

    /// Also hang every field on the page as a widget annotation
    pub fn with_widgets(mut self) -> Self {
        self.widgets_on_page = true;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });

        let mut operations = Vec::new();
        for (i, line) in self.lines.iter().enumerate() {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
            operations.push(Operation::new("Td", vec![72.into(), (720 - 20 * i as i64).into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(line.as_str())]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

        let field_refs: Vec<Object> = self
            .fields
            .into_iter()
            .enumerate()
            .map(|(i, mut field)| {
                if self.widgets_on_page {
                    let y = 700 - 30 * i as i64;
                    field.set("Type", "Annot");
                    field.set("Subtype", "Widget");
                    field.set("P", page_id);
                    field.set("Rect", vec![300.into(), y.into(), 500.into(), (y + 20).into()]);
                }
                doc.add_object(field).into()
            })
            .collect();

        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        };
        if self.widgets_on_page && !field_refs.is_empty() {
            page.set("Annots", field_refs.clone());
        }
        doc.objects.insert(page_id, Object::Dictionary(page));
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );

        let mut catalog = dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        };
        if !field_refs.is_empty() {
            catalog.set("AcroForm", dictionary! { "Fields" => field_refs });
        }
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }
}

pub fn text_field(name: &str, flags: i64) -> Dictionary {
    dictionary! {
        "T" => Object::string_literal(name),
        "FT" => "Tx",
        "Ff" => flags,
    }
}

pub fn signature_field(name: &str) -> Dictionary {
    dictionary! {
        "T" => Object::string_literal(name),
        "FT" => "Sig",
    }
}

pub fn write_pdf(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}
