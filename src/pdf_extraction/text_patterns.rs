// Heuristic fallback for flat documents: look for printed captions and
// checkbox glyphs in the page text.
use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::panic;

use super::{ExtractionMethod, FieldStrategy, PdfInput};
use crate::config::{ExtractorConfig, LabelPattern};
use crate::types::{FieldDescriptor, FieldKind, FormsiftError};

static CHECKBOX_GLYPH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"☐|□|\[ \]").expect("checkbox glyph pattern"));

static YES_NO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Yes[^\n]*?No").expect("yes/no pattern"));

/// Compiled form of the label table plus the synthetic-choice cap
pub struct LabelScanner {
    labels: Vec<CompiledLabel>,
    max_synthetic_choices: usize,
}

struct CompiledLabel {
    pattern: Regex,
    exclude: Option<Regex>,
    label: LabelPattern,
}

impl CompiledLabel {
    fn new(label: &LabelPattern) -> crate::Result<Self> {
        let compile = |pattern: &str| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| FormsiftError::Config(format!("label {:?}: {}", label.name, e)))
        };
        Ok(Self {
            pattern: compile(&label.pattern)?,
            exclude: label.exclude.as_deref().map(|p| compile(&format!("^(?:{})", p))).transpose()?,
            label: label.clone(),
        })
    }

    fn found_in(&self, text: &str) -> bool {
        match &self.exclude {
            None => self.pattern.is_match(text),
            Some(exclude) => self
                .pattern
                .find_iter(text)
                .any(|m| !exclude.is_match(m.as_str())),
        }
    }
}

impl LabelScanner {
    pub fn new(config: &ExtractorConfig) -> crate::Result<Self> {
        let labels = config
            .labels
            .iter()
            .map(CompiledLabel::new)
            .collect::<crate::Result<Vec<_>>>()?;
        Ok(Self {
            labels,
            max_synthetic_choices: config.max_synthetic_choices,
        })
    }

    /// Descriptors suggested by `text`. Each label contributes at most once
    /// no matter how often its caption repeats.
    pub fn scan(&self, text: &str) -> Vec<FieldDescriptor> {
        let mut fields: Vec<FieldDescriptor> = self
            .labels
            .iter()
            .filter(|compiled| compiled.found_in(text))
            .map(|CompiledLabel { label, .. }| {
                FieldDescriptor::new(label.name.clone(), label.kind, label.required)
            })
            .collect();
        fields.extend(self.synthetic_choices(text));
        fields
    }

    fn synthetic_choices(&self, text: &str) -> Vec<FieldDescriptor> {
        let cap = self.max_synthetic_choices;
        let checkboxes = CHECKBOX_GLYPH.find_iter(text).count().min(cap);
        let radios = YES_NO.find_iter(text).count().min(cap - checkboxes);

        let checkbox_fields = (1..=checkboxes)
            .map(|i| FieldDescriptor::new(format!("checkbox_{}", i), FieldKind::Checkbox, false));
        let radio_fields = (1..=radios)
            .map(|i| FieldDescriptor::new(format!("radio_{}", i), FieldKind::Radio, false));
        checkbox_fields.chain(radio_fields).collect()
    }
}

/// All page text as one string. lopdf first; pdf-extract when lopdf fails or
/// finds nothing.
pub fn document_text(input: &PdfInput<'_>) -> Result<String> {
    let pages: Vec<u32> = input.document.get_pages().keys().copied().collect();
    let lopdf_text = input.document.extract_text(&pages);
    if let Ok(text) = &lopdf_text {
        if !text.trim().is_empty() {
            return Ok(text.clone());
        }
    }

    let bytes = input.bytes;
    let fallback = match panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(anyhow!("pdf-extract failed: {}", e)),
        Err(_) => Err(anyhow!("pdf-extract panicked")),
    };

    match (lopdf_text, fallback) {
        (_, Ok(text)) => Ok(text),
        (Ok(empty), Err(e)) => {
            log::debug!("{}", e);
            Ok(empty)
        }
        (Err(lopdf_err), Err(e)) => Err(anyhow!("lopdf failed: {}; {}", lopdf_err, e)),
    }
}

pub struct TextPatternStrategy {
    scanner: LabelScanner,
}

impl TextPatternStrategy {
    pub fn new(config: &ExtractorConfig) -> crate::Result<Self> {
        Ok(Self {
            scanner: LabelScanner::new(config)?,
        })
    }
}

impl FieldStrategy for TextPatternStrategy {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::TextPatterns
    }

    fn extract(&self, input: &PdfInput<'_>) -> Result<Vec<FieldDescriptor>> {
        let text = document_text(input)?;
        Ok(self.scanner.scan(&text))
    }
}
