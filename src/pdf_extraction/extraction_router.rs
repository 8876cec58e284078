// Runs the extraction methods in order and merges what they find.
//
// Structured methods (form dictionary, page widgets, pdfium) always all run and
// are unioned. The text heuristic runs only when none of them found anything.
// Output is deduplicated on (name, type); the first method to report a pair wins.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

use super::lopdf_helper::load_pdf;
use super::{
    AcroFormStrategy, ExtractionMethod, FieldStrategy, PdfInput, PdfiumStrategy,
    TextPatternStrategy, WidgetStrategy,
};
use crate::config::ExtractorConfig;
use crate::source::{DocumentSource, ScopedDocument};
use crate::types::{FieldDescriptor, FieldKind, FormsiftError, Result};

/// What one method contributed, before deduplication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodContribution {
    pub method: ExtractionMethod,
    pub found: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    pub fields: Vec<FieldDescriptor>,
    pub contributions: Vec<MethodContribution>,
    pub extraction_time_ms: u64,
}

impl ExtractionOutcome {
    pub fn used_fallback(&self) -> bool {
        self.contributions
            .iter()
            .any(|c| c.method == ExtractionMethod::TextPatterns)
    }
}

pub struct FieldExtractor {
    config: ExtractorConfig,
    structured: Vec<Box<dyn FieldStrategy>>,
    fallback: Box<dyn FieldStrategy>,
}

impl FieldExtractor {
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        let structured: Vec<Box<dyn FieldStrategy>> = vec![
            Box::new(AcroFormStrategy::new(&config)),
            Box::new(WidgetStrategy::new(&config)),
            Box::new(PdfiumStrategy::new()),
        ];
        let fallback = Box::new(TextPatternStrategy::new(&config)?);
        Ok(Self::with_strategies(config, structured, fallback))
    }

    /// Assemble an extractor from explicit strategies, run in the given order
    pub fn with_strategies(
        config: ExtractorConfig,
        structured: Vec<Box<dyn FieldStrategy>>,
        fallback: Box<dyn FieldStrategy>,
    ) -> Self {
        Self {
            config,
            structured,
            fallback,
        }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract from wherever `source` points. Temp files created along the
    /// way are gone by the time this returns.
    pub fn extract_source(&self, source: &DocumentSource) -> Result<ExtractionOutcome> {
        let document = ScopedDocument::open(source, &self.config.fetch)?;
        let bytes = document.read()?;
        self.extract_bytes(&bytes, document.label())
    }

    pub fn extract_path(&self, path: &Path) -> Result<ExtractionOutcome> {
        self.extract_source(&DocumentSource::File(path.to_path_buf()))
    }

    /// Extract from an in-memory PDF. Fails only when the bytes cannot be
    /// parsed as a PDF at all; finding no fields is a normal, empty result.
    pub fn extract_bytes(&self, bytes: &[u8], label: &str) -> Result<ExtractionOutcome> {
        let document = load_pdf(bytes).map_err(|e| {
            log::error!("Error processing PDF {}: {}", label, e);
            FormsiftError::Unreadable {
                document: label.to_string(),
                reason: e.to_string(),
            }
        })?;
        let outcome = self.extract_input(&PdfInput {
            bytes,
            document: &document,
        });
        log::info!(
            "{}: {} fields in {}ms",
            label,
            outcome.fields.len(),
            outcome.extraction_time_ms
        );
        Ok(outcome)
    }

    /// Run every applicable method against an opened document. Never fails.
    pub fn extract_input(&self, input: &PdfInput<'_>) -> ExtractionOutcome {
        let start = Instant::now();
        let mut fields = Vec::new();
        let mut contributions = Vec::new();

        for strategy in &self.structured {
            contributions.push(run_strategy(strategy.as_ref(), input, &mut fields));
        }
        if fields.is_empty() {
            contributions.push(run_strategy(self.fallback.as_ref(), input, &mut fields));
        }

        ExtractionOutcome {
            fields: dedup_fields(fields),
            contributions,
            extraction_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

fn run_strategy(
    strategy: &dyn FieldStrategy,
    input: &PdfInput<'_>,
    fields: &mut Vec<FieldDescriptor>,
) -> MethodContribution {
    let method = strategy.method();
    match strategy.extract(input) {
        Ok(found) => {
            if !found.is_empty() {
                log::info!("Extracted {} fields using {}", found.len(), method.as_str());
            }
            let count = found.len();
            fields.extend(found);
            MethodContribution {
                method,
                found: count,
                error: None,
            }
        }
        Err(e) => {
            log::debug!("{} extraction failed: {:#}", method.as_str(), e);
            MethodContribution {
                method,
                found: 0,
                error: Some(format!("{:#}", e)),
            }
        }
    }
}

/// Keep the first descriptor for each (name, type) pair, in order
pub fn dedup_fields(fields: Vec<FieldDescriptor>) -> Vec<FieldDescriptor> {
    let mut seen: HashSet<(String, FieldKind)> = HashSet::new();
    fields
        .into_iter()
        .filter(|field| seen.insert((field.name.clone(), field.kind)))
        .collect()
}
