// Batch runs and the JSON report they produce
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::pdf_extraction::{FieldExtractor, MethodContribution};
use crate::source::DocumentSource;
use crate::types::{FieldDescriptor, Result};

/// Result for one input document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormRecord {
    pub source: String,
    pub fields: Vec<FieldDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodContribution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FormRecord {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub generated_at: DateTime<Utc>,
    pub documents: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub forms: Vec<FormRecord>,
}

impl BatchReport {
    pub fn from_records(forms: Vec<FormRecord>) -> Self {
        let succeeded = forms.iter().filter(|r| r.is_ok()).count();
        Self {
            generated_at: Utc::now(),
            documents: forms.len(),
            succeeded,
            failed: forms.len() - succeeded,
            forms,
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    pub fn write_to(&self, path: &Path, pretty: bool) -> Result<()> {
        fs::write(path, self.to_json(pretty)?)?;
        log::info!("Results saved to {}", path.display());
        Ok(())
    }
}

/// Extract every source in order. A document that fails is recorded with its
/// error and the run moves on to the next one.
pub fn run_batch(extractor: &FieldExtractor, sources: &[DocumentSource]) -> BatchReport {
    let total = sources.len();
    let records = sources
        .iter()
        .enumerate()
        .map(|(i, source)| {
            log::info!("Processing document {}/{}: {}", i + 1, total, source);
            match extractor.extract_source(source) {
                Ok(outcome) => FormRecord {
                    source: source.to_string(),
                    fields: outcome.fields,
                    methods: outcome.contributions,
                    error: None,
                },
                Err(e) => {
                    log::error!("{}: {}", source, e);
                    FormRecord {
                        source: source.to_string(),
                        fields: Vec::new(),
                        methods: Vec::new(),
                        error: Some(e.to_string()),
                    }
                }
            }
        })
        .collect();
    BatchReport::from_records(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldKind;

    fn record(source: &str, error: Option<&str>) -> FormRecord {
        FormRecord {
            source: source.to_string(),
            fields: vec![FieldDescriptor::new("ssn", FieldKind::Text, true)],
            methods: Vec::new(),
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn counts_successes_and_failures() {
        let report = BatchReport::from_records(vec![
            record("a.pdf", None),
            record("b.pdf", Some("could not be read")),
            record("c.pdf", None),
        ]);
        assert_eq!(report.documents, 3);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert!(!report.all_succeeded());
    }

    #[test]
    fn json_omits_empty_optional_parts() {
        let report = BatchReport::from_records(vec![record("a.pdf", None)]);
        let json: serde_json::Value = serde_json::from_str(&report.to_json(false).unwrap()).unwrap();
        let form = &json["forms"][0];
        assert!(form.get("error").is_none());
        assert!(form.get("methods").is_none());
        assert_eq!(form["fields"][0]["name"], "ssn");
        assert!(json["generated_at"].is_string());
    }

    #[test]
    fn writes_report_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("va_forms.json");
        let report = BatchReport::from_records(vec![record("a.pdf", None)]);
        report.write_to(&path, true).unwrap();
        let back: BatchReport = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back.forms, report.forms);
    }
}
