// Core types for formsift
use serde::{Deserialize, Serialize};
use std::fmt;

// Categorical tag for a discovered form input
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Select,
    Checkbox,
    Radio,
    Signature,
    Button,
    Date,
    Email,
    Tel,
    Unknown,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Select => "select",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Radio => "radio",
            FieldKind::Signature => "signature",
            FieldKind::Button => "button",
            FieldKind::Date => "date",
            FieldKind::Email => "email",
            FieldKind::Tel => "tel",
            FieldKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fillable input found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind, required: bool) -> Self {
        Self {
            name: name.into(),
            kind,
            required,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Identity used when merging output from several methods.
    pub fn key(&self) -> (&str, FieldKind) {
        (self.name.as_str(), self.kind)
    }
}

// Field flags from the /Ff entry of a field dictionary
bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FieldFlags: u32 {
        const READ_ONLY   = 1 << 0;
        const REQUIRED    = 1 << 1;
        const NO_EXPORT   = 1 << 2;
        const RADIO       = 1 << 15;
        const PUSH_BUTTON = 1 << 16;
        const COMBO       = 1 << 17;
    }
}

impl FieldFlags {
    /// Build from a raw /Ff integer, keeping only the bits we model.
    pub fn from_raw(raw: i64) -> Self {
        Self::from_bits_truncate(raw as u32)
    }

    pub fn is_required(&self) -> bool {
        self.contains(FieldFlags::REQUIRED)
    }
}

// Error types
#[derive(Debug, thiserror::Error)]
pub enum FormsiftError {
    #[error("document {document} could not be read: {reason}")]
    Unreadable { document: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("fetch error: {0}")]
    Fetch(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("{0} is not available")]
    MethodUnavailable(&'static str),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for FormsiftError {
    fn from(err: reqwest::Error) -> Self {
        FormsiftError::Fetch(err.to_string())
    }
}

impl From<toml::de::Error> for FormsiftError {
    fn from(err: toml::de::Error) -> Self {
        FormsiftError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FormsiftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_serializes_without_absent_label() {
        let field = FieldDescriptor::new("ssn", FieldKind::Text, true);
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "ssn", "type": "text", "required": true})
        );
    }

    #[test]
    fn descriptor_keeps_label_when_present() {
        let field = FieldDescriptor::new("dob", FieldKind::Date, false).with_label("Date of birth");
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["label"], "Date of birth");
        assert_eq!(json["type"], "date");
    }

    #[test]
    fn required_flag_is_bit_two() {
        assert!(FieldFlags::from_raw(2).is_required());
        assert!(FieldFlags::from_raw(3).is_required());
        assert!(!FieldFlags::from_raw(1).is_required());
        assert!(!FieldFlags::from_raw(0).is_required());
        assert!(FieldFlags::from_raw(1 << 15).contains(FieldFlags::RADIO));
    }
}
