// Extraction configuration: lookup tables and fetch settings
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{FieldKind, FormsiftError, Result};

pub const CONFIG_ENV: &str = "FORMSIFT_CONFIG";
pub const PDFIUM_PATH_ENV: &str = "FORMSIFT_PDFIUM_PATH";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExtractorConfig {
    /// Upper bound on checkbox/radio descriptors invented by the text heuristic.
    #[serde(default = "default_max_synthetic_choices")]
    pub max_synthetic_choices: usize,
    #[serde(default)]
    pub acroform_types: AcroFormTypes,
    #[serde(default)]
    pub widget_types: WidgetTypes,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default = "default_labels")]
    pub labels: Vec<LabelPattern>,
}

/// /FT name (without the slash) to kind, used by the form dictionary walk.
/// Entries read from a config file are laid over the built-in table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AcroFormTypes(pub BTreeMap<String, FieldKind>);

impl<'de> Deserialize<'de> for AcroFormTypes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let overrides = BTreeMap::<String, FieldKind>::deserialize(deserializer)?;
        let mut types = Self::default();
        types.0.extend(overrides);
        Ok(types)
    }
}

impl AcroFormTypes {
    /// Absent /FT means text, an unmapped one unknown
    pub fn kind_for(&self, field_type: Option<&str>) -> FieldKind {
        match field_type {
            None => FieldKind::Text,
            Some(ft) => self.0.get(ft).copied().unwrap_or(FieldKind::Unknown),
        }
    }
}

impl Default for AcroFormTypes {
    fn default() -> Self {
        let table = [
            ("Tx", FieldKind::Text),
            ("Ch", FieldKind::Select),
            ("Btn", FieldKind::Checkbox),
            ("Sig", FieldKind::Signature),
        ];
        Self(table.into_iter().map(|(ft, kind)| (ft.to_string(), kind)).collect())
    }
}

/// Kind assigned to each widget class seen by the page annotation walk.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WidgetTypes {
    pub text: FieldKind,
    pub checkbox: FieldKind,
    pub radio: FieldKind,
    pub list_box: FieldKind,
    pub combo_box: FieldKind,
    pub signature: FieldKind,
    pub push_button: FieldKind,
}

impl Default for WidgetTypes {
    fn default() -> Self {
        Self {
            text: FieldKind::Text,
            checkbox: FieldKind::Checkbox,
            radio: FieldKind::Radio,
            list_box: FieldKind::Select,
            combo_box: FieldKind::Select,
            signature: FieldKind::Signature,
            push_button: FieldKind::Button,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            user_agent: format!("formsift/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// A caption that usually sits in front of an input on printed forms.
///
/// `pattern` is a regular expression matched case-insensitively against
/// extracted page text. A match that `exclude` also matches from its first
/// character is skipped, so `Date of Birth:` is not taken for a bare date.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LabelPattern {
    pub pattern: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,
}

impl LabelPattern {
    fn new(pattern: &str, name: &str, kind: FieldKind, required: bool) -> Self {
        Self {
            pattern: pattern.to_string(),
            name: name.to_string(),
            kind,
            required,
            exclude: None,
        }
    }

    fn excluding(mut self, pattern: &str) -> Self {
        self.exclude = Some(pattern.to_string());
        self
    }
}

fn default_max_synthetic_choices() -> usize { 10 }

// A label must be followed by a colon on the same line
fn default_labels() -> Vec<LabelPattern> {
    use FieldKind::*;
    vec![
        LabelPattern::new(r"social\s+security\s+number[^:\n]*:", "social_security_number", Text, true),
        LabelPattern::new(r"first\s+name[^:\n]*:", "first_name", Text, true),
        LabelPattern::new(r"last\s+name[^:\n]*:", "last_name", Text, true),
        LabelPattern::new(r"middle\s+initial[^:\n]*:", "middle_initial", Text, false),
        LabelPattern::new(r"date\s+of\s+birth[^:\n]*:", "date_of_birth", Date, true),
        LabelPattern::new(r"address[^:\n]*:", "address", Text, true),
        LabelPattern::new(r"phone[^:\n]*:", "phone", Tel, false),
        LabelPattern::new(r"e-?mail[^:\n]*:", "email", Email, false),
        LabelPattern::new(r"signature[^:\n]*:", "signature", Text, true),
        LabelPattern::new(r"\bdate\b[^:\n]*:", "date", Date, false)
            .excluding(r"date\s+of\s+birth"),
        LabelPattern::new(r"veteran[^:\n]*\bid\b[^:\n]*:", "veteran_id", Text, true),
        LabelPattern::new(r"service[^:\n]*number[^:\n]*:", "service_number", Text, true),
    ]
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_synthetic_choices: default_max_synthetic_choices(),
            acroform_types: AcroFormTypes::default(),
            widget_types: WidgetTypes::default(),
            fetch: FetchConfig::default(),
            labels: default_labels(),
        }
    }
}

impl ExtractorConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| FormsiftError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Resolve the effective configuration: explicit path, then
    /// `$FORMSIFT_CONFIG`, then the user config dir, then built-in defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        if let Ok(path) = env::var(CONFIG_ENV) {
            return Self::load(Path::new(&path));
        }
        match default_config_path() {
            Some(path) if path.exists() => {
                log::debug!("loading config from {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| FormsiftError::Config(e.to_string()))
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("formsift").join("config.toml"))
}

// Get pdfium library path from environment or use default
pub fn pdfium_library_path() -> PathBuf {
    env::var(PDFIUM_PATH_ENV)
        .unwrap_or_else(|_| "./lib".to_string())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_builtin_tables() {
        let config = ExtractorConfig::default();
        assert_eq!(config.max_synthetic_choices, 10);
        let types = &config.acroform_types;
        assert_eq!(types.kind_for(Some("Tx")), FieldKind::Text);
        assert_eq!(types.kind_for(Some("Ch")), FieldKind::Select);
        assert_eq!(types.kind_for(Some("Btn")), FieldKind::Checkbox);
        assert_eq!(types.kind_for(Some("Sig")), FieldKind::Signature);
        assert_eq!(types.kind_for(Some("Xyz")), FieldKind::Unknown);
        assert_eq!(types.kind_for(None), FieldKind::Text);
        assert_eq!(config.labels.len(), 12);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = ExtractorConfig::from_toml_str(
            r#"
            max_synthetic_choices = 3

            [widget_types]
            list_box = "unknown"
            "#,
        )
        .unwrap();
        assert_eq!(config.max_synthetic_choices, 3);
        assert_eq!(config.widget_types.list_box, FieldKind::Unknown);
        assert_eq!(config.widget_types.combo_box, FieldKind::Select);
        assert_eq!(config.labels, default_labels());
    }

    #[test]
    fn partial_acroform_types_keep_defaults() {
        let config = ExtractorConfig::from_toml_str(
            r#"
            [acroform_types]
            Tx = "email"
            Xfa = "button"
            "#,
        )
        .unwrap();
        let types = &config.acroform_types;
        assert_eq!(types.kind_for(Some("Tx")), FieldKind::Email);
        assert_eq!(types.kind_for(Some("Xfa")), FieldKind::Button);
        assert_eq!(types.kind_for(Some("Ch")), FieldKind::Select);
        assert_eq!(types.kind_for(Some("Btn")), FieldKind::Checkbox);
        assert_eq!(types.kind_for(Some("Sig")), FieldKind::Signature);
    }

    #[test]
    fn label_table_can_be_replaced() {
        let config = ExtractorConfig::from_toml_str(
            r#"
            [[labels]]
            pattern = "claim\\s+number[^:\n]*:"
            name = "claim_number"
            type = "text"
            required = true
            "#,
        )
        .unwrap();
        assert_eq!(config.labels.len(), 1);
        assert_eq!(config.labels[0].name, "claim_number");
    }

    #[test]
    fn round_trips_through_toml() {
        let config = ExtractorConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(ExtractorConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn rejects_unknown_kind() {
        let err = ExtractorConfig::from_toml_str("[acroform_types]\nTx = \"textarea\"\n");
        assert!(matches!(err, Err(FormsiftError::Config(_))));
    }
}
