//! Experiment documents.
//!
//! An experiment is described by a YAML (or TOML) document:
//!
//! ```yaml
//! name: scenarios
//! cases:
//!   emis:
//!     longname: Emissions scenario
//!     vals: [low, high]
//!   param:
//!     longname: Tuning parameter
//!     vals: [x, y, z]
//! data_dir: /data
//! case_path: "emis_{emis}/param_{param}"
//! output_prefix: "{emis}.{param}."
//! output_suffix: .nc
//! ```
//!
//! Case order in the document is the case order of the experiment.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

use crate::case::Case;
use crate::error::ExperimentError;
use crate::experiment::Experiment;

/// Serialization format of an experiment document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML, the default.
    Yaml,
    /// TOML, selected by a `.toml` extension.
    Toml,
}

impl ConfigFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

/// Top-level experiment document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExperimentConfig {
    /// Experiment name.
    pub name: String,

    /// Cases keyed by case key, in declaration order.
    pub cases: IndexMap<String, CaseConfig>,

    /// Root directory of the experiment output.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory template; values are nested in case order when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_path: Option<String>,

    /// File name prefix template.
    #[serde(default)]
    pub output_prefix: String,

    /// Literal file name suffix.
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,

    /// Check the directory layout when the experiment is built.
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub validate_data: bool,

    /// Output layout flag written by older experiment documents. Carried
    /// through parse and write; paths are always one file per label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeseries: Option<bool>,
}

/// One case in an experiment document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseConfig {
    /// Human-readable name.
    #[serde(alias = "long_name")]
    pub longname: String,

    /// Case values, in order.
    #[serde(deserialize_with = "scalar_list")]
    pub vals: Vec<String>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./")
}
fn default_output_suffix() -> String {
    ".nc".to_string()
}
fn default_true() -> bool {
    true
}
fn is_true(v: &bool) -> bool {
    *v
}

/// A case value as it may appear in a document.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(x) => format!("{x:?}"),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

/// Accept `vals: [low, 1850, 0.5, true]` and keep every entry as text.
fn scalar_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let raw = Vec::<Scalar>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(Scalar::into_string).collect())
}

impl ExperimentConfig {
    /// Parse a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`ExperimentError::Config`] for malformed documents, missing
    /// required fields, or unknown fields.
    pub fn from_yaml_str(s: &str) -> Result<Self, ExperimentError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Parse a TOML document.
    ///
    /// # Errors
    ///
    /// As [`from_yaml_str`](Self::from_yaml_str).
    pub fn from_toml_str(s: &str) -> Result<Self, ExperimentError> {
        Ok(toml::from_str(s)?)
    }

    /// Render as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ExperimentError::Config`] if serialization fails.
    pub fn to_yaml_string(&self) -> Result<String, ExperimentError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Render as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ExperimentError::Config`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, ExperimentError> {
        Ok(toml::to_string(self)?)
    }

    /// Read a document, choosing the format from the extension.
    ///
    /// # Errors
    ///
    /// Returns [`ExperimentError::Io`] if the file cannot be read and
    /// [`ExperimentError::Config`] if it cannot be parsed.
    pub fn read(path: &Path) -> Result<Self, ExperimentError> {
        let text = fs::read_to_string(path).map_err(|e| ExperimentError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        match ConfigFormat::from_path(path) {
            ConfigFormat::Yaml => Self::from_yaml_str(&text),
            ConfigFormat::Toml => Self::from_toml_str(&text),
        }
    }

    /// Write the document, choosing the format from the extension.
    ///
    /// # Errors
    ///
    /// Returns [`ExperimentError::Io`] if the file cannot be written.
    pub fn write(&self, path: &Path) -> Result<(), ExperimentError> {
        let text = match ConfigFormat::from_path(path) {
            ConfigFormat::Yaml => self.to_yaml_string()?,
            ConfigFormat::Toml => self.to_toml_string()?,
        };
        fs::write(path, text).map_err(|e| ExperimentError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Build the experiment this document describes.
    ///
    /// # Errors
    ///
    /// Any error of [`Case::new`] or [`ExperimentBuilder::build`].
    ///
    /// [`ExperimentBuilder::build`]: crate::ExperimentBuilder::build
    pub fn into_experiment(self) -> Result<Experiment, ExperimentError> {
        let cases = self
            .cases
            .into_iter()
            .map(|(key, case)| Case::new(key, case.longname, case.vals))
            .collect::<Result<Vec<_>, _>>()?;

        let mut builder = Experiment::builder(self.name)
            .with_cases(cases)
            .with_data_dir(self.data_dir)
            .with_output_prefix(self.output_prefix)
            .with_output_suffix(self.output_suffix)
            .with_validate_data(self.validate_data);
        if let Some(case_path) = self.case_path {
            builder = builder.with_case_path(case_path);
        }
        builder.build()
    }
}

impl TryFrom<ExperimentConfig> for Experiment {
    type Error = ExperimentError;

    fn try_from(config: ExperimentConfig) -> Result<Self, Self::Error> {
        config.into_experiment()
    }
}

impl From<&Experiment> for ExperimentConfig {
    fn from(exp: &Experiment) -> Self {
        Self {
            name: exp.name().to_string(),
            cases: exp
                .cases()
                .iter()
                .map(|case| {
                    (
                        case.key().to_string(),
                        CaseConfig {
                            longname: case.long_name().to_string(),
                            vals: case.values().to_vec(),
                        },
                    )
                })
                .collect(),
            data_dir: exp.data_dir().to_path_buf(),
            case_path: exp.case_path().map(str::to_string),
            output_prefix: exp.output_prefix().to_string(),
            output_suffix: exp.output_suffix().to_string(),
            validate_data: exp.validate_data(),
            timeseries: None,
        }
    }
}

impl Experiment {
    /// The document describing this experiment.
    pub fn to_config(&self) -> ExperimentConfig {
        ExperimentConfig::from(self)
    }
}

/// Read an experiment from a YAML or TOML document.
///
/// # Errors
///
/// As [`ExperimentConfig::read`] and [`ExperimentConfig::into_experiment`].
pub fn load(path: &Path) -> Result<Experiment, ExperimentError> {
    info!(path = %path.display(), "reading experiment");
    ExperimentConfig::read(path)?.into_experiment()
}

/// Write an experiment to a YAML or TOML document.
///
/// # Errors
///
/// As [`ExperimentConfig::write`].
pub fn save(experiment: &Experiment, path: &Path) -> Result<(), ExperimentError> {
    info!(path = %path.display(), experiment = %experiment.name(), "writing experiment");
    experiment.to_config().write(path)
}
