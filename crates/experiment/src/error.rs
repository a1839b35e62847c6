//! Error types for casegrid-experiment.

use std::path::PathBuf;

use crate::space::Combination;

/// Boxed error reported by a dataset engine or a preprocessing step.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type for all fallible operations in the casegrid-experiment crate.
///
/// Construction problems (`InvalidCase`, `Config`, `Template`,
/// `UnknownPlaceholder`, `PathNotFound`) prevent an [`Experiment`] from
/// existing at all. Load problems carry the case-value combination that
/// failed.
///
/// [`Experiment`]: crate::Experiment
#[derive(Debug, thiserror::Error)]
pub enum ExperimentError {
    /// Returned when a case key or value list is malformed.
    #[error("invalid case '{key}': {reason}")]
    InvalidCase {
        /// Key of the offending case.
        key: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Returned for malformed configuration documents or experiment settings.
    #[error("configuration error: {reason}")]
    Config {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a template string cannot be parsed.
    #[error("invalid template '{template}': {reason}")]
    Template {
        /// The template source.
        template: String,
        /// Description of the syntax problem.
        reason: String,
    },

    /// Returned when a template names a placeholder no case declares.
    #[error("template '{template}' references undeclared case '{name}'")]
    UnknownPlaceholder {
        /// The template source.
        template: String,
        /// The unresolved placeholder name.
        name: String,
    },

    /// Returned when an expected directory is absent.
    #[error("path not found: {}", path.display())]
    PathNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// Returned when a combination has the wrong number of values.
    #[error("expected {expected} case value(s), got {got}")]
    CaseCount {
        /// Number of declared cases.
        expected: usize,
        /// Number of values supplied.
        got: usize,
    },

    /// Returned when a key is not a declared case.
    #[error("unknown case '{key}'")]
    UnknownCase {
        /// The undeclared key.
        key: String,
    },

    /// Returned when a value is not declared for its case.
    #[error("value '{value}' is not declared for case '{case}'")]
    UnknownCaseValue {
        /// Key of the case.
        case: String,
        /// The undeclared value.
        value: String,
    },

    /// Returned when a file label cannot be substituted into a path.
    #[error("invalid label '{label}'")]
    InvalidLabel {
        /// The rejected label.
        label: String,
    },

    /// Returned when the engine cannot open a resolved file.
    #[error("failed to load case {index} {combination} from {}", path.display())]
    Load {
        /// Position of the combination in the case space.
        index: usize,
        /// The combination that failed.
        combination: Combination,
        /// The resolved file path.
        path: PathBuf,
        /// The engine's error.
        #[source]
        source: BoxError,
    },

    /// Returned when the preprocessing step fails for one combination.
    #[error("preprocessing failed for case {index} {combination}")]
    Preprocess {
        /// Position of the combination in the case space.
        index: usize,
        /// The combination that failed.
        combination: Combination,
        /// The preprocessing error.
        #[source]
        source: BoxError,
    },

    /// Returned when datasets cannot be concatenated along a case dimension.
    #[error("failed to concatenate along '{dim}'")]
    Merge {
        /// The case dimension being introduced.
        dim: String,
        /// The engine's error.
        #[source]
        source: BoxError,
    },

    /// Returned when a combination cannot be selected out of a master dataset.
    #[error("failed to select case {combination} from master dataset")]
    Select {
        /// The combination being selected.
        combination: Combination,
        /// The engine's error.
        #[source]
        source: BoxError,
    },

    /// Returned when a configuration file or directory cannot be accessed.
    #[error("i/o error at {}: {reason}", path.display())]
    Io {
        /// The path involved.
        path: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },
}

impl From<serde_yaml::Error> for ExperimentError {
    fn from(e: serde_yaml::Error) -> Self {
        ExperimentError::Config {
            reason: e.to_string(),
        }
    }
}

impl From<toml::de::Error> for ExperimentError {
    fn from(e: toml::de::Error) -> Self {
        ExperimentError::Config {
            reason: e.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ExperimentError {
    fn from(e: toml::ser::Error) -> Self {
        ExperimentError::Config {
            reason: e.to_string(),
        }
    }
}
