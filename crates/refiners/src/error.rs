//! Error taxonomy of refiner runs.
//!
//! Structural errors come from `sdkgen-dom`; configuration and unsupported
//! construct errors are raised here. Every refiner returns [`RefineError`].

use sdkgen_dom::StructuralError;
use thiserror::Error;

use crate::config::GenerationLanguage;

/// Invalid or missing per-run configuration, or an invalid pass composition.
///
/// Always raised before the first pass touches the tree.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A required value is missing or empty.
    #[error("missing configuration value '{0}'")]
    Missing(&'static str),

    /// A value is present but unusable.
    #[error("invalid configuration value for '{field}': {reason}")]
    Invalid {
        /// Configuration key.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// The language selector names no known target.
    #[error("unknown target language '{0}'")]
    UnknownLanguage(String),

    /// The configuration file could not be read.
    #[error("failed to read configuration file '{path}': {source}")]
    Read {
        /// File path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A pass is scheduled before one of its declared prerequisites.
    #[error("pass '{pass}' must run after '{prerequisite}' in the {target} pipeline")]
    PassOrder {
        /// Target whose pipeline is misassembled.
        target: GenerationLanguage,
        /// Pass scheduled too early.
        pass: &'static str,
        /// Pass that must precede it.
        prerequisite: &'static str,
    },
}

/// A target met a shape of the code model it has no lowering rule for.
///
/// Fatal for that target only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{construct} at '{path}' is not supported{}", describe_target(.target, .pass))]
pub struct UnsupportedConstructError {
    /// Description of the unsupported shape.
    pub construct: String,
    /// Qualified path of the element.
    pub path: String,
    /// Target being refined, filled in by the pipeline.
    pub target: Option<GenerationLanguage>,
    /// Pass that gave up, filled in by the pipeline.
    pub pass: Option<&'static str>,
}

fn describe_target(target: &Option<GenerationLanguage>, pass: &Option<&'static str>) -> String {
    match (target, pass) {
        (Some(target), Some(pass)) => format!(" by the {target} refiner ({pass})"),
        (Some(target), None) => format!(" by the {target} refiner"),
        (None, Some(pass)) => format!(" ({pass})"),
        (None, None) => String::new(),
    }
}

impl UnsupportedConstructError {
    /// Error for the element at `path`.
    pub fn new(construct: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            construct: construct.into(),
            path: path.into(),
            target: None,
            pass: None,
        }
    }
}

/// Any failure of a refiner run.
#[derive(Debug, Error)]
pub enum RefineError {
    /// The tree violates an invariant.
    #[error(transparent)]
    Structural(#[from] StructuralError),

    /// The run was misconfigured.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The target cannot lower part of the tree.
    #[error(transparent)]
    Unsupported(#[from] UnsupportedConstructError),
}

impl RefineError {
    /// Attributes the error to a pass and target when it does not name them yet.
    pub fn in_pass(self, pass: &'static str, target: GenerationLanguage) -> Self {
        match self {
            RefineError::Structural(err) => RefineError::Structural(err.in_pass(pass)),
            RefineError::Unsupported(mut err) => {
                err.pass.get_or_insert(pass);
                err.target.get_or_insert(target);
                RefineError::Unsupported(err)
            }
            other @ RefineError::Configuration(_) => other,
        }
    }

    /// Unsupported constructs only abort the affected target.
    pub fn is_target_local(&self) -> bool {
        matches!(self, RefineError::Unsupported(_))
    }
}
