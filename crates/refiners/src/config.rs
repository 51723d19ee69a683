//! Per-run generation settings.
//!
//! Loaded from TOML:
//!
//! ```toml
//! language = "csharp"
//! client_class_name = "GraphClient"
//! client_namespace_name = "Graph.Sdk"
//! uses_backing_store = false
//! serializers = ["Sdkgen.Serialization.Json.JsonSerializationWriterFactory"]
//! deserializers = ["Sdkgen.Serialization.Json.JsonParseNodeFactory"]
//! ```
//!
//! Empty serializer or deserializer lists are filled with the target's defaults.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigurationError;

/// Target language of a refiner run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationLanguage {
    /// C#.
    CSharp,
    /// Java.
    Java,
    /// TypeScript.
    TypeScript,
    /// Go.
    Go,
    /// Ruby.
    Ruby,
    /// Command-line client built on the C# stack.
    Shell,
}

impl GenerationLanguage {
    /// Every supported target.
    pub const ALL: [GenerationLanguage; 6] = [
        GenerationLanguage::CSharp,
        GenerationLanguage::Java,
        GenerationLanguage::TypeScript,
        GenerationLanguage::Go,
        GenerationLanguage::Ruby,
        GenerationLanguage::Shell,
    ];

    /// Lower-case selector used in configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            GenerationLanguage::CSharp => "csharp",
            GenerationLanguage::Java => "java",
            GenerationLanguage::TypeScript => "typescript",
            GenerationLanguage::Go => "go",
            GenerationLanguage::Ruby => "ruby",
            GenerationLanguage::Shell => "shell",
        }
    }

    /// Serialization writer factories registered when none are configured.
    pub fn default_serializers(self) -> &'static [&'static str] {
        match self {
            GenerationLanguage::CSharp | GenerationLanguage::Shell => &[
                "Sdkgen.Serialization.Json.JsonSerializationWriterFactory",
                "Sdkgen.Serialization.Text.TextSerializationWriterFactory",
            ],
            GenerationLanguage::Java => &[
                "io.sdkgen.serialization.JsonSerializationWriterFactory",
                "io.sdkgen.serialization.TextSerializationWriterFactory",
            ],
            GenerationLanguage::TypeScript => {
                &["@sdkgen/serialization-json.JsonSerializationWriterFactory"]
            }
            GenerationLanguage::Go => {
                &["github.com/sdkgen/serialization-go/json.JsonSerializationWriterFactory"]
            }
            GenerationLanguage::Ruby => {
                &["sdkgen_serialization_json.JsonSerializationWriterFactory"]
            }
        }
    }

    /// Parse node factories registered when none are configured.
    pub fn default_deserializers(self) -> &'static [&'static str] {
        match self {
            GenerationLanguage::CSharp | GenerationLanguage::Shell => &[
                "Sdkgen.Serialization.Json.JsonParseNodeFactory",
                "Sdkgen.Serialization.Text.TextParseNodeFactory",
            ],
            GenerationLanguage::Java => &[
                "io.sdkgen.serialization.JsonParseNodeFactory",
                "io.sdkgen.serialization.TextParseNodeFactory",
            ],
            GenerationLanguage::TypeScript => &["@sdkgen/serialization-json.JsonParseNodeFactory"],
            GenerationLanguage::Go => {
                &["github.com/sdkgen/serialization-go/json.JsonParseNodeFactory"]
            }
            GenerationLanguage::Ruby => &["sdkgen_serialization_json.JsonParseNodeFactory"],
        }
    }
}

impl fmt::Display for GenerationLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationLanguage {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        GenerationLanguage::ALL
            .into_iter()
            .find(|language| language.as_str() == wanted)
            .ok_or_else(|| ConfigurationError::UnknownLanguage(s.to_string()))
    }
}

/// Read-only settings of one refiner run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationConfiguration {
    /// Target language.
    pub language: GenerationLanguage,
    /// Name of the generated entry-point class.
    ///
    /// Validated here and handed to the writer through
    /// [`LanguageRefiner::configuration`](crate::LanguageRefiner::configuration).
    /// No refiner pass reads it.
    pub client_class_name: String,
    /// Root namespace of the generated code. Writers resolve relative import
    /// paths against it; like the class name it passes through refining as is.
    pub client_namespace_name: String,
    /// Models keep their values in a backing store.
    #[serde(default)]
    pub uses_backing_store: bool,
    /// Serialization writer factories, `namespace.Symbol` formatted.
    #[serde(default)]
    pub serializers: Vec<String>,
    /// Parse node factories, `namespace.Symbol` formatted.
    #[serde(default)]
    pub deserializers: Vec<String>,
}

impl GenerationConfiguration {
    /// Configuration with the target's default serialization modules.
    pub fn new(
        language: GenerationLanguage,
        client_class_name: impl Into<String>,
        client_namespace_name: impl Into<String>,
    ) -> Self {
        Self {
            language,
            client_class_name: client_class_name.into(),
            client_namespace_name: client_namespace_name.into(),
            uses_backing_store: false,
            serializers: Vec::new(),
            deserializers: Vec::new(),
        }
        .with_default_modules()
    }

    /// Same settings for another target, with that target's default modules.
    pub fn for_language(&self, language: GenerationLanguage) -> Self {
        Self {
            language,
            serializers: Vec::new(),
            deserializers: Vec::new(),
            ..self.clone()
        }
        .with_default_modules()
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigurationError> {
        let config: GenerationConfiguration = toml::from_str(source)?;
        let config = config.with_default_modules();
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigurationError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigurationError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        debug!(
            path = %path.display(),
            language = %config.language,
            "Loaded generation configuration."
        );
        Ok(config)
    }

    /// Checks names and module lists.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.client_class_name.trim().is_empty() {
            return Err(ConfigurationError::Missing("client_class_name"));
        }
        if !is_identifier(&self.client_class_name) {
            return Err(ConfigurationError::Invalid {
                field: "client_class_name",
                reason: format!("'{}' is not a valid identifier", self.client_class_name),
            });
        }
        if self.client_namespace_name.trim().is_empty() {
            return Err(ConfigurationError::Missing("client_namespace_name"));
        }
        if let Some(segment) = self
            .client_namespace_name
            .split('.')
            .find(|segment| !is_identifier(segment))
        {
            return Err(ConfigurationError::Invalid {
                field: "client_namespace_name",
                reason: format!("segment '{segment}' is not a valid identifier"),
            });
        }
        check_modules("serializers", &self.serializers)?;
        check_modules("deserializers", &self.deserializers)
    }

    fn with_default_modules(mut self) -> Self {
        if self.serializers.is_empty() {
            self.serializers = owned(self.language.default_serializers());
        }
        if self.deserializers.is_empty() {
            self.deserializers = owned(self.language.default_deserializers());
        }
        self
    }
}

fn owned(modules: &[&str]) -> Vec<String> {
    modules.iter().map(ToString::to_string).collect()
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn check_modules(field: &'static str, modules: &[String]) -> Result<(), ConfigurationError> {
    for module in modules {
        match module.rsplit_once('.') {
            Some((namespace, symbol)) if !namespace.is_empty() && is_identifier(symbol) => {}
            _ => {
                return Err(ConfigurationError::Invalid {
                    field,
                    reason: format!("'{module}' is not a 'namespace.Symbol' module reference"),
                });
            }
        }
    }
    Ok(())
}

/// Splits a `namespace.Symbol` module reference.
pub(crate) fn split_module(module: &str) -> Option<(&str, &str)> {
    module.rsplit_once('.')
}
