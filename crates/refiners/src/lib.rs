//! Per-language refiners for the sdkgen code model.
//!
//! A refiner takes the language-neutral [`CodeTree`] built from an API
//! description and lowers it, in place, into the shape one target language's
//! writer expects: reserved names escaped, unions turned into wrapper classes,
//! imports resolved, accessors and constructors synthesized.
//!
//! ```no_run
//! use sdkgen_refiners::{refiner_for, GenerationConfiguration, GenerationLanguage};
//! # fn run(tree: &mut sdkgen_dom::CodeTree) -> Result<(), Box<dyn std::error::Error>> {
//! let config = GenerationConfiguration::new(GenerationLanguage::CSharp, "GraphClient", "Graph");
//! refiner_for(&config)?.refine(tree)?;
//! # Ok(())
//! # }
//! ```

use rayon::prelude::*;
use sdkgen_dom::CodeTree;
use tracing::{info, warn};

pub mod config;
pub mod conventions;
pub mod error;
pub mod naming;
pub mod pipeline;
pub mod targets;
pub mod toolbox;
pub mod union_codec;

pub use config::{GenerationConfiguration, GenerationLanguage};
pub use error::{ConfigurationError, RefineError, UnsupportedConstructError};
pub use pipeline::{PassId, Pipeline};
pub use targets::{
    refiner_for, CSharpRefiner, GoRefiner, JavaRefiner, LanguageRefiner, RubyRefiner, ShellRefiner,
    TypeScriptRefiner,
};
pub use union_codec::{CodecError, UnionCodec, WrapperValue};

/// Result of refining one target in [`refine_targets`].
#[derive(Debug)]
pub struct TargetOutcome {
    /// Target of this run.
    pub language: GenerationLanguage,
    /// The refined copy, or why the target failed.
    pub result: Result<CodeTree, RefineError>,
}

/// Refines a private copy of `tree` for every configuration, in parallel.
///
/// Targets never observe each other: a failure only affects its own outcome.
/// Outcomes keep the order of `configs`.
pub fn refine_targets(tree: &CodeTree, configs: &[GenerationConfiguration]) -> Vec<TargetOutcome> {
    info!(targets = configs.len(), elements = tree.len(), "Refining targets.");
    configs
        .par_iter()
        .map(|config| {
            let result = refiner_for(config)
                .map_err(RefineError::from)
                .and_then(|refiner| {
                    let mut copy = tree.clone();
                    refiner.refine(&mut copy).map(|()| copy)
                });
            if let Err(err) = &result {
                warn!(language = %config.language, error = %err, "Target refinement failed.");
            }
            TargetOutcome {
                language: config.language,
                result,
            }
        })
        .collect()
}
