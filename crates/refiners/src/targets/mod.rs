//! One refiner per target language.
//!
//! A refiner is an ordered [`Pipeline`] of toolbox passes, the parameters it
//! feeds them (reserved words, rename rule, default imports) and a few bespoke
//! passes of its own.

use std::fmt;

use sdkgen_dom::CodeTree;

use crate::config::{GenerationConfiguration, GenerationLanguage};
use crate::error::{ConfigurationError, RefineError};
use crate::pipeline::Pipeline;

mod csharp;
mod go;
mod java;
mod ruby;
mod shell;
mod typescript;

pub use csharp::CSharpRefiner;
pub use go::GoRefiner;
pub use java::JavaRefiner;
pub use ruby::RubyRefiner;
pub use shell::ShellRefiner;
pub use typescript::TypeScriptRefiner;

/// Lowers a language-neutral tree for one target.
pub trait LanguageRefiner: fmt::Debug + Send + Sync {
    /// Target language.
    fn language(&self) -> GenerationLanguage;

    /// Settings this refiner was built from, for the writer that runs next.
    fn configuration(&self) -> &GenerationConfiguration;

    /// The ordered passes of this target.
    fn pipeline(&self) -> Pipeline<'_>;

    /// Mutates `tree` in place through the whole pipeline.
    fn refine(&self, tree: &mut CodeTree) -> Result<(), RefineError> {
        self.pipeline().run(tree)
    }
}

/// Builds the refiner selected by `config`, after validating it.
pub fn refiner_for(
    config: &GenerationConfiguration,
) -> Result<Box<dyn LanguageRefiner>, ConfigurationError> {
    config.validate()?;
    let config = config.clone();
    let refiner: Box<dyn LanguageRefiner> = match config.language {
        GenerationLanguage::CSharp => Box::new(CSharpRefiner::new(config)),
        GenerationLanguage::Java => Box::new(JavaRefiner::new(config)),
        GenerationLanguage::TypeScript => Box::new(TypeScriptRefiner::new(config)),
        GenerationLanguage::Go => Box::new(GoRefiner::new(config)),
        GenerationLanguage::Ruby => Box::new(RubyRefiner::new(config)),
        GenerationLanguage::Shell => Box::new(ShellRefiner::new(config)),
    };
    Ok(refiner)
}
