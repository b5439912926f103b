//! Engine construction options.
//!
//! [`EngineOptions`] is the options bag a provider accumulates through
//! configuration and reads exactly once when the engine environment is
//! built. It only carries knobs the underlying engine understands; template
//! compilation and evaluation stay the engine's business.

use std::path::PathBuf;

use minijinja::{AutoEscape, Environment, ErrorKind, UndefinedBehavior};

use crate::loader::{CachedLoader, TemplateLoader};

/// Options applied when constructing an engine environment.
///
/// Replaced wholesale by a provider's `with_options`; mutated only by
/// cache-directory resolution at registration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Source-cache directory. When set, loaded template source is written
    /// through to this directory and served from there on later loads.
    pub cache: Option<PathBuf>,
    /// HTML auto-escaping based on the template name (engine default rules).
    pub auto_escape: bool,
    /// Undefined variables raise a runtime error instead of rendering empty.
    pub strict_variables: bool,
    /// Engine debug mode: richer error context in render failures.
    pub debug: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            cache: None,
            auto_escape: true,
            strict_variables: false,
            debug: false,
        }
    }
}

impl EngineOptions {
    /// Creates the default options bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source-cache directory.
    pub fn cache(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache = Some(dir.into());
        self
    }

    /// Enables or disables HTML auto-escaping.
    pub fn auto_escape(mut self, enabled: bool) -> Self {
        self.auto_escape = enabled;
        self
    }

    /// Enables or disables strict undefined-variable handling.
    pub fn strict_variables(mut self, enabled: bool) -> Self {
        self.strict_variables = enabled;
        self
    }

    /// Enables or disables engine debug mode.
    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Applies the non-cache options to an environment.
    pub fn apply(&self, env: &mut Environment<'static>) {
        if !self.auto_escape {
            env.set_auto_escape_callback(|_| AutoEscape::None);
        }
        if self.strict_variables {
            env.set_undefined_behavior(UndefinedBehavior::Strict);
        }
        env.set_debug(self.debug);
    }
}

/// Builds an engine environment from a loader and an options bag.
///
/// When the options carry a cache directory, the loader is wrapped in a
/// [`CachedLoader`] before being installed. Loader failures surface as
/// engine errors at render time and map back onto
/// [`RenderError`](crate::RenderError) through the usual conversion.
pub fn build_environment<L>(loader: L, options: &EngineOptions) -> Environment<'static>
where
    L: TemplateLoader + 'static,
{
    let mut env = Environment::new();
    options.apply(&mut env);

    let loader: Box<dyn TemplateLoader> = match &options.cache {
        Some(dir) => Box::new(CachedLoader::new(Box::new(loader), dir.clone())),
        None => Box::new(loader),
    };
    env.set_loader(move |name| {
        loader.load(name).map_err(|err| {
            // Keep the original error attached so the conversion back to
            // RenderError can restore its kind instead of guessing.
            minijinja::Error::new(ErrorKind::InvalidOperation, "template loader failed")
                .with_source(err)
        })
    });
    env
}
