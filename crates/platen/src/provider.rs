//! The rendering service provider.
//!
//! [`RenderingProvider`] is a configuration builder: it accumulates search
//! paths, engine options, caching directives, globals, and optional custom
//! loader or pre-built environment through fluent calls, then resolves all
//! of it against a [`Kernel`] in a single [`register`](RenderingProvider::register)
//! step. Registration builds one engine environment, wraps it in a
//! [`Renderer`] facade, and publishes three bindings into the kernel's
//! service container:
//!
//! - `Arc<Renderer>` — the concrete facade
//! - `Arc<dyn Rendering>` — the generic rendering capability (same instance)
//! - `Arc<minijinja::Environment<'static>>` — the raw engine, for advanced
//!   consumers (same instance the facade holds)
//!
//! # Example
//!
//! ```rust,no_run
//! use platen::{AppKernel, Kernel, RenderingProvider, Renderer};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), platen::RenderError> {
//! let mut kernel = AppKernel::new("/srv/app").production(true);
//!
//! RenderingProvider::standard(["views"])
//!     .with_globals([("site_name".to_string(), serde_json::json!("Acme"))])
//!     .register(&mut kernel)?;
//!
//! let renderer = kernel.services().get_required::<Arc<Renderer>>().unwrap();
//! let html = renderer.render("index.html", ())?;
//! # Ok(())
//! # }
//! ```
//!
//! # Construction precedence
//!
//! Evaluated at registration time, highest first:
//!
//! 1. [`with_environment`](RenderingProvider::with_environment): the given
//!    environment is used as-is; loader, options, paths, and caching are
//!    ignored.
//! 2. [`with_loader`](RenderingProvider::with_loader): an environment is
//!    built from that loader plus the options bag.
//! 3. Otherwise a [`FilesystemLoader`] is built, rooted at the kernel's
//!    application root, with every configured search path registered under
//!    its namespace (or the default namespace).
//!
//! Registering twice rebuilds everything and silently overwrites the three
//! container bindings; there is no double-registration guard.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use minijinja::Environment;
use tracing::debug;

use platen_render::{
    build_environment, EngineOptions, FilesystemLoader, RenderError, Renderer, Rendering,
    SearchPath, TemplateLoader,
};

use crate::kernel::Kernel;

/// Search path used when none is configured.
pub const DEFAULT_TEMPLATE_DIR: &str = "templates";

/// Cache subdirectory used by [`RenderingProvider::standard`], resolved
/// under the application root.
pub const DEFAULT_CACHE_DIR: &str = "var/templates";

/// Configuration builder for the rendering service.
pub struct RenderingProvider {
    paths: Vec<SearchPath>,
    options: EngineOptions,
    loader: Option<Arc<dyn TemplateLoader>>,
    environment: Option<Environment<'static>>,
    globals: Option<BTreeMap<String, serde_json::Value>>,
    cache_dir: Option<PathBuf>,
    cache_if_production: bool,
}

impl Default for RenderingProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderingProvider {
    /// Creates a provider with no paths, default options, and no caching.
    pub fn new() -> Self {
        Self {
            paths: Vec::new(),
            options: EngineOptions::new(),
            loader: None,
            environment: None,
            globals: None,
            cache_dir: None,
            cache_if_production: false,
        }
    }

    /// Creates a provider from search paths, falling back to the default
    /// templates directory when none are given.
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<SearchPath>,
    {
        let mut paths: Vec<SearchPath> = paths.into_iter().map(Into::into).collect();
        if paths.is_empty() {
            paths.push(SearchPath::new(DEFAULT_TEMPLATE_DIR));
        }
        Self::new().with_paths(paths)
    }

    /// Creates a provider with the standard layout: the given paths plus the
    /// default templates directory, and production-gated caching under
    /// [`DEFAULT_CACHE_DIR`].
    pub fn standard<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<SearchPath>,
    {
        let mut paths: Vec<SearchPath> = paths.into_iter().map(Into::into).collect();
        paths.push(SearchPath::new(DEFAULT_TEMPLATE_DIR));
        Self::new()
            .with_paths(paths)
            .cache_if_production(DEFAULT_CACHE_DIR)
    }

    /// Replaces the search-path mapping wholesale. Order is preserved.
    pub fn with_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<SearchPath>,
    {
        self.paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the options bag wholesale.
    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// Supplies a custom template-loading strategy, bypassing default
    /// filesystem loader construction.
    pub fn with_loader(mut self, loader: impl TemplateLoader + 'static) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }

    /// Supplies a pre-built engine environment, bypassing loader, options,
    /// paths, and caching entirely.
    pub fn with_environment(mut self, environment: Environment<'static>) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Sets the global variables pushed into the renderer at registration.
    pub fn with_globals<I>(mut self, globals: I) -> Self
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        self.globals = Some(globals.into_iter().collect());
        self
    }

    /// Enables unconditional template-source caching under `dir`, resolved
    /// against the application root at registration time.
    pub fn cache(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Enables caching under `dir` only when the kernel reports a
    /// production deployment at registration time.
    pub fn cache_if_production(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_if_production = true;
        self.cache(dir)
    }

    /// Returns `true` if a custom loader was supplied.
    pub fn has_loader(&self) -> bool {
        self.loader.is_some()
    }

    /// Returns `true` if a pre-built environment was supplied.
    pub fn has_environment(&self) -> bool {
        self.environment.is_some()
    }

    /// The configured search paths, in order.
    pub fn search_paths(&self) -> &[SearchPath] {
        &self.paths
    }

    /// Resolves the configuration against the kernel and publishes the
    /// rendering service.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Loader`] when the path configuration is
    /// invalid (nonexistent search directory, empty namespace). Nothing is
    /// caught or recovered locally.
    pub fn register(&mut self, kernel: &mut dyn Kernel) -> Result<(), RenderError> {
        self.resolve_cache(kernel);

        let mut renderer = self.make_renderer(kernel)?;
        if let Some(globals) = &self.globals {
            renderer.add_globals(globals.iter().map(|(k, v)| (k.clone(), v)));
        }

        let renderer = Arc::new(renderer);
        let services = kernel.services_mut();
        services.insert(renderer.shared_environment());
        services.insert::<Arc<dyn Rendering>>(Arc::clone(&renderer) as Arc<dyn Rendering>);
        services.insert(renderer);
        debug!("rendering service published");
        Ok(())
    }

    /// Applies cache-directory resolution to the options bag.
    fn resolve_cache(&mut self, kernel: &dyn Kernel) {
        let Some(dir) = &self.cache_dir else {
            return;
        };
        if !self.cache_if_production || kernel.is_production() {
            let resolved = kernel.app_path(dir);
            debug!(cache_dir = %resolved.display(), "template cache enabled");
            self.options.cache = Some(resolved);
        }
    }

    /// Builds the facade per the construction precedence.
    fn make_renderer(&self, kernel: &dyn Kernel) -> Result<Renderer, RenderError> {
        if let Some(environment) = &self.environment {
            debug!("using pre-built engine environment");
            return Ok(Renderer::new(environment.clone()));
        }
        if let Some(loader) = &self.loader {
            debug!("building engine environment from custom loader");
            return Ok(Renderer::new(build_environment(
                Arc::clone(loader),
                &self.options,
            )));
        }

        let mut loader = FilesystemLoader::new(kernel.root());
        for path in &self.paths {
            match &path.namespace {
                Some(namespace) => loader.add_namespaced(namespace, &path.dir)?,
                None => loader.add_path(&path.dir)?,
            }
        }
        debug!(
            root = %kernel.root().display(),
            paths = self.paths.len(),
            "building engine environment from filesystem loader"
        );
        Ok(Renderer::new(build_environment(loader, &self.options)))
    }
}
