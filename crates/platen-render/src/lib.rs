//! # Platen Render - Template Rendering Facade
//!
//! `platen-render` wraps a template engine ([`minijinja`]) behind a small,
//! stable facade. It owns the engine boundary — error mapping, template
//! loading, construction options — and deliberately nothing else: parsing,
//! compilation caching, and inheritance resolution all stay inside the
//! engine.
//!
//! This crate is the rendering foundation for the `platen` service provider,
//! but can be used on its own wherever an application wants named templates
//! loaded from disk.
//!
//! ## Core Concepts
//!
//! - [`Renderer`]: facade over one engine environment — render, globals,
//!   extension functions, raw-engine access
//! - [`Rendering`]: the object-safe rendering capability for consumers that
//!   don't care about the concrete facade
//! - [`TemplateLoader`] / [`FilesystemLoader`]: how template source is found,
//!   with ordered search paths and `@namespace/name` references
//! - [`EngineOptions`]: the options bag read once at environment construction
//! - [`RenderError`]: loading, syntax, and runtime failures, surfaced from
//!   the engine unchanged
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use platen_render::{build_environment, EngineOptions, FilesystemLoader, Renderer};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Welcome { user: String }
//!
//! # fn main() -> Result<(), platen_render::RenderError> {
//! let mut loader = FilesystemLoader::new("/srv/app");
//! loader.add_path("templates")?;
//!
//! let mut renderer = Renderer::new(build_environment(loader, &EngineOptions::new()));
//! renderer.add_globals([("site_name", "Acme")]);
//!
//! let html = renderer.render("welcome.html", &Welcome { user: "ada".into() })?;
//! # Ok(())
//! # }
//! ```

mod error;
pub mod loader;
pub mod options;
pub mod renderer;

pub use error::RenderError;
pub use loader::{CachedLoader, FilesystemLoader, SearchPath, TemplateLoader};
pub use options::{build_environment, EngineOptions};
pub use renderer::{ExtensionFn, ExtensionProvider, Renderer, Rendering};
