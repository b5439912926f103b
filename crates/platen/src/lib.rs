//! # Platen - Template Rendering Integration
//!
//! Platen wires the [`platen_render`] engine facade into an application:
//! a lightweight service container, an application kernel abstraction, and
//! a fluent [`RenderingProvider`] that turns declarative configuration into
//! a registered, ready-to-use rendering service.
//!
//! ## Core Concepts
//!
//! - [`Kernel`] / [`AppKernel`]: the application context — root path,
//!   deployment flavor, and the service container
//! - [`ServiceContainer`]: type-keyed storage for shared services
//! - [`RenderingProvider`]: fluent configuration builder; its
//!   [`register`](RenderingProvider::register) call builds one engine
//!   environment and publishes the facade, the `Arc<dyn Rendering>`
//!   capability, and the raw engine into the container
//! - [`Renderer`] / [`Rendering`]: re-exported from [`platen_render`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use platen::{AppKernel, Kernel, Renderer, RenderingProvider};
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut kernel = AppKernel::new("/srv/app").production(true);
//!
//! RenderingProvider::standard(["views"])
//!     .with_globals([("site_name".to_string(), serde_json::json!("Acme"))])
//!     .register(&mut kernel)?;
//!
//! let renderer = kernel.services().get_required::<Arc<Renderer>>()?;
//! println!("{}", renderer.render("index.html", ())?);
//! # Ok(())
//! # }
//! ```
//!
//! For direct control over the engine — custom loaders, options, building
//! environments by hand — use [`platen_render`] (re-exported as
//! [`render`]).

pub mod container;
pub mod kernel;
pub mod provider;

pub use platen_render as render;

pub use container::ServiceContainer;
pub use kernel::{AppKernel, Kernel};
pub use provider::{RenderingProvider, DEFAULT_CACHE_DIR, DEFAULT_TEMPLATE_DIR};

pub use platen_render::{
    build_environment, CachedLoader, EngineOptions, ExtensionFn, ExtensionProvider,
    FilesystemLoader, RenderError, Renderer, Rendering, SearchPath, TemplateLoader,
};
