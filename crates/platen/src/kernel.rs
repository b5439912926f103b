//! Host kernel surface.
//!
//! A service provider registers against something that can answer three
//! questions: where is the application root, is this a production
//! deployment, and where do services go. [`Kernel`] is that seam; hosts
//! with their own application object implement it, everyone else (and the
//! test suite) uses the concrete [`AppKernel`].

use std::path::{Path, PathBuf};

use crate::container::ServiceContainer;

/// What a service provider consumes at registration time.
pub trait Kernel {
    /// The application root path.
    fn root(&self) -> &Path;

    /// Whether the host reports a production deployment. Read at
    /// registration time, never earlier.
    fn is_production(&self) -> bool;

    /// Read access to the service container.
    fn services(&self) -> &ServiceContainer;

    /// Write access to the service container.
    fn services_mut(&mut self) -> &mut ServiceContainer;

    /// Resolves a path against the application root. Absolute inputs pass
    /// through unchanged.
    fn app_path(&self, relative: &Path) -> PathBuf {
        if relative.is_absolute() {
            relative.to_path_buf()
        } else {
            self.root().join(relative)
        }
    }
}

/// Concrete application kernel.
///
/// # Example
///
/// ```rust
/// use platen::{AppKernel, Kernel};
///
/// let kernel = AppKernel::new("/srv/app").production(true);
/// assert!(kernel.is_production());
/// ```
pub struct AppKernel {
    root: PathBuf,
    production: bool,
    services: ServiceContainer,
}

impl AppKernel {
    /// Creates a kernel rooted at the given application path, in
    /// non-production mode, with an empty service container.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            production: false,
            services: ServiceContainer::new(),
        }
    }

    /// Sets the deployment mode.
    pub fn production(mut self, production: bool) -> Self {
        self.production = production;
        self
    }
}

impl Kernel for AppKernel {
    fn root(&self) -> &Path {
        &self.root
    }

    fn is_production(&self) -> bool {
        self.production
    }

    fn services(&self) -> &ServiceContainer {
        &self.services
    }

    fn services_mut(&mut self) -> &mut ServiceContainer {
        &mut self.services
    }
}
