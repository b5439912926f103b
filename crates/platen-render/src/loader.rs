//! Template loading.
//!
//! This module defines the [`TemplateLoader`] trait — the seam through which
//! the engine asks for template source — and two implementations:
//!
//! - [`FilesystemLoader`]: the default loader, searching an ordered list of
//!   directories under an application root, with optional namespaces.
//! - [`CachedLoader`]: a decorator that writes loaded source through to a
//!   cache directory and serves subsequent loads from there.
//!
//! # Name Resolution
//!
//! Plain names (`"index.html"`, `"emails/welcome.html"`) search the
//! directories registered without a namespace, in registration order; the
//! first directory containing the file wins. Namespaced names use the
//! `@namespace/rest` form and search only the directories registered under
//! that namespace:
//!
//! ```rust,ignore
//! let mut loader = FilesystemLoader::new("/srv/app");
//! loader.add_path("templates")?;
//! loader.add_namespaced("admin", "vendor/admin/templates")?;
//!
//! loader.load("index.html")?;        // /srv/app/templates/index.html
//! loader.load("@admin/users.html")?; // /srv/app/vendor/admin/templates/users.html
//! ```
//!
//! Names containing `..` components are rejected so a template reference
//! cannot escape its search path.

use std::fmt::Write as _;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::RenderError;

/// A template-loading strategy.
///
/// Returning `Ok(None)` means "not found" and lets the engine raise its own
/// template-not-found error with full context; `Err` is reserved for real
/// failures (unreadable file, invalid name).
pub trait TemplateLoader: Send + Sync {
    /// Loads the source of the named template, if it exists.
    fn load(&self, name: &str) -> Result<Option<String>, RenderError>;
}

impl<T: TemplateLoader + ?Sized> TemplateLoader for std::sync::Arc<T> {
    fn load(&self, name: &str) -> Result<Option<String>, RenderError> {
        (**self).load(name)
    }
}

/// One entry of the ordered search-path mapping: a directory, optionally
/// registered under a namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPath {
    /// Namespace label, or `None` for the default namespace.
    pub namespace: Option<String>,
    /// Directory to search. Relative paths resolve under the loader root.
    pub dir: PathBuf,
}

impl SearchPath {
    /// Creates an entry in the default (unnamed) namespace.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            namespace: None,
            dir: dir.into(),
        }
    }

    /// Creates an entry under the given namespace.
    pub fn namespaced(namespace: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            dir: dir.into(),
        }
    }
}

impl From<&str> for SearchPath {
    fn from(dir: &str) -> Self {
        SearchPath::new(dir)
    }
}

impl From<String> for SearchPath {
    fn from(dir: String) -> Self {
        SearchPath::new(dir)
    }
}

impl From<PathBuf> for SearchPath {
    fn from(dir: PathBuf) -> Self {
        SearchPath::new(dir)
    }
}

impl<N: Into<String>, D: Into<PathBuf>> From<(N, D)> for SearchPath {
    fn from((namespace, dir): (N, D)) -> Self {
        SearchPath::namespaced(namespace, dir)
    }
}

/// Filesystem-based template loader with ordered, namespaced search paths.
///
/// Directories are validated when added: a nonexistent search directory is a
/// configuration error and fails immediately rather than at first render.
pub struct FilesystemLoader {
    root: PathBuf,
    paths: Vec<(Option<String>, PathBuf)>,
}

impl FilesystemLoader {
    /// Creates a loader rooted at the application root path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            paths: Vec::new(),
        }
    }

    /// Registers a directory in the default namespace.
    ///
    /// Relative directories resolve under the loader root.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Loader`] if the directory does not exist or is
    /// not a directory.
    pub fn add_path(&mut self, dir: impl AsRef<Path>) -> Result<(), RenderError> {
        let dir = self.validated_dir(dir.as_ref())?;
        self.paths.push((None, dir));
        Ok(())
    }

    /// Registers a directory under a namespace.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Loader`] if the namespace is empty or the
    /// directory does not exist.
    pub fn add_namespaced(
        &mut self,
        namespace: impl Into<String>,
        dir: impl AsRef<Path>,
    ) -> Result<(), RenderError> {
        let namespace = namespace.into();
        if namespace.is_empty() {
            return Err(RenderError::Loader(
                "template namespace must be a non-empty string".to_string(),
            ));
        }
        let dir = self.validated_dir(dir.as_ref())?;
        self.paths.push((Some(namespace), dir));
        Ok(())
    }

    /// Returns the registered search directories in registration order.
    pub fn search_paths(&self) -> impl Iterator<Item = (Option<&str>, &Path)> {
        self.paths
            .iter()
            .map(|(ns, dir)| (ns.as_deref(), dir.as_path()))
    }

    fn validated_dir(&self, dir: &Path) -> Result<PathBuf, RenderError> {
        let dir = if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            self.root.join(dir)
        };
        if !dir.is_dir() {
            return Err(RenderError::Loader(format!(
                "template directory does not exist: {}",
                dir.display()
            )));
        }
        Ok(dir)
    }
}

impl TemplateLoader for FilesystemLoader {
    fn load(&self, name: &str) -> Result<Option<String>, RenderError> {
        let (namespace, rest) = split_namespace(name)?;
        reject_traversal(name, rest)?;

        for (entry_ns, dir) in &self.paths {
            if entry_ns.as_deref() != namespace {
                continue;
            }
            let candidate = dir.join(rest);
            if candidate.is_file() {
                return fs::read_to_string(&candidate).map(Some).map_err(|err| {
                    RenderError::Loader(format!(
                        "failed to read template {}: {}",
                        candidate.display(),
                        err
                    ))
                });
            }
        }

        Ok(None)
    }
}

/// Splits `@namespace/rest` into its parts; plain names map to the default
/// namespace.
fn split_namespace(name: &str) -> Result<(Option<&str>, &str), RenderError> {
    let Some(tail) = name.strip_prefix('@') else {
        return Ok((None, name));
    };
    match tail.split_once('/') {
        Some((ns, rest)) if !ns.is_empty() && !rest.is_empty() => Ok((Some(ns), rest)),
        _ => Err(RenderError::Loader(format!(
            "malformed namespaced template name: \"{}\" (expected \"@namespace/template\")",
            name
        ))),
    }
}

/// Rejects names whose relative part would escape the search directory.
fn reject_traversal(name: &str, rest: &str) -> Result<(), RenderError> {
    let escapes = Path::new(rest)
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));
    if escapes {
        return Err(RenderError::Loader(format!(
            "template name \"{}\" must stay inside its search path",
            name
        )));
    }
    Ok(())
}

/// Write-through source cache around another loader.
///
/// On a cache miss the inner loader is consulted and a successful result is
/// written to the cache directory; later loads of the same name are served
/// from the cached copy without touching the inner loader. Created by the
/// provider when a cache directory has been resolved.
pub struct CachedLoader {
    inner: Box<dyn TemplateLoader>,
    dir: PathBuf,
}

impl CachedLoader {
    /// Wraps `inner` with a cache under `dir`. The directory is created on
    /// first write.
    pub fn new(inner: Box<dyn TemplateLoader>, dir: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            dir: dir.into(),
        }
    }

    /// Returns the cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Flattens a template name into a single cache filename.
    ///
    /// Every byte outside `[A-Za-z0-9._-]` is percent-encoded, so distinct
    /// names always map to distinct files and the mapping stays stable
    /// across toolchain upgrades.
    fn cache_path(&self, name: &str) -> PathBuf {
        let mut file = String::with_capacity(name.len() + 8);
        for byte in name.bytes() {
            match byte {
                b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'.' | b'_' | b'-' => {
                    file.push(byte as char)
                }
                _ => {
                    let _ = write!(file, "%{:02x}", byte);
                }
            }
        }
        file.push_str(".cached");
        self.dir.join(file)
    }
}

impl TemplateLoader for CachedLoader {
    fn load(&self, name: &str) -> Result<Option<String>, RenderError> {
        let path = self.cache_path(name);
        if path.is_file() {
            return Ok(Some(fs::read_to_string(&path)?));
        }

        let Some(source) = self.inner.load(name)? else {
            return Ok(None);
        };

        fs::create_dir_all(&self.dir).map_err(|err| {
            RenderError::Loader(format!(
                "failed to create template cache directory {}: {}",
                self.dir.display(),
                err
            ))
        })?;
        fs::write(&path, &source)?;
        Ok(Some(source))
    }
}
