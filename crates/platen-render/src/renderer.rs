//! The renderer facade.
//!
//! [`Renderer`] wraps exactly one engine environment and exposes the small
//! surface the rest of an application needs: render a named template,
//! register globals, register extension functions, and hand out the raw
//! environment for advanced consumers. Everything else — compilation,
//! caching, inheritance — is the engine's job.
//!
//! # Example
//!
//! ```rust
//! use minijinja::Environment;
//! use platen_render::Renderer;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Page { title: String }
//!
//! let mut env = Environment::new();
//! env.add_template_owned("page.txt".to_string(), "== {{ title }} ==".to_string()).unwrap();
//!
//! let renderer = Renderer::new(env);
//! let out = renderer.render("page.txt", &Page { title: "Home".into() }).unwrap();
//! assert_eq!(out, "== Home ==");
//! ```

use std::sync::Arc;

use minijinja::value::{Rest, Value};
use minijinja::Environment;
use serde::Serialize;

use crate::error::RenderError;

/// A template-callable extension function over engine values.
pub type ExtensionFn =
    Arc<dyn Fn(&[Value]) -> Result<Value, minijinja::Error> + Send + Sync>;

/// External collaborator supplying named extension functions.
///
/// Each `(name, callable)` pair becomes a function invocable from template
/// syntax. No uniqueness check is performed here; a duplicate name
/// overwrites the prior registration per the engine's own semantics.
pub trait ExtensionProvider {
    /// Returns the functions to register, in registration order.
    fn extensions(&self) -> Vec<(String, ExtensionFn)>;
}

/// The generic rendering capability.
///
/// Consumers that only need "render this template with this context" can
/// depend on `Arc<dyn Rendering>` instead of the concrete [`Renderer`].
pub trait Rendering: Send + Sync {
    /// Renders a named template with the given context value.
    fn render_template(&self, template: &str, context: &Value) -> Result<String, RenderError>;
}

/// Facade over an engine environment.
///
/// Holds a single environment (1:1). The environment stays exclusively
/// owned while globals and extensions are being registered; once a shared
/// handle has been handed out via [`shared_environment`](Self::shared_environment),
/// further mutation copies on write so the published instance is never
/// changed underneath its consumers.
pub struct Renderer {
    env: Arc<Environment<'static>>,
}

impl Renderer {
    /// Wraps an engine environment.
    pub fn new(env: Environment<'static>) -> Self {
        Self { env: Arc::new(env) }
    }

    /// Renders a named template with the given context.
    ///
    /// # Errors
    ///
    /// - [`RenderError::Loader`] if the template cannot be located or read —
    ///   a missing template is always an error, never an empty string.
    /// - [`RenderError::Syntax`] if the template source fails to parse.
    /// - [`RenderError::Runtime`] if evaluation fails.
    pub fn render(
        &self,
        template: &str,
        context: impl Serialize,
    ) -> Result<String, RenderError> {
        let tmpl = self.env.get_template(template)?;
        Ok(tmpl.render(Value::from_serialize(&context))?)
    }

    /// Registers global variables visible to all subsequently rendered
    /// templates, without per-call passing. There is no removal operation.
    pub fn add_globals<I, K, V>(&mut self, globals: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Serialize,
    {
        let env = Arc::make_mut(&mut self.env);
        for (name, value) in globals {
            env.add_global(name.into(), Value::from_serialize(&value));
        }
    }

    /// Registers every function exposed by `provider` into the environment.
    pub fn add_extensions(&mut self, provider: &dyn ExtensionProvider) {
        let env = Arc::make_mut(&mut self.env);
        for (name, func) in provider.extensions() {
            env.add_function(name, move |args: Rest<Value>| func(&args.0));
        }
    }

    /// Read-only access to the wrapped environment.
    pub fn environment(&self) -> &Environment<'static> {
        &self.env
    }

    /// The same environment instance behind a shared handle, for publishing
    /// the raw engine alongside the facade.
    pub fn shared_environment(&self) -> Arc<Environment<'static>> {
        Arc::clone(&self.env)
    }
}

impl Rendering for Renderer {
    fn render_template(&self, template: &str, context: &Value) -> Result<String, RenderError> {
        let tmpl = self.env.get_template(template)?;
        Ok(tmpl.render(context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_with(templates: &[(&str, &str)]) -> Environment<'static> {
        let mut env = Environment::new();
        for (name, source) in templates {
            env.add_template_owned(name.to_string(), source.to_string())
                .unwrap();
        }
        env
    }

    struct MathExtensions;

    impl ExtensionProvider for MathExtensions {
        fn extensions(&self) -> Vec<(String, ExtensionFn)> {
            vec![
                (
                    "double".to_string(),
                    Arc::new(|args: &[Value]| {
                        let n = args
                            .first()
                            .and_then(|v| i64::try_from(v.clone()).ok())
                            .unwrap_or_default();
                        Ok(Value::from(n * 2))
                    }) as ExtensionFn,
                ),
                (
                    "answer".to_string(),
                    Arc::new(|_: &[Value]| Ok(Value::from(42))) as ExtensionFn,
                ),
            ]
        }
    }

    #[test]
    fn test_render_with_context() {
        let renderer = Renderer::new(env_with(&[("hello.txt", "Hello, {{ name }}!")]));
        let out = renderer
            .render("hello.txt", minijinja::context! { name => "World" })
            .unwrap();
        assert_eq!(out, "Hello, World!");
    }

    #[test]
    fn test_missing_template_is_loader_error() {
        let renderer = Renderer::new(env_with(&[]));
        let err = renderer.render("missing.tpl", ()).unwrap_err();
        assert!(matches!(err, RenderError::Loader(_)));
    }

    #[test]
    fn test_syntax_error_surfaces() {
        let mut env = Environment::new();
        // Broken templates registered through a loader only fail at first use.
        env.set_loader(|name| {
            if name == "broken.txt" {
                Ok(Some("{% if %}".to_string()))
            } else {
                Ok(None)
            }
        });
        let renderer = Renderer::new(env);
        let err = renderer.render("broken.txt", ()).unwrap_err();
        assert!(matches!(err, RenderError::Syntax(_)));
    }

    #[test]
    fn test_runtime_error_surfaces() {
        let renderer = Renderer::new(env_with(&[("t.txt", "{{ x | no_such_filter }}")]));
        let err = renderer
            .render("t.txt", minijinja::context! { x => 1 })
            .unwrap_err();
        assert!(matches!(err, RenderError::Runtime(_)));
    }

    #[test]
    fn test_globals_visible_without_per_call_variables() {
        let mut renderer =
            Renderer::new(env_with(&[("site.txt", "Welcome to {{ site_name }}")]));
        renderer.add_globals([("site_name", "Acme")]);

        let out = renderer.render("site.txt", ()).unwrap();
        assert_eq!(out, "Welcome to Acme");
    }

    #[test]
    fn test_per_call_variables_shadow_globals() {
        let mut renderer = Renderer::new(env_with(&[("t.txt", "{{ who }}")]));
        renderer.add_globals([("who", "global")]);

        let out = renderer
            .render("t.txt", minijinja::context! { who => "local" })
            .unwrap();
        assert_eq!(out, "local");
    }

    #[test]
    fn test_extensions_invocable_from_templates() {
        let mut renderer =
            Renderer::new(env_with(&[("t.txt", "{{ double(21) }} {{ answer() }}")]));
        renderer.add_extensions(&MathExtensions);

        assert_eq!(renderer.render("t.txt", ()).unwrap(), "42 42");
    }

    #[test]
    fn test_duplicate_extension_overwrites() {
        struct First;
        impl ExtensionProvider for First {
            fn extensions(&self) -> Vec<(String, ExtensionFn)> {
                vec![(
                    "tag".to_string(),
                    Arc::new(|_: &[Value]| Ok(Value::from("first"))) as ExtensionFn,
                )]
            }
        }
        struct Second;
        impl ExtensionProvider for Second {
            fn extensions(&self) -> Vec<(String, ExtensionFn)> {
                vec![(
                    "tag".to_string(),
                    Arc::new(|_: &[Value]| Ok(Value::from("second"))) as ExtensionFn,
                )]
            }
        }

        let mut renderer = Renderer::new(env_with(&[("t.txt", "{{ tag() }}")]));
        renderer.add_extensions(&First);
        renderer.add_extensions(&Second);

        assert_eq!(renderer.render("t.txt", ()).unwrap(), "second");
    }

    #[test]
    fn test_shared_environment_is_same_instance() {
        let renderer = Renderer::new(env_with(&[("t.txt", "x")]));
        let shared = renderer.shared_environment();
        assert!(Arc::ptr_eq(&shared, &renderer.shared_environment()));
        assert!(shared.get_template("t.txt").is_ok());
    }

    #[test]
    fn test_mutation_after_sharing_copies_on_write() {
        let mut renderer = Renderer::new(env_with(&[("t.txt", "{{ v }}")]));
        let published = renderer.shared_environment();

        renderer.add_globals([("v", "late")]);

        // The published handle predates the mutation and stays unchanged.
        assert_eq!(
            published.get_template("t.txt").unwrap().render(()).unwrap(),
            ""
        );
        assert_eq!(renderer.render("t.txt", ()).unwrap(), "late");
    }

    #[test]
    fn test_rendering_capability_object() {
        let renderer: Arc<dyn Rendering> =
            Arc::new(Renderer::new(env_with(&[("t.txt", "{{ n }}")])));
        let out = renderer
            .render_template("t.txt", &Value::from_serialize(&serde_json::json!({"n": 7})))
            .unwrap();
        assert_eq!(out, "7");
    }
}
