//! Error types for template rendering.
//!
//! This module provides [`RenderError`], the single error type for all
//! rendering operations. The engine's own failures are surfaced through
//! three kinds — loading, syntax, and runtime — without local recovery,
//! retry, or user-facing formatting. That responsibility belongs to the
//! caller or to the engine itself.

use std::fmt;

/// Error type for template rendering operations.
///
/// All three kinds originate in the underlying template engine (or in the
/// loader feeding it) and are propagated to the caller unchanged in meaning.
#[derive(Debug)]
pub enum RenderError {
    /// The loader could not locate or read a template, or the loader
    /// configuration itself is invalid (nonexistent search directory,
    /// empty namespace, parent-directory traversal in a template name).
    ///
    /// May surface while building an environment as well as during render.
    Loader(String),

    /// Template source failed to parse.
    Syntax(String),

    /// Evaluation of an otherwise-valid template failed: undefined variable
    /// under strict mode, unknown filter or function, type error during
    /// interpolation, recursion limit.
    Runtime(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Loader(msg) => write!(f, "template loading error: {}", msg),
            RenderError::Syntax(msg) => write!(f, "template syntax error: {}", msg),
            RenderError::Runtime(msg) => write!(f, "template runtime error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        // Loader reads are the only I/O in this crate.
        RenderError::Loader(err.to_string())
    }
}

impl From<minijinja::Error> for RenderError {
    fn from(err: minijinja::Error) -> Self {
        use minijinja::ErrorKind;

        // A loader failure travels through the engine wrapped as a generic
        // engine error with the RenderError attached as its source; unwrap
        // it so the kind survives the round trip.
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            if let Some(inner) = cause.downcast_ref::<RenderError>() {
                return match inner {
                    RenderError::Loader(msg) => RenderError::Loader(msg.clone()),
                    RenderError::Syntax(msg) => RenderError::Syntax(msg.clone()),
                    RenderError::Runtime(msg) => RenderError::Runtime(msg.clone()),
                };
            }
            source = cause.source();
        }

        match err.kind() {
            ErrorKind::TemplateNotFound => RenderError::Loader(err.to_string()),
            ErrorKind::SyntaxError | ErrorKind::BadEscape => RenderError::Syntax(err.to_string()),
            _ => RenderError::Runtime(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RenderError::Loader("template \"missing.html\" not found".to_string());
        assert!(err.to_string().contains("template loading error"));
        assert!(err.to_string().contains("missing.html"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: RenderError = io_err.into();
        assert!(matches!(err, RenderError::Loader(_)));
    }

    #[test]
    fn test_from_minijinja_template_not_found() {
        let mj_err = minijinja::Error::new(
            minijinja::ErrorKind::TemplateNotFound,
            "template 'missing.html' not found",
        );
        let err: RenderError = mj_err.into();
        assert!(matches!(err, RenderError::Loader(_)));
    }

    #[test]
    fn test_from_minijinja_syntax_error() {
        let mj_err = minijinja::Error::new(minijinja::ErrorKind::SyntaxError, "unexpected end");
        let err: RenderError = mj_err.into();
        assert!(matches!(err, RenderError::Syntax(_)));
    }

    #[test]
    fn test_loader_source_survives_engine_wrapping() {
        let wrapped =
            minijinja::Error::new(minijinja::ErrorKind::InvalidOperation, "template loader failed")
                .with_source(RenderError::Loader("denied".to_string()));
        let err: RenderError = wrapped.into();
        assert!(matches!(err, RenderError::Loader(msg) if msg == "denied"));
    }

    #[test]
    fn test_from_minijinja_runtime_error() {
        let mj_err = minijinja::Error::new(minijinja::ErrorKind::UnknownFilter, "no such filter");
        let err: RenderError = mj_err.into();
        assert!(matches!(err, RenderError::Runtime(_)));
    }
}
