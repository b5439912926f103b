//! Type-keyed service container.
//!
//! [`ServiceContainer`] is the registry a service provider publishes into:
//! one instance per type, retrievable by that type. Abstract capabilities
//! are bound by inserting a trait object handle (e.g. `Arc<dyn Rendering>`)
//! under its own type key, so consumers can depend on the abstraction
//! instead of the concrete service.
//!
//! Re-inserting a type silently replaces the previous instance and returns
//! it; there is no double-registration guard. Providers that register twice
//! simply overwrite their earlier bindings.

use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Container for application services, keyed by type.
///
/// # Example
///
/// ```rust
/// use platen::ServiceContainer;
///
/// struct Mailer { from: String }
///
/// let mut services = ServiceContainer::new();
/// services.insert(Mailer { from: "noreply@example.com".into() });
///
/// let mailer = services.get::<Mailer>().unwrap();
/// assert_eq!(mailer.from, "noreply@example.com");
/// ```
#[derive(Default)]
pub struct ServiceContainer {
    map: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl ServiceContainer {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a service instance.
    ///
    /// If an instance of this type is already bound, it is replaced and
    /// returned.
    pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) -> Option<T> {
        self.map
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|boxed| boxed.downcast().ok().map(|b| *b))
    }

    /// Gets a reference to the bound instance of `T`, if any.
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref())
    }

    /// Gets the bound instance of `T`, failing if none is bound.
    pub fn get_required<T: Send + Sync + 'static>(&self) -> Result<&T, anyhow::Error> {
        self.get::<T>().ok_or_else(|| {
            anyhow::anyhow!(
                "service missing: type {} not found in container",
                std::any::type_name::<T>()
            )
        })
    }

    /// Removes the bound instance of `T`, returning it if it existed.
    pub fn remove<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.map
            .remove(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast().ok().map(|b| *b))
    }

    /// Returns `true` if an instance of `T` is bound.
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.map.contains_key(&TypeId::of::<T>())
    }

    /// Returns the number of bound services.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    struct English;
    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".into()
        }
    }

    #[test]
    fn test_insert_and_get() {
        let mut services = ServiceContainer::new();
        services.insert(7_u32);

        assert_eq!(services.get::<u32>(), Some(&7));
        assert!(services.get::<String>().is_none());
    }

    #[test]
    fn test_insert_overwrites_and_returns_displaced() {
        let mut services = ServiceContainer::new();
        assert_eq!(services.insert(1_u32), None);
        assert_eq!(services.insert(2_u32), Some(1));
        assert_eq!(services.get::<u32>(), Some(&2));
        assert_eq!(services.len(), 1);
    }

    #[test]
    fn test_capability_binding() {
        let mut services = ServiceContainer::new();
        let concrete = Arc::new(English);
        services.insert::<Arc<English>>(concrete.clone());
        services.insert::<Arc<dyn Greeter>>(concrete);

        let by_capability = services.get::<Arc<dyn Greeter>>().unwrap();
        assert_eq!(by_capability.greet(), "hello");
        assert!(services.contains::<Arc<English>>());
        assert_eq!(services.len(), 2);
    }

    #[test]
    fn test_get_required() {
        let mut services = ServiceContainer::new();
        services.insert("bound".to_string());

        assert_eq!(services.get_required::<String>().unwrap(), "bound");
        let err = services.get_required::<u64>().unwrap_err();
        assert!(err.to_string().contains("service missing"));
    }

    #[test]
    fn test_remove() {
        let mut services = ServiceContainer::new();
        services.insert(3_i64);

        assert_eq!(services.remove::<i64>(), Some(3));
        assert!(services.is_empty());
        assert_eq!(services.remove::<i64>(), None);
    }
}
