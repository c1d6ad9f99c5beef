//! Ordered collections of extractor plugins.
//!
//! Registration order is dispatch order. There is no discovery: every
//! plugin is listed explicitly, so the order is visible and testable.

use std::sync::Arc;

use crate::traits::extractor::Extractor;
use crate::types::document::DocumentClass;

/// The plugins known for one document class, plus an optional fallback.
#[derive(Clone)]
pub struct ExtractorRegistry {
    class: DocumentClass,
    plugins: Vec<Arc<dyn Extractor>>,
    fallback: Option<Arc<dyn Extractor>>,
}

impl ExtractorRegistry {
    /// Start building a registry for `class`.
    pub fn builder(class: DocumentClass) -> ExtractorRegistryBuilder {
        ExtractorRegistryBuilder {
            class,
            plugins: Vec::new(),
            fallback: None,
        }
    }

    pub fn class(&self) -> DocumentClass {
        self.class
    }

    /// Registered plugins in dispatch order (fallback excluded).
    pub fn plugins(&self) -> &[Arc<dyn Extractor>] {
        &self.plugins
    }

    /// Generic extractor tried after every registered plugin.
    pub fn fallback(&self) -> Option<&Arc<dyn Extractor>> {
        self.fallback.as_ref()
    }

    /// Plugin names in dispatch order.
    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorRegistry")
            .field("class", &self.class)
            .field("plugins", &self.names())
            .field("fallback", &self.fallback.as_ref().map(|p| p.name()))
            .finish()
    }
}

/// Builder for [`ExtractorRegistry`].
pub struct ExtractorRegistryBuilder {
    class: DocumentClass,
    plugins: Vec<Arc<dyn Extractor>>,
    fallback: Option<Arc<dyn Extractor>>,
}

impl ExtractorRegistryBuilder {
    /// Append a plugin. Duplicate names are ignored after the first.
    pub fn register(mut self, plugin: impl Extractor + 'static) -> Self {
        self.push(Arc::new(plugin));
        self
    }

    /// Append an already-shared plugin.
    pub fn register_arc(mut self, plugin: Arc<dyn Extractor>) -> Self {
        self.push(plugin);
        self
    }

    /// Set the generic fallback extractor.
    pub fn with_fallback(mut self, fallback: impl Extractor + 'static) -> Self {
        self.fallback = Some(Arc::new(fallback));
        self
    }

    pub fn build(self) -> ExtractorRegistry {
        ExtractorRegistry {
            class: self.class,
            plugins: self.plugins,
            fallback: self.fallback,
        }
    }

    fn push(&mut self, plugin: Arc<dyn Extractor>) {
        if self.plugins.iter().any(|p| p.name() == plugin.name()) {
            tracing::warn!(plugin = plugin.name(), "Ignoring duplicate plugin registration");
            return;
        }
        self.plugins.push(plugin);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockExtractor;

    #[test]
    fn test_registration_order_is_preserved() {
        let registry = ExtractorRegistry::builder(DocumentClass::Publisher)
            .register(MockExtractor::generic("b"))
            .register(MockExtractor::specific("a"))
            .register(MockExtractor::generic("c"))
            .with_fallback(MockExtractor::generic("fallback"))
            .build();

        assert_eq!(registry.names(), vec!["b", "a", "c"]);
        assert_eq!(registry.fallback().map(|p| p.name()), Some("fallback"));
        assert_eq!(registry.class(), DocumentClass::Publisher);
    }

    #[test]
    fn test_duplicate_names_ignored() {
        let registry = ExtractorRegistry::builder(DocumentClass::Repository)
            .register(MockExtractor::generic("dspace"))
            .register(MockExtractor::generic("dspace"))
            .build();

        assert_eq!(registry.len(), 1);
        assert!(registry.fallback().is_none());
    }
}
