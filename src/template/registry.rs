//! In-memory template registry

use std::collections::BTreeMap;
use std::sync::Arc;

use super::types::{
    Render, StoredTemplate, TemplateError, TemplateMetadata, TemplateResult, TemplateSummary,
};

/// Registry of compiled templates keyed by normalized template key.
///
/// Populated once during bootstrap and read-only afterwards, so it can be
/// shared behind an `Arc` without locking. Keys are kept sorted, which makes
/// [`TemplateRegistry::list`] deterministic.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, StoredTemplate>,
}

impl TemplateRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template under `key`.
    ///
    /// Returns `Ok(false)` without touching the existing entry when the key is
    /// already taken; the first registration always wins.
    pub fn register(
        &mut self,
        key: &str,
        renderer: Arc<dyn Render>,
        metadata: TemplateMetadata,
    ) -> TemplateResult<bool> {
        if key.trim().is_empty() {
            return Err(TemplateError::InvalidKey(key.to_string()));
        }

        if self.templates.contains_key(key) {
            tracing::warn!(key = %key, "Template with this key already exists, keeping the first one");
            return Ok(false);
        }

        self.templates
            .insert(key.to_string(), StoredTemplate::new(renderer, metadata));
        Ok(true)
    }

    /// Get a template by key
    pub fn get(&self, key: &str) -> TemplateResult<&StoredTemplate> {
        if key.is_empty() {
            return Err(TemplateError::NotFound(key.to_string()));
        }

        self.templates
            .get(key)
            .ok_or_else(|| TemplateError::NotFound(key.to_string()))
    }

    /// Render a template with variables
    pub fn render(&self, key: &str, vars: &serde_json::Value) -> TemplateResult<String> {
        self.get(key)?.render(vars)
    }

    /// Iterate over registered keys and their metadata, sorted by key
    pub fn list(&self) -> impl Iterator<Item = (&str, &TemplateMetadata)> + '_ {
        self.templates
            .iter()
            .map(|(key, stored)| (key.as_str(), stored.metadata()))
    }

    /// Owned snapshot of every registered template
    pub fn summaries(&self) -> Vec<TemplateSummary> {
        self.list()
            .map(|(key, metadata)| TemplateSummary {
                key: key.to_string(),
                metadata: metadata.clone(),
            })
            .collect()
    }

    /// Check if a template exists
    pub fn contains(&self, key: &str) -> bool {
        self.templates.contains_key(key)
    }

    /// Get the number of templates
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Log every registered template with its metadata
    pub fn log_templates(&self) {
        if self.is_empty() {
            tracing::info!("No templates registered.");
            return;
        }

        tracing::info!(count = self.len(), "Registered templates:");
        for (key, metadata) in self.list() {
            let metadata = serde_json::to_string(metadata).unwrap_or_default();
            tracing::info!(key = %key, metadata = %metadata, "  - template");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixed(output: &'static str) -> Arc<dyn Render> {
        Arc::new(move |_: &serde_json::Value| -> TemplateResult<String> { Ok(output.to_string()) })
    }

    fn subject(subject: &str) -> TemplateMetadata {
        json!({ "subject": subject }).as_object().unwrap().clone().into()
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = TemplateRegistry::new();

        let inserted = registry
            .register("order-placed", fixed("<p>order</p>"), subject("Your order"))
            .unwrap();
        assert!(inserted);

        let stored = registry.get("order-placed").unwrap();
        assert_eq!(stored.metadata().subject(), Some("Your order"));
        assert_eq!(stored.render(&json!({})).unwrap(), "<p>order</p>");
    }

    #[test]
    fn test_register_blank_key() {
        let mut registry = TemplateRegistry::new();

        for key in ["", "   "] {
            assert!(matches!(
                registry.register(key, fixed("x"), TemplateMetadata::new()),
                Err(TemplateError::InvalidKey(_))
            ));
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_first_registration_wins() {
        let mut registry = TemplateRegistry::new();

        assert!(registry
            .register("foo", fixed("first"), subject("First"))
            .unwrap());
        assert!(!registry
            .register("foo", fixed("second"), subject("Second"))
            .unwrap());

        let stored = registry.get("foo").unwrap();
        assert_eq!(stored.render(&json!({})).unwrap(), "first");
        assert_eq!(stored.metadata().subject(), Some("First"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_get_unknown_or_empty_key() {
        let mut registry = TemplateRegistry::new();
        registry
            .register("known", fixed("x"), TemplateMetadata::new())
            .unwrap();

        assert!(matches!(registry.get(""), Err(TemplateError::NotFound(_))));
        assert!(matches!(
            registry.get("unknown"),
            Err(TemplateError::NotFound(ref key)) if key == "unknown"
        ));
        assert!(matches!(
            registry.render("", &json!({})),
            Err(TemplateError::NotFound(_))
        ));
    }

    #[test]
    fn test_render_failure_is_propagated() {
        let mut registry = TemplateRegistry::new();
        let failing: Arc<dyn Render> =
            Arc::new(|_: &serde_json::Value| -> TemplateResult<String> {
                Err(TemplateError::Render {
                    key: "failing".to_string(),
                    message: "boom".to_string(),
                })
            });
        registry
            .register("failing", failing, TemplateMetadata::new())
            .unwrap();

        match registry.render("failing", &json!({})) {
            Err(TemplateError::Render { key, message }) => {
                assert_eq!(key, "failing");
                assert_eq!(message, "boom");
            }
            other => panic!("expected render error, got {:?}", other),
        }
    }

    #[test]
    fn test_list_is_sorted_and_restartable() {
        let mut registry = TemplateRegistry::new();
        for key in ["order-placed", "auth-invite", "auth-password-reset"] {
            registry
                .register(key, fixed("x"), TemplateMetadata::new())
                .unwrap();
        }

        let first: Vec<&str> = registry.list().map(|(key, _)| key).collect();
        let second: Vec<&str> = registry.list().map(|(key, _)| key).collect();
        assert_eq!(first, vec!["auth-invite", "auth-password-reset", "order-placed"]);
        assert_eq!(first, second);
        assert_eq!(registry.summaries().len(), 3);
    }
}
