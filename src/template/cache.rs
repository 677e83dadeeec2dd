use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::error::TemplateError;

use super::compile::Template;

type CacheKey = (String, String, String);

/// Compiled templates keyed by `(scenario, step, field)`.
///
/// Two iterations may compile the same key at once; the input text for a key
/// never changes, so whichever insert lands last is equivalent.
#[derive(Debug, Default)]
pub struct TemplateCache {
    templates: DashMap<CacheKey, Arc<Template>>,
}

impl TemplateCache {
    /// Returns the cached template for the key, compiling `input` on first use.
    ///
    /// # Errors
    ///
    /// Returns an error when `input` fails to compile.
    pub fn get_or_compile(
        &self,
        scenario: &str,
        step: &str,
        field: &str,
        input: &str,
    ) -> Result<Arc<Template>, TemplateError> {
        let key = (scenario.to_owned(), step.to_owned(), field.to_owned());
        if let Some(template) = self.templates.get(&key) {
            return Ok(Arc::clone(template.value()));
        }
        let compiled = Arc::new(Template::compile(field, input)?);
        debug!("Compiled template {}/{}/{}.", scenario, step, field);
        self.templates.insert(key, Arc::clone(&compiled));
        Ok(compiled)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
