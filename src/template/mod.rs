//! Request templating against a variable scope.
mod cache;
mod compile;
mod context;
mod escape;

#[cfg(test)]
mod tests;

use crate::error::TemplateError;
use crate::scope::Scope;
use crate::transport::RequestParts;

pub use cache::TemplateCache;
pub use compile::Template;
use compile::Escape;

pub const TEXT_KIND: &str = "text";
pub const HTML_KIND: &str = "html";

const URL_FIELD: &str = "url";
const BODY_FIELD: &str = "body";
const HEADER_FIELD_PREFIX: &str = "header:";

/// Renders the textual fields of a request in place.
pub trait Templater {
    /// Renders `url`, every header value, then `body`, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns an error when a field fails to compile or render.
    fn apply(
        &self,
        parts: &mut RequestParts,
        scope: &Scope,
        scenario: &str,
        step: &str,
    ) -> Result<(), TemplateError>;
}

/// Interpolates values verbatim.
#[derive(Debug, Default)]
pub struct TextTemplater {
    cache: TemplateCache,
}

impl TextTemplater {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    #[must_use]
    pub const fn cache(&self) -> &TemplateCache {
        &self.cache
    }
}

impl Templater for TextTemplater {
    fn apply(
        &self,
        parts: &mut RequestParts,
        scope: &Scope,
        scenario: &str,
        step: &str,
    ) -> Result<(), TemplateError> {
        render_parts(&self.cache, Escape::None, parts, scope, scenario, step)
    }
}

/// Escapes interpolated values for the markup context they land in; literal
/// template text is untouched.
#[derive(Debug, Default)]
pub struct HtmlTemplater {
    cache: TemplateCache,
}

impl HtmlTemplater {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    #[must_use]
    pub const fn cache(&self) -> &TemplateCache {
        &self.cache
    }
}

impl Templater for HtmlTemplater {
    fn apply(
        &self,
        parts: &mut RequestParts,
        scope: &Scope,
        scenario: &str,
        step: &str,
    ) -> Result<(), TemplateError> {
        render_parts(&self.cache, Escape::Html, parts, scope, scenario, step)
    }
}

/// The templater a request step renders with.
#[derive(Debug)]
pub enum StepTemplater {
    Text(TextTemplater),
    Html(HtmlTemplater),
}

impl StepTemplater {
    #[must_use]
    pub fn text() -> Self {
        Self::Text(TextTemplater::new())
    }

    #[must_use]
    pub fn html() -> Self {
        Self::Html(HtmlTemplater::new())
    }

    /// Builds the templater named by `kind`, if it is a known one.
    #[must_use]
    pub fn from_kind(kind: &str) -> Option<Self> {
        match kind {
            TEXT_KIND => Some(Self::text()),
            HTML_KIND => Some(Self::html()),
            _ => None,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => TEXT_KIND,
            Self::Html(_) => HTML_KIND,
        }
    }

    #[must_use]
    pub const fn is_default(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    #[cfg(test)]
    #[must_use]
    pub const fn cache(&self) -> &TemplateCache {
        match self {
            Self::Text(templater) => templater.cache(),
            Self::Html(templater) => templater.cache(),
        }
    }
}

impl Default for StepTemplater {
    fn default() -> Self {
        Self::text()
    }
}

impl Clone for StepTemplater {
    fn clone(&self) -> Self {
        match self {
            Self::Text(_) => Self::text(),
            Self::Html(_) => Self::html(),
        }
    }
}

// Caches are runtime state; two templaters are equal when they render alike.
impl PartialEq for StepTemplater {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind()
    }
}

impl Templater for StepTemplater {
    fn apply(
        &self,
        parts: &mut RequestParts,
        scope: &Scope,
        scenario: &str,
        step: &str,
    ) -> Result<(), TemplateError> {
        match self {
            Self::Text(templater) => templater.apply(parts, scope, scenario, step),
            Self::Html(templater) => templater.apply(parts, scope, scenario, step),
        }
    }
}

fn render_parts(
    cache: &TemplateCache,
    escape: Escape,
    parts: &mut RequestParts,
    scope: &Scope,
    scenario: &str,
    step: &str,
) -> Result<(), TemplateError> {
    let url = cache.get_or_compile(scenario, step, URL_FIELD, &parts.url)?;
    parts.url = url.render(scope, escape)?;

    for (name, value) in &mut parts.headers {
        let field = format!("{}{}", HEADER_FIELD_PREFIX, name);
        let template = cache.get_or_compile(scenario, step, &field, value)?;
        *value = template.render(scope, escape)?;
    }

    if let Some(body) = parts.body.as_mut() {
        let template = cache.get_or_compile(scenario, step, BODY_FIELD, body)?;
        *body = template.render(scope, escape)?;
    }

    Ok(())
}
