//! Shared test helpers for template engine tests

use crate::template::engine::TemplateContext;
use toml::toml;

/// Create a simple test context with basic scalar values
pub(super) fn simple_context() -> TemplateContext {
    let data = toml! {
        title = "My Title"
        count = 42
        price = 9.99
        enabled = true
        disabled = false
        empty = ""
        date = 2026-01-15
        markup = "<b>\"Tom\" & 'Jerry'</b>"
    };
    TemplateContext::new(data)
}

/// Create a nested test context with arrays and tables
pub(super) fn nested_context() -> TemplateContext {
    let data = toml! {
        [site]
        name = "Docs"
        tags = []

        [[site.pages]]
        slug = "intro"
        title = "Introduction"
        draft = false

        [[site.pages]]
        slug = "usage"
        title = "Usage"
        draft = true
    };
    TemplateContext::new(data)
}
