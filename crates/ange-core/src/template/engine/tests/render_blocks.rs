//! Block rendering tests: each, if, require

use super::helpers::{nested_context, simple_context};
use super::*;
use crate::template::module::ModuleLoader;
use toml::Value;

/// In-memory loader for require tests
struct MapLoader;

impl ModuleLoader for MapLoader {
    fn load(&self, specifier: &str) -> Result<Value, String> {
        match specifier {
            "./version.txt" => Ok(Value::String("1.4.0".to_string())),
            "./authors.toml" => Ok(Value::Table(toml::toml! {
                names = ["Ada", "Grace"]
            })),
            other => Err(format!("unknown module {}", other)),
        }
    }
}

#[test]
fn test_each_loop() {
    let context = nested_context();
    let template = "<% each site.pages |page| %>[<%= page.slug %>]<% /each %>";
    let result = render(template, &context).unwrap();
    assert_eq!(result, "[intro][usage]");
}

#[test]
fn test_each_loop_with_trimmed_lines() {
    let context = nested_context();
    let template = "\
<% each site.pages |page| -%>
- <%= page.title %>
<% /each -%>
done
";
    let result = render(template, &context).unwrap();
    assert_eq!(result, "- Introduction\n- Usage\ndone\n");
}

#[test]
fn test_each_empty_array() {
    let context = nested_context();
    let result = render("a<% each site.tags |t| %>x<% /each %>b", &context).unwrap();
    assert_eq!(result, "ab");
}

#[test]
fn test_nested_each_sees_outer_variable() {
    let context = TemplateContext::new(toml::toml! {
        [[groups]]
        name = "g1"
        items = ["a", "b"]

        [[groups]]
        name = "g2"
        items = ["c"]
    });
    let template =
        "<% each groups |g| %><% each g.items |i| %><%= g.name %>:<%= i %> <% /each %><% /each %>";
    let result = render(template, &context).unwrap();
    assert_eq!(result, "g1:a g1:b g2:c ");
}

#[test]
fn test_loop_variable_does_not_leak() {
    let context = nested_context();
    let template = "<% each site.pages |page| %><% /each %><%= page.slug %>";
    let result = render(template, &context);
    assert!(matches!(result, Err(TemplateError::UndefinedKey { .. })));
}

#[test]
fn test_if_else() {
    let context = simple_context();
    let template = "<% if enabled %>on<% else %>off<% /if %>|<% if disabled %>on<% else %>off<% /if %>";
    let result = render(template, &context).unwrap();
    assert_eq!(result, "on|off");
}

#[test]
fn test_if_falsy_values() {
    let context = nested_context();
    let template = "<% if site.tags %>tags<% /if %><% if missing %>missing<% /if %><% if site.name %>name<% /if %>";
    let result = render(template, &context).unwrap();
    assert_eq!(result, "name");
}

#[test]
fn test_if_inside_each() {
    let context = nested_context();
    let template = "<% each site.pages |p| %><% if p.draft %>(<%= p.slug %>)<% else %><%= p.slug %><% /if %> <% /each %>";
    let result = render(template, &context).unwrap();
    assert_eq!(result, "intro (usage) ");
}

#[test]
fn test_require_statement_binds_module() {
    let engine = TemplateEngine::with_loader(MapLoader);
    let template = "<% require \"./authors.toml\" as authors -%>\n<% each authors.names |n| %><%= n %>;<% /each %>";
    let result = engine.render(template, &TemplateContext::default()).unwrap();
    assert_eq!(result, "Ada;Grace;");
}

#[test]
fn test_require_call_expression() {
    let engine = TemplateEngine::with_loader(MapLoader);
    let result = engine
        .render("v<%- require(\"./version.txt\") %>", &TemplateContext::default())
        .unwrap();
    assert_eq!(result, "v1.4.0");
}

#[test]
fn test_require_call_with_key_path() {
    let engine = TemplateEngine::with_loader(MapLoader);
    let result = engine
        .render(
            "<% each require(\"./authors.toml\").names |n| %><%= n %><% /each %>",
            &TemplateContext::default(),
        )
        .unwrap();
    assert_eq!(result, "AdaGrace");
}

#[test]
fn test_require_without_loader_fails() {
    let result = render("<%= require(\"./version.txt\") %>", &TemplateContext::default());
    assert!(matches!(result, Err(TemplateError::Module { .. })));
}
