//! Error handling tests for template engine

use super::helpers::{nested_context, simple_context};
use super::*;

#[test]
fn test_error_undefined_key() {
    let context = simple_context();
    let result = render("Value: <%= nonexistent %>", &context);
    match result {
        Err(TemplateError::UndefinedKey { key, line, column }) => {
            assert_eq!(key, "nonexistent");
            assert_eq!(line, 1);
            assert_eq!(column, 8);
        }
        other => panic!("Expected UndefinedKey error, got {:?}", other),
    }
}

#[test]
fn test_error_line_and_column() {
    let context = simple_context();
    let result = render("one\ntwo\n    <%= missing.key %>", &context);
    let err = result.unwrap_err();
    assert_eq!(err.position(), Some((3, 5)));
    assert!(err.to_string().contains("3:5"));
}

#[test]
fn test_error_array_in_output() {
    let context = nested_context();
    let result = render("<%= site.pages %>", &context);
    match result {
        Err(TemplateError::NotPrintable { expr, kind, .. }) => {
            assert_eq!(expr, "site.pages");
            assert_eq!(kind, "array");
        }
        other => panic!("Expected NotPrintable error, got {:?}", other),
    }
}

#[test]
fn test_error_table_in_output() {
    let context = nested_context();
    let result = render("<%- site %>", &context);
    assert!(matches!(
        result,
        Err(TemplateError::NotPrintable { kind: "table", .. })
    ));
}

#[test]
fn test_error_each_over_scalar() {
    let context = nested_context();
    let result = render("<% each site.name |c| %><% /each %>", &context);
    assert!(matches!(result, Err(TemplateError::NotIterable { .. })));
}

#[test]
fn test_error_unclosed_tag() {
    let context = simple_context();
    let result = render("Value: <%= title", &context);
    match result {
        Err(TemplateError::MalformedSyntax { message, column, .. }) => {
            assert!(message.contains("close tag"));
            assert_eq!(column, 8);
        }
        other => panic!("Expected MalformedSyntax error, got {:?}", other),
    }
}

#[test]
fn test_error_unclosed_each() {
    let context = nested_context();
    let result = render("<% each site.pages |p| %><%= p.slug %>", &context);
    match result {
        Err(TemplateError::MalformedSyntax { message, .. }) => {
            assert!(message.contains("Unclosed each"));
        }
        other => panic!("Expected MalformedSyntax error, got {:?}", other),
    }
}

#[test]
fn test_error_stray_block_end() {
    let context = simple_context();
    assert!(matches!(
        render("<% /each %>", &context),
        Err(TemplateError::MalformedSyntax { .. })
    ));
    assert!(matches!(
        render("<% else %>", &context),
        Err(TemplateError::MalformedSyntax { .. })
    ));
}

#[test]
fn test_error_invalid_each_syntax() {
    let context = nested_context();
    let result = render("<% each site.pages page %><% /each %>", &context);
    match result {
        Err(TemplateError::MalformedSyntax { message, .. }) => {
            assert!(message.contains("|var|"));
        }
        other => panic!("Expected MalformedSyntax error, got {:?}", other),
    }
}

#[test]
fn test_error_unknown_statement() {
    let context = simple_context();
    let result = render("<% while true %>", &context);
    match result {
        Err(TemplateError::MalformedSyntax { message, .. }) => {
            assert!(message.contains("Unknown statement 'while'"));
        }
        other => panic!("Expected MalformedSyntax error, got {:?}", other),
    }
}

#[test]
fn test_error_invalid_expression() {
    let context = simple_context();
    assert!(matches!(
        render("<%= 1 + 2 %>", &context),
        Err(TemplateError::MalformedSyntax { .. })
    ));
    assert!(matches!(
        render("<%= \"open %>", &context),
        Err(TemplateError::MalformedSyntax { .. })
    ));
}

#[test]
fn test_error_invalid_require_syntax() {
    let context = simple_context();
    let result = render("<% require ./data.toml as data %>", &context);
    assert!(matches!(result, Err(TemplateError::MalformedSyntax { .. })));
}

#[test]
fn test_error_deeply_nested_blocks() {
    let context = simple_context();
    let template = "<% if enabled %>".repeat(200_000);
    match render(&template, &context) {
        Err(TemplateError::MalformedSyntax {
            message,
            line,
            column,
        }) => {
            assert!(message.contains("nested deeper"), "message: {}", message);
            assert_eq!(line, 1);
            assert_eq!(column, 16 * blocks::MAX_NESTING + 1);
        }
        other => panic!("Expected MalformedSyntax error, got {:?}", other),
    }
}

#[test]
fn test_nesting_up_to_limit_renders() {
    let context = simple_context();
    let depth = blocks::MAX_NESTING;
    let template = format!(
        "{}ok{}",
        "<% if enabled %>".repeat(depth),
        "<% /if %>".repeat(depth)
    );
    assert_eq!(render(&template, &context).unwrap(), "ok");

    let too_deep = format!(
        "{}ok{}",
        "<% each site.pages |p| %>".repeat(depth + 1),
        "<% /each %>".repeat(depth + 1)
    );
    assert!(matches!(
        render(&too_deep, &nested_context()),
        Err(TemplateError::MalformedSyntax { .. })
    ));
}
