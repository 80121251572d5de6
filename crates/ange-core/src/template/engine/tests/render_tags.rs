//! Tag-level tests: comments, literals, trim modifier

use super::helpers::simple_context;
use super::*;

#[test]
fn test_comment_renders_nothing() {
    let context = simple_context();
    let result = render("a<%# anything at all %>b", &context).unwrap();
    assert_eq!(result, "ab");
}

#[test]
fn test_output_directive_comment_is_invisible() {
    let context = simple_context();
    let template = "<%# output: ./out.txt -%>\nbody\n";
    let result = render(template, &context).unwrap();
    assert_eq!(result, "body\n");
}

#[test]
fn test_directive_without_trim_keeps_newline() {
    let context = simple_context();
    let template = "<%# output: ./out.txt %>\nbody\n";
    let result = render(template, &context).unwrap();
    assert_eq!(result, "\nbody\n");
}

#[test]
fn test_trim_modifier_crlf() {
    let context = simple_context();
    let template = "<%# header -%>\r\nbody";
    let result = render(template, &context).unwrap();
    assert_eq!(result, "body");
}

#[test]
fn test_trim_only_removes_one_newline() {
    let context = simple_context();
    let result = render("<%= count -%>\n\nend", &context).unwrap();
    assert_eq!(result, "42\nend");
}

#[test]
fn test_literal_open_tag() {
    let context = simple_context();
    let result = render("<%% not a tag %>", &context).unwrap();
    assert_eq!(result, "<% not a tag %>");
}

#[test]
fn test_lone_angle_bracket_before_tag() {
    let context = simple_context();
    let result = render("<<%= count %>>", &context).unwrap();
    assert_eq!(result, "<42>");
}

#[test]
fn test_percent_inside_tag() {
    let context = simple_context();
    let result = render("<%# 100% sure %>ok", &context).unwrap();
    assert_eq!(result, "ok");
}
