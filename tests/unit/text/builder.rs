use serde_json::json;

use super::*;
use crate::template::jinja::JinjaTemplates;

#[test]
fn fragments_render_in_insertion_order() {
    let mut b = TextBuilder::new();
    b.add_text("<p>one</p>");
    b.add_text("<p>two</p>");
    assert_eq!(b.render(), "<p>one</p><p>two</p>");
    assert_eq!(b.chunks().len(), 2);
}

#[test]
fn whitespace_only_text_counts_as_empty() {
    let mut b = TextBuilder::new();
    assert!(b.is_empty());
    b.add_text("  \n");
    assert!(b.is_empty());
    b.add_text("<p>x</p>");
    assert!(!b.is_empty());
}

#[test]
fn templates_are_rendered_into_fragments() {
    let mut t = JinjaTemplates::new();
    t.add_template("rows", "<p>{{ n }} rows</p>").unwrap();
    let mut ctx = Context::new();
    ctx.insert("n".to_string(), json!(12));

    let mut b = TextBuilder::new();
    b.add_template_named(&t, "rows", &ctx).unwrap();
    b.add_template_source(&t, &TemplateSource::new("inline", "<p>{{ n + 1 }}</p>"), &ctx)
        .unwrap();
    assert_eq!(b.render(), "<p>12 rows</p><p>13</p>");
}

#[test]
fn template_errors_propagate() {
    let t = JinjaTemplates::new();
    let mut b = TextBuilder::new();
    assert!(b.add_template_named(&t, "missing", &Context::new()).is_err());
    assert!(b.chunks().is_empty());
}
