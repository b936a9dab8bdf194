use std::io;
use std::sync::{Arc, Mutex};

use serde_json::json;

use super::*;
use crate::template::context;

/// Log sink shared between the subscriber and the test.
#[derive(Clone, Default)]
struct LogSink(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogSink {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn captured_logs(f: impl FnOnce()) -> String {
    let sink = LogSink::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(sink.clone())
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    let bytes = sink.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn renders_registered_templates() {
    let mut t = JinjaTemplates::new();
    t.add_template("greeting", "<p>Cast on {{ stitches }} stitches.</p>")
        .unwrap();
    let out = t
        .render_named("greeting", &context([("stitches", json!(88))]))
        .unwrap();
    assert_eq!(out, "<p>Cast on 88 stitches.</p>");
}

#[test]
fn missing_template_is_distinguished_from_render_failure() {
    let t = JinjaTemplates::new();
    let err = t.render_named("nope", &Context::new()).unwrap_err();
    assert!(matches!(err, PatternError::TemplateNotFound { ref name } if name == "nope"));

    let bad = TemplateSource::new("broken", "{{ 1 + }}");
    let err = t.render_source(&bad, &Context::new()).unwrap_err();
    assert!(matches!(err, PatternError::TemplateRender { ref name, .. } if name == "broken"));
}

#[test]
fn graded_filters_are_available() {
    let t = JinjaTemplates::new();
    let src = TemplateSource::new(
        "filters",
        "Work {{ rows|count_fmt }} rows ({{ inches|length_fmt }}).",
    );
    let ctx = context([("rows", json!([14, 16])), ("inches", json!(2))]);
    assert_eq!(
        t.render_source(&src, &ctx).unwrap(),
        "Work 14 (16) rows (2\")."
    );
}

#[test]
fn ad_hoc_templates_escape_context_values() {
    let t = JinjaTemplates::new();
    let src = TemplateSource::new("Element 1", "<p>{{ piece.name }}</p>");
    let ctx = context([("piece", json!({"name": "Back & <i>Front"}))]);
    assert_eq!(
        t.render_source(&src, &ctx).unwrap(),
        "<p>Back &amp; &lt;i&gt;Front</p>"
    );
}

#[test]
fn registered_templates_escape_regardless_of_name() {
    let mut t = JinjaTemplates::new();
    t.add_template("label", "{{ label }}").unwrap();
    let ctx = context([("label", json!("Hats & Cowls"))]);
    assert_eq!(t.render_named("label", &ctx).unwrap(), "Hats &amp; Cowls");
}

#[test]
fn formatted_lengths_are_not_escaped_in_html_templates() {
    let mut t = JinjaTemplates::new();
    t.add_template("length.html", "<p>{{ inches|length_fmt }} & {{ label }}</p>")
        .unwrap();
    let ctx = context([("inches", json!(2.5)), ("label", json!("<b>"))]);
    assert_eq!(
        t.render_named("length.html", &ctx).unwrap(),
        "<p>2½\" & &lt;b&gt;</p>"
    );
}

#[test]
fn template_dir_is_searched_for_unregistered_names() {
    let dir = std::env::temp_dir().join(format!("patterntext-jinja-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("row.txt"), "row {{ n }}").unwrap();

    let t = JinjaTemplates::with_template_dir(&dir);
    let out = t.render_named("row.txt", &context([("n", json!(3))])).unwrap();
    assert_eq!(out, "row 3");
    assert!(matches!(
        t.render_named("absent.txt", &Context::new()),
        Err(PatternError::TemplateNotFound { .. })
    ));
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn render_failure_logs_template_and_context() {
    let t = JinjaTemplates::new();
    let bad = TemplateSource::new("broken", "{{ rows + }}");
    let ctx = context([("rows", json!(14))]);
    let logs = captured_logs(|| {
        assert!(t.render_source(&bad, &ctx).is_err());
    });
    assert!(logs.contains("error while rendering template"));
    assert!(logs.contains("broken"));
    assert!(logs.contains(r#"{"rows":14}"#));
}

#[test]
fn missing_template_logs_lookup_failure() {
    let t = JinjaTemplates::new();
    let ctx = context([("piece", json!("Back"))]);
    let logs = captured_logs(|| {
        assert!(t.render_named("notes/absent.html", &ctx).is_err());
    });
    assert!(logs.contains("could not find template"));
    assert!(logs.contains("notes/absent.html"));
    assert!(logs.contains(r#"{"piece":"Back"}"#));
    assert!(!logs.contains("error while rendering template"));
}
