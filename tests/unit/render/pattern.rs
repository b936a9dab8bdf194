use std::sync::Arc;

use super::*;
use crate::foundation::core::PatternId;
use crate::model::design::SpecSource;
use crate::render::cache::InMemoryCache;
use crate::section::notes::{DESIGNER_NOTES, PATTERN_NOTES, STITCHES, WEB_PERSONAL_NOTES};
use crate::template::jinja::JinjaTemplates;

struct MockLayout;

impl PatternLayout for MockLayout {
    fn name(&self) -> &str {
        "Mock Renderer"
    }

    fn preamble(&self, pattern: &Arc<Pattern>) -> PatternResult<Vec<SectionEntry>> {
        Ok(vec![
            SectionEntry::pattern(pattern, DESIGNER_NOTES),
            SectionEntry::pattern(pattern, PATTERN_NOTES),
        ])
    }

    fn instructions(&self, _pattern: &Arc<Pattern>) -> PatternResult<Vec<SectionEntry>> {
        Ok(vec![SectionEntry::pieces(None, STITCHES)])
    }

    fn postamble(&self, pattern: &Arc<Pattern>) -> PatternResult<Vec<SectionEntry>> {
        Ok(vec![SectionEntry::pattern(pattern, WEB_PERSONAL_NOTES)])
    }

    fn charts(&self, _pattern: &Arc<Pattern>) -> PatternResult<Vec<SectionEntry>> {
        Ok(Vec::new())
    }
}

fn pattern(kind: &str) -> Arc<Pattern> {
    Arc::new(
        Pattern::new(PatternId(42), "Test Pattern", Arc::new(SpecSource::default())).with_kind(kind),
    )
}

fn renderer(
    pattern: Arc<Pattern>,
    cache: Arc<InMemoryCache>,
    config: RenderConfig,
) -> PatternResult<PatternRenderer> {
    PatternRenderer::new(
        pattern,
        &MockLayout,
        cache,
        Arc::new(JinjaTemplates::new()),
        config,
    )
}

#[test]
fn pattern_is_the_four_chunks_in_order() {
    let cache = Arc::new(InMemoryCache::new());
    let r = renderer(pattern("TestIndividualPattern"), Arc::clone(&cache), RenderConfig::default())
        .unwrap();
    let preamble = r.render_preamble().unwrap();
    let postamble = r.render_postamble().unwrap();
    assert!(preamble.as_str().contains("<h2>Pattern Notes</h2>"));
    assert!(!preamble.as_str().contains("Design Notes"));
    assert!(r.render_instructions().unwrap().is_empty());
    assert!(r.render_charts().unwrap().is_empty());

    let whole = r.render_pattern().unwrap();
    assert_eq!(
        whole.as_str(),
        format!("{}{}", preamble.as_str(), postamble.as_str())
    );
}

#[test]
fn second_render_is_served_from_cache() {
    let cache = Arc::new(InMemoryCache::new());
    let r = renderer(pattern("TestIndividualPattern"), Arc::clone(&cache), RenderConfig::default())
        .unwrap();
    let first = r.render_pattern().unwrap();
    let stats = r.stats();
    assert_eq!(stats.section_misses, 2);
    assert_eq!(stats.section_hits, 0);
    assert_eq!(stats.chunk_misses, 5);

    let second = r.render_pattern().unwrap();
    assert_eq!(first, second);
    assert_eq!(r.stats().chunk_hits, 1);
    assert_eq!(r.stats().section_misses, 2);
}

#[test]
fn keys_follow_the_documented_format() {
    let cache = Arc::new(InMemoryCache::new());
    let r = renderer(pattern("TestIndividualPattern"), Arc::clone(&cache), RenderConfig::default())
        .unwrap();
    assert_eq!(
        r.cache_keys(),
        vec![
            "patterntext:DesignerNotesSection:TestIndividualPattern:[42]".to_string(),
            "patterntext:PatternNotesSection:TestIndividualPattern:[42]".to_string(),
            "patterntext:WebPersonalNotesSection:TestIndividualPattern:[42]".to_string(),
            "patterntext:Mock_Renderer:preamble:[42]".to_string(),
            "patterntext:Mock_Renderer:instructions:[42]".to_string(),
            "patterntext:Mock_Renderer:postamble:[42]".to_string(),
            "patterntext:Mock_Renderer:charts:[42]".to_string(),
            "patterntext:Mock_Renderer:pattern:[42]".to_string(),
        ]
    );
}

#[test]
fn flush_removes_everything_a_render_wrote() {
    let cache = Arc::new(InMemoryCache::new());
    cache.set("unrelated", "keep me");
    let r = renderer(pattern("TestIndividualPattern"), Arc::clone(&cache), RenderConfig::default())
        .unwrap();
    r.prefill_cache().unwrap();

    let owned = r.cache_keys();
    let written: Vec<String> = cache.keys().into_iter().filter(|k| k != "unrelated").collect();
    assert_eq!(written.len(), 7);
    assert!(written.iter().all(|k| owned.contains(k)));

    r.flush_cache();
    assert_eq!(cache.keys(), vec!["unrelated".to_string()]);
}

#[test]
fn disabled_cache_is_never_written() {
    let cache = Arc::new(InMemoryCache::new());
    let config = RenderConfig {
        cache_enabled: false,
        ..RenderConfig::default()
    };
    let r = renderer(pattern("TestIndividualPattern"), Arc::clone(&cache), config).unwrap();
    let first = r.render_pattern().unwrap();
    let second = r.render_pattern().unwrap();
    assert_eq!(first, second);
    assert!(cache.is_empty());
    assert_eq!(r.stats().section_hits, 0);
}

#[test]
fn custom_prefix_is_used() {
    let cache = Arc::new(InMemoryCache::new());
    let config = RenderConfig {
        cache_key_prefix: "shop".to_string(),
        ..RenderConfig::default()
    };
    let r = renderer(pattern("TestIndividualPattern"), Arc::clone(&cache), config).unwrap();
    assert!(r.cache_keys().iter().all(|k| k.starts_with("shop:")));
}

#[test]
fn input_kind_may_not_shadow_a_chunk_name() {
    let cache = Arc::new(InMemoryCache::new());
    let err = renderer(pattern("charts"), cache, RenderConfig::default()).unwrap_err();
    assert!(matches!(err, PatternError::Construction(_)));
    assert!(err.to_string().contains("charts"));
}
