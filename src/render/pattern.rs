use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::RenderConfig;
use crate::foundation::core::SafeHtml;
use crate::foundation::error::{PatternError, PatternResult};
use crate::model::pattern::Pattern;
use crate::piece::list::PieceList;
use crate::render::cache::{
    CHARTS_CHUNK, CHUNK_NAMES, INSTRUCTIONS_CHUNK, PATTERN_CHUNK, POSTAMBLE_CHUNK, PREAMBLE_CHUNK,
    RenderCache, make_cache_key,
};
use crate::section::{SectionClass, SectionInput};
use crate::template::{Context, TemplateService};

/// One configured section: what it is built around (if that exists in this pattern) and how.
#[derive(Clone, Debug)]
pub struct SectionEntry {
    pub input: Option<SectionInput>,
    pub class: SectionClass,
}

impl SectionEntry {
    pub fn new(input: Option<SectionInput>, class: SectionClass) -> Self {
        Self { input, class }
    }

    /// A section built around the whole pattern.
    pub fn pattern(pattern: &Arc<Pattern>, class: SectionClass) -> Self {
        Self::new(Some(SectionInput::Pattern(Arc::clone(pattern))), class)
    }

    /// A section built around pieces, absent when the pattern has none of them.
    pub fn pieces(pieces: Option<PieceList>, class: SectionClass) -> Self {
        Self::new(pieces.map(SectionInput::Pieces), class)
    }
}

/// Which sections go into each chunk of a rendered pattern.
pub trait PatternLayout: Send + Sync {
    /// Layout name; part of every chunk cache key.
    fn name(&self) -> &str;

    fn preamble(&self, pattern: &Arc<Pattern>) -> PatternResult<Vec<SectionEntry>>;

    fn instructions(&self, pattern: &Arc<Pattern>) -> PatternResult<Vec<SectionEntry>>;

    fn postamble(&self, pattern: &Arc<Pattern>) -> PatternResult<Vec<SectionEntry>>;

    fn charts(&self, pattern: &Arc<Pattern>) -> PatternResult<Vec<SectionEntry>>;
}

/// Cache hit/miss counts since the renderer was built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub section_hits: u64,
    pub section_misses: u64,
    pub chunk_hits: u64,
    pub chunk_misses: u64,
}

#[derive(Default)]
struct StatCounters {
    section_hits: AtomicU64,
    section_misses: AtomicU64,
    chunk_hits: AtomicU64,
    chunk_misses: AtomicU64,
}

impl StatCounters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> CacheStats {
        CacheStats {
            section_hits: self.section_hits.load(Ordering::Relaxed),
            section_misses: self.section_misses.load(Ordering::Relaxed),
            chunk_hits: self.chunk_hits.load(Ordering::Relaxed),
            chunk_misses: self.chunk_misses.load(Ordering::Relaxed),
        }
    }
}

/// Renders a pattern chunk by chunk, writing every section and chunk through the cache.
pub struct PatternRenderer {
    name: String,
    pattern: Arc<Pattern>,
    preamble: Vec<SectionEntry>,
    instructions: Vec<SectionEntry>,
    postamble: Vec<SectionEntry>,
    charts: Vec<SectionEntry>,
    cache: Arc<dyn RenderCache>,
    templates: Arc<dyn TemplateService>,
    config: RenderConfig,
    stats: StatCounters,
}

impl PatternRenderer {
    pub fn new(
        pattern: Arc<Pattern>,
        layout: &dyn PatternLayout,
        cache: Arc<dyn RenderCache>,
        templates: Arc<dyn TemplateService>,
        config: RenderConfig,
    ) -> PatternResult<Self> {
        config.validate()?;
        let renderer = Self {
            name: layout.name().to_string(),
            preamble: layout.preamble(&pattern)?,
            instructions: layout.instructions(&pattern)?,
            postamble: layout.postamble(&pattern)?,
            charts: layout.charts(&pattern)?,
            pattern,
            cache,
            templates,
            config,
            stats: StatCounters::default(),
        };

        for entry in renderer.entries() {
            if let Some(input) = &entry.input
                && CHUNK_NAMES.contains(&input.kind())
            {
                return Err(PatternError::construction(format!(
                    "section input kind '{}' of {} collides with a chunk name",
                    input.kind(),
                    entry.class.name()
                )));
            }
        }
        Ok(renderer)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &Arc<Pattern> {
        &self.pattern
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    #[tracing::instrument(skip(self), fields(renderer = %self.name))]
    pub fn render_preamble(&self) -> PatternResult<SafeHtml> {
        self.render_chunk(PREAMBLE_CHUNK, &self.preamble)
    }

    #[tracing::instrument(skip(self), fields(renderer = %self.name))]
    pub fn render_instructions(&self) -> PatternResult<SafeHtml> {
        self.render_chunk(INSTRUCTIONS_CHUNK, &self.instructions)
    }

    #[tracing::instrument(skip(self), fields(renderer = %self.name))]
    pub fn render_postamble(&self) -> PatternResult<SafeHtml> {
        self.render_chunk(POSTAMBLE_CHUNK, &self.postamble)
    }

    #[tracing::instrument(skip(self), fields(renderer = %self.name))]
    pub fn render_charts(&self) -> PatternResult<SafeHtml> {
        self.render_chunk(CHARTS_CHUNK, &self.charts)
    }

    /// The four chunks, in order, as one document.
    #[tracing::instrument(skip(self), fields(renderer = %self.name))]
    pub fn render_pattern(&self) -> PatternResult<SafeHtml> {
        let key = self.chunk_key(PATTERN_CHUNK);
        if let Some(hit) = self.cache_get(&key) {
            StatCounters::bump(&self.stats.chunk_hits);
            return Ok(SafeHtml::new(hit));
        }
        StatCounters::bump(&self.stats.chunk_misses);

        let chunks = [
            self.render_preamble()?,
            self.render_instructions()?,
            self.render_postamble()?,
            self.render_charts()?,
        ];
        let html = SafeHtml::concat(&chunks);
        self.cache_set(&key, html.as_str());
        Ok(html)
    }

    /// Render everything so later requests are served from the cache.
    #[tracing::instrument(skip(self), fields(renderer = %self.name))]
    pub fn prefill_cache(&self) -> PatternResult<()> {
        self.render_preamble()?;
        self.render_instructions()?;
        self.render_postamble()?;
        self.render_charts()?;
        self.render_pattern()?;
        Ok(())
    }

    /// Delete every key this renderer can write.
    #[tracing::instrument(skip(self), fields(renderer = %self.name))]
    pub fn flush_cache(&self) {
        let keys = self.cache_keys();
        tracing::debug!(count = keys.len(), "flushing cache");
        self.cache.delete_many(&keys);
    }

    /// Per-section keys for every present input, then the four chunk keys and the pattern key.
    pub fn cache_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        for entry in self.entries() {
            if let Some(input) = &entry.input {
                let key = self.section_key(entry.class, input);
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
        keys.extend(CHUNK_NAMES.iter().map(|chunk| self.chunk_key(chunk)));
        keys
    }

    fn entries(&self) -> impl Iterator<Item = &SectionEntry> {
        self.preamble
            .iter()
            .chain(&self.instructions)
            .chain(&self.postamble)
            .chain(&self.charts)
    }

    fn chunk_key(&self, chunk: &str) -> String {
        make_cache_key(
            &self.config.cache_key_prefix,
            &self.name,
            chunk,
            &[self.pattern.id.0],
        )
    }

    fn section_key(&self, class: SectionClass, input: &SectionInput) -> String {
        make_cache_key(
            &self.config.cache_key_prefix,
            class.name(),
            input.kind(),
            &input.ids(),
        )
    }

    fn cache_get(&self, key: &str) -> Option<String> {
        if !self.config.cache_enabled {
            return None;
        }
        self.cache.get(key)
    }

    fn cache_set(&self, key: &str, value: &str) {
        if self.config.cache_enabled {
            self.cache.set(key, value);
        }
    }

    fn render_chunk(&self, chunk: &str, entries: &[SectionEntry]) -> PatternResult<SafeHtml> {
        let key = self.chunk_key(chunk);
        if let Some(hit) = self.cache_get(&key) {
            StatCounters::bump(&self.stats.chunk_hits);
            return Ok(SafeHtml::new(hit));
        }
        StatCounters::bump(&self.stats.chunk_misses);

        let mut html = SafeHtml::default();
        for entry in entries {
            let Some(input) = &entry.input else {
                continue;
            };
            html.push(&self.render_section(entry.class, input)?);
        }
        self.cache_set(&key, html.as_str());
        Ok(html)
    }

    fn render_section(&self, class: SectionClass, input: &SectionInput) -> PatternResult<SafeHtml> {
        let section = class.build(input, &self.templates)?;
        if !section.is_nonempty() {
            tracing::debug!(section = class.name(), "skipping empty section");
            return Ok(SafeHtml::default());
        }

        let key = self.section_key(class, input);
        tracing::info!(key = %key, "looking in cache");
        if let Some(hit) = self.cache_get(&key) {
            tracing::info!(key = %key, "found in cache");
            StatCounters::bump(&self.stats.section_hits);
            return Ok(SafeHtml::new(hit));
        }
        tracing::info!(key = %key, "not found in cache, generating");
        StatCounters::bump(&self.stats.section_misses);

        let html = section.render(section_extra_context(&self.pattern))?;
        self.cache_set(&key, html.as_str());
        Ok(html)
    }
}

/// Extra context every section is rendered with.
pub fn section_extra_context(pattern: &Pattern) -> Context {
    let mut extra = Context::new();
    extra.insert("pattern".to_string(), pattern.to_context_value());
    extra
}

impl std::fmt::Debug for PatternRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternRenderer")
            .field("name", &self.name)
            .field("pattern", &self.pattern.id)
            .field("sections", &self.entries().count())
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pattern.rs"]
mod tests;
