use std::{
    fs,
    io::Write as _,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "patterntext", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a whole pattern as HTML.
    Render(RenderArgs),
    /// Print every cache key the renderer owns, one per line.
    Keys(LayoutArgs),
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Input pattern JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Section layout to use.
    #[arg(long, value_enum, default_value_t = LayoutChoice::WebFull)]
    layout: LayoutChoice,

    /// Broadcast over every size instead of rendering the first piece only.
    #[arg(long)]
    graded: bool,

    /// Renderer config JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    layout: LayoutArgs,

    /// Output HTML path. Defaults to stdout.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Load garment templates from this directory instead of the built-in copies.
    #[arg(long)]
    template_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LayoutChoice {
    WebFull,
    PdfFull,
    PdfAbridged,
}

impl From<LayoutChoice> for patterntext::LayoutFormat {
    fn from(choice: LayoutChoice) -> Self {
        match choice {
            LayoutChoice::WebFull => Self::WebFull,
            LayoutChoice::PdfFull => Self::PdfFull,
            LayoutChoice::PdfAbridged => Self::PdfAbridged,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Keys(args) => cmd_keys(args),
    }
}

fn read_pattern_json(path: &Path) -> anyhow::Result<Arc<patterntext::Pattern>> {
    let json =
        fs::read_to_string(path).with_context(|| format!("open pattern '{}'", path.display()))?;
    let doc = patterntext::TestGarmentDocument::from_json(&json)
        .with_context(|| "parse pattern JSON")?;
    Ok(doc.into_pattern()?)
}

fn read_config(path: Option<&Path>) -> anyhow::Result<patterntext::RenderConfig> {
    let Some(path) = path else {
        return Ok(patterntext::RenderConfig::default());
    };
    let json =
        fs::read_to_string(path).with_context(|| format!("open config '{}'", path.display()))?;
    patterntext::RenderConfig::from_json(&json).with_context(|| "parse config JSON")
}

fn make_templates(
    template_dir: Option<&Path>,
) -> anyhow::Result<Arc<dyn patterntext::TemplateService>> {
    let templates = match template_dir {
        Some(dir) => patterntext::JinjaTemplates::with_template_dir(dir),
        None => {
            let mut t = patterntext::JinjaTemplates::new();
            patterntext::register_test_garment_templates(&mut t)?;
            t
        }
    };
    Ok(Arc::new(templates))
}

fn make_renderer(
    args: &LayoutArgs,
    templates: Arc<dyn patterntext::TemplateService>,
) -> anyhow::Result<patterntext::PatternRenderer> {
    let pattern = read_pattern_json(&args.in_path)?;
    let config = read_config(args.config.as_deref())?;
    let layout = patterntext::TestGarmentLayout::new(args.layout.into(), args.graded);
    Ok(patterntext::PatternRenderer::new(
        pattern,
        &layout,
        Arc::new(patterntext::InMemoryCache::new()),
        templates,
        config,
    )?)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let templates = make_templates(args.template_dir.as_deref())?;
    let renderer = make_renderer(&args.layout, templates)?;
    let html = renderer.render_pattern()?;

    match &args.out {
        Some(out) => fs::write(out, html.as_str())
            .with_context(|| format!("write output '{}'", out.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(html.as_str().as_bytes())
                .with_context(|| "write output to stdout")?;
            stdout.write_all(b"\n")?;
        }
    }
    tracing::info!(stats = ?renderer.stats(), "rendered {}", renderer.name());
    Ok(())
}

fn cmd_keys(args: LayoutArgs) -> anyhow::Result<()> {
    let renderer = make_renderer(&args, make_templates(None)?)?;
    let mut stdout = std::io::stdout().lock();
    for key in renderer.cache_keys() {
        writeln!(stdout, "{key}")?;
    }
    Ok(())
}
