//! docsite: static HTML documentation for a Basilisk simulation repository.
//!
//! Walks the configured source directories, turns every C/C++, Python, shell
//! and Markdown file into a themed page through pandoc, and finishes with an
//! `index.html` built from the README plus `sitemap.xml` and `robots.txt`.
//!
//! ```text
//! docsite --root . --site-url https://example.org/project
//! ```

mod config;
mod convert;
mod error;
mod extract;
mod index;
mod inject;
mod metadata;
mod paths;
mod pipeline;
mod postprocess;
mod sitemap;
mod source;
mod tool;
mod walk;

use anyhow::{Context, Result};
use clap::Parser;
use config::{Overrides, SiteConfig};
use convert::Converter;
use extract::native::LiterateC;
use pipeline::Tools;
use postprocess::anchors::DeclAnchors;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "docsite",
    about = "Generate a static documentation site from a Basilisk project tree"
)]
struct Cli {
    /// Config file (default: docsite.toml in the repository root)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Repository root
    #[arg(short = 'r', long, default_value = ".")]
    root: PathBuf,

    /// Output directory
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Source directory to scan. Can be specified multiple times.
    #[arg(short = 's', long = "source-dir")]
    source_dirs: Vec<String>,

    /// Pandoc HTML template
    #[arg(long)]
    template: Option<PathBuf>,

    /// Directory holding literate-c and decl_anchors.awk
    #[arg(long)]
    darcsit: Option<PathBuf>,

    /// Stylesheet copied next to the index and linked from every page
    #[arg(long)]
    css: Option<PathBuf>,

    /// Base URL passed to the template
    #[arg(long)]
    base_url: Option<String>,

    /// Absolute site URL used in sitemap.xml and robots.txt
    #[arg(long)]
    site_url: Option<String>,

    /// Converter command
    #[arg(long)]
    pandoc: Option<String>,

    /// Stream editor command for declaration anchors
    #[arg(long)]
    awk: Option<String>,

    /// Remove the output directory before generating
    #[arg(long)]
    clean: bool,

    /// Debug logging
    #[arg(short = 'v', long, conflicts_with = "quiet")]
    verbose: bool,

    /// Warnings and errors only
    #[arg(short = 'q', long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let root = cli
        .root
        .canonicalize()
        .with_context(|| format!("repository root not found: {}", cli.root.display()))?;
    let overrides = Overrides {
        output_dir: cli.output,
        source_dirs: cli.source_dirs,
        template: cli.template,
        darcsit_dir: cli.darcsit,
        css: cli.css,
        base_url: cli.base_url,
        site_url: cli.site_url,
        pandoc: cli.pandoc,
        awk: cli.awk,
    };
    let config = SiteConfig::load(&root, cli.config.as_deref(), overrides)?;
    config.validate()?;

    if cli.clean && config.output_dir.exists() {
        tracing::info!("cleaning {}", config.output_dir.display());
        fs::remove_dir_all(&config.output_dir)
            .with_context(|| format!("failed to remove {}", config.output_dir.display()))?;
    }
    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("failed to create output directory: {}", config.output_dir.display())
    })?;
    copy_stylesheet(&config)?;

    let sources = walk::find_sources(&config)?;
    tracing::info!("processing {} files", sources.len());

    let converter = Converter::new(config.pandoc.clone(), config.template.clone());
    let preprocessor = LiterateC::new(config.literate_c());
    let tagger = DeclAnchors::new(config.awk.clone(), config.decl_anchors()).in_dir(&config.root);
    let tools = Tools {
        converter: &converter,
        preprocessor: &preprocessor,
        tagger: &tagger,
    };
    let summary = pipeline::run(&config, &tools, &sources);

    let mut errors = summary.failed.len();
    match index::generate(&config, &converter, &summary.generated) {
        Ok(page) => tracing::info!("generated {}", page.display()),
        Err(err) => {
            tracing::error!("index page not written: {:#}", err);
            errors += 1;
        }
    }
    sitemap::write(&config, &summary.generated)?;

    if errors == 0 {
        tracing::info!("done: {} pages", summary.generated.len());
    } else {
        tracing::warn!("done: {} pages, {} errors", summary.generated.len(), errors);
    }
    Ok(())
}

fn init_tracing(cli: &Cli) {
    let default = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Copy the configured stylesheet into the output root. A missing file only
/// costs the styling, so it is a warning.
fn copy_stylesheet(config: &SiteConfig) -> Result<()> {
    let (Some(css), Some(name)) = (&config.css, config.css_name()) else {
        return Ok(());
    };
    if !css.is_file() {
        tracing::warn!("stylesheet not found at {}", css.display());
        return Ok(());
    }
    let target = config.output_dir.join(name);
    fs::copy(css, &target)
        .with_context(|| format!("failed to copy {} to {}", css.display(), target.display()))?;
    Ok(())
}
