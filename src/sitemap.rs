//! `sitemap.xml` and `robots.txt`.

use crate::config::SiteConfig;
use crate::pipeline::GeneratedFiles;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const HOME_PRIORITY: &str = "1.0";
const KEY_SECTION_PRIORITY: &str = "0.8";
const DEFAULT_PRIORITY: &str = "0.6";

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn priority(config: &SiteConfig, page: &Path) -> &'static str {
    let relative = page.strip_prefix(&config.output_dir).unwrap_or(page);
    let top = relative
        .components()
        .next()
        .map(|c| c.as_os_str().to_string_lossy().into_owned());
    let is_key = relative.components().count() > 1
        && top.is_some_and(|t| config.key_sections.iter().any(|k| *k == t));
    if is_key {
        KEY_SECTION_PRIORITY
    } else {
        DEFAULT_PRIORITY
    }
}

/// One `<url>` per generated page plus the homepage.
pub fn sitemap_xml(config: &SiteConfig, generated: &GeneratedFiles) -> String {
    let mut pages: Vec<&Path> = generated.values().map(|p| p.as_path()).collect();
    pages.sort();

    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");
    push_url(&mut out, &format!("{}/", config.site_url), HOME_PRIORITY);
    for page in pages {
        let relative = page
            .strip_prefix(&config.output_dir)
            .unwrap_or(page)
            .to_string_lossy()
            .replace('\\', "/");
        push_url(
            &mut out,
            &format!("{}/{}", config.site_url, relative),
            priority(config, page),
        );
    }
    out.push_str("</urlset>\n");
    out
}

fn push_url(out: &mut String, loc: &str, priority: &str) {
    out.push_str("  <url>\n");
    out.push_str(&format!("    <loc>{}</loc>\n", xml_escape(loc)));
    out.push_str(&format!("    <priority>{priority}</priority>\n"));
    out.push_str("  </url>\n");
}

pub fn robots_txt(config: &SiteConfig) -> String {
    format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}/sitemap.xml\n",
        config.site_url
    )
}

/// Write both files into the output root.
pub fn write(config: &SiteConfig, generated: &GeneratedFiles) -> Result<()> {
    let sitemap = config.output_dir.join("sitemap.xml");
    fs::write(&sitemap, sitemap_xml(config, generated))
        .with_context(|| format!("failed to write {}", sitemap.display()))?;
    let robots = config.output_dir.join("robots.txt");
    fs::write(&robots, robots_txt(config))
        .with_context(|| format!("failed to write {}", robots.display()))?;
    Ok(())
}
