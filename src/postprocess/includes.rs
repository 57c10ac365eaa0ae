//! Turn highlighted `#include "X"` lines into links.
//!
//! Headers that live in the local sources directory link to their own
//! generated page; everything else links to the upstream source browser.

use crate::convert::html_escape;
use crate::paths::relative_link;
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static RE_INCLUDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)(<span class="pp">#include\s*</span>)(<span class="im">(?:"|&quot;)(.*?)(?:"|&quot;)</span>)"#,
    )
    .unwrap()
});

/// Everything needed to resolve include targets for one page.
pub struct IncludeLinker<'a> {
    /// Directory searched for local headers (e.g. `<root>/src-local`).
    pub local_sources_dir: &'a Path,
    /// Where the pages for `local_sources_dir` are generated.
    pub local_output_dir: PathBuf,
    /// Directory of the page being rewritten.
    pub page_dir: &'a Path,
    /// External URL template; `{}` is replaced with the include string.
    pub fallback_url: &'a str,
}

impl IncludeLinker<'_> {
    /// Link target and title for an include string.
    pub fn resolve(&self, include: &str) -> (String, String) {
        let name = include.rsplit('/').next().unwrap_or(include);
        if !name.is_empty() && self.local_sources_dir.join(name).is_file() {
            let target = self.local_output_dir.join(format!("{name}.html"));
            (
                relative_link(self.page_dir, &target),
                format!("Link to local documentation for {include}"),
            )
        } else {
            (
                self.fallback_url.replace("{}", include),
                format!("Link to Basilisk source for {include}"),
            )
        }
    }

    /// Wrap every include span in an anchor, keeping the span markup as is.
    pub fn link(&self, html: &str) -> String {
        RE_INCLUDE
            .replace_all(html, |caps: &Captures| {
                let (url, title) = self.resolve(&caps[3]);
                format!(
                    "{}<a href=\"{}\" title=\"{}\">{}</a>",
                    &caps[1],
                    html_escape(&url),
                    html_escape(&title),
                    &caps[2]
                )
            })
            .into_owned()
    }
}
