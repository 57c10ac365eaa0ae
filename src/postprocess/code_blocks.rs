//! Code-block containers and removal of literate-c line numbers.

use regex::{Captures, Regex};
use std::collections::HashSet;
use std::sync::LazyLock;

/// Class of the element the copy-button script attaches to.
pub const CONTAINER_CLASS: &str = "code-block-container";

static RE_PRE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<pre[^>]*><code[^>]*>.*?</code></pre>").unwrap());

static RE_SOURCE_CODE_DIV: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)<div class="sourceCode" id="cb\d+"[^>]*>(.*?)</div>"#).unwrap());

// One or more spans holding only digits directly before a closing span.
static RE_LINE_NUMBERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\s*<span class="[^"]*">\s*\d+\s*</span>\s*)+(\s*</span>)"#).unwrap()
});

static RE_SPAN_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<span\b([^>]*)>|</span>").unwrap());

// pandoc wraps each highlighted source line in `<span id="cbN-M">`.
static RE_LINE_SPAN_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bid="cb\d+-\d+""#).unwrap());

const SPAN_CLOSE: &str = "</span>";

/// Wrap `<pre><code>` regions and replace pandoc's `sourceCode` divs with
/// the container element.
///
/// On pandoc's highlighted output the two rewrites nest one container in
/// the other; each `pre` still sits in exactly one innermost container.
///
/// Not idempotent: a second pass nests another container, so run it once per
/// page.
pub fn wrap(html: &str) -> String {
    let wrapped = RE_PRE_CODE.replace_all(html, |caps: &Captures| {
        format!("<div class=\"{CONTAINER_CLASS}\">{}</div>", &caps[0])
    });
    RE_SOURCE_CODE_DIV
        .replace_all(&wrapped, |caps: &Captures| {
            format!("<div class=\"{CONTAINER_CLASS}\">{}</div>", &caps[1])
        })
        .into_owned()
}

/// Collapse trailing line-number annotations into the closing tag they
/// precede.
///
/// A number that ends a pandoc source line is code (`#define MAXLEVEL 10`),
/// so segments followed by the close of a line span are kept.
pub fn strip_line_numbers(html: &str) -> String {
    let line_ends = line_span_closes(html);
    RE_LINE_NUMBERS
        .replace_all(html, |caps: &Captures| {
            let close = caps.get(2).map_or(0, |m| m.end() - SPAN_CLOSE.len());
            if line_ends.contains(&close) {
                caps[0].to_string()
            } else {
                caps[2].to_string()
            }
        })
        .into_owned()
}

/// Byte offsets of the `</span>` tags that close a pandoc line span.
fn line_span_closes(html: &str) -> HashSet<usize> {
    let mut open: Vec<bool> = Vec::new();
    let mut closes = HashSet::new();
    for caps in RE_SPAN_TAG.captures_iter(html) {
        match caps.get(1) {
            Some(attrs) => open.push(RE_LINE_SPAN_ID.is_match(attrs.as_str())),
            None => {
                if open.pop() == Some(true) {
                    closes.insert(caps.get(0).map_or(0, |m| m.start()));
                }
            }
        }
    }
    closes
}
