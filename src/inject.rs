//! Idempotent insertion of the stylesheet link and the copy-button script.

use regex::Regex;
use std::sync::LazyLock;

/// Marker class the copy script creates; its presence means the script is in.
pub const COPY_MARKER: &str = "copy-button";

static RE_HEAD_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<head(?:\s[^>]*)?>").unwrap());
static RE_HEAD_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</head>").unwrap());
static RE_BODY_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<body(?:\s[^>]*)?>").unwrap());
static RE_BODY_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</body>").unwrap());
static RE_SCRIPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>(.*?)</script>").unwrap());

const COPY_SCRIPT: &str = r#"<script type="text/javascript">
document.addEventListener('DOMContentLoaded', function () {
  document.querySelectorAll('.code-block-container pre').forEach(function (pre) {
    var button = document.createElement('button');
    button.className = 'copy-button';
    button.textContent = 'Copy';
    button.setAttribute('aria-label', 'Copy code to clipboard');
    pre.parentNode.appendChild(button);
    button.addEventListener('click', function () {
      var done = function (label) {
        button.textContent = label;
        button.classList.toggle('copied', label === 'Copied!');
        setTimeout(function () {
          button.textContent = 'Copy';
          button.classList.remove('copied');
        }, 2000);
      };
      if (navigator.clipboard && window.isSecureContext) {
        navigator.clipboard.writeText(pre.textContent).then(
          function () { done('Copied!'); },
          function () { done('Error!'); }
        );
        return;
      }
      var area = document.createElement('textarea');
      area.value = pre.textContent;
      document.body.appendChild(area);
      area.select();
      try {
        document.execCommand('copy');
        done('Copied!');
      } catch (err) {
        console.error('Copy failed:', err);
        done('Error!');
      }
      document.body.removeChild(area);
    });
  });
});
</script>
"#;

/// Link `css_name` from the head. `prefix` is the `../` chain from the page
/// to the output root.
pub fn insert_css(html: &str, css_name: &str, prefix: &str) -> String {
    let existing = Regex::new(&format!(
        r#"(?i)<link\b[^>]*href="(?:\.\./)*{}""#,
        regex::escape(css_name)
    ));
    if existing.is_ok_and(|re| re.is_match(html)) {
        return html.to_string();
    }
    let link = format!("<link href=\"{prefix}{css_name}\" rel=\"stylesheet\" type=\"text/css\" />\n");
    insert(html, &link, &RE_HEAD_CLOSE, &RE_HEAD_OPEN, Region::Head)
}

/// Add the copy-button script before `</body>`.
pub fn insert_js(html: &str) -> String {
    if has_copy_script(html) {
        return html.to_string();
    }
    insert(html, COPY_SCRIPT, &RE_BODY_CLOSE, &RE_BODY_OPEN, Region::Body)
}

/// Whether a `<script>` element already carries the marker. Mentions of the
/// class name in page content do not count.
fn has_copy_script(html: &str) -> bool {
    RE_SCRIPT
        .captures_iter(html)
        .any(|caps| caps[1].contains(COPY_MARKER))
}

/// Both insertions, stylesheet first. `css_name` is `None` when no
/// stylesheet is configured.
pub fn inject(html: &str, css_name: Option<&str>, prefix: &str) -> String {
    let html = match css_name {
        Some(name) => insert_css(html, name, prefix),
        None => html.to_string(),
    };
    insert_js(&html)
}

#[derive(Clone, Copy)]
enum Region {
    Head,
    Body,
}

/// Insert before the closing tag; else right after the opening tag; else
/// build a skeleton around the existing content.
fn insert(html: &str, snippet: &str, close: &Regex, open: &Regex, region: Region) -> String {
    if let Some(m) = close.find(html) {
        return format!("{}{}{}", &html[..m.start()], snippet, &html[m.start()..]);
    }
    if let Some(m) = open.find(html) {
        return format!("{}\n{}{}", &html[..m.end()], snippet, &html[m.end()..]);
    }
    let content = html.trim();
    match region {
        Region::Head => format!(
            "<!DOCTYPE html>\n<html>\n<head>\n{snippet}</head>\n<body>\n{content}\n</body>\n</html>\n"
        ),
        Region::Body => format!(
            "<!DOCTYPE html>\n<html>\n<head>\n</head>\n<body>\n{content}\n{snippet}</body>\n</html>\n"
        ),
    }
}
