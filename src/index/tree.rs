//! README directory-tree diagram → nested Markdown link list.
//!
//! ```text
//! ├── src-local/    Core code
//! │   └── dye.h     Tracer
//! └── run.sh        Entry script
//! ```
//!
//! becomes
//!
//! ```text
//! * **[src-local/](src-local)** - Core code
//!   * **[dye.h](src-local/dye.h.html)** - Tracer
//! * **[run.sh](run.sh.html)** - Entry script
//! ```

use regex::Regex;
use std::sync::LazyLock;

static RE_TREE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[^\n]*\n(├[^\n]*\n.*?└.*?)\n```").unwrap());

/// Directories shown in bold but never linked (no generated page exists).
const UNLINKED_DIRS: &[&str] = &["basilisk/src"];

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";

/// One line of the diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub name: String,
    pub depth: usize,
    pub is_dir: bool,
    pub description: String,
    /// Link target, `None` for unlinked directories.
    pub link: Option<String>,
}

impl TreeNode {
    pub fn to_markdown(&self) -> String {
        let entry = match (&self.link, self.is_dir) {
            (Some(link), _) => format!("**[{}]({})**", self.name, link),
            (None, true) => format!("**{}**", self.name),
            (None, false) => self.name.clone(),
        };
        let indent = "  ".repeat(self.depth);
        if self.description.is_empty() {
            format!("{indent}* {entry}")
        } else {
            format!("{indent}* {entry} - {}", self.description)
        }
    }
}

/// Nesting depth of a diagram line: glyph columns before the branch marker,
/// four per level.
fn depth_of(line: &str) -> usize {
    let marker = line.find(BRANCH).or_else(|| line.find(LAST_BRANCH));
    match marker {
        Some(i) => line[..i].chars().count() / 4,
        None => line.matches(PIPE).count(),
    }
}

/// Parse the diagram body (without fences).
pub fn parse(tree: &str) -> Vec<TreeNode> {
    // stack[d] is the resolved directory that depth-d entries live in the
    // context of; entries at depth d resolve against stack[d - 1].
    let mut stack: Vec<String> = Vec::new();
    let mut prev_depth: Option<usize> = None;
    let mut nodes = Vec::new();

    for line in tree.lines() {
        let clean = line.replace(BRANCH, "").replace(LAST_BRANCH, "").replace(PIPE, "");
        let clean = clean.trim().trim_start_matches('│').trim();
        if clean.is_empty() {
            continue;
        }
        let depth = depth_of(line);

        let (name, description) = match clean.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (clean, ""),
        };

        match prev_depth {
            Some(prev) if depth > prev => {
                if let Some(last) = stack.last().cloned() {
                    stack.push(last);
                }
            }
            Some(prev) if depth < prev => {
                for _ in 0..(prev - depth) {
                    stack.pop();
                }
            }
            _ => {}
        }

        let parent = depth.checked_sub(1).and_then(|d| stack.get(d));
        let is_dir = name.ends_with('/');
        let bare = name.trim_end_matches('/');
        let resolved = match parent {
            Some(p) => format!("{p}/{bare}"),
            None => bare.to_string(),
        };

        let link = if is_dir {
            if stack.len() <= depth {
                stack.push(resolved.clone());
            } else {
                stack[depth] = resolved.clone();
            }
            (!UNLINKED_DIRS.contains(&resolved.as_str())).then_some(resolved)
        } else {
            Some(format!("{resolved}.html"))
        };

        nodes.push(TreeNode {
            name: name.to_string(),
            depth,
            is_dir,
            description: description.to_string(),
            link,
        });
        prev_depth = Some(depth);
    }
    nodes
}

/// Replace the first tree diagram in `readme` with its link list. READMEs
/// without a diagram are returned unchanged.
pub fn convert(readme: &str) -> String {
    let Some(caps) = RE_TREE_BLOCK.captures(readme) else {
        return readme.to_string();
    };
    let mut html = vec!["<div class=\"repository-structure\">".to_string()];
    html.extend(parse(&caps[1]).iter().map(TreeNode::to_markdown));
    html.push("</div>".to_string());

    let whole = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
    format!("{}{}{}", &readme[..whole.start], html.join("\n"), &readme[whole.end..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_then_root_file() {
        let nodes = parse("├── src-local/    Core code\n└── run.sh    Entry script");
        let lines: Vec<String> = nodes.iter().map(TreeNode::to_markdown).collect();
        assert_eq!(
            lines,
            vec![
                "* **[src-local/](src-local)** - Core code",
                "* **[run.sh](run.sh.html)** - Entry script",
            ]
        );
    }

    #[test]
    fn file_inside_directory_links_under_it() {
        let nodes = parse("└── src-local/   Core\n    └── dye.h   Tracer");
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].depth, 1);
        assert_eq!(nodes[1].link.as_deref(), Some("src-local/dye.h.html"));
        assert_eq!(nodes[1].to_markdown(), "  * **[dye.h](src-local/dye.h.html)** - Tracer");
    }

    #[test]
    fn nested_directories_resolve_full_paths() {
        let tree = "\
├── testCases/        Cases
│   ├── drop/         Drop cases
│   │   └── impact.c  Impact
│   └── cavity.c      Cavity
└── run.sh            Runner";
        let nodes = parse(tree);
        let links: Vec<_> = nodes.iter().map(|n| n.link.clone().unwrap()).collect();
        assert_eq!(
            links,
            vec![
                "testCases",
                "testCases/drop",
                "testCases/drop/impact.c.html",
                "testCases/cavity.c.html",
                "run.sh.html",
            ]
        );
        assert_eq!(nodes.iter().map(|n| n.depth).collect::<Vec<_>>(), vec![0, 1, 2, 1, 0]);
    }

    #[test]
    fn special_directory_is_not_linked() {
        let nodes = parse("├── basilisk/src/   Upstream\n└── run.sh   Runner");
        assert_eq!(nodes[0].link, None);
        assert_eq!(nodes[0].to_markdown(), "* **basilisk/src/** - Upstream");
    }

    #[test]
    fn missing_description_has_no_dash() {
        let nodes = parse("├── a.c\n└── b.c");
        assert_eq!(nodes[0].to_markdown(), "* **[a.c](a.c.html)**");
    }

    #[test]
    fn readme_block_is_replaced() {
        let readme = "# Project\n\n```\n├── src-local/    Core code\n└── run.sh    Entry script\n```\n\nAfter.\n";
        let out = convert(readme);
        assert_eq!(
            out,
            "# Project\n\n<div class=\"repository-structure\">\n* **[src-local/](src-local)** - Core code\n* **[run.sh](run.sh.html)** - Entry script\n</div>\n\nAfter.\n"
        );
    }

    #[test]
    fn readme_without_tree_is_unchanged() {
        let readme = "# Project\n\n```bash\nmake test\n```\n";
        assert_eq!(convert(readme), readme);
    }
}
