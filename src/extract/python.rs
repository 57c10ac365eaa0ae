//! Python docstring/code splitter.
//!
//! Triple-quoted blocks become prose paragraphs; everything else is grouped
//! into ```` ```python ```` fences, keeping the original line order.

const DELIMITERS: [&str; 2] = ["\"\"\"", "'''"];

#[derive(Default)]
struct Splitter {
    out: Vec<String>,
    code: Option<Vec<String>>,
    /// Delimiter of the open quoted block and the lines collected so far.
    quoted: Option<(&'static str, Vec<String>)>,
}

impl Splitter {
    fn line(&mut self, line: &str) {
        if let Some((delim, lines)) = self.quoted.as_mut() {
            lines.push(line.to_string());
            if line.contains(*delim) {
                self.close_quoted();
            }
            return;
        }

        let trimmed = line.trim();
        if let Some(delim) = DELIMITERS.iter().copied().find(|d| trimmed.starts_with(d)) {
            self.close_code();
            self.quoted = Some((delim, vec![line.to_string()]));
            // `"""One-liner."""` opens and closes on the same line.
            if trimmed.len() >= 2 * delim.len() && trimmed[delim.len()..].contains(delim) {
                self.close_quoted();
            }
            return;
        }

        match self.code.as_mut() {
            Some(code) => code.push(line.to_string()),
            None if !trimmed.is_empty() => self.code = Some(vec![line.to_string()]),
            None => self.out.push(line.to_string()),
        }
    }

    fn close_code(&mut self) {
        if let Some(code) = self.code.take() {
            let fence = super::fence_for(&code.join("\n"), '`');
            self.out.push(format!("{fence}python"));
            self.out.extend(code);
            self.out.push(fence);
        }
    }

    fn close_quoted(&mut self) {
        let Some((_, lines)) = self.quoted.take() else {
            return;
        };
        let prose: Vec<String> = lines.iter().filter_map(|l| clean_docstring_line(l)).collect();
        if prose.iter().all(|l| l.is_empty()) {
            return;
        }
        self.out.push(String::new());
        self.out.extend(prose);
        self.out.push(String::new());
    }

    fn finish(mut self) -> String {
        // At most one of the two is open.
        self.close_code();
        self.close_quoted();
        self.out.join("\n")
    }
}

/// Trim a docstring line and strip delimiter remnants. Lines that consist of
/// nothing but delimiters are dropped.
fn clean_docstring_line(line: &str) -> Option<String> {
    let mut text = line.trim();
    if !text.is_empty() && DELIMITERS.iter().any(|d| text.split(d).all(str::is_empty)) {
        return None;
    }
    for d in DELIMITERS {
        if let Some(rest) = text.strip_prefix(d) {
            text = rest;
        }
        if let Some(rest) = text.strip_suffix(d) {
            text = rest;
        }
    }
    Some(text.trim().to_string())
}

/// Split Python source into Markdown prose and fenced code.
pub fn split(content: &str) -> String {
    let mut splitter = Splitter::default();
    for line in content.lines() {
        splitter.line(line);
    }
    splitter.finish()
}

/// First docstring body of a module, used for page metadata.
pub fn first_docstring(content: &str) -> Option<String> {
    let mut collected: Option<(&str, Vec<String>)> = None;
    for line in content.lines() {
        let trimmed = line.trim();
        match collected.as_mut() {
            Some((delim, lines)) => {
                let done = line.contains(*delim);
                lines.push(line.to_string());
                if done {
                    break;
                }
            }
            None => {
                if let Some(delim) = DELIMITERS.iter().copied().find(|d| trimmed.starts_with(d)) {
                    let done = trimmed[delim.len()..].contains(delim);
                    collected = Some((delim, vec![line.to_string()]));
                    if done {
                        break;
                    }
                }
            }
        }
    }
    let (_, lines) = collected?;
    let body: Vec<String> = lines.iter().filter_map(|l| clean_docstring_line(l)).collect();
    let body = body.join("\n").trim().to_string();
    (!body.is_empty()).then_some(body)
}
