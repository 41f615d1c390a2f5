//! Whitespace handling for rendered text.

/// Append `text` with every run of whitespace collapsed to one space.
pub fn push_collapsed(out: &mut String, text: &str) {
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
                in_space = true;
            }
        } else {
            out.push(c);
            in_space = false;
        }
    }
}

/// Final layout pass.
///
/// Lines are trimmed, runs of blank lines become one, and leading or
/// trailing blank lines are dropped. With `single_line` the remaining
/// non-blank lines are joined by single spaces.
pub fn normalize(text: &str, single_line: bool) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut after_blank = true;
    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            if !after_blank {
                lines.push("");
                after_blank = true;
            }
        } else {
            lines.push(line);
            after_blank = false;
        }
    }
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }

    if single_line {
        lines.retain(|line| !line.is_empty());
        lines.join(" ")
    } else {
        lines.join("\n")
    }
}
