use std::sync::OnceLock;

use regex::Regex;

fn wide_whitespace() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s{3,}").expect("whitespace pattern is valid"))
}

/// Normalizes text handed over by a PDF extraction collaborator: trims line
/// ends, collapses runs of blank lines down to one, and squeezes 3+ spaces.
///
/// An empty result after tidying is the signal that the source document had
/// no extractable text.
pub fn tidy_extracted_text(text: &str) -> String {
    let trimmed: Vec<&str> = text.lines().map(str::trim).collect();

    let mut kept: Vec<&str> = Vec::new();
    for (index, line) in trimmed.iter().enumerate() {
        let previous_blank = index > 0 && trimmed[index - 1].is_empty();
        if !line.is_empty() || !previous_blank {
            kept.push(line);
        }
    }

    kept.iter()
        .map(|line| wide_whitespace().replace_all(line, "   ").into_owned())
        .collect::<Vec<_>>()
        .join("\n")
}
