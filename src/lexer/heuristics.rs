//! Content heuristics used to score lexers when the filename is absent or
//! ambiguous.
//!
//! Scores live in `[0.0, 1.0]`, higher meaning more confident. A first-line
//! match (shebang, `<?php`, modelines, ...) is decisive; marker substrings add
//! partial confidence on top.

/// Marker substrings per language name with the weight each contributes.
type MarkerTable = &'static [(&'static str, &'static [(&'static str, f32)])];

static MARKERS: MarkerTable = &[
    (
        "Python",
        &[
            ("def ", 0.2),
            ("import ", 0.1),
            ("print(", 0.1),
            ("elif ", 0.2),
            ("self.", 0.1),
            ("__name__", 0.2),
        ],
    ),
    (
        "Rust",
        &[
            ("fn ", 0.2),
            ("let mut ", 0.3),
            ("impl ", 0.2),
            ("pub ", 0.1),
            ("::", 0.05),
            ("#[derive(", 0.4),
        ],
    ),
    ("C", &[("#include <", 0.3), ("int main(", 0.3), ("printf(", 0.1)]),
    (
        "C++",
        &[
            ("#include <", 0.25),
            ("std::", 0.3),
            ("template<", 0.2),
            ("namespace ", 0.2),
        ],
    ),
    ("Go", &[("package ", 0.2), ("func ", 0.3), (":=", 0.1)]),
    (
        "Java",
        &[("public class ", 0.4), ("System.out", 0.3), ("import java.", 0.4)],
    ),
    (
        "JavaScript",
        &[
            ("function ", 0.2),
            ("const ", 0.1),
            ("=> ", 0.1),
            ("console.log", 0.3),
            ("require(", 0.2),
        ],
    ),
    (
        "JavaScript (Babel)",
        &[
            ("function ", 0.2),
            ("const ", 0.1),
            ("=> ", 0.1),
            ("console.log", 0.3),
            ("require(", 0.2),
        ],
    ),
    ("HTML", &[("<!DOCTYPE html", 0.6), ("<html", 0.5), ("<div", 0.2)]),
    ("PHP", &[("<?php", 1.0)]),
    ("XML", &[("<?xml", 1.0)]),
    ("Ruby", &[("puts ", 0.3), ("end\n", 0.1), ("require '", 0.2)]),
    (
        "Bourne Again Shell (bash)",
        &[("echo ", 0.1), ("fi\n", 0.2), ("then\n", 0.1), ("$(", 0.1)],
    ),
    ("Lisp", &[("(defun ", 0.4), ("(let ", 0.1), ("(setq ", 0.3)]),
    ("Makefile", &[(".PHONY", 0.5), ("$(MAKE)", 0.3)]),
    ("Markdown", &[("\n# ", 0.1), ("```", 0.2), ("](http", 0.2)]),
];

/// Marker table for a language, empty if the language has none.
pub fn markers_for(language: &str) -> &'static [(&'static str, f32)] {
    MARKERS
        .iter()
        .find(|(name, _)| *name == language)
        .map(|(_, markers)| *markers)
        .unwrap_or(&[])
}

/// Score `source` against a marker table.
pub fn marker_score(source: &str, markers: &[(&str, f32)]) -> f32 {
    markers
        .iter()
        .filter(|(needle, _)| source.contains(needle))
        .map(|(_, weight)| weight)
        .sum::<f32>()
        .min(1.0)
}

/// Per-source facts computed once and shared across all candidate lexers.
#[derive(Debug, Clone, Default)]
pub struct ContentProbe<'a> {
    pub source: &'a str,
    /// Language whose first-line pattern matched the source, if any.
    pub first_line_language: Option<String>,
}

impl<'a> ContentProbe<'a> {
    pub fn new(source: &'a str, first_line_language: Option<String>) -> Self {
        Self {
            source,
            first_line_language,
        }
    }

    /// Confidence that `source` is written in `language`.
    pub fn score(&self, language: &str, markers: &[(&str, f32)]) -> f32 {
        if self.first_line_language.as_deref() == Some(language) {
            return 1.0;
        }
        marker_score(self.source, markers)
    }
}
