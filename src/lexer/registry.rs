//! Lexer registry: filename patterns and content heuristics mapped to lexers.

use super::heuristics::{markers_for, ContentProbe};
use super::{Lexer, SyntectLexer};
use crate::{Error, Result};
use log::debug;
use std::path::Path;
use std::sync::Arc;
use syntect::parsing::SyntaxSet;

/// Name of the fallback lexer used when content guessing finds nothing.
pub const PLAIN_TEXT: &str = "Plain Text";

/// One registered language.
pub struct LexerEntry {
    /// Extensions (`"py"`) or whole file names (`"Makefile"`), without globs.
    pub patterns: Vec<String>,
    /// Marker substrings used by content scoring.
    pub markers: &'static [(&'static str, f32)],
    pub lexer: Arc<dyn Lexer>,
}

impl LexerEntry {
    pub fn new(patterns: Vec<String>, lexer: Arc<dyn Lexer>) -> Self {
        let markers = markers_for(lexer.name());
        Self {
            patterns,
            markers,
            lexer,
        }
    }

    pub fn name(&self) -> &str {
        self.lexer.name()
    }

    /// Whether `filename` matches one of this entry's patterns.
    ///
    /// Every dot-suffix of the base name is tried, so `archive.tar.gz`
    /// matches both `gz` and `tar.gz`. Matching ignores ASCII case.
    pub fn matches_filename(&self, filename: &str) -> bool {
        let base = Path::new(filename)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(filename);

        let mut candidates = vec![base];
        candidates.extend(base.match_indices('.').map(|(i, _)| &base[i + 1..]));

        self.patterns.iter().any(|pattern| {
            candidates
                .iter()
                .any(|c| !c.is_empty() && c.eq_ignore_ascii_case(pattern))
        })
    }
}

/// Ordered set of lexers. Registration order breaks scoring ties.
pub struct LexerRegistry {
    entries: Vec<LexerEntry>,
    syntaxes: Option<Arc<SyntaxSet>>,
}

impl LexerRegistry {
    /// An empty registry; add languages with [`LexerRegistry::register`].
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            syntaxes: None,
        }
    }

    /// Registry with one syntect-backed lexer per syntax in `set`.
    pub fn from_syntax_set(set: SyntaxSet) -> Self {
        let set = Arc::new(set);
        let entries = set
            .syntaxes()
            .iter()
            .enumerate()
            .filter(|(_, syntax)| !syntax.hidden)
            .map(|(index, syntax)| {
                LexerEntry::new(
                    syntax.file_extensions.clone(),
                    Arc::new(SyntectLexer::new(set.clone(), index)),
                )
            })
            .collect();
        Self {
            entries,
            syntaxes: Some(set),
        }
    }

    /// Registry over the extended syntax collection bundled with two-face.
    pub fn with_extended_syntaxes() -> Self {
        Self::from_syntax_set(two_face::syntax::extra_newlines())
    }

    pub fn register(&mut self, entry: LexerEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look a lexer up by its exact language name.
    pub fn by_name(&self, name: &str) -> Option<Arc<dyn Lexer>> {
        self.entries
            .iter()
            .find(|e| e.name() == name)
            .map(|e| e.lexer.clone())
    }

    /// Pick a lexer by filename, or by content when no filename is given.
    pub fn resolve(&self, filename: Option<&str>, source: &str) -> Result<Arc<dyn Lexer>> {
        match filename.filter(|f| !f.is_empty()) {
            Some(name) => self.for_filename(name, source),
            None => self.guess(source),
        }
    }

    /// Lexer whose patterns match `filename`; content breaks ties between
    /// several matches.
    pub fn for_filename(&self, filename: &str, source: &str) -> Result<Arc<dyn Lexer>> {
        let probe = self.probe(source);
        let best = self
            .entries
            .iter()
            .filter(|e| e.matches_filename(filename))
            .fold(None::<(&LexerEntry, f32)>, |best, entry| {
                let score = probe.score(entry.name(), entry.markers);
                match best {
                    Some((_, top)) if top >= score => best,
                    _ => Some((entry, score)),
                }
            });

        match best {
            Some((entry, score)) => {
                debug!("lexer for {}: {} (score {:.2})", filename, entry.name(), score);
                Ok(entry.lexer.clone())
            }
            None => Err(Error::LexerResolutionError(format!(
                "no lexer for filename {:?}",
                filename
            ))),
        }
    }

    /// Guess a lexer from content alone, falling back to plain text.
    pub fn guess(&self, source: &str) -> Result<Arc<dyn Lexer>> {
        let probe = self.probe(source);
        let mut best: Option<(&LexerEntry, f32)> = None;
        for entry in &self.entries {
            let score = probe.score(entry.name(), entry.markers);
            if score <= 0.0 {
                continue;
            }
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((entry, score));
            }
        }

        if let Some((entry, score)) = best {
            debug!("guessed lexer {} (score {:.2})", entry.name(), score);
            return Ok(entry.lexer.clone());
        }

        self.by_name(PLAIN_TEXT).ok_or_else(|| {
            Error::LexerResolutionError("no lexer matches the source content".into())
        })
    }

    fn probe<'a>(&self, source: &'a str) -> ContentProbe<'a> {
        let first_line = self
            .syntaxes
            .as_ref()
            .and_then(|set| set.find_syntax_by_first_line(source))
            .map(|syntax| syntax.name.clone());
        ContentProbe::new(source, first_line)
    }
}

impl Default for LexerRegistry {
    fn default() -> Self {
        Self::with_extended_syntaxes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Token;

    struct Fixed(&'static str);

    impl Lexer for Fixed {
        fn name(&self) -> &str {
            self.0
        }

        fn tokenize(&self, source: &str) -> Result<Vec<Vec<Token>>> {
            Ok(source.lines().map(|_| Vec::new()).collect())
        }
    }

    fn entry(name: &'static str, patterns: &[&str]) -> LexerEntry {
        LexerEntry::new(
            patterns.iter().map(|p| p.to_string()).collect(),
            Arc::new(Fixed(name)),
        )
    }

    #[test]
    fn filename_patterns_match_suffixes_and_base_names() {
        let e = entry("Make", &["Makefile", "mk", "tar.gz"]);
        assert!(e.matches_filename("Makefile"));
        assert!(e.matches_filename("/src/project/Makefile"));
        assert!(e.matches_filename("rules.mk"));
        assert!(e.matches_filename("a.TAR.GZ"));
        assert!(!e.matches_filename("Makefile.bak"));
        assert!(!e.matches_filename(""));
    }

    #[test]
    fn content_breaks_filename_ties() {
        let mut reg = LexerRegistry::empty();
        reg.register(entry("C", &["h"]));
        reg.register(entry("C++", &["h"]));

        let plain = reg.for_filename("x.h", "int x;").unwrap();
        assert_eq!(plain.name(), "C");

        let cpp = reg
            .for_filename("x.h", "namespace a { std::string s; }")
            .unwrap();
        assert_eq!(cpp.name(), "C++");
    }

    #[test]
    fn unknown_filename_is_a_resolution_error() {
        let mut reg = LexerRegistry::empty();
        reg.register(entry("Python", &["py"]));
        let err = reg.for_filename("notes.zzz", "print(1)").unwrap_err();
        assert!(matches!(err, Error::LexerResolutionError(_)));
    }

    #[test]
    fn empty_registry_cannot_guess() {
        let reg = LexerRegistry::empty();
        assert!(matches!(
            reg.guess("anything"),
            Err(Error::LexerResolutionError(_))
        ));
    }

    #[test]
    fn guess_prefers_highest_score() {
        let mut reg = LexerRegistry::empty();
        reg.register(entry("Python", &["py"]));
        reg.register(entry("Rust", &["rs"]));
        let lx = reg.guess("fn main() { let mut x = 1; }").unwrap();
        assert_eq!(lx.name(), "Rust");
    }

    #[test]
    fn extended_registry_resolves_common_files() {
        let reg = LexerRegistry::with_extended_syntaxes();
        assert_eq!(reg.resolve(Some("foo.py"), "print(1)").unwrap().name(), "Python");
        assert_eq!(reg.resolve(Some("main.rs"), "fn main() {}").unwrap().name(), "Rust");
        assert_eq!(
            reg.resolve(None, "#!/usr/bin/env python\nprint(1)\n").unwrap().name(),
            "Python"
        );
        assert_eq!(reg.resolve(None, "hello there").unwrap().name(), PLAIN_TEXT);
    }
}
