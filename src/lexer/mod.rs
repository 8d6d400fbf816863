//! Lexers: split source text into tagged tokens, one token list per line.
//!
//! A [`Lexer`] is looked up through a [`LexerRegistry`], either by filename
//! (with content as the tiebreaker) or by content heuristics alone.

pub mod heuristics;
pub mod registry;

pub use registry::{LexerEntry, LexerRegistry};

use crate::{Error, Result};
use std::borrow::Cow;
use std::sync::Arc;
use syntect::parsing::{ParseState, ScopeStack, SyntaxSet};
use syntect::easy::ScopeRegionIterator;
use syntect::util::LinesWithEndings;

/// A run of source text together with the scope stack it was lexed under.
///
/// The scope stack is the token's tag; the highlighting theme maps it to a
/// color at raster time.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    pub scopes: ScopeStack,
}

/// A language lexer.
pub trait Lexer: Send + Sync {
    /// Human readable language name (e.g. `"Python"`).
    fn name(&self) -> &str;

    /// Tokenize `source` into one token list per line. Line terminators are
    /// stripped from the tokens; empty lines yield empty lists.
    fn tokenize(&self, source: &str) -> Result<Vec<Vec<Token>>>;
}

impl std::fmt::Debug for dyn Lexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer").field("name", &self.name()).finish()
    }
}

/// A lexer backed by one syntect syntax definition.
pub struct SyntectLexer {
    set: Arc<SyntaxSet>,
    index: usize,
}

impl SyntectLexer {
    /// `index` is the position of the syntax in `set.syntaxes()`.
    pub fn new(set: Arc<SyntaxSet>, index: usize) -> Self {
        Self { set, index }
    }
}

impl Lexer for SyntectLexer {
    fn name(&self) -> &str {
        &self.set.syntaxes()[self.index].name
    }

    fn tokenize(&self, source: &str) -> Result<Vec<Vec<Token>>> {
        let syntax = &self.set.syntaxes()[self.index];
        let mut state = ParseState::new(syntax);
        let mut stack = ScopeStack::new();

        // Newline-terminated syntaxes expect every line to end in '\n'.
        let text: Cow<'_, str> = if !source.is_empty() && !source.ends_with('\n') {
            Cow::Owned(format!("{}\n", source))
        } else {
            Cow::Borrowed(source)
        };

        let mut lines = Vec::new();
        for line in LinesWithEndings::from(text.as_ref()) {
            let ops = state.parse_line(line, &self.set).map_err(|e| {
                Error::RenderError(format!("{} lexer failed: {}", syntax.name, e))
            })?;

            let mut tokens = Vec::new();
            for (region, op) in ScopeRegionIterator::new(&ops, line) {
                stack
                    .apply(op)
                    .map_err(|e| Error::RenderError(format!("scope stack error: {:?}", e)))?;
                let region = region.trim_end_matches(['\n', '\r']);
                if region.is_empty() {
                    continue;
                }
                tokens.push(Token {
                    text: region.to_string(),
                    scopes: stack.clone(),
                });
            }
            lines.push(tokens);
        }
        Ok(lines)
    }
}

/// Number of lines in `source`, counted the way the crop math expects
/// (a trailing newline does not start a new line).
pub fn line_count(source: &str) -> usize {
    source.lines().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn python() -> SyntectLexer {
        let set = Arc::new(two_face::syntax::extra_newlines());
        let index = set
            .syntaxes()
            .iter()
            .position(|s| s.name == "Python")
            .expect("python syntax");
        SyntectLexer::new(set, index)
    }

    #[test]
    fn tokenize_yields_one_list_per_line() {
        let lines = python().tokenize("import os\n\nprint(os.name)\n").unwrap();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].is_empty());
        let first: String = lines[0].iter().map(|t| t.text.as_str()).collect();
        assert_eq!(first, "import os");
    }

    #[test]
    fn tokenize_handles_missing_trailing_newline() {
        let lines = python().tokenize("x = 1").unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].iter().all(|t| !t.text.contains('\n')));
    }

    #[test]
    fn keywords_carry_a_nested_scope() {
        let lines = python().tokenize("def f():\n    pass\n").unwrap();
        let def = lines[0].iter().find(|t| t.text == "def").expect("def token");
        // Deeper than the bare `source.python` scope.
        assert!(def.scopes.as_slice().len() > 1);
    }

    #[test]
    fn line_count_ignores_trailing_newline() {
        assert_eq!(line_count("a\nb\nc\nd\ne\n"), 5);
        assert_eq!(line_count("a\nb"), 2);
        assert_eq!(line_count(""), 0);
    }
}
