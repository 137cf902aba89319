#![warn(missing_docs)]
//! `bracket-colors-lang` - comment and literal syntax for `bracket-colors` hosts.
//!
//! Only brackets in program text get colored. Hosts that do not already know where comments and
//! string literals are can describe the language with a [`LanguageConfig`] and classify the text
//! themselves.

/// Comment syntax of a language. Empty tokens count as absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommentTokens {
    /// Runs to the end of the line, e.g. `//` or `#`.
    pub line: Option<String>,
    /// Opening and closing delimiters, e.g. `/*` and `*/`.
    pub block: Option<(String, String)>,
}

impl CommentTokens {
    fn c_style() -> Self {
        Self {
            line: Some("//".to_string()),
            block: Some(("/*".to_string(), "*/".to_string())),
        }
    }

    fn hash() -> Self {
        Self {
            line: Some("#".to_string()),
            block: None,
        }
    }

    /// The line comment token.
    pub fn line_token(&self) -> Option<&str> {
        self.line.as_deref().filter(|token| !token.is_empty())
    }

    /// The block comment delimiters, if both are set.
    pub fn block_tokens(&self) -> Option<(&str, &str)> {
        match &self.block {
            Some((open, close)) if !open.is_empty() && !close.is_empty() => {
                Some((open.as_str(), close.as_str()))
            }
            _ => None,
        }
    }
}

/// Everything a host needs to separate code from comments and literals.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LanguageConfig {
    /// Comment tokens.
    pub comments: CommentTokens,
    /// Characters that open and close a string (or char) literal, e.g. `"` and `'`.
    ///
    /// A literal opened by one quote character is closed by the same character.
    pub string_quotes: Vec<char>,
    /// Escape character inside string literals (e.g. `\`).
    pub escape: Option<char>,
}

impl LanguageConfig {
    /// Rust: `//`, `/* */`, double-quoted strings with `\` escapes.
    ///
    /// Single quotes are left out: lifetimes (`'a`) would otherwise swallow the rest of a line.
    pub fn rust() -> Self {
        Self {
            comments: CommentTokens::c_style(),
            string_quotes: vec!['"'],
            escape: Some('\\'),
        }
    }

    /// C / C++ / Java style: `//`, `/* */`, `"` and `'` literals with `\` escapes.
    pub fn c() -> Self {
        Self {
            comments: CommentTokens::c_style(),
            string_quotes: vec!['"', '\''],
            escape: Some('\\'),
        }
    }

    /// Python: `#` comments, `"` and `'` literals with `\` escapes.
    pub fn python() -> Self {
        Self {
            comments: CommentTokens::hash(),
            string_quotes: vec!['"', '\''],
            escape: Some('\\'),
        }
    }

    /// Plain text: everything is code.
    pub fn plain() -> Self {
        Self::default()
    }

    /// Returns `true` if `ch` opens (and closes) a string literal.
    pub fn is_quote(&self, ch: char) -> bool {
        self.string_quotes.contains(&ch)
    }
}
