//! Code / comment / string classification.

use bracket_colors_lang::LanguageConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    LineComment,
    BlockComment,
    Literal(char),
}

fn token_at(chars: &[char], i: usize, token: &str) -> bool {
    let mut p = i;
    for expected in token.chars() {
        if chars.get(p) != Some(&expected) {
            return false;
        }
        p += 1;
    }
    true
}

/// Classify every character: `true` for program text, `false` inside comments and string
/// literals (delimiters included).
///
/// Line comments end at `\n`; the newline itself is code again. Unterminated block comments and
/// literals run to the end of the text.
pub fn classify_code(chars: impl Iterator<Item = char>, language: &LanguageConfig) -> Vec<bool> {
    let chars: Vec<char> = chars.collect();
    let mut code = vec![true; chars.len()];
    let line = language.comments.line_token();
    let block = language.comments.block_tokens();

    let mut state = State::Code;
    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        match state {
            State::Code => {
                if let Some(token) = line
                    && token_at(&chars, i, token)
                {
                    state = State::LineComment;
                    continue;
                }
                if let Some((start, _)) = block
                    && token_at(&chars, i, start)
                {
                    let n = start.chars().count();
                    code[i..i + n].fill(false);
                    i += n;
                    state = State::BlockComment;
                    continue;
                }
                if language.is_quote(ch) {
                    code[i] = false;
                    state = State::Literal(ch);
                }
                i += 1;
            }
            State::LineComment => {
                if ch == '\n' {
                    state = State::Code;
                } else {
                    code[i] = false;
                }
                i += 1;
            }
            State::BlockComment => {
                if let Some((_, end)) = block
                    && token_at(&chars, i, end)
                {
                    let n = end.chars().count();
                    code[i..i + n].fill(false);
                    i += n;
                    state = State::Code;
                    continue;
                }
                code[i] = false;
                i += 1;
            }
            State::Literal(quote) => {
                code[i] = false;
                if language.escape == Some(ch) {
                    if let Some(escaped) = code.get_mut(i + 1) {
                        *escaped = false;
                    }
                    i += 2;
                    continue;
                }
                if ch == quote {
                    state = State::Code;
                }
                i += 1;
            }
        }
    }

    code
}
