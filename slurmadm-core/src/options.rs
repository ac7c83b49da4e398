//! Option-string tokenization.
//!
//! Slurm CLIs take space-separated `key=value` options where values may
//! contain quoted spaces (`description='Test Account'`). Splitting happens
//! here and nowhere else, and the resulting tokens are passed to the process
//! as a discrete argument vector; no shell ever sees them.

use crate::error::{Result, SlurmadmError};

/// Split a free-form option string into argument tokens.
///
/// Whitespace separates tokens; single or double quotes group a value, and
/// the quotes themselves are stripped (`description='Test Account'` becomes
/// the single token `description=Test Account`). An empty or all-whitespace
/// string yields no tokens. Unbalanced quoting is rejected before anything
/// is executed, as is an unquoted word starting with `#`: the lexer would
/// treat that word and everything after it as a comment and drop it, and a
/// truncated argument vector must never run.
pub fn tokenize(options: &str) -> Result<Vec<String>> {
    if options.trim().is_empty() {
        return Ok(Vec::new());
    }
    if has_comment_start(options) {
        return Err(SlurmadmError::InvalidOptions {
            raw: options.to_string(),
        });
    }
    shlex::split(options).ok_or_else(|| SlurmadmError::InvalidOptions {
        raw: options.to_string(),
    })
}

/// True when a `#` opens a new unquoted word. `shlex::split` skips from
/// there to the end of the line instead of reporting an error, so this is
/// checked up front. A `#` inside a word (`name=x#tag`) or inside quotes
/// (`comment='# note'`) is an ordinary character.
fn has_comment_start(options: &str) -> bool {
    let mut at_word_start = true;
    let mut in_single = false;
    let mut in_double = false;
    let mut escaped = false;
    for ch in options.chars() {
        if escaped {
            escaped = false;
            at_word_start = false;
            continue;
        }
        if in_single {
            in_single = ch != '\'';
            continue;
        }
        if in_double {
            match ch {
                '"' => in_double = false,
                '\\' => escaped = true,
                _ => {}
            }
            continue;
        }
        match ch {
            '#' if at_word_start => return true,
            '\\' => escaped = true,
            '\'' => {
                in_single = true;
                at_word_start = false;
            }
            '"' => {
                in_double = true;
                at_word_start = false;
            }
            _ if ch.is_whitespace() => at_word_start = true,
            _ => at_word_start = false,
        }
    }
    false
}
