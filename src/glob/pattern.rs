//! Glob-to-regex compilation.

use regex::Regex;
use thiserror::Error;

/// Error produced when a glob pattern cannot be compiled.
#[derive(Debug, Error)]
pub enum GlobError {
    #[error("malformed pattern '{pattern}': {reason}")]
    Malformed {
        pattern: String,
        reason: &'static str,
    },
    #[error("malformed pattern '{pattern}'")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl GlobError {
    /// Returns the offending pattern.
    pub fn pattern(&self) -> &str {
        match self {
            Self::Malformed { pattern, .. } | Self::Regex { pattern, .. } => pattern,
        }
    }
}

/// A compiled glob pattern.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    separator: char,
    regex: Regex,
}

impl CompiledPattern {
    /// Returns `true` if the whole candidate matches the pattern.
    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub const fn separator(&self) -> char {
        self.separator
    }
}

/// Compiles `pattern` into a matcher where `separator` delimits path segments.
///
/// `**` crosses separators, `*` and `?` do not. Classes (`[a-z]`, `[!x]`) and
/// alternations (`{a,b}`) are supported; `\` escapes the next character.
pub fn compile(pattern: &str, separator: char) -> Result<CompiledPattern, GlobError> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut parser = Parser {
        pattern,
        chars: &chars,
        pos: 0,
        sep: regex::escape(&separator.to_string()),
    };

    let body = parser.sequence(0)?;
    let regex = Regex::new(&format!("^{body}$")).map_err(|source| GlobError::Regex {
        pattern: pattern.to_string(),
        source,
    })?;

    Ok(CompiledPattern {
        source: pattern.to_string(),
        separator,
        regex,
    })
}

/// Returns `true` if `pattern` contains any glob metacharacter.
pub fn has_meta(pattern: &str) -> bool {
    pattern.contains(['*', '?', '[', '{', '\\'])
}

struct Parser<'a> {
    pattern: &'a str,
    chars: &'a [char],
    pos: usize,
    sep: String,
}

impl Parser<'_> {
    fn malformed(&self, reason: &'static str) -> GlobError {
        GlobError::Malformed {
            pattern: self.pattern.to_string(),
            reason,
        }
    }

    /// Parses until end of input, or until `,`/`}` when inside `depth` braces.
    fn sequence(&mut self, depth: usize) -> Result<String, GlobError> {
        let mut out = String::new();

        while let Some(&c) = self.chars.get(self.pos) {
            match c {
                ',' | '}' if depth > 0 => return Ok(out),
                '*' => {
                    if self.chars.get(self.pos + 1) == Some(&'*') {
                        self.pos += 2;
                        out.push_str(".*");
                    } else {
                        self.pos += 1;
                        out.push_str(&format!("[^{}]*", self.sep));
                    }
                }
                '?' => {
                    self.pos += 1;
                    out.push_str(&format!("[^{}]", self.sep));
                }
                '[' => out.push_str(&self.class()?),
                '{' => out.push_str(&self.alternation(depth)?),
                '\\' => {
                    let escaped = self
                        .chars
                        .get(self.pos + 1)
                        .ok_or_else(|| self.malformed("trailing escape character"))?;
                    out.push_str(&regex::escape(&escaped.to_string()));
                    self.pos += 2;
                }
                _ => {
                    out.push_str(&regex::escape(&c.to_string()));
                    self.pos += 1;
                }
            }
        }

        if depth > 0 {
            return Err(self.malformed("unterminated '{'"));
        }
        Ok(out)
    }

    fn class(&mut self) -> Result<String, GlobError> {
        self.pos += 1;
        let negated = matches!(self.chars.get(self.pos), Some('!' | '^'));
        if negated {
            self.pos += 1;
        }

        let mut items = String::new();
        let mut count = 0;
        loop {
            let c = *self
                .chars
                .get(self.pos)
                .ok_or_else(|| self.malformed("unterminated '['"))?;
            match c {
                ']' => {
                    self.pos += 1;
                    break;
                }
                '\\' => {
                    let escaped = self
                        .chars
                        .get(self.pos + 1)
                        .ok_or_else(|| self.malformed("trailing escape character"))?;
                    items.push_str(&regex::escape(&escaped.to_string()));
                    self.pos += 2;
                }
                _ => {
                    let is_range = self.chars.get(self.pos + 1) == Some(&'-')
                        && self.chars.get(self.pos + 2).is_some_and(|&end| end != ']');
                    if is_range {
                        let end = self.chars[self.pos + 2];
                        if end < c {
                            return Err(self.malformed("invalid character range"));
                        }
                        items.push_str(&regex::escape(&c.to_string()));
                        items.push('-');
                        items.push_str(&regex::escape(&end.to_string()));
                        self.pos += 3;
                    } else {
                        items.push_str(&regex::escape(&c.to_string()));
                        self.pos += 1;
                    }
                }
            }
            count += 1;
        }

        if count == 0 {
            return Err(self.malformed("empty character class"));
        }

        if negated {
            Ok(format!("[^{items}{}]", self.sep))
        } else {
            Ok(format!("[{items}]"))
        }
    }

    fn alternation(&mut self, depth: usize) -> Result<String, GlobError> {
        self.pos += 1;
        let mut branches = Vec::new();

        loop {
            branches.push(self.sequence(depth + 1)?);
            match self.chars.get(self.pos) {
                Some(',') => self.pos += 1,
                Some('}') => {
                    self.pos += 1;
                    break;
                }
                _ => return Err(self.malformed("unterminated '{'")),
            }
        }

        Ok(format!("(?:{})", branches.join("|")))
    }
}
