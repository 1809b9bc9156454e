//! Path templates: compiled patterns with capture variables.
//!
//! A template is an alternating sequence of literal text and named
//! variables. `{name}` captures any run of characters except `/`;
//! `{name+}` is greedy and captures the rest of the path including `/`
//! separators (it must therefore be the final element of the pattern).
//!
//! Templates are compiled once at attach time and are immutable afterwards.
//! Malformed patterns fail at compile time with a [`TemplateError`], never
//! at request time.

use std::fmt;

/// Error raised while compiling a path template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// A `{` without a closing `}`.
    #[error("unterminated variable in template {pattern:?}")]
    UnterminatedVariable {
        /// The offending pattern.
        pattern: String,
    },

    /// A `{}` or `{+}` with no variable name.
    #[error("empty variable name in template {pattern:?}")]
    EmptyVariableName {
        /// The offending pattern.
        pattern: String,
    },

    /// A variable name containing characters outside `[A-Za-z0-9_-]`.
    #[error("invalid variable name {name:?} in template {pattern:?}")]
    InvalidVariableName {
        /// The offending pattern.
        pattern: String,
        /// The rejected variable name.
        name: String,
    },

    /// The same variable name used twice in one template.
    #[error("duplicate variable name {name:?} in template {pattern:?}")]
    DuplicateVariableName {
        /// The offending pattern.
        pattern: String,
        /// The duplicated variable name.
        name: String,
    },

    /// A greedy `{name+}` variable followed by more pattern text.
    #[error("greedy variable {name:?} must terminate template {pattern:?}")]
    GreedyVariableNotLast {
        /// The offending pattern.
        pattern: String,
        /// The greedy variable name.
        name: String,
    },

    /// A `}` with no opening `{`.
    #[error("unmatched '}}' in template {pattern:?}")]
    UnmatchedBrace {
        /// The offending pattern.
        pattern: String,
    },
}

/// How a template anchors against the remaining request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchingMode {
    /// The template must consume the whole remaining path (a lone trailing
    /// `/` is tolerated). Used for leaf resources.
    #[default]
    Exact,
    /// The template must match a prefix of the remaining path; the
    /// remainder is passed on for nested dispatch.
    Prefix,
}

/// One element of a compiled template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable { name: String, greedy: bool },
}

/// The outcome of matching a template against a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateMatch {
    /// Number of input characters consumed by the template.
    pub matched_len: usize,
    /// Captured variable bindings, in template order.
    pub variables: Vec<(String, String)>,
    /// The unconsumed rest of the path.
    pub remaining: String,
}

/// A compiled path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    pattern: String,
    segments: Vec<Segment>,
    literal_len: usize,
    variable_count: usize,
    case_insensitive: bool,
}

impl PathTemplate {
    /// Compile a pattern such as `/users/{name}` or `/files/{path+}`.
    ///
    /// # Errors
    ///
    /// Returns a [`TemplateError`] describing the first syntax problem
    /// found. Compilation failures are configuration errors: they surface
    /// at attach time and are fatal to startup, never seen at request time.
    pub fn compile(pattern: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut seen_names: Vec<String> = Vec::new();
        let mut chars = pattern.char_indices().peekable();

        while let Some((_, ch)) = chars.next() {
            match ch {
                '{' => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }

                    let mut name = String::new();
                    let mut terminated = false;
                    for (_, inner) in chars.by_ref() {
                        if inner == '}' {
                            terminated = true;
                            break;
                        }
                        name.push(inner);
                    }

                    if !terminated {
                        return Err(TemplateError::UnterminatedVariable {
                            pattern: pattern.to_owned(),
                        });
                    }

                    let greedy = name.ends_with('+');
                    if greedy {
                        name.pop();
                    }

                    if name.is_empty() {
                        return Err(TemplateError::EmptyVariableName {
                            pattern: pattern.to_owned(),
                        });
                    }
                    if !name
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
                    {
                        return Err(TemplateError::InvalidVariableName {
                            pattern: pattern.to_owned(),
                            name,
                        });
                    }
                    if seen_names.iter().any(|n| n == &name) {
                        return Err(TemplateError::DuplicateVariableName {
                            pattern: pattern.to_owned(),
                            name,
                        });
                    }

                    seen_names.push(name.clone());
                    segments.push(Segment::Variable { name, greedy });

                    if greedy && chars.peek().is_some() {
                        let greedy_name = seen_names.last().cloned().unwrap_or_default();
                        return Err(TemplateError::GreedyVariableNotLast {
                            pattern: pattern.to_owned(),
                            name: greedy_name,
                        });
                    }
                }
                '}' => {
                    return Err(TemplateError::UnmatchedBrace {
                        pattern: pattern.to_owned(),
                    });
                }
                _ => literal.push(ch),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        let literal_len = segments
            .iter()
            .map(|s| match s {
                Segment::Literal(text) => text.len(),
                Segment::Variable { .. } => 0,
            })
            .sum();
        let variable_count = seen_names.len();

        Ok(Self {
            pattern: pattern.to_owned(),
            segments,
            literal_len,
            variable_count,
            case_insensitive: false,
        })
    }

    /// Make literal matching case-insensitive.
    #[must_use]
    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    /// The source pattern this template was compiled from.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Total number of literal characters, the primary specificity metric:
    /// more literal text means a more specific template.
    #[must_use]
    pub fn literal_len(&self) -> usize {
        self.literal_len
    }

    /// Number of capture variables, the secondary specificity metric:
    /// fewer variables means a more specific template.
    #[must_use]
    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    /// Match this template against a path.
    ///
    /// Returns the consumed length, captured bindings, and the unconsumed
    /// remainder, or `None` when the path does not match. In
    /// [`MatchingMode::Exact`] the remainder must be empty or a lone `/`.
    #[must_use]
    pub fn match_path(&self, path: &str, mode: MatchingMode) -> Option<TemplateMatch> {
        let mut pos = 0usize;
        let mut variables = Vec::with_capacity(self.variable_count);

        for (index, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Literal(text) => {
                    let candidate = path.get(pos..pos + text.len())?;
                    if !self.literal_eq(candidate, text) {
                        return None;
                    }
                    pos += text.len();
                }
                Segment::Variable { name, greedy } => {
                    if *greedy {
                        // Greedy variable: the rest of the path, slashes
                        // included. Compilation guarantees it is last.
                        let value = &path[pos..];
                        if value.is_empty() {
                            return None;
                        }
                        variables.push((name.clone(), value.to_owned()));
                        pos = path.len();
                    } else {
                        let window_end = path[pos..]
                            .find('/')
                            .map_or(path.len(), |offset| pos + offset);
                        let window = &path[pos..window_end];

                        let value_len = match self.next_literal(index) {
                            // An inner literal delimiter (e.g. the "-" in
                            // "{year}-{month}") bounds the capture within
                            // the window.
                            Some(lit) if !lit.starts_with('/') => {
                                self.find_literal(window, lit)?
                            }
                            // Otherwise the capture takes the whole window,
                            // up to the next '/' or the end of the path.
                            _ => window.len(),
                        };

                        if value_len == 0 {
                            return None;
                        }
                        variables.push((name.clone(), window[..value_len].to_owned()));
                        pos += value_len;
                    }
                }
            }
        }

        let remaining = &path[pos..];
        if mode == MatchingMode::Exact && !(remaining.is_empty() || remaining == "/") {
            return None;
        }

        Some(TemplateMatch {
            matched_len: pos,
            variables,
            remaining: remaining.to_owned(),
        })
    }

    /// The literal segment following `index`, if any.
    fn next_literal(&self, index: usize) -> Option<&str> {
        match self.segments.get(index + 1) {
            Some(Segment::Literal(text)) => Some(text),
            _ => None,
        }
    }

    /// Find the first occurrence of `lit` in `window` after at least one
    /// character, returning the variable value length.
    fn find_literal(&self, window: &str, lit: &str) -> Option<usize> {
        if self.case_insensitive {
            let window_lower = window.to_ascii_lowercase();
            let lit_lower = lit.to_ascii_lowercase();
            window_lower[1.min(window_lower.len())..]
                .find(&lit_lower)
                .map(|offset| offset + 1.min(window.len()))
        } else {
            window[1.min(window.len())..]
                .find(lit)
                .map(|offset| offset + 1.min(window.len()))
        }
    }

    fn literal_eq(&self, a: &str, b: &str) -> bool {
        if self.case_insensitive {
            a.eq_ignore_ascii_case(b)
        } else {
            a == b
        }
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}
