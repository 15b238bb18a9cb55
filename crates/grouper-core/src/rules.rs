//! Ordered text-rewrite rules.
//!
//! A rule is either a regex replacement or a whole-text transform. The
//! `regex` crate has no look-around, so a replacement may carry a [`Guard`]
//! that inspects the characters immediately before and after each match.
//! A rejected match is retried one character further along.

use regex::{Captures, Regex};

pub type RewriteFn = Box<dyn Fn(&Captures<'_>) -> String + Send + Sync>;

pub enum Rewrite {
    /// Replacement template in `regex` expansion syntax (`${1}`).
    Template(&'static str),
    With(RewriteFn),
}

/// Context check on the characters surrounding a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Guard {
    Always,
    /// Not preceded by a word character.
    NotAfterWord,
    /// Not followed by a word character.
    NotBeforeWord,
    /// Neither preceded nor followed by a word character.
    Isolated,
    /// Like `Isolated`, and also not preceded by an apostrophe.
    IsolatedLetter,
    /// Not followed by a digit.
    NotBeforeDigit,
    /// Neither preceded nor followed by a digit.
    NotBetweenDigits,
}

pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl Guard {
    pub fn admits(self, before: Option<char>, after: Option<char>) -> bool {
        let word = |c: Option<char>| c.is_some_and(is_word_char);
        let digit = |c: Option<char>| c.is_some_and(|c| c.is_ascii_digit());
        match self {
            Guard::Always => true,
            Guard::NotAfterWord => !word(before),
            Guard::NotBeforeWord => !word(after),
            Guard::Isolated => !word(before) && !word(after),
            Guard::IsolatedLetter => {
                !word(before) && !word(after) && !matches!(before, Some('\'' | '’'))
            }
            Guard::NotBeforeDigit => !digit(after),
            Guard::NotBetweenDigits => !digit(before) && !digit(after),
        }
    }
}

enum Action {
    Replace {
        pattern: Regex,
        guard: Guard,
        rewrite: Rewrite,
    },
    Transform(fn(&str) -> String),
}

pub struct Rule {
    name: &'static str,
    action: Action,
}

impl Rule {
    /// Regex replacement with an expansion template.
    ///
    /// Patterns are compile-time literals; an invalid one is a programming
    /// error caught by the normalizer's construction test.
    pub fn replace(name: &'static str, pattern: &str, template: &'static str) -> Self {
        Self::build(name, pattern, Rewrite::Template(template))
    }

    /// Regex replacement computed from the captures.
    pub fn replace_with<F>(name: &'static str, pattern: &str, f: F) -> Self
    where
        F: Fn(&Captures<'_>) -> String + Send + Sync + 'static,
    {
        Self::build(name, pattern, Rewrite::With(Box::new(f)))
    }

    pub fn transform(name: &'static str, f: fn(&str) -> String) -> Self {
        Self {
            name,
            action: Action::Transform(f),
        }
    }

    fn build(name: &'static str, pattern: &str, rewrite: Rewrite) -> Self {
        let pattern = Regex::new(pattern)
            .unwrap_or_else(|e| panic!("rewrite rule '{name}' has an invalid pattern: {e}"));
        Self {
            name,
            action: Action::Replace {
                pattern,
                guard: Guard::Always,
                rewrite,
            },
        }
    }

    /// Attach a context guard. No effect on transforms.
    pub fn guarded(mut self, guard: Guard) -> Self {
        if let Action::Replace { guard: g, .. } = &mut self.action {
            *g = guard;
        }
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn apply(&self, text: &str) -> String {
        match &self.action {
            Action::Transform(f) => f(text),
            Action::Replace {
                pattern,
                guard,
                rewrite,
            } => replace_guarded(pattern, *guard, rewrite, text),
        }
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

fn next_boundary(text: &str, i: usize) -> usize {
    text[i..]
        .chars()
        .next()
        .map_or(text.len() + 1, |c| i + c.len_utf8())
}

fn replace_guarded(pattern: &Regex, guard: Guard, rewrite: &Rewrite, text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut at = 0;

    while at <= text.len() {
        let Some(caps) = pattern.captures_at(text, at) else {
            break;
        };
        let Some(m) = caps.get(0) else {
            break;
        };

        let before = text[..m.start()].chars().next_back();
        let after = text[m.end()..].chars().next();
        if !guard.admits(before, after) {
            at = next_boundary(text, m.start());
            continue;
        }

        out.push_str(&text[last..m.start()]);
        match rewrite {
            Rewrite::Template(template) => caps.expand(template, &mut out),
            Rewrite::With(f) => out.push_str(&f(&caps)),
        }
        last = m.end();
        at = if m.is_empty() {
            next_boundary(text, m.end())
        } else {
            m.end()
        };
    }

    out.push_str(&text[last..]);
    out
}
