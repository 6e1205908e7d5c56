//! Multiple-choice questions with unique one-letter shorthands.
use std::io::{self, Write};

use colored::Colorize;

use crate::console::Console;

#[derive(Debug, Clone)]
struct Choice<T> {
    value: T,
    label: &'static str,
    shorthand: Option<(usize, char)>,
}

/// The answers a question accepts
///
/// Each answer gets as shorthand the first letter of its label that no earlier
/// answer claimed: `yes`, `no`, `all`, `none` become `y`, `n`, `a`, `o`.
#[derive(Debug, Clone)]
pub struct Choices<T> {
    choices: Vec<Choice<T>>,
    default: Option<T>,
}

impl<T: Copy + PartialEq> Choices<T> {
    /// Creates the set of answers; an empty reply selects `default`
    pub fn new(choices: impl IntoIterator<Item = (T, &'static str)>, default: Option<T>) -> Self {
        let mut taken: Vec<char> = Vec::new();
        let choices = choices
            .into_iter()
            .map(|(value, label)| {
                let shorthand = label
                    .char_indices()
                    .map(|(i, c)| (i, c.to_ascii_lowercase()))
                    .find(|(_, c)| c.is_alphanumeric() && !taken.contains(c));
                if let Some((_, c)) = shorthand {
                    taken.push(c);
                }
                Choice {
                    value,
                    label,
                    shorthand,
                }
            })
            .collect();
        Self { choices, default }
    }

    /// Shorthand letter of `value`
    pub fn shorthand(&self, value: T) -> Option<char> {
        self.choices
            .iter()
            .find(|c| c.value == value)
            .and_then(|c| c.shorthand)
            .map(|(_, c)| c)
    }

    /// Interprets a reply; `None` if it matches nothing
    pub fn resolve(&self, reply: &str) -> Option<T> {
        let reply = reply.trim().to_lowercase();
        if reply.is_empty() {
            return self.default;
        }
        let mut chars = reply.chars();
        let single = match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        };
        self.choices
            .iter()
            .find(|c| c.label == reply || (single.is_some() && c.shorthand.map(|s| s.1) == single))
            .map(|c| c.value)
    }

    /// Renders the answers as `(yes/no)`
    ///
    /// With `color` the shorthand is underlined and the default is bold;
    /// otherwise the shorthand is bracketed and the default is upper-case.
    pub fn render(&self, color: bool) -> String {
        let parts: Vec<String> = self
            .choices
            .iter()
            .map(|c| {
                let is_default = self.default == Some(c.value);
                let label = if is_default && !color {
                    c.label.to_uppercase()
                } else {
                    c.label.to_string()
                };
                let Some((at, short)) = c.shorthand else {
                    return if is_default && color {
                        label.bold().to_string()
                    } else {
                        label
                    };
                };
                let (before, rest) = label.split_at(at);
                let after = &rest[short.len_utf8()..];
                let short = &rest[..short.len_utf8()];
                if color {
                    let style = |s: &str| {
                        if is_default {
                            s.bold().to_string()
                        } else {
                            s.to_string()
                        }
                    };
                    let short = if is_default {
                        short.underline().bold().to_string()
                    } else {
                        short.underline().to_string()
                    };
                    format!("{}{}{}", style(before), short, style(after))
                } else {
                    format!("{before}[{short}]{after}")
                }
            })
            .collect();
        format!("({})", parts.join("/"))
    }

    /// Asks `question` once
    ///
    /// Returns `on_eof` when the input is exhausted and `None` when the reply
    /// matches no answer.
    pub fn ask(
        &self,
        console: &mut Console<'_>,
        question: &str,
        on_eof: Option<T>,
    ) -> io::Result<Option<T>> {
        let prompt = self.render(console.color());
        write!(console.out(), "{question} {prompt} ")?;
        match console.read_line()? {
            Some(reply) => Ok(self.resolve(&reply)),
            None => {
                writeln!(console.out())?;
                Ok(on_eof)
            }
        }
    }
}
