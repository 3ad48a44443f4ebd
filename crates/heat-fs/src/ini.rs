//! Line-preserving INI document editing
//!
//! OpenStack services read `oslo.config` style INI files: `[section]`
//! headers followed by `key = value` lines, with `#` or `;` comments.
//! [`IniDocument`] keeps every line it does not touch byte-for-byte, so
//! operator comments and unrelated options survive an edit.

use crate::{Error, Result};

/// Outcome of setting a single option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// The key did not exist and was inserted
    Added,
    /// The key existed with a different value
    Updated,
    /// The key already held the requested value
    Unchanged,
}

impl SetOutcome {
    pub fn is_change(self) -> bool {
        !matches!(self, SetOutcome::Unchanged)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    Section {
        name: String,
        raw: String,
    },
    Entry {
        key: String,
        value: String,
        /// Original text, dropped once the value is rewritten
        raw: Option<String>,
    },
    Other(String),
}

impl Line {
    fn render(&self) -> String {
        match self {
            Line::Section { raw, .. } | Line::Other(raw) => raw.clone(),
            Line::Entry {
                raw: Some(raw), ..
            } => raw.clone(),
            Line::Entry {
                key,
                value,
                raw: None,
            } => format!("{} = {}", key, value),
        }
    }
}

/// An INI file held as an ordered list of lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    lines: Vec<Line>,
}

impl IniDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse INI source.
    ///
    /// Only an unterminated section header is rejected. Lines that are
    /// neither headers nor `key = value` pairs are kept verbatim.
    pub fn parse(source: &str) -> Result<Self> {
        let mut lines = Vec::new();

        for (idx, raw) in source.lines().enumerate() {
            let trimmed = raw.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                lines.push(Line::Other(raw.to_string()));
            } else if trimmed.starts_with('[') {
                let name = trimmed
                    .strip_prefix('[')
                    .and_then(|rest| rest.strip_suffix(']'))
                    .ok_or_else(|| Error::IniParse {
                        line: idx + 1,
                        message: format!("unterminated section header `{}`", trimmed),
                    })?;
                lines.push(Line::Section {
                    name: name.trim().to_string(),
                    raw: raw.to_string(),
                });
            } else if let Some((key, value)) = trimmed.split_once('=') {
                lines.push(Line::Entry {
                    key: key.trim().to_string(),
                    value: value.trim().to_string(),
                    raw: Some(raw.to_string()),
                });
            } else {
                lines.push(Line::Other(raw.to_string()));
            }
        }

        Ok(Self { lines })
    }

    /// Look up the value of `key` in `section`.
    ///
    /// When a key is repeated the last occurrence wins, matching how
    /// `oslo.config` reads the file.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.positions_in(section)
            .filter_map(|idx| match &self.lines[idx] {
                Line::Entry { key: k, value, .. } if k == key => Some(value.as_str()),
                _ => None,
            })
            .last()
    }

    /// Check whether a `[section]` header exists.
    pub fn has_section(&self, section: &str) -> bool {
        self.lines
            .iter()
            .any(|line| matches!(line, Line::Section { name, .. } if name == section))
    }

    /// Set `key = value` under `[section]`.
    ///
    /// An existing key is rewritten in place. A new key goes after the last
    /// option of the section, and a new section is appended to the end of
    /// the document.
    ///
    /// The value is stored trimmed, as [`IniDocument::parse`] would read it
    /// back. Values containing `\n` or `\r` are rejected.
    pub fn set(&mut self, section: &str, key: &str, value: &str) -> Result<SetOutcome> {
        if value.contains(['\n', '\r']) {
            return Err(Error::MultilineValue {
                section: section.to_string(),
                key: key.to_string(),
            });
        }
        let value = value.trim();

        let existing = self
            .positions_in(section)
            .filter(|&idx| matches!(&self.lines[idx], Line::Entry { key: k, .. } if k == key))
            .last();

        if let Some(idx) = existing {
            if let Line::Entry { value: current, raw, .. } = &mut self.lines[idx] {
                if current == value {
                    return Ok(SetOutcome::Unchanged);
                }
                *current = value.to_string();
                *raw = None;
            }
            return Ok(SetOutcome::Updated);
        }

        let entry = Line::Entry {
            key: key.to_string(),
            value: value.to_string(),
            raw: None,
        };

        match self.insertion_point(section) {
            Some(idx) => self.lines.insert(idx, entry),
            None => {
                let needs_gap = self
                    .lines
                    .last()
                    .is_some_and(|line| !matches!(line, Line::Other(raw) if raw.trim().is_empty()));
                if needs_gap {
                    self.lines.push(Line::Other(String::new()));
                }
                self.lines.push(Line::Section {
                    name: section.to_string(),
                    raw: format!("[{}]", section),
                });
                self.lines.push(entry);
            }
        }

        Ok(SetOutcome::Added)
    }

    /// Render the document back to text, ending with a newline.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.render());
            out.push('\n');
        }
        out
    }

    /// Indices of all lines that belong to a `[section]` block.
    fn positions_in<'a>(&'a self, section: &'a str) -> impl Iterator<Item = usize> + 'a {
        let mut current: Option<&str> = None;
        self.lines.iter().enumerate().filter_map(move |(idx, line)| {
            if let Line::Section { name, .. } = line {
                current = Some(name.as_str());
                return None;
            }
            (current == Some(section)).then_some(idx)
        })
    }

    /// Index right after the last option (or header) of the last block
    /// named `section`.
    fn insertion_point(&self, section: &str) -> Option<usize> {
        let header = self
            .lines
            .iter()
            .rposition(|line| matches!(line, Line::Section { name, .. } if name == section))?;

        let mut point = header + 1;
        for (offset, line) in self.lines[header + 1..].iter().enumerate() {
            match line {
                Line::Section { .. } => break,
                Line::Entry { .. } => point = header + 1 + offset + 1,
                Line::Other(_) => {}
            }
        }
        Some(point)
    }
}
