//! Section-qualified INI reader, the way the original `RPG_RT.ini`/`Save.ini` parser does
//! it: every key is stored as `section.name` (both folded to lowercase), the way
//! `inireader.cpp`'s `MakeKey` builds its lookup keys, and `key=value` lines win over any
//! previous line with the same key. A line indented relative to its `key=value` line is a
//! continuation of that value, appended with a space, matching the multi-line values
//! `Save.ini` comments can span.

use std::collections::BTreeMap;

use crate::error::{LcfError, LcfResult};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    entries: BTreeMap<String, String>,
}

fn make_key(section: &str, name: &str) -> String {
    format!("{}.{}", section.trim().to_ascii_lowercase(), name.trim().to_ascii_lowercase())
}

impl IniDocument {
    pub fn parse(text: &str) -> LcfResult<Self> {
        let mut entries = BTreeMap::new();
        let mut section = String::new();
        let mut last_key: Option<String> = None;

        for (lineno, raw_line) in text.lines().enumerate() {
            if raw_line.trim().is_empty() {
                last_key = None;
                continue;
            }

            let is_continuation = raw_line.starts_with(' ') || raw_line.starts_with('\t');
            let line = raw_line.trim();

            if is_continuation {
                let Some(key) = &last_key else {
                    return Err(LcfError::malformed(
                        "ini",
                        format!("line {}: indented continuation with no preceding key", lineno + 1),
                    ));
                };
                let value = entries.entry(key.clone()).or_insert_with(String::new);
                if !value.is_empty() {
                    value.push(' ');
                }
                value.push_str(line);
                continue;
            }

            if line.starts_with(';') || line.starts_with('#') {
                last_key = None;
                continue;
            }
            if line.starts_with('[') && line.ends_with(']') {
                section = line[1..line.len() - 1].trim().to_ascii_lowercase();
                last_key = None;
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(LcfError::malformed("ini", format!("line {}: missing '='", lineno + 1)));
            };
            let full_key = make_key(&section, key);
            entries.insert(full_key.clone(), value.trim().to_string());
            last_key = Some(full_key);
        }

        Ok(IniDocument { entries })
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.entries.get(&make_key(section, key)).map(String::as_str)
    }

    pub fn get_or(&self, section: &str, key: &str, default: &str) -> String {
        self.get(section, key).unwrap_or(default).to_string()
    }

    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        self.entries.insert(make_key(section, key), value.into());
    }

    /// Renders back to text, regrouped by section in key order.
    pub fn render(&self) -> String {
        let mut sections: Vec<(&str, Vec<(&str, &str)>)> = Vec::new();
        for (full_key, value) in &self.entries {
            let (section, key) = full_key.split_once('.').unwrap_or(("", full_key.as_str()));
            match sections.iter_mut().find(|(s, _)| *s == section) {
                Some((_, keys)) => keys.push((key, value.as_str())),
                None => sections.push((section, vec![(key, value.as_str())])),
            }
        }

        let mut out = String::new();
        for (section, keys) in sections {
            out.push_str(&format!("[{section}]\r\n"));
            for (key, value) in keys {
                out.push_str(&format!("{key}={value}\r\n"));
            }
        }
        out
    }
}
