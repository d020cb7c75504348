use crate::error::TessError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE: &str = ".tess.stn";

/// Runtime switches resolved from the config file and the command line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Refuse to run programs that produced parse diagnostics.
    pub strict: bool,
    /// Enable the `mem` builtins.
    pub unsafe_memory: bool,
}

/// The `key = value` pairs of a `.tess.stn` file, in file order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Config {
    entries: Vec<(String, String)>,
}

fn is_comment(line: &str) -> bool {
    line.is_empty() || line.starts_with('#') || line.starts_with('$')
}

fn unquote(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

impl Config {
    /// Lines without `=` are skipped.
    pub fn parse(text: &str) -> Config {
        let mut config = Config::default();
        for line in text.lines() {
            if is_comment(line.trim()) {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                config.push(key, value);
            }
        }
        config
    }

    /// Like `parse`, but a line without `=`, an empty key, or a switch that
    /// is not a boolean is an error.
    pub fn parse_strict(text: &str) -> Result<Config, TessError> {
        let mut config = Config::default();
        for (number, line) in text.lines().enumerate() {
            let line_number = number + 1;
            if is_comment(line.trim()) {
                continue;
            }
            let (key, value) = line.split_once('=').ok_or_else(|| TessError::Config {
                line: line_number,
                message: format!("expected 'key = value', found '{}'", line.trim()),
            })?;
            if key.trim().is_empty() {
                return Err(TessError::Config {
                    line: line_number,
                    message: "missing key".to_string(),
                });
            }
            config.push(key, value);
            let (key, value) = &config.entries[config.entries.len() - 1];
            if (key == "strict" || key == "unsafe") && parse_flag(value).is_none() {
                return Err(TessError::Config {
                    line: line_number,
                    message: format!("'{}' must be true or false, found '{}'", key, value),
                });
            }
        }
        Ok(config)
    }

    fn push(&mut self, key: &str, value: &str) {
        self.entries
            .push((key.trim().to_string(), unquote(value.trim()).to_string()));
    }

    /// A missing file is not an error.
    pub fn load(path: &Path, strict: bool) -> Result<Option<Config>, TessError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(TessError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        debug!(path = %path.display(), "loading config");
        let config = if strict {
            Config::parse_strict(&text)?
        } else {
            Config::parse(&text)
        };
        Ok(Some(config))
    }

    /// Looks next to the script first, then in the working directory.
    pub fn discover(script_dir: &Path) -> Option<PathBuf> {
        let beside = script_dir.join(CONFIG_FILE);
        if beside.is_file() {
            return Some(beside);
        }
        let here = PathBuf::from(CONFIG_FILE);
        if here.is_file() {
            Some(here)
        } else {
            None
        }
    }

    /// The first entry for `key` wins.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(parse_flag)
    }

    pub fn log_filter(&self) -> Option<&str> {
        self.get("log").filter(|filter| !filter.is_empty())
    }

    pub fn options(&self) -> Options {
        Options {
            strict: self.flag("strict").unwrap_or(false),
            unsafe_memory: self.flag("unsafe").unwrap_or(false),
        }
    }
}
