//! Interface options (rc file)
//!
//! Read once by the front-end and handed to the dispatcher. Uses the
//! familiar `OPTIONS=` line format:
//!
//! ```text
//! # Power menus
//! OPTIONS=use_menu,!always_show_list
//! OPTIONS=page_rows:18
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::OptionsError;
use crate::selection::NavigationMode;

/// Default number of list rows per page
pub const DEFAULT_PAGE_ROWS: usize = 18;
/// Most list rows that fit between the prompt line and the status line
pub const MAX_PAGE_ROWS: usize = 20;

/// User preferences consulted by the power menus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiOptions {
    /// Cursor-driven menus instead of typed letters
    pub use_menu: bool,
    /// Show the list as soon as a typed prompt opens
    pub always_show_list: bool,
    /// Allow casting without enough mana or hit points
    pub over_exert: bool,
    /// Ask for confirmation even when an inscription tag picked the entry
    pub confirm_tagged: bool,
    /// Ring the bell when a power fails
    pub flush_failure: bool,
    pub page_rows: usize,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            use_menu: false,
            always_show_list: false,
            over_exert: true,
            confirm_tagged: false,
            flush_failure: true,
            page_rows: DEFAULT_PAGE_ROWS,
        }
    }
}

impl UiOptions {
    /// Load options from a file
    pub fn load_from_file(path: &Path) -> Result<Self, OptionsError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_config(&contents)
    }

    /// Parse options from a config string
    pub fn parse_config(contents: &str) -> Result<Self, OptionsError> {
        let mut options = Self::default();

        for line in contents.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(opts) = line.strip_prefix("OPTIONS=") {
                for opt in opts.split(',') {
                    options.parse_option(opt.trim())?;
                }
            }
        }

        Ok(options)
    }

    fn parse_option(&mut self, opt: &str) -> Result<(), OptionsError> {
        if opt.is_empty() {
            return Ok(());
        }

        let (negated, opt_name) = match opt.strip_prefix('!') {
            Some(name) => (true, name),
            None => (false, opt),
        };

        if let Some((key, value)) = opt_name.split_once(':') {
            return self.set_option(key.trim(), Some(value.trim()));
        }
        if let Some((key, value)) = opt_name.split_once('=') {
            return self.set_option(key.trim(), Some(value.trim()));
        }

        self.set_bool_option(opt_name, !negated)
    }

    fn set_bool_option(&mut self, name: &str, value: bool) -> Result<(), OptionsError> {
        match name {
            "use_menu" => self.use_menu = value,
            "always_show_list" => self.always_show_list = value,
            "over_exert" => self.over_exert = value,
            "confirm_tagged" => self.confirm_tagged = value,
            "flush_failure" => self.flush_failure = value,
            "page_rows" => return Err(OptionsError::MissingValue(name.to_string())),
            _ => return Err(OptionsError::UnknownOption(name.to_string())),
        }
        Ok(())
    }

    fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<(), OptionsError> {
        let value = value.ok_or_else(|| OptionsError::MissingValue(name.to_string()))?;

        match name {
            "page_rows" => {
                self.page_rows = value
                    .parse()
                    .ok()
                    .filter(|rows| (1..=MAX_PAGE_ROWS).contains(rows))
                    .ok_or_else(|| OptionsError::InvalidValue(name.to_string(), value.to_string()))?;
            }
            "use_menu" | "always_show_list" | "over_exert" | "confirm_tagged" | "flush_failure" => {
                let flag = match value.to_lowercase().as_str() {
                    "yes" | "true" | "on" | "1" => true,
                    "no" | "false" | "off" | "0" => false,
                    _ => {
                        return Err(OptionsError::InvalidValue(
                            name.to_string(),
                            value.to_string(),
                        ));
                    }
                };
                self.set_bool_option(name, flag)?;
            }
            _ => return Err(OptionsError::UnknownOption(name.to_string())),
        }
        Ok(())
    }

    /// Save options to a file
    pub fn save_to_file(&self, path: &Path) -> Result<(), OptionsError> {
        std::fs::write(path, self.to_config_string())?;
        Ok(())
    }

    /// Convert options to config file format
    pub fn to_config_string(&self) -> String {
        let flag = |on: bool, name: &str| {
            if on {
                name.to_string()
            } else {
                format!("!{}", name)
            }
        };

        let mut lines = vec!["# Power menu options".to_string(), String::new()];
        lines.push(format!(
            "OPTIONS={},{}",
            flag(self.use_menu, "use_menu"),
            flag(self.always_show_list, "always_show_list")
        ));
        lines.push(format!("OPTIONS=page_rows:{}", self.page_rows));
        lines.push(String::new());
        lines.push("# Casting".to_string());
        lines.push(format!(
            "OPTIONS={},{},{}",
            flag(self.over_exert, "over_exert"),
            flag(self.confirm_tagged, "confirm_tagged"),
            flag(self.flush_failure, "flush_failure")
        ));
        lines.join("\n")
    }

    /// Navigation mode the menus should run in
    pub fn navigation_mode(&self) -> NavigationMode {
        if self.use_menu {
            NavigationMode::Menu
        } else {
            NavigationMode::Typed
        }
    }
}
