//! Configuration loading and parsing.
//!
//! Reads `levi.toml` (or an override path provided by the binary):
//!
//! ```toml
//! [editor]
//! tab_width = 4
//! expand_tabs = true
//!
//! [scroll.margin]
//! vertical = 0
//!
//! [gutter]
//! min_width = 5
//! ```
//!
//! Every key is optional. Unknown fields are ignored and a file that fails
//! to parse falls back to defaults. The vertical scroll margin is clamped
//! at application time to `(h - 2) / 2` where `h` is the number of text rows,
//! so the raw parsed value is retained for re-clamping after a resize.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "levi.toml";

/// Terminal geometry the effective config depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigContext {
    pub viewport_columns: u16,
    pub viewport_rows: u16,
    pub status_rows: u16,
}

impl ConfigContext {
    pub fn new(viewport_columns: u16, viewport_rows: u16, status_rows: u16) -> Self {
        Self {
            viewport_columns,
            viewport_rows,
            status_rows,
        }
    }

    pub fn text_rows(&self) -> u16 {
        self.viewport_rows.saturating_sub(self.status_rows)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    #[serde(default = "EditorConfig::default_tab_width")]
    pub tab_width: usize,
    #[serde(default = "EditorConfig::default_expand_tabs")]
    pub expand_tabs: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_width: Self::default_tab_width(),
            expand_tabs: Self::default_expand_tabs(),
        }
    }
}

impl EditorConfig {
    const fn default_tab_width() -> usize {
        4
    }
    const fn default_expand_tabs() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct MarginConfig {
    #[serde(default)]
    pub vertical: u16,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ScrollConfig {
    #[serde(default)]
    pub margin: MarginConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct GutterConfig {
    /// Narrowest gutter, number plus padding.
    #[serde(default = "GutterConfig::default_min_width")]
    pub min_width: u16,
}

impl Default for GutterConfig {
    fn default() -> Self {
        Self {
            min_width: Self::default_min_width(),
        }
    }
}

impl GutterConfig {
    const fn default_min_width() -> u16 {
        5
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub gutter: GutterConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>,            // original file string (optional)
    pub file: ConfigFile,               // parsed (or default) data
    pub effective_vertical_margin: u16, // clamped to viewport semantics
}

/// Config path: `./levi.toml` when present, else the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("levi").join(CONFIG_FILE_NAME);
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), "config_absent_using_defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                raw: Some(content),
                file,
                effective_vertical_margin: 0, // computed later
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Compute the clamped vertical margin for `ctx`. Returns the effective value.
    pub fn apply_context(&mut self, ctx: ConfigContext) -> u16 {
        let raw = self.file.scroll.margin.vertical;
        let text_rows = ctx.text_rows();
        let (clamped, max) = if text_rows <= 3 {
            (0, 0)
        } else {
            let max = (text_rows - 2) / 2;
            (raw.min(max), max)
        };

        if clamped != raw {
            info!(
                target: "config",
                raw,
                clamped,
                max,
                text_rows,
                viewport_rows = ctx.viewport_rows,
                status_rows = ctx.status_rows,
                "scroll_margin_vertical_clamped"
            );
        }
        self.effective_vertical_margin = clamped;
        clamped
    }

    /// Re-clamp after a resize. `Some(new_margin)` when the effective value changed.
    pub fn recompute_with_context(&mut self, ctx: ConfigContext) -> Option<u16> {
        let prev = self.effective_vertical_margin;
        let current = self.apply_context(ctx);
        if current != prev { Some(current) } else { None }
    }

    /// Tab width, never zero.
    pub fn tab_width(&self) -> usize {
        self.file.editor.tab_width.max(1)
    }
}
