use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default delay before a stage change is written back to the provider.
pub const DEFAULT_DEBOUNCE_SECS: u64 = 5;

/// Provider page-size ceiling (Airtable maximum per request).
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub review: ReviewConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            review: ReviewConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Records fetched per page; clamped to [`MAX_PAGE_SIZE`].
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

impl ProviderConfig {
    /// Page size after applying the provider ceiling.
    #[must_use]
    pub fn effective_page_size(&self) -> usize {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Seconds a stage change sits in the deferred-write window.
    #[serde(default = "default_debounce_secs")]
    pub debounce_secs: u64,
    /// Newest candidates first when true.
    #[serde(default = "default_true")]
    pub sort_desc: bool,
    /// Show locally hidden candidates in the list by default.
    #[serde(default)]
    pub show_hidden: bool,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            debounce_secs: default_debounce_secs(),
            sort_desc: default_true(),
            show_hidden: false,
        }
    }
}

const fn default_page_size() -> usize {
    MAX_PAGE_SIZE
}

const fn default_debounce_secs() -> u64 {
    DEFAULT_DEBOUNCE_SECS
}

const fn default_true() -> bool {
    true
}

/// Load `.sift/config.toml` from the project root, falling back to
/// defaults when the file does not exist.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(".sift/config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_behavior() {
        let cfg = ProjectConfig::default();
        assert_eq!(cfg.provider.page_size, 100);
        assert_eq!(cfg.review.debounce_secs, 5);
        assert!(cfg.review.sort_desc);
        assert!(!cfg.review.show_hidden);
    }

    #[test]
    fn partial_config_fills_missing_fields() {
        let cfg: ProjectConfig = toml::from_str("[review]\ndebounce_secs = 2\n").expect("parse");
        assert_eq!(cfg.review.debounce_secs, 2);
        assert!(cfg.review.sort_desc);
        assert_eq!(cfg.provider.page_size, 100);
    }

    #[test]
    fn page_size_clamps_to_provider_ceiling() {
        let cfg: ProjectConfig =
            toml::from_str("[provider]\npage_size = 500\n").expect("parse");
        assert_eq!(cfg.provider.effective_page_size(), 100);
        let cfg: ProjectConfig = toml::from_str("[provider]\npage_size = 0\n").expect("parse");
        assert_eq!(cfg.provider.effective_page_size(), 1);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = std::env::temp_dir().join("sift-config-missing");
        let cfg = load_project_config(&dir).expect("defaults");
        assert_eq!(cfg.review.debounce_secs, DEFAULT_DEBOUNCE_SECS);
    }
}
