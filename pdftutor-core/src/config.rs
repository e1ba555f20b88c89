use anyhow::{anyhow, Result};
use log::warn;
use serde::{Deserialize, Serialize};

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_min_width() -> f64 {
    20.0
}

fn default_min_height() -> f64 {
    16.0
}

fn default_prefix_chars() -> usize {
    8
}

fn default_min_prefix_phrase_chars() -> usize {
    3
}

fn default_min_word_chars() -> usize {
    2
}

fn default_highlight_color() -> String {
    "#fdfbd4".to_string() // pale yellow used by the viewer overlay
}

fn default_context_char_limit() -> usize {
    15000
}

fn default_stored_color() -> String {
    "yellow".to_string()
}

fn default_created_by() -> String {
    "AI".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TutorConfig {
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub prompt: PromptConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Tidy headings, list spacing and blank lines in the cleaned text
    #[serde(default = "default_true")]
    pub normalize_markdown: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            normalize_markdown: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Highlight boxes narrower than this are widened
    #[serde(default = "default_min_width")]
    pub min_width: f64,

    /// Highlight boxes shorter than this are heightened
    #[serde(default = "default_min_height")]
    pub min_height: f64,

    /// Prefix tier: how many leading characters of the phrase to search for
    #[serde(default = "default_prefix_chars")]
    pub prefix_chars: usize,

    /// Prefix tier only runs for phrases longer than this
    #[serde(default = "default_min_prefix_phrase_chars")]
    pub min_prefix_phrase_chars: usize,

    /// Word tier ignores words of this length or shorter
    #[serde(default = "default_min_word_chars")]
    pub min_word_chars: usize,

    /// Color used when a highlight command names none
    #[serde(default = "default_highlight_color")]
    pub default_color: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            min_width: default_min_width(),
            min_height: default_min_height(),
            prefix_chars: default_prefix_chars(),
            min_prefix_phrase_chars: default_min_prefix_phrase_chars(),
            min_word_chars: default_min_word_chars(),
            default_color: default_highlight_color(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Characters of document text sent to the model
    #[serde(default = "default_context_char_limit")]
    pub context_char_limit: usize,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            context_char_limit: default_context_char_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Color stored on annotation records when the command names none
    #[serde(default = "default_stored_color")]
    pub default_color: String,

    #[serde(default = "default_created_by")]
    pub created_by: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            default_color: default_stored_color(),
            created_by: default_created_by(),
        }
    }
}

impl TutorConfig {
    /// Load config from a YAML file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config {}: {}", path, e))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: TutorConfig = serde_yaml::from_str(content)
            .map_err(|e| anyhow!("Failed to parse config: {}", e))?;
        Ok(config)
    }

    /// Load config with fallback to default
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|e| {
                warn!("{}; using defaults", e);
                Self::default()
            }),
            None => Self::default(),
        }
    }
}
