use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    pub use_colors: bool,
    pub indent_style: IndentStyle,
    pub include_types: bool,
    /// Print loop header/exit markers and loop hints next to block labels.
    pub include_metadata: bool,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            use_colors: false,
            indent_style: IndentStyle::Spaces(4),
            include_types: true,
            include_metadata: true,
        }
    }
}

impl EmitterConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndentStyle {
    Spaces(usize),
    Tabs,
}

impl IndentStyle {
    pub fn unit(&self) -> String {
        match self {
            IndentStyle::Spaces(n) => " ".repeat(*n),
            IndentStyle::Tabs => "\t".to_string(),
        }
    }
}
