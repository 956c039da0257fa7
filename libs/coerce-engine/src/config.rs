use std::path::Path;

use chrono_tz::Tz;
use coerce_api::{Layout, TimeDefaults};
use serde::Deserialize;

use crate::error::EngineError;

/// Layouts tried when a call supplies none, in order.
pub const DEFAULT_LAYOUTS: [&str; 5] = [
    "rfc3339",
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d",
];

/// Process time defaults, parsed from TOML (or any [`ConfigParser`]).
///
/// ```toml
/// location = "Asia/Shanghai"
/// layouts = ["rfc3339", "%Y-%m-%d %H:%M:%S"]
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CastConfig {
    /// IANA zone name.
    #[serde(default = "default_location")]
    pub location: String,

    /// Layout patterns; `rfc3339` and `rfc2822` name the internet formats.
    #[serde(default = "default_layouts")]
    pub layouts: Vec<String>,
}

fn default_location() -> String {
    "UTC".to_string()
}

fn default_layouts() -> Vec<String> {
    DEFAULT_LAYOUTS.iter().map(|s| s.to_string()).collect()
}

impl Default for CastConfig {
    fn default() -> Self {
        Self {
            location: default_location(),
            layouts: default_layouts(),
        }
    }
}

impl CastConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self, EngineError> {
        Self::load_with(path, &[&TomlParser])
    }

    /// Load configuration, picking the parser by file extension.
    pub fn load_with(path: &str, parsers: &[&dyn ConfigParser]) -> Result<Self, EngineError> {
        let ext = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        let parser = parsers
            .iter()
            .find(|p| p.extensions().iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .ok_or_else(|| {
                EngineError::Config(format!("{path}: no parser for extension '{ext}'"))
            })?;

        let content = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("{path}: {e}")))?;
        tracing::debug!(path, ext, "loading cast config");
        parser.parse(&content).map_err(|e| e.with_context(path))
    }

    /// Parse configuration from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self, EngineError> {
        toml::from_str(toml_str).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Validate the zone name and build the defaults provider.
    pub fn into_defaults(self) -> Result<StaticDefaults, EngineError> {
        let location: Tz = self
            .location
            .parse()
            .map_err(|e| EngineError::Config(format!("location '{}': {e}", self.location)))?;
        Ok(StaticDefaults {
            location,
            layouts: self.layouts.into_iter().map(Layout::from).collect(),
        })
    }
}

/// Source format for [`CastConfig`].
pub trait ConfigParser {
    /// File extensions this parser handles, without the dot.
    fn extensions(&self) -> &[&str];

    fn parse(&self, content: &str) -> Result<CastConfig, EngineError>;
}

pub struct TomlParser;

impl ConfigParser for TomlParser {
    fn extensions(&self) -> &[&str] {
        &["toml"]
    }

    fn parse(&self, content: &str) -> Result<CastConfig, EngineError> {
        CastConfig::parse(content)
    }
}

/// Fixed location and layout list.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticDefaults {
    location: Tz,
    layouts: Vec<Layout>,
}

impl StaticDefaults {
    pub fn new(location: Tz, layouts: Vec<Layout>) -> Self {
        Self { location, layouts }
    }

    pub fn with_location(mut self, location: Tz) -> Self {
        self.location = location;
        self
    }

    pub fn with_layouts(mut self, layouts: Vec<Layout>) -> Self {
        self.layouts = layouts;
        self
    }
}

impl Default for StaticDefaults {
    fn default() -> Self {
        Self {
            location: Tz::UTC,
            layouts: DEFAULT_LAYOUTS.iter().copied().map(Layout::from).collect(),
        }
    }
}

impl TimeDefaults for StaticDefaults {
    fn layouts(&self) -> Vec<Layout> {
        self.layouts.clone()
    }

    fn location(&self) -> Tz {
        self.location
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = CastConfig::parse("").unwrap();
        assert_eq!(cfg, CastConfig::default());
        let defaults = cfg.into_defaults().unwrap();
        assert_eq!(defaults, StaticDefaults::default());
        assert_eq!(defaults.layouts()[0], Layout::Rfc3339);
    }

    #[test]
    fn parse_location_and_layouts() {
        let cfg = CastConfig::parse(
            r#"
location = "Asia/Shanghai"
layouts = ["%d/%m/%Y", "RFC2822"]
"#,
        )
        .unwrap();
        let defaults = cfg.into_defaults().unwrap();
        assert_eq!(defaults.location(), Tz::Asia__Shanghai);
        assert_eq!(
            defaults.layouts(),
            vec![Layout::Pattern("%d/%m/%Y".into()), Layout::Rfc2822]
        );
    }

    #[test]
    fn unknown_zone_is_config_error() {
        let cfg = CastConfig { location: "Mars/Olympus".into(), ..CastConfig::default() };
        let err = cfg.into_defaults().unwrap_err();
        assert!(matches!(err, EngineError::Config(ref m) if m.contains("Mars/Olympus")));
    }

    #[test]
    fn malformed_toml_is_config_error() {
        assert!(matches!(CastConfig::parse("layouts = 3"), Err(EngineError::Config(_))));
    }

    #[test]
    fn load_with_rejects_unknown_extension() {
        let err = CastConfig::load_with("cast.yaml", &[&TomlParser]).unwrap_err();
        assert!(err.to_string().contains("no parser for extension 'yaml'"));
    }

    #[test]
    fn load_reads_file() {
        let path = std::env::temp_dir().join(format!("coerce-config-{}.toml", std::process::id()));
        std::fs::write(&path, "location = \"Europe/Berlin\"\n").unwrap();
        let cfg = CastConfig::load(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(cfg.location, "Europe/Berlin");
        assert_eq!(cfg.layouts.len(), DEFAULT_LAYOUTS.len());
    }
}
