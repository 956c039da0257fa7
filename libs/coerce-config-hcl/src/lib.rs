use coerce_engine::config::{CastConfig, ConfigParser};
use coerce_engine::error::EngineError;

pub struct HclParser;

impl ConfigParser for HclParser {
    fn extensions(&self) -> &[&str] {
        &["hcl"]
    }

    fn parse(&self, content: &str) -> Result<CastConfig, EngineError> {
        hcl::from_str(content).map_err(|e| EngineError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coerce_api::chrono_tz::Tz;
    use coerce_api::{Layout, TimeDefaults};
    use coerce_engine::config::TomlParser;

    #[test]
    fn parses_hcl_attributes() {
        let cfg = HclParser
            .parse(
                r#"
location = "America/New_York"
layouts  = ["%m/%d/%Y %H:%M", "rfc3339"]
"#,
            )
            .unwrap();
        let defaults = cfg.into_defaults().unwrap();
        assert_eq!(defaults.location(), Tz::America__New_York);
        assert_eq!(defaults.layouts()[1], Layout::Rfc3339);
    }

    #[test]
    fn missing_attributes_take_defaults() {
        let cfg = HclParser.parse("").unwrap();
        assert_eq!(cfg, CastConfig::default());
    }

    #[test]
    fn load_with_picks_parser_by_extension() {
        let path = std::env::temp_dir().join(format!("coerce-hcl-{}.hcl", std::process::id()));
        std::fs::write(&path, "location = \"Europe/Paris\"\n").unwrap();
        let parsers: [&dyn ConfigParser; 2] = [&TomlParser, &HclParser];
        let cfg = CastConfig::load_with(path.to_str().unwrap(), &parsers).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(cfg.location, "Europe/Paris");
    }
}
