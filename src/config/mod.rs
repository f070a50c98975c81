//! Configuration loading and validation

mod schema;

pub use schema::*;

use anyhow::Result;
use std::path::Path;

/// Load configuration from a YAML file
pub fn load_config(path: &Path) -> Result<OvertoneConfig> {
    let contents = std::fs::read_to_string(path)?;
    let config: OvertoneConfig = serde_yaml::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_minimal_config() {
        let yaml = r#"
audio:
  sample_rate: 48000

bank:
  channels: 64
"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.audio.sample_rate, 48000);
        assert_eq!(config.bank.channels, 64);
        // Untouched sections fall back to defaults
        assert!((config.bank.fundamental - 65.406).abs() < 1e-9);
        assert_eq!(config.envelope.channels, vec![3, 4]);
    }

    #[test]
    fn test_load_rejects_invalid_config() {
        let yaml = r#"
bank:
  channels: 2
"#;
        // Controlled channels 3 and 4 don't fit in a 2-channel bank
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        assert!(load_config(file.path()).is_err());
    }
}
