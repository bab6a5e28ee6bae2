use clap::{Args, ValueEnum};
use serde::Deserialize;

use super::error::InspectError;

// ═══════════════════════════════════════════════════════════════
//  Config file (TOML)
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Human-readable block per record.
    #[default]
    Table,
    /// One re-exported JSON object per line.
    Json,
}

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    pub input: Option<String>,
    pub strict: Option<bool>,
    pub format: Option<OutputFormat>,
    pub relative: Option<bool>,
}

pub fn load_config(path: &str) -> Result<Config, InspectError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| InspectError::Config(format!("cannot read config {path}: {e}")))?;
    toml::from_str(&content).map_err(|e| InspectError::Config(format!("bad config {path}: {e}")))
}

// ═══════════════════════════════════════════════════════════════
//  CLI args
// ═══════════════════════════════════════════════════════════════

#[derive(Args, Clone, Debug)]
pub struct InspectArgs {
    /// Path to the TOML config file
    #[arg(long, default_value = "metadata-inspect.toml", env = "METADATA_INSPECT_CONFIG")]
    pub config: String,

    /// Exported records, one JSON object per line ("-" = stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// Abort on the first malformed or undecodable line, or ordering violation
    #[arg(long)]
    pub strict: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Print timestamps as seconds after session connect
    #[arg(long)]
    pub relative: bool,
}

// ═══════════════════════════════════════════════════════════════
//  Effective: merged config
// ═══════════════════════════════════════════════════════════════

/// Final settings after merging: config file < env/CLI.
#[derive(Debug, Clone)]
pub struct Effective {
    pub input: String,
    pub strict: bool,
    pub format: OutputFormat,
    pub relative: bool,
}

impl Effective {
    pub fn new(args: &InspectArgs) -> Result<Self, InspectError> {
        let cfg = match load_config(&args.config) {
            Ok(c) => c,
            Err(e) => {
                if std::path::Path::new(&args.config).exists() {
                    return Err(e);
                }
                Config::default()
            }
        };

        Ok(Self {
            input: args.input.clone().or(cfg.input).unwrap_or_else(|| "-".into()),
            strict: args.strict || cfg.strict.unwrap_or(false),
            format: args.format.or(cfg.format).unwrap_or_default(),
            relative: args.relative || cfg.relative.unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn args(config: &str) -> InspectArgs {
        InspectArgs {
            config: config.to_string(),
            input: None,
            strict: false,
            format: None,
            relative: false,
        }
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let eff = Effective::new(&args(path.to_str().unwrap())).unwrap();
        assert_eq!(eff.input, "-");
        assert!(!eff.strict);
        assert_eq!(eff.format, OutputFormat::Table);
        assert!(!eff.relative);
    }

    #[test]
    fn cli_overrides_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "input = \"streams.jsonl\"\nformat = \"json\"\nrelative = true").unwrap();

        let mut cli = args(file.path().to_str().unwrap());
        let eff = Effective::new(&cli).unwrap();
        assert_eq!(eff.input, "streams.jsonl");
        assert_eq!(eff.format, OutputFormat::Json);
        assert!(eff.relative);

        cli.input = Some("other.jsonl".into());
        cli.format = Some(OutputFormat::Table);
        cli.strict = true;
        let eff = Effective::new(&cli).unwrap();
        assert_eq!(eff.input, "other.jsonl");
        assert_eq!(eff.format, OutputFormat::Table);
        assert!(eff.strict);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "strict = \"maybe\"").unwrap();

        assert!(matches!(
            Effective::new(&args(file.path().to_str().unwrap())),
            Err(InspectError::Config(_))
        ));
    }
}
