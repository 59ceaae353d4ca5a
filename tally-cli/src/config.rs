use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use tally_finance::DEFAULT_OUTPUT_FILE;
use tally_ingest::year::DEFAULT_PRIOR_DECEMBER_PATTERN;
use tally_ingest::{ClassifierRules, Extractor, LabelYearResolver, PdfPageSource, YearFilter, default_year_filters};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub output: OutputSection,
    pub classifier: ClassifierSection,
    pub year: YearSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClassifierSection {
    /// Added to the built-in payment markers.
    pub extra_payment_markers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YearSection {
    /// Regex over the file name marking statements that also cover the
    /// previous December.
    pub prior_december_pattern: String,
    pub filters: Vec<YearFilter>,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_OUTPUT_FILE),
        }
    }
}

impl Default for YearSection {
    fn default() -> Self {
        Self {
            prior_december_pattern: DEFAULT_PRIOR_DECEMBER_PATTERN.to_string(),
            filters: default_year_filters(),
        }
    }
}

impl Config {
    pub fn extractor(&self) -> Result<Extractor<PdfPageSource, LabelYearResolver>> {
        let resolver = LabelYearResolver::new(&self.year.prior_december_pattern)
            .with_context(|| format!("invalid prior_december_pattern {:?}", self.year.prior_december_pattern))?;
        let rules = ClassifierRules::default().with_payment_markers(self.classifier.extra_payment_markers.clone());

        Ok(Extractor::new(PdfPageSource, resolver)
            .with_rules(rules)
            .with_year_filters(self.year.filters.clone()))
    }
}

pub fn tally_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".tally"))
}

pub fn default_config_path() -> Option<PathBuf> {
    tally_home().ok().map(|dir| dir.join("config.toml"))
}

/// Load `explicit` (must exist) or the default config file if present.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(p) if !p.exists() => bail!("config file not found: {}", p.display()),
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(Config::default()),
        },
    };
    parse_config_file(&path)
}

fn parse_config_file(path: &Path) -> Result<Config> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.output.file, PathBuf::from("extracted_expenses.csv"));
        assert_eq!(cfg.year.filters, default_year_filters());
        assert!(cfg.classifier.extra_payment_markers.is_empty());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[classifier]
extra_payment_markers = ["ONLINE PAYMENT"]

[[year.filters]]
filename_contains = "FY24"
year = 2024
"#,
        )
        .unwrap();

        let cfg = load_config(Some(&path)).unwrap();
        assert_eq!(cfg.output.file, PathBuf::from(DEFAULT_OUTPUT_FILE));
        assert_eq!(cfg.classifier.extra_payment_markers, vec!["ONLINE PAYMENT"]);
        assert_eq!(cfg.year.prior_december_pattern, DEFAULT_PRIOR_DECEMBER_PATTERN);
        assert_eq!(
            cfg.year.filters,
            vec![YearFilter {
                filename_contains: "FY24".to_string(),
                year: 2024
            }]
        );
    }

    #[test]
    fn test_missing_explicit_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("none.toml"))).is_err());
    }

    #[test]
    fn test_bad_pattern_is_rejected() {
        let mut cfg = Config::default();
        cfg.year.prior_december_pattern = "(".to_string();
        assert!(cfg.extractor().is_err());
    }
}
