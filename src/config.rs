// src/config.rs
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::narratives::{default_groups, KeywordGroup};

pub const ENV_DEMO_MODE: &str = "DEMO_MODE";
pub const ENV_BEARER_TOKEN: &str = "TWITTER_BEARER_TOKEN";
pub const ENV_CACHE_PATH: &str = "NARRATIVE_CACHE_PATH";
pub const ENV_NARRATIVES_PATH: &str = "NARRATIVES_CONFIG_PATH";

pub const DEFAULT_CACHE_PATH: &str = "narrative_detected.json";

/// Runtime configuration read once at startup and threaded through `AppState`.
#[derive(Debug, Clone)]
pub struct RadarConfig {
    /// Fixture-only mode: never touch the live search API.
    pub demo_mode: bool,
    /// Bearer credential for the search API; absence is only an error once a
    /// live scan actually starts.
    pub bearer_token: Option<String>,
    /// Location of the JSON file holding the last headline report.
    pub cache_path: PathBuf,
}

impl RadarConfig {
    pub fn from_env() -> Self {
        let demo_mode = std::env::var(ENV_DEMO_MODE)
            .map(|v| v.to_ascii_lowercase() == "true")
            .unwrap_or(false);
        let bearer_token = std::env::var(ENV_BEARER_TOKEN)
            .ok()
            .filter(|t| !t.trim().is_empty());
        let cache_path = std::env::var(ENV_CACHE_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CACHE_PATH));

        Self {
            demo_mode,
            bearer_token,
            cache_path,
        }
    }
}

/// Load keyword groups from an explicit path. Supports TOML or JSON formats.
pub fn load_groups_from(path: &Path) -> Result<Vec<KeywordGroup>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading narratives config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_groups(&content, ext.as_str())
}

/// Load keyword groups using env var + fallbacks:
/// 1) $NARRATIVES_CONFIG_PATH
/// 2) config/narratives.toml
/// 3) config/narratives.json
/// 4) built-in defaults
pub fn load_groups_default() -> Result<Vec<KeywordGroup>> {
    if let Ok(p) = std::env::var(ENV_NARRATIVES_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_groups_from(&pb);
        } else {
            return Err(anyhow!("NARRATIVES_CONFIG_PATH points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/narratives.toml");
    if toml_p.exists() {
        return load_groups_from(&toml_p);
    }
    let json_p = PathBuf::from("config/narratives.json");
    if json_p.exists() {
        return load_groups_from(&json_p);
    }
    Ok(default_groups())
}

fn parse_groups(s: &str, hint_ext: &str) -> Result<Vec<KeywordGroup>> {
    // Try TOML first if hinted or content looks like toml.
    let try_toml = hint_ext == "toml" || s.contains("[[group]]");
    if try_toml {
        if let Ok(v) = parse_toml(s) {
            return Ok(v);
        }
    }
    // Try JSON array
    if let Ok(v) = parse_json(s) {
        return Ok(v);
    }
    // Fallback: also try TOML if not attempted
    if !try_toml {
        if let Ok(v) = parse_toml(s) {
            return Ok(v);
        }
    }
    Err(anyhow!("unsupported narratives config format"))
}

fn parse_toml(s: &str) -> Result<Vec<KeywordGroup>> {
    #[derive(serde::Deserialize)]
    struct TomlGroups {
        group: Vec<KeywordGroup>,
    }
    let v: TomlGroups = toml::from_str(s)?;
    clean_groups(v.group)
}

fn parse_json(s: &str) -> Result<Vec<KeywordGroup>> {
    let v: Vec<KeywordGroup> = serde_json::from_str(s)?;
    clean_groups(v)
}

fn clean_groups(groups: Vec<KeywordGroup>) -> Result<Vec<KeywordGroup>> {
    let mut out = Vec::with_capacity(groups.len());
    for mut g in groups {
        g.name = g.name.trim().to_string();
        g.keywords = g
            .keywords
            .into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        if g.name.is_empty() {
            return Err(anyhow!("narrative group with empty name"));
        }
        if g.keywords.is_empty() {
            return Err(anyhow!("narrative group '{}' has no keywords", g.name));
        }
        out.push(g);
    }
    if out.is_empty() {
        return Err(anyhow!("narratives config defines no groups"));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_and_json_formats_parse() {
        let toml = r#"
            [[group]]
            name = " Restaking "
            keywords = ["EigenLayer", " EIGEN ", ""]

            [[group]]
            name = "AI Agents"
            keywords = ["AI agent"]
        "#;
        let out = parse_toml(toml).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].name, "Restaking");
        assert_eq!(out[0].keywords, vec!["EigenLayer", "EIGEN"]);

        let json = r#"[{"name": "Bitcoin L2", "keywords": ["Ordinals", "Runes"]}]"#;
        let out = parse_json(json).unwrap();
        assert_eq!(out[0].name, "Bitcoin L2");
        assert_eq!(out[0].keywords.len(), 2);
    }

    #[test]
    fn empty_groups_are_rejected() {
        assert!(parse_json(r#"[{"name": "", "keywords": ["x"]}]"#).is_err());
        assert!(parse_json(r#"[{"name": "X", "keywords": []}]"#).is_err());
        assert!(parse_json("[]").is_err());
    }

    #[serial_test::serial]
    #[test]
    fn default_uses_env_then_fallbacks() {
        // Isolate CWD in a temp dir so a real config/ in the repo can't interfere
        let old = std::env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        std::env::set_current_dir(tmp.path()).unwrap();

        std::env::remove_var(ENV_NARRATIVES_PATH);

        // No files in the temp CWD -> built-in defaults
        let v = load_groups_default().unwrap();
        assert_eq!(v, default_groups());

        // Env takes precedence
        let p_json = tmp.path().join("narratives.json");
        std::fs::write(&p_json, r#"[{"name": "X", "keywords": ["x"]}]"#).unwrap();
        std::env::set_var(ENV_NARRATIVES_PATH, p_json.display().to_string());
        let v2 = load_groups_default().unwrap();
        assert_eq!(v2.len(), 1);
        assert_eq!(v2[0].name, "X");
        std::env::remove_var(ENV_NARRATIVES_PATH);

        std::env::set_current_dir(&old).unwrap();
    }

    #[serial_test::serial]
    #[test]
    fn demo_mode_flag_is_case_insensitive_true() {
        std::env::set_var(ENV_DEMO_MODE, "TRUE");
        std::env::remove_var(ENV_BEARER_TOKEN);
        std::env::remove_var(ENV_CACHE_PATH);
        let cfg = RadarConfig::from_env();
        assert!(cfg.demo_mode);
        assert!(cfg.bearer_token.is_none());
        assert_eq!(cfg.cache_path, PathBuf::from(DEFAULT_CACHE_PATH));

        std::env::set_var(ENV_DEMO_MODE, "no");
        assert!(!RadarConfig::from_env().demo_mode);
        std::env::remove_var(ENV_DEMO_MODE);
    }
}
