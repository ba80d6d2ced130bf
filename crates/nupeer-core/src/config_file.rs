use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub parsing: Option<ParsingSection>,
    pub output: Option<OutputSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsingSection {
    pub max_title_length: Option<usize>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    /// Extra regexes for header/summary lines to discard, appended to the defaults.
    pub extra_noise_patterns: Option<Vec<String>>,
    /// Extra semester codes, e.g. `{ QTR = "Fall" }`.
    pub semester_aliases: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSection {
    /// `table`, `json` or `summary`.
    pub format: Option<String>,
    pub color: Option<bool>,
}

/// Platform config directory path: `<config_dir>/nupeer/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("nupeer").join("config.toml"))
}

/// Load config by cascading CWD `.nupeer.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".nupeer.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
///
/// Semester aliases are unioned, with overlay entries winning per code.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let bp = base.parsing.unwrap_or_default();
    let op = overlay.parsing.unwrap_or_default();
    let bo = base.output.unwrap_or_default();
    let oo = overlay.output.unwrap_or_default();

    let semester_aliases = match (bp.semester_aliases, op.semester_aliases) {
        (None, None) => None,
        (Some(b), None) => Some(b),
        (None, Some(o)) => Some(o),
        (Some(mut b), Some(o)) => {
            b.extend(o);
            Some(b)
        }
    };

    ConfigFile {
        parsing: Some(ParsingSection {
            max_title_length: op.max_title_length.or(bp.max_title_length),
            min_year: op.min_year.or(bp.min_year),
            max_year: op.max_year.or(bp.max_year),
            extra_noise_patterns: op.extra_noise_patterns.or(bp.extra_noise_patterns),
            semester_aliases,
        }),
        output: Some(OutputSection {
            format: oo.format.or(bo.format),
            color: oo.color.or(bo.color),
        }),
    }
}

/// Save the config to the platform config directory.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf, String> {
    let path = config_path().ok_or_else(|| "Could not determine config directory".to_string())?;
    save_to_path(config, &path)?;
    Ok(path)
}

/// Write the config as pretty TOML, creating parent directories as needed.
pub fn save_to_path(config: &ConfigFile, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let content =
        toml::to_string_pretty(config).map_err(|e| format!("Failed to serialize config: {}", e))?;
    std::fs::write(path, content).map_err(|e| format!("Failed to write config: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsing_section_round_trip_toml() {
        let config = ConfigFile {
            parsing: Some(ParsingSection {
                max_title_length: Some(120),
                ..Default::default()
            }),
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ConfigFile = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.parsing.unwrap().max_title_length, Some(120));
    }

    #[test]
    fn semester_aliases_table_deserializes() {
        let toml_str = "[parsing]\nsemester_aliases = { QTR = \"Fall\", MAY = \"Summer\" }\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        let aliases = parsed.parsing.unwrap().semester_aliases.unwrap();
        assert_eq!(aliases.get("QTR").map(String::as_str), Some("Fall"));
        assert_eq!(aliases.len(), 2);
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            parsing: Some(ParsingSection {
                max_title_length: Some(300),
                min_year: Some(1950),
                ..Default::default()
            }),
            output: Some(OutputSection {
                format: Some("table".into()),
                color: Some(true),
            }),
        };
        let overlay = ConfigFile {
            parsing: Some(ParsingSection {
                max_title_length: Some(100),
                ..Default::default()
            }),
            output: Some(OutputSection {
                format: Some("json".into()),
                color: None,
            }),
        };
        let merged = merge(base, overlay);
        let parsing = merged.parsing.unwrap();
        assert_eq!(parsing.max_title_length, Some(100));
        assert_eq!(parsing.min_year, Some(1950));
        let output = merged.output.unwrap();
        assert_eq!(output.format.as_deref(), Some("json"));
        assert_eq!(output.color, Some(true));
    }

    #[test]
    fn merge_unions_semester_aliases() {
        let base = ConfigFile {
            parsing: Some(ParsingSection {
                semester_aliases: Some(BTreeMap::from([
                    ("QTR".to_string(), "Fall".to_string()),
                    ("MAY".to_string(), "Summer".to_string()),
                ])),
                ..Default::default()
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            parsing: Some(ParsingSection {
                semester_aliases: Some(BTreeMap::from([(
                    "QTR".to_string(),
                    "Winter".to_string(),
                )])),
                ..Default::default()
            }),
            ..Default::default()
        };
        let aliases = merge(base, overlay).parsing.unwrap().semester_aliases.unwrap();
        assert_eq!(aliases.get("QTR").map(String::as_str), Some("Winter"));
        assert_eq!(aliases.get("MAY").map(String::as_str), Some("Summer"));
    }

    #[test]
    fn save_then_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = ConfigFile {
            output: Some(OutputSection {
                format: Some("summary".into()),
                color: Some(false),
            }),
            ..Default::default()
        };
        save_to_path(&config, &path).unwrap();
        let loaded = load_from_path(&path).unwrap();
        assert_eq!(loaded.output.unwrap().format.as_deref(), Some("summary"));
    }

    #[test]
    fn unparsable_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[parsing\nmax_title_length = ").unwrap();
        assert!(load_from_path(&path).is_none());
        assert!(load_from_path(&dir.path().join("missing.toml")).is_none());
    }
}
