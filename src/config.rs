use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = ".langdictrc.json";

pub const DEFAULT_LANGUAGES: &[&str] = &[
    "fr", "es", "it", "jp", "ko", "nl", "pt", "ro", "ru", "zh_s", "zh_t",
];

/// What to do with a language file that exists but cannot be read as a flat
/// string map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MalformedPolicy {
    /// Abort the run and leave the file untouched.
    #[default]
    Error,
    /// Discard the file content and bootstrap it from the extracted keys.
    Reset,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_source_root")]
    pub source_root: String,
    #[serde(default = "default_target_dir")]
    pub target_dir: String,
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default = "default_function")]
    pub function: String,
    /// Template file name, relative to `target_dir`. `null` disables it.
    #[serde(default = "default_template")]
    pub template: Option<String>,
    #[serde(default)]
    pub on_malformed: MalformedPolicy,
}

fn default_source_root() -> String {
    "./".to_string()
}

fn default_target_dir() -> String {
    "./assets/lang".to_string()
}

fn default_languages() -> Vec<String> {
    DEFAULT_LANGUAGES.iter().map(|s| s.to_string()).collect()
}

fn default_extension() -> String {
    "go".to_string()
}

fn default_function() -> String {
    "lang.Translate".to_string()
}

fn default_template() -> Option<String> {
    Some("gen_template.json".to_string())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_root: default_source_root(),
            target_dir: default_target_dir(),
            languages: default_languages(),
            extension: default_extension(),
            function: default_function(),
            template: default_template(),
            on_malformed: MalformedPolicy::default(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Language codes become file names, so they must be non-empty, unique and
    /// free of path separators.
    pub fn validate(&self) -> Result<()> {
        if self.languages.is_empty() {
            bail!("'languages' must list at least one language code");
        }

        let mut seen = HashSet::new();
        for code in &self.languages {
            if code.trim().is_empty() {
                bail!("Empty language code in 'languages'");
            }
            if code.contains(['/', '\\']) || code == "." || code == ".." {
                bail!("Invalid language code in 'languages': \"{}\"", code);
            }
            if !seen.insert(code.as_str()) {
                bail!("Duplicate language code in 'languages': \"{}\"", code);
            }
        }

        if self.extension.trim_start_matches('.').is_empty() {
            bail!("'extension' must not be empty");
        }
        if self.function.is_empty() {
            bail!("'function' must not be empty");
        }
        if let Some(template) = &self.template
            && template.is_empty()
        {
            bail!("'template' must not be empty (use null to disable it)");
        }
        if let Some(template) = self.template_path()
            && let Some(code) = self
                .languages
                .iter()
                .find(|code| self.language_path(code) == template)
        {
            bail!(
                "Language \"{}\" would share its file with the template: {}",
                code,
                template.display()
            );
        }

        Ok(())
    }

    /// Extension filter without a leading dot.
    pub fn extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }

    pub fn language_path(&self, code: &str) -> PathBuf {
        Path::new(&self.target_dir).join(format!("{}.json", code))
    }

    pub fn template_path(&self) -> Option<PathBuf> {
        self.template
            .as_ref()
            .map(|name| Path::new(&self.target_dir).join(name))
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Path of the config file, `None` when using defaults.
    pub path: Option<PathBuf>,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            config
                .validate()
                .with_context(|| format!("Invalid config file: {}", path.display()))?;
            Ok(ConfigLoadResult {
                config,
                path: Some(path),
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            path: None,
        }),
    }
}
