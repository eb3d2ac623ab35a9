use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::semantic::DEFAULT_MODEL;

/// Default listen address for the daemon.
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
/// General acceptance threshold: a match at or below this score is rejected.
pub(crate) const DEFAULT_ACCEPT_THRESHOLD: f32 = 0.3;
/// Stricter threshold for trends; matches below it answer with the digest.
pub(crate) const DEFAULT_TRENDS_DIGEST_THRESHOLD: f32 = 0.5;
/// Default model download timeout in seconds
const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 300;

/// Configuration for the retrieval engine
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Model name for embeddings (e.g., "all-MiniLM-L6-v2")
    #[serde(default = "default_model")]
    pub model: String,

    /// Minimum similarity for a knowledge-base match to be trusted [0.0, 1.0]
    #[serde(default = "default_accept_threshold")]
    pub accept_threshold: f32,

    /// Trend matches below this score return the full trends digest [0.0, 1.0]
    #[serde(default = "default_trends_digest_threshold")]
    pub trends_digest_threshold: f32,

    /// Timeout for model download in seconds
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            accept_threshold: DEFAULT_ACCEPT_THRESHOLD,
            trends_digest_threshold: DEFAULT_TRENDS_DIGEST_THRESHOLD,
            download_timeout_secs: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_accept_threshold() -> f32 {
    DEFAULT_ACCEPT_THRESHOLD
}

fn default_trends_digest_threshold() -> f32 {
    DEFAULT_TRENDS_DIGEST_THRESHOLD
}

fn default_download_timeout_secs() -> u64 {
    DEFAULT_DOWNLOAD_TIMEOUT_SECS
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default)]
    pub retrieval: RetrievalConfig,

    #[serde(skip_serializing, skip_deserializing)]
    base_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            retrieval: RetrievalConfig::default(),
            base_path: String::new(),
        }
    }
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

impl Config {
    fn validate(&self) {
        let retrieval = &self.retrieval;

        if !(0.0..=1.0).contains(&retrieval.accept_threshold) {
            panic!(
                "retrieval.accept_threshold must be between 0.0 and 1.0, got {}",
                retrieval.accept_threshold
            );
        }

        if !(0.0..=1.0).contains(&retrieval.trends_digest_threshold) {
            panic!(
                "retrieval.trends_digest_threshold must be between 0.0 and 1.0, got {}",
                retrieval.trends_digest_threshold
            );
        }

        if retrieval.download_timeout_secs == 0 {
            panic!("retrieval.download_timeout_secs must be greater than 0");
        }
    }

    pub fn load_with(base_path: &str) -> Self {
        std::fs::create_dir_all(base_path).expect("failed to create base directory");
        let config_path = Path::new(base_path).join("config.yaml");

        // create new if does not exist
        if !config_path.exists() {
            std::fs::write(
                &config_path,
                serde_yml::to_string(&Self::default()).unwrap(),
            )
            .expect("failed to write default config");
        }

        let config_str =
            std::fs::read_to_string(&config_path).expect("config file is not valid utf8");
        let mut config: Self = serde_yml::from_str(&config_str).expect("config is malformed");

        config.base_path = base_path.to_string();

        config.validate();

        // resave in case config version needs an upgrade
        if config_str != serde_yml::to_string(&config).unwrap() {
            config.save();
        }

        config
    }

    pub fn save(&self) {
        let config_str = serde_yml::to_string(&self).unwrap();
        std::fs::write(Path::new(&self.base_path).join("config.yaml"), config_str)
            .expect("failed to write config");
    }
}

/// Base data directory: `MODISTE_BASE_PATH` or `~/.local/share/modiste`.
pub fn base_path() -> String {
    std::env::var("MODISTE_BASE_PATH").unwrap_or_else(|_| {
        let home = homedir::my_home()
            .expect("Could not determine home directory")
            .expect("Home directory path is empty");
        format!("{}/.local/share/modiste", home.to_string_lossy())
    })
}
