//! Poster configuration.
//!
//! Provides configuration options for the posting session, read from
//! `ARTICLES_*` environment variables.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use articles_sdk::client::config::DEFAULT_RPC_URL;
use articles_sdk::{Article, ClientConfig, Commitment};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::submitter::SubmitterConfig;

/// Address of the deployed article program.
pub const DEFAULT_PROGRAM_ID: &str = "BPE4bWD9DjWDCjTewNbf9pDvDeRfsMDQu1tfk7rJpwL";

/// Configuration for the poster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PosterConfig {
    /// JSON-RPC endpoint.
    pub rpc_url: String,

    /// Path to the signer's keypair file.
    pub keypair_path: PathBuf,

    /// Article program address (base58).
    pub program_id: String,

    /// Commitment level a transaction must reach.
    pub commitment: Commitment,

    /// Confirmation timeout in milliseconds.
    pub confirmation_timeout_ms: u64,

    /// Status poll interval in milliseconds.
    pub poll_interval_ms: u64,

    /// Retries for rate-limited or timed out RPC reads.
    pub max_retries: u32,

    /// Skip the RPC node's preflight simulation on submission.
    pub skip_preflight: bool,

    /// Optional JSON file holding the articles to post.
    pub batch_file: Option<PathBuf>,

    /// Run against an in-process ledger with a throwaway signer.
    pub dry_run: bool,
}

impl Default for PosterConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            keypair_path: default_keypair_path(),
            program_id: DEFAULT_PROGRAM_ID.to_string(),
            commitment: Commitment::default(),
            confirmation_timeout_ms: 60_000,
            poll_interval_ms: 500,
            max_retries: 3,
            skip_preflight: false,
            batch_file: None,
            dry_run: false,
        }
    }
}

impl PosterConfig {
    /// Builds a configuration from `ARTICLES_*` environment variables,
    /// falling back to defaults for anything unset.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = read_var("ARTICLES_RPC_URL") {
            config.rpc_url = url;
        }
        if let Some(path) = read_var("ARTICLES_KEYPAIR") {
            config.keypair_path = PathBuf::from(path);
        }
        if let Some(program_id) = read_var("ARTICLES_PROGRAM_ID") {
            config.program_id = program_id;
        }
        if let Some(level) = read_var("ARTICLES_COMMITMENT") {
            config.commitment = Commitment::from_name(&level)
                .ok_or(ConfigError::InvalidCommitment(level))?;
        }
        if let Some(ms) = read_var("ARTICLES_CONFIRM_TIMEOUT_MS") {
            config.confirmation_timeout_ms = parse_number("ARTICLES_CONFIRM_TIMEOUT_MS", &ms)?;
        }
        if let Some(ms) = read_var("ARTICLES_POLL_INTERVAL_MS") {
            config.poll_interval_ms = parse_number("ARTICLES_POLL_INTERVAL_MS", &ms)?;
        }
        if let Some(flag) = read_var("ARTICLES_SKIP_PREFLIGHT") {
            config.skip_preflight = parse_flag(&flag)?;
        }
        if let Some(path) = read_var("ARTICLES_BATCH_FILE") {
            config.batch_file = Some(PathBuf::from(path));
        }
        if let Some(flag) = read_var("ARTICLES_DRY_RUN") {
            config.dry_run = parse_flag(&flag)?;
        }

        Ok(config)
    }

    /// Sets the RPC endpoint.
    #[must_use]
    pub fn with_rpc_url(mut self, url: impl Into<String>) -> Self {
        self.rpc_url = url.into();
        self
    }

    /// Sets the keypair path.
    #[must_use]
    pub fn with_keypair_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.keypair_path = path.into();
        self
    }

    /// Sets the program address.
    #[must_use]
    pub fn with_program_id(mut self, program_id: impl Into<String>) -> Self {
        self.program_id = program_id.into();
        self
    }

    /// Sets the commitment level.
    #[must_use]
    pub const fn with_commitment(mut self, commitment: Commitment) -> Self {
        self.commitment = commitment;
        self
    }

    /// Sets the confirmation timeout.
    #[must_use]
    pub const fn with_confirmation_timeout(mut self, ms: u64) -> Self {
        self.confirmation_timeout_ms = ms;
        self
    }

    /// Sets the poll interval.
    #[must_use]
    pub const fn with_poll_interval(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    /// Enables or disables skipping preflight simulation.
    #[must_use]
    pub const fn with_skip_preflight(mut self, skip: bool) -> Self {
        self.skip_preflight = skip;
        self
    }

    /// Sets the batch file.
    #[must_use]
    pub fn with_batch_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.batch_file = Some(path.into());
        self
    }

    /// Enables or disables dry-run mode.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.rpc_url.starts_with("http://") && !self.rpc_url.starts_with("https://") {
            return Err(ConfigError::InvalidRpcUrl(self.rpc_url.clone()));
        }

        if self.confirmation_timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        if self.poll_interval_ms == 0 || self.poll_interval_ms > self.confirmation_timeout_ms {
            return Err(ConfigError::InvalidPollInterval);
        }

        self.parse_program_id()?;

        Ok(())
    }

    /// Parses the program address from base58.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is not 32 bytes of base58.
    pub fn parse_program_id(&self) -> Result<Pubkey, ConfigError> {
        let bytes = bs58::decode(&self.program_id)
            .into_vec()
            .map_err(|_| ConfigError::InvalidProgramId(self.program_id.clone()))?;

        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| ConfigError::InvalidProgramId(self.program_id.clone()))?;

        Ok(Pubkey::new_from_array(arr))
    }

    /// Loads the articles to post: the batch file when set, otherwise the
    /// two sample articles.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch file cannot be read or parsed.
    pub fn load_batch(&self) -> Result<Vec<Article>, ConfigError> {
        match &self.batch_file {
            Some(path) => read_batch_file(path),
            None => Ok(default_batch()),
        }
    }

    /// Returns the RPC client settings.
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.rpc_url.clone())
            .with_commitment(self.commitment)
            .with_max_retries(self.max_retries)
            .with_skip_preflight(self.skip_preflight)
    }

    /// Returns the confirmation settings.
    #[must_use]
    pub fn submitter_config(&self) -> SubmitterConfig {
        SubmitterConfig {
            commitment: self.commitment,
            confirmation_timeout: Duration::from_millis(self.confirmation_timeout_ms),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }
}

/// The articles posted when no batch file is given.
#[must_use]
pub fn default_batch() -> Vec<Article> {
    vec![
        Article::new("Hello", "Hello World!"),
        Article::new("Test title", "Test Content"),
    ]
}

fn default_keypair_path() -> PathBuf {
    let home = env::var_os("HOME").map(PathBuf::from).unwrap_or_default();
    home.join(".config").join("solana").join("id.json")
}

fn read_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_number(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        name,
        value: value.to_string(),
    })
}

fn parse_flag(value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidFlag(value.to_string())),
    }
}

fn read_batch_file(path: &Path) -> Result<Vec<Article>, ConfigError> {
    let batch_error = |reason: String| ConfigError::BatchFile {
        path: path.display().to_string(),
        reason,
    };

    let text = std::fs::read_to_string(path).map_err(|e| batch_error(e.to_string()))?;
    serde_json::from_str(&text).map_err(|e| batch_error(e.to_string()))
}

/// Configuration errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// RPC URL is not http(s).
    #[error("invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    /// Program address is not valid base58.
    #[error("invalid program id: {0}")]
    InvalidProgramId(String),

    /// Unknown commitment name.
    #[error("invalid commitment level: {0}")]
    InvalidCommitment(String),

    /// A numeric variable did not parse.
    #[error("{name} must be a valid number, got {value:?}")]
    InvalidNumber {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
    },

    /// A boolean variable did not parse.
    #[error("invalid boolean flag: {0}")]
    InvalidFlag(String),

    /// Invalid confirmation timeout.
    #[error("confirmation_timeout_ms must be > 0")]
    InvalidTimeout,

    /// Invalid poll interval.
    #[error("poll_interval_ms must be > 0 and <= confirmation_timeout_ms")]
    InvalidPollInterval,

    /// Keypair file could not be loaded.
    #[error("cannot load keypair from {path}: {reason}")]
    Keypair {
        /// File path.
        path: String,
        /// What went wrong.
        reason: String,
    },

    /// Batch file could not be loaded.
    #[error("cannot load articles from {path}: {reason}")]
    BatchFile {
        /// File path.
        path: String,
        /// What went wrong.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = PosterConfig::default();
        assert_eq!(config.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(config.program_id, DEFAULT_PROGRAM_ID);
        assert_eq!(config.commitment, Commitment::Confirmed);
        assert_eq!(config.confirmation_timeout_ms, 60_000);
        assert_eq!(config.poll_interval_ms, 500);
        assert!(config.keypair_path.ends_with(".config/solana/id.json"));
        assert!(config.batch_file.is_none());
        assert!(!config.skip_preflight);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_config_builder() {
        let config = PosterConfig::default()
            .with_rpc_url("http://127.0.0.1:8899")
            .with_commitment(Commitment::Finalized)
            .with_confirmation_timeout(5_000)
            .with_poll_interval(50)
            .with_dry_run(true);

        assert_eq!(config.rpc_url, "http://127.0.0.1:8899");
        assert_eq!(config.commitment, Commitment::Finalized);
        assert_eq!(config.confirmation_timeout_ms, 5_000);
        assert_eq!(config.poll_interval_ms, 50);
        assert!(config.dry_run);
    }

    #[test]
    fn test_config_validate_valid() {
        assert!(PosterConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_validate_invalid_url() {
        let config = PosterConfig::default().with_rpc_url("ftp://example.com");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRpcUrl(_))
        ));
    }

    #[test]
    fn test_config_validate_invalid_timeout() {
        let config = PosterConfig::default().with_confirmation_timeout(0);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidTimeout)));
    }

    #[test]
    fn test_config_validate_invalid_poll_interval() {
        let zero = PosterConfig::default().with_poll_interval(0);
        assert!(matches!(zero.validate(), Err(ConfigError::InvalidPollInterval)));

        let too_long = PosterConfig::default()
            .with_confirmation_timeout(100)
            .with_poll_interval(200);
        assert!(matches!(
            too_long.validate(),
            Err(ConfigError::InvalidPollInterval)
        ));
    }

    #[test]
    fn test_config_parse_program_id() {
        let config = PosterConfig::default();
        let program_id = config.parse_program_id().expect("program id");
        assert_eq!(program_id.to_string(), DEFAULT_PROGRAM_ID);
    }

    #[test]
    fn test_config_parse_program_id_invalid() {
        let config = PosterConfig::default().with_program_id("invalid!");
        assert!(config.parse_program_id().is_err());

        // valid base58, wrong length
        let short = PosterConfig::default().with_program_id("1111");
        assert!(short.parse_program_id().is_err());
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("X", " 250 ").expect("number"), 250);
        assert!(matches!(
            parse_number("X", "ten"),
            Err(ConfigError::InvalidNumber { name: "X", .. })
        ));
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true").expect("flag"));
        assert!(parse_flag("1").expect("flag"));
        assert!(!parse_flag("No").expect("flag"));
        assert!(parse_flag("maybe").is_err());
    }

    #[test]
    fn test_default_batch() {
        let batch = PosterConfig::default().load_batch().expect("batch");
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], Article::new("Hello", "Hello World!"));
        assert_eq!(batch[1], Article::new("Test title", "Test Content"));
    }

    #[test]
    fn test_load_batch_file() {
        let path = env::temp_dir().join(format!("articles-batch-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"[{"title":"One","content":"first"},{"title":"Two","content":"second"}]"#,
        )
        .expect("write batch");

        let batch = PosterConfig::default()
            .with_batch_file(&path)
            .load_batch()
            .expect("batch");
        std::fs::remove_file(&path).ok();

        assert_eq!(batch, vec![Article::new("One", "first"), Article::new("Two", "second")]);
    }

    #[test]
    fn test_load_batch_missing_file() {
        let config = PosterConfig::default().with_batch_file("/nonexistent/batch.json");
        assert!(matches!(
            config.load_batch(),
            Err(ConfigError::BatchFile { .. })
        ));
    }

    #[test]
    fn test_submitter_config() {
        let config = PosterConfig::default()
            .with_confirmation_timeout(2_000)
            .with_poll_interval(100);
        let submitter = config.submitter_config();
        assert_eq!(submitter.confirmation_timeout, Duration::from_millis(2_000));
        assert_eq!(submitter.poll_interval, Duration::from_millis(100));
        assert_eq!(submitter.commitment, Commitment::Confirmed);
    }

    #[test]
    fn test_client_config() {
        let config = PosterConfig::default().with_commitment(Commitment::Processed);
        let client = config.client_config();
        assert_eq!(client.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(client.commitment, Commitment::Processed);
        assert!(!client.skip_preflight);
        assert!(client.validate().is_ok());
    }

    #[test]
    fn test_client_config_skip_preflight() {
        let client = PosterConfig::default()
            .with_skip_preflight(true)
            .client_config();
        assert!(client.skip_preflight);
    }
}
