// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use clap::Parser;
use credbridge_kernel::config::{DeferPolicy, ReconcileConfig, DEFAULT_MIN_DIFFERENTIAL};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// credbridge node: posts cred scores to the oracle whenever the webhook fires.
///
/// Every option can also be set through the environment (or a `.env` file).
#[derive(Parser, Debug, Clone)]
#[command(name = "credbridge-node")]
pub struct NodeConfig {
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8000")]
    pub bind_addr: SocketAddr,

    /// Bearer token required on the webhook. Unset disables the check.
    #[arg(long, env = "WEBHOOK_TOKEN")]
    pub auth_token: Option<String>,

    #[arg(long, env = "RPC_URL", default_value = "http://127.0.0.1:8545")]
    pub rpc_url: String,

    #[arg(long, env = "SIGNER_PRIVATE_KEY", hide_env_values = true)]
    pub signer_private_key: Option<String>,

    #[arg(long, env = "ORACLE_ADDRESS")]
    pub oracle_address: Option<String>,

    /// Distribution contract read by the dashboard. Unset hides `pending`.
    #[arg(long, env = "IDA_ADDRESS")]
    pub ida_address: Option<String>,

    #[arg(long, env = "IDA_TOKEN")]
    pub ida_token: Option<String>,

    /// Publisher of the distribution index; usually the cortex contract.
    #[arg(long, env = "CORTEX_ADDRESS")]
    pub ida_publisher: Option<String>,

    #[arg(long, env = "IDA_INDEX_ID", default_value_t = 1)]
    pub ida_index_id: u32,

    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    pub github_api_url: String,

    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// File looked up in `<user>/<user>` for the identity proof.
    #[arg(long, env = "PROOF_FILE", default_value = "ethereum-proof.json")]
    pub proof_file: String,

    /// Shell command producing the score snapshot. Unset: read the output file as-is.
    #[arg(long, env = "SCORING_COMMAND")]
    pub scoring_command: Option<String>,

    #[arg(long, env = "SCORING_DIR", default_value = "../sourcecred")]
    pub scoring_dir: PathBuf,

    /// Relative to `scoring_dir`.
    #[arg(long, env = "SCORING_OUTPUT", default_value = "output/credScores.json")]
    pub scoring_output: PathBuf,

    /// Relative to `scoring_dir`; removed before every run.
    #[arg(long, env = "SCORING_SCRATCH_DIR")]
    pub scoring_scratch_dir: Option<PathBuf>,

    #[arg(long, env = "CACHE_PATH", default_value = "cached-identities.json")]
    pub cache_path: PathBuf,

    #[arg(long, env = "HISTORY_PATH", default_value = "credScores.json.old")]
    pub history_path: PathBuf,

    /// Exclusive: a change of exactly this size is ignored. May be negative.
    #[arg(long, env = "MIN_CRED_DIFFERENTIAL", default_value_t = DEFAULT_MIN_DIFFERENTIAL, allow_negative_numbers = true)]
    pub min_differential: f64,

    /// retry | drop
    #[arg(long, env = "DEFER_POLICY", default_value = "retry")]
    pub defer_policy: DeferPolicy,

    #[arg(long, env = "ORACLE_TIMEOUT_SECS", default_value_t = 120)]
    pub oracle_timeout_secs: u64,

    #[arg(long, env = "PROOF_TIMEOUT_SECS", default_value_t = 15)]
    pub proof_timeout_secs: u64,

    #[arg(long, env = "SCORING_TIMEOUT_SECS", default_value_t = 1800)]
    pub scoring_timeout_secs: u64,
}

impl NodeConfig {
    pub fn reconcile(&self) -> ReconcileConfig {
        ReconcileConfig {
            min_differential: self.min_differential,
            defer_policy: self.defer_policy,
        }
    }

    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_secs(self.oracle_timeout_secs)
    }

    pub fn proof_timeout(&self) -> Duration {
        Duration::from_secs(self.proof_timeout_secs)
    }

    pub fn scoring_timeout(&self) -> Duration {
        Duration::from_secs(self.scoring_timeout_secs)
    }

    /// Checks what the chain-facing mode needs before anything starts.
    pub fn validate(&self) -> Result<(), String> {
        if self.signer_private_key.is_none() {
            return Err("SIGNER_PRIVATE_KEY is required".into());
        }
        if self.oracle_address.is_none() {
            return Err("ORACLE_ADDRESS is required".into());
        }
        if self.ida_address.is_some() && self.ida_token.is_none() {
            return Err("IDA_TOKEN is required when IDA_ADDRESS is set".into());
        }
        Ok(())
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            auth_token: None,
            rpc_url: "http://127.0.0.1:8545".into(),
            signer_private_key: None,
            oracle_address: None,
            ida_address: None,
            ida_token: None,
            ida_publisher: None,
            ida_index_id: 1,
            github_api_url: "https://api.github.com".into(),
            github_token: None,
            proof_file: "ethereum-proof.json".into(),
            scoring_command: None,
            scoring_dir: PathBuf::from("../sourcecred"),
            scoring_output: PathBuf::from("output/credScores.json"),
            scoring_scratch_dir: None,
            cache_path: PathBuf::from("cached-identities.json"),
            history_path: PathBuf::from("credScores.json.old"),
            min_differential: DEFAULT_MIN_DIFFERENTIAL,
            defer_policy: DeferPolicy::default(),
            oracle_timeout_secs: 120,
            proof_timeout_secs: 15,
            scoring_timeout_secs: 1800,
        }
    }
}
