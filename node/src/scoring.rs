// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use async_trait::async_trait;
use credbridge_kernel::types::ScoreSnapshot;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;

use crate::config::NodeConfig;
use crate::errors::NodeError;

/// Produces the current score snapshot.
#[async_trait]
pub trait ScoreSource: Send + Sync {
    async fn compute_scores(&self) -> Result<ScoreSnapshot, NodeError>;
}

/// Runs the external scoring command in its working directory and reads
/// the JSON it writes.
#[derive(Debug, Clone)]
pub struct CommandScorePipeline {
    pub command: Option<String>,
    pub workdir: PathBuf,
    pub output: PathBuf,
    pub scratch_dir: Option<PathBuf>,
    pub timeout: Duration,
}

impl CommandScorePipeline {
    pub fn from_config(cfg: &NodeConfig) -> Self {
        Self {
            command: cfg.scoring_command.clone(),
            workdir: cfg.scoring_dir.clone(),
            output: cfg.scoring_output.clone(),
            scratch_dir: cfg.scoring_scratch_dir.clone(),
            timeout: cfg.scoring_timeout(),
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.workdir.join(&self.output)
    }

    async fn clear_scratch(&self) -> Result<(), NodeError> {
        let Some(scratch) = &self.scratch_dir else {
            return Ok(());
        };
        let path = self.workdir.join(scratch);
        match tokio::fs::remove_dir_all(&path).await {
            Ok(()) => {
                tracing::debug!("Cleared scoring scratch dir {:?}", path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(NodeError::Scoring(format!("clearing {:?}: {}", path, e))),
        }
    }

    async fn run_command(&self, command: &str) -> Result<(), NodeError> {
        tracing::info!("Running scoring pipeline: {}", command);
        let child = Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(&self.workdir)
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, child)
            .await
            .map_err(|_| NodeError::Scoring(format!("timed out after {}s", self.timeout.as_secs())))?
            .map_err(|e| NodeError::Scoring(format!("spawn: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(NodeError::Scoring(format!(
                "exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ScoreSource for CommandScorePipeline {
    async fn compute_scores(&self) -> Result<ScoreSnapshot, NodeError> {
        if let Some(command) = &self.command {
            self.clear_scratch().await?;
            self.run_command(command).await?;
        }

        let path = self.output_path();
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| NodeError::Scoring(format!("reading {:?}: {}", path, e)))?;
        let scores = ScoreSnapshot::from_json(&bytes)?;
        tracing::info!("Scoring pipeline produced {} scores", scores.len());
        Ok(scores)
    }
}
