use crate::artifact::save_artifact;
use crate::client::{Download, JobId, SlidesClient};
use crate::error::SlidesError;
use deckbot_core::AppConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    /// Download attempts in total, including the first one.
    pub attempts: u32,
    pub interval: Duration,
}

impl PollPolicy {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            attempts: config.download_attempts,
            interval: config.poll_interval(),
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self { attempts: 3, interval: Duration::from_secs(10) }
    }
}

impl SlidesClient {
    /// Downloads the deck for `job` into `dir`, polling while the API reports it as pending.
    pub async fn fetch_artifact(
        &self,
        job: &JobId,
        format: &str,
        dir: &Path,
        policy: &PollPolicy,
    ) -> Result<PathBuf, SlidesError> {
        let attempts = policy.attempts.max(1);

        for attempt in 1..=attempts {
            match self.download(job).await? {
                Download::Ready(bytes) => {
                    let path = save_artifact(dir, job, format, &bytes).await?;
                    info!("💾 Saved {}", path.display());
                    return Ok(path);
                }
                Download::Pending if attempt < attempts => {
                    info!(
                        "⏳ Presentation {} not ready, retrying in {}s (attempt {}/{})",
                        job,
                        policy.interval.as_secs(),
                        attempt,
                        attempts
                    );
                    tokio::time::sleep(policy.interval).await;
                }
                Download::Pending => {}
            }
        }

        warn!("⚠️ Presentation {} never became ready", job);
        Err(SlidesError::NotReady { attempts })
    }
}
