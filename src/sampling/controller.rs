use anyhow::{bail, Context, Result};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::loop_worker::{sampling_loop, SamplingContext};

/// Owns the sampling task's lifecycle. Stopping cancels the tick loop and
/// joins it; an in-flight detection is left to finish on the worker thread
/// and its result is discarded with the closed event channel.
pub struct SamplerController {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl SamplerController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn start(&mut self, ctx: SamplingContext) -> Result<()> {
        if self.handle.is_some() {
            bail!("sampling already active");
        }

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(sampling_loop(ctx, cancel_token.clone()));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Idempotent: cancelling an already-stopped sampler is a no-op.
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("sampling loop task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }
}

impl Default for SamplerController {
    fn default() -> Self {
        Self::new()
    }
}
