use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use uuid::Uuid;

use dinebot_jobs::{DispatchOutcome, Worker};

/// Runs one worker invocation per tick, like a scheduled trigger would.
pub fn spawn(worker: Arc<Worker>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let correlation_id = format!("poll-{}", Uuid::new_v4());
            match worker.dispatch_once(&correlation_id).await {
                Ok(DispatchOutcome::Idle) => {
                    debug!(event_name = "worker.poll.idle", correlation_id = %correlation_id);
                }
                Ok(outcome) => {
                    info!(
                        event_name = "worker.poll.completed",
                        correlation_id = %correlation_id,
                        outcome = ?outcome,
                        "worker invocation completed"
                    );
                }
                Err(error) => {
                    error!(
                        event_name = "worker.poll.failed",
                        correlation_id = %correlation_id,
                        error = %error,
                        "worker invocation failed; message left for redelivery"
                    );
                }
            }
        }
    })
}
