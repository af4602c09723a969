//! Orchestrator coordinating many concurrent sessions

use crate::common::SessionId;
use crate::config::Config;
use crate::metrics::{AggregateReport, MetricsAggregator};
use crate::session::{Session, SessionResult};

use std::sync::Arc;
use std::time::Instant;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// Spawns the configured number of sessions with a fixed inter-spawn
/// stagger, waits for every one to reach a terminal state and produces the
/// frozen aggregate report.
///
/// One session's failure never aborts the run: every outcome, including hard
/// failures and panicked tasks, is folded into the aggregate.
pub struct SessionManager {
    config: Config,
    metrics: Arc<MetricsAggregator>,
}

impl SessionManager {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            metrics: Arc::new(MetricsAggregator::new()),
        }
    }

    /// Run the whole test: spawn, await all, freeze the report
    pub async fn run(&mut self) -> AggregateReport {
        info!(
            "Starting {} sessions against {} ({} profile)",
            self.config.run.client_count,
            self.config.target.addr(),
            self.config.profile.label()
        );

        let started = Instant::now();
        let handles = self.spawn_all_sessions().await;
        self.wait_for_sessions(handles, started).await;

        let report = self.metrics.finalize(started.elapsed());
        info!(
            "All {} sessions finished in {:.2}s",
            report.total_clients,
            report.elapsed.as_secs_f64()
        );
        report
    }

    /// Spawn every session task, pacing starts with the configured stagger
    /// so the target's accept queue is never hit all at once.
    async fn spawn_all_sessions(&self) -> Vec<tokio::task::JoinHandle<SessionResult>> {
        let mut handles = Vec::with_capacity(self.config.run.client_count as usize);

        for ordinal in 0..self.config.run.client_count {
            let id = SessionId::from(ordinal);
            let session = Session::new(
                id,
                self.config.target.addr(),
                self.config.profile.for_session(id),
                self.config.run.connect_timeout,
                self.config.run.response_timeout,
            );

            let metrics = Arc::clone(&self.metrics);
            let handle = tokio::spawn(async move {
                let result = session.run().await;
                // Merge before the task ends so every terminal state is
                // folded exactly once, even ones the join loop never sees.
                metrics.merge(&result);
                result
            });
            handles.push(handle);

            sleep(self.config.run.spawn_stagger).await;
        }

        handles
    }

    /// Await every session task; a panicked task is folded into the
    /// aggregate as a crashed session rather than aborting the run.
    async fn wait_for_sessions(
        &self,
        handles: Vec<tokio::task::JoinHandle<SessionResult>>,
        started: Instant,
    ) {
        let joined = futures_util::future::join_all(handles).await;

        for (ordinal, outcome) in joined.into_iter().enumerate() {
            match outcome {
                Ok(result) => {
                    debug!("Session {} joined: {}", result.id, result.outcome);
                }
                Err(e) => {
                    let id = SessionId::new(ordinal as u32);
                    error!("Session {} task crashed: {}", id, e);
                    self.metrics
                        .merge(&SessionResult::crashed(id, started.elapsed()));
                }
            }
        }
    }
}
