//! Background renewal loop.

use super::agent::{DiscoveryAgent, DiscoveryError};
use crate::discovery::{
    domain::Service,
    ports::{DirectoryTransport, ResponseReader},
};
use mockable::Clock;
use std::error::Error as _;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Shortest wait between renewal attempts.
///
/// Applies when the server hands out a TTL of zero, which would otherwise
/// spin the loop.
pub const MIN_RENEWAL_INTERVAL: Duration = Duration::from_secs(1);

/// A renewal attempt that did not leave the service registered.
#[derive(Debug, Clone, Error)]
pub enum RenewalFailure {
    /// The attempt failed before the server could answer.
    #[error(transparent)]
    Error(#[from] DiscoveryError),
    /// The server answered and refused the registration.
    #[error("discovery server rejected registration of {service}")]
    Rejected {
        /// Name of the refused service.
        service: String,
    },
}

/// Receives renewal failures; the loop itself never stops on them.
pub trait RenewalErrorSink: Send + Sync {
    /// Handles one failed renewal attempt.
    fn report(&self, failure: &RenewalFailure);
}

impl<F> RenewalErrorSink for F
where
    F: Fn(&RenewalFailure) + Send + Sync,
{
    fn report(&self, failure: &RenewalFailure) {
        self(failure);
    }
}

/// Sink that logs every failure at `warn` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorSink;

impl RenewalErrorSink for TracingErrorSink {
    fn report(&self, failure: &RenewalFailure) {
        warn!(
            error = %failure,
            causes = %cause_chain(failure),
            "service renewal failed"
        );
    }
}

fn cause_chain(failure: &RenewalFailure) -> String {
    std::iter::successors(failure.source(), |&cause| cause.source())
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ")
}

impl<T, R, C> DiscoveryAgent<T, R, C>
where
    T: DirectoryTransport,
    R: ResponseReader,
    C: Clock + Send + Sync,
{
    /// Keeps `service` registered until `cancel` fires.
    ///
    /// Each cycle waits for the TTL read at the start of that wait, then
    /// calls [`ensure_registered`](Self::ensure_registered). A TTL granted
    /// mid-wait applies from the next cycle. Failures go to `sink` and the
    /// loop carries on. Cancellation wins over an elapsed wait, and an
    /// attempt already in flight completes before the loop exits.
    ///
    /// The wait runs on tokio's monotonic timer while freshness is judged by
    /// the agent's clock, and the period equals the freshness window. If the
    /// clock runs behind the timer, a tick can still find the registration
    /// fresh and skip it, leaving the server-side entry to lapse for up to
    /// one TTL before the next cycle renews it.
    pub async fn run_renewal_loop<S>(&self, service: &Service, cancel: &CancellationToken, sink: &S)
    where
        S: RenewalErrorSink + ?Sized,
    {
        info!(service = service.name(), "renewal loop started");
        loop {
            let wait = self.ttl().as_duration().max(MIN_RENEWAL_INTERVAL);
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(wait) => self.renew_once(service, sink).await,
            }
        }
        info!(service = service.name(), "renewal loop stopped");
    }

    async fn renew_once<S>(&self, service: &Service, sink: &S)
    where
        S: RenewalErrorSink + ?Sized,
    {
        match self.ensure_registered(service).await {
            Ok(true) => {}
            Ok(false) => sink.report(&RenewalFailure::Rejected {
                service: service.name().to_owned(),
            }),
            Err(err) => sink.report(&RenewalFailure::Error(err)),
        }
    }
}

impl<T, R, C> DiscoveryAgent<T, R, C>
where
    T: DirectoryTransport + 'static,
    R: ResponseReader + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Runs [`run_renewal_loop`](Self::run_renewal_loop) on a new task.
    ///
    /// Cancel the token and await the handle for a clean shutdown.
    #[must_use = "dropping the handle detaches the renewal task"]
    pub fn spawn_renewal_loop<S>(
        self: &Arc<Self>,
        service: Service,
        cancel: CancellationToken,
        sink: S,
    ) -> JoinHandle<()>
    where
        S: RenewalErrorSink + 'static,
    {
        let agent = Arc::clone(self);
        tokio::spawn(async move {
            agent.run_renewal_loop(&service, &cancel, &sink).await;
        })
    }
}
