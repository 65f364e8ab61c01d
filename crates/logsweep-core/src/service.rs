// ── Acquisition service facade ──

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{error, info};

use logsweep_api::HostApi;

use crate::config::ServiceConfig;
use crate::discovery::discover_controllers;
use crate::error::CoreError;
use crate::fetch::read_logs;
use crate::model::ControllerInfo;
use crate::state::{Action, AppState, AppStore, app_store};
use crate::store::Subscription;
use crate::stream::StateStream;

/// Phase of the service's load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    /// No cycle running; the state holds the last completed result.
    #[default]
    Idle,
    /// Resolving the controller fleet from the host object tree.
    Discovering,
    /// Reading and merging device logs.
    Fetching,
    /// The last cycle aborted on a fatal discovery error.
    Failed,
}

/// Facade over the acquisition pipeline.
///
/// Owns the store and the injected host capability. One [`load`](Self::load)
/// call runs a full discovery, fetch and merge cycle; consumers read
/// snapshots through [`current_state`](Self::current_state), observe
/// changes through [`subscribe`](Self::subscribe) or
/// [`state_stream`](Self::state_stream), and follow cycle phases through
/// [`watch_phase`](Self::watch_phase).
pub struct LogService {
    host: Arc<dyn HostApi>,
    config: ServiceConfig,
    store: AppStore,
    phase_tx: watch::Sender<LoadPhase>,
    state_rx: watch::Receiver<Arc<AppState>>,
    last_load: RwLock<Option<DateTime<Utc>>>,
    // Keeps the store → watch bridge alive for the service's lifetime.
    _bridge: Subscription,
}

impl LogService {
    /// Create a service around an injected host capability.
    pub fn new(host: Arc<dyn HostApi>, config: ServiceConfig) -> Result<Self, CoreError> {
        config.validate()?;

        let store = app_store();
        let (phase_tx, _) = watch::channel(LoadPhase::Idle);
        let (state_tx, state_rx) = watch::channel(store.state());
        let bridge = store.subscribe(move |snapshot| {
            let _ = state_tx.send(Arc::clone(snapshot));
        });

        Ok(Self {
            host,
            config,
            store,
            phase_tx,
            state_rx,
            last_load: RwLock::new(None),
            _bridge: bridge,
        })
    }

    /// Run one full load cycle: discover the fleet, then fetch and merge
    /// every controller's log. Calls are not synchronized; run one cycle
    /// at a time.
    ///
    /// On a fatal discovery error the store keeps its last-known-good
    /// contents, progress stays indeterminate, and the error is returned.
    pub async fn load(&self) -> Result<(), CoreError> {
        self.phase_tx.send_replace(LoadPhase::Discovering);
        self.store.dispatch(Action::SetProgress { value: -1, max: 1 });

        let controllers = match discover_controllers(self.host.as_ref(), &self.config).await {
            Ok(controllers) => controllers,
            Err(err) => {
                error!(error = %err, "controller discovery failed, aborting load cycle");
                self.phase_tx.send_replace(LoadPhase::Failed);
                return Err(err);
            }
        };

        info!(count = controllers.len(), "controllers discovered");
        self.store.dispatch(Action::AddControllers(controllers));

        self.phase_tx.send_replace(LoadPhase::Fetching);
        read_logs(self.host.as_ref(), &self.store, &self.config).await;

        *self
            .last_load
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Utc::now());
        self.phase_tx.send_replace(LoadPhase::Idle);
        Ok(())
    }

    /// Current published snapshot. Lock-free.
    pub fn current_state(&self) -> Arc<AppState> {
        self.store.state()
    }

    /// Observe every published snapshot synchronously, in dispatch order.
    pub fn subscribe(
        &self,
        observer: impl Fn(&Arc<AppState>) + Send + Sync + 'static,
    ) -> Subscription {
        self.store.subscribe(observer)
    }

    /// Async subscription to published snapshots.
    pub fn state_stream(&self) -> StateStream {
        StateStream::new(self.state_rx.clone())
    }

    /// Current load phase.
    pub fn phase(&self) -> LoadPhase {
        *self.phase_tx.borrow()
    }

    /// Follow load-phase transitions.
    pub fn watch_phase(&self) -> watch::Receiver<LoadPhase> {
        self.phase_tx.subscribe()
    }

    /// Identification summaries for the discovered fleet, in path order.
    pub fn controllers(&self) -> Vec<ControllerInfo> {
        let state = self.store.state();
        state
            .paths
            .iter()
            .filter_map(|path| state.controllers.get(path))
            .map(|controller| controller.info())
            .collect()
    }

    /// Completion time of the last successful load cycle.
    pub fn last_load(&self) -> Option<DateTime<Utc>> {
        *self
            .last_load
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Age of the data from the last successful load cycle.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.last_load().map(|at| Utc::now() - at)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use logsweep_api::FakeHost;

    use super::*;

    #[test]
    fn new_service_starts_idle_with_empty_state() {
        let service =
            LogService::new(Arc::new(FakeHost::new("/srv")), ServiceConfig::default()).unwrap();
        assert_eq!(service.phase(), LoadPhase::Idle);
        assert!(service.current_state().paths.is_empty());
        assert!(service.last_load().is_none());
        assert!(service.data_age().is_none());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ServiceConfig {
            max_in_flight: 0,
            ..ServiceConfig::default()
        };
        let result = LogService::new(Arc::new(FakeHost::new("/srv")), config);
        assert!(matches!(result, Err(CoreError::InvalidConfig { .. })));
    }
}
