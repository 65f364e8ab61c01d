// ── Application state & reducer ──

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::merge::merge_records;
use crate::model::{Controller, ErrorLog, LogRecord};
use crate::store::Store;

/// Progress of the current load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Completed units; `-1` while the cycle has no known extent yet.
    pub value: i32,
    /// Total units, fixed to the controller count when fetching begins.
    pub max: i32,
}

impl Progress {
    /// The cycle has started but its extent is not known yet.
    pub fn is_indeterminate(self) -> bool {
        self.value < 0
    }

    pub fn is_complete(self) -> bool {
        self.value >= self.max
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self { value: 0, max: 1 }
    }
}

/// The aggregate snapshot published to subscribers.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Sorted controller paths; always the sorted key set of `controllers`.
    pub paths: Vec<String>,
    /// Discovered controllers by path.
    pub controllers: HashMap<String, Arc<Controller>>,
    /// Latest parsed log per controller path.
    pub logs: HashMap<String, Arc<ErrorLog>>,
    /// Every device's records merged, sorted by `(timestamp, device)`.
    pub global_log: Vec<Arc<LogRecord>>,
    pub progress: Progress,
}

/// Actions understood by the application reducer.
#[derive(Debug, Clone)]
pub enum Action {
    SetProgress { value: i32, max: i32 },
    AddErrorLog { path: String, log: Arc<ErrorLog> },
    AddControllers(Vec<Arc<Controller>>),
}

/// The application store: [`AppState`] driven by [`Action`]s.
pub type AppStore = Store<AppState, Action>;

/// Build the application store with an empty initial state.
pub fn app_store() -> AppStore {
    Store::new(AppState::default(), reduce)
}

/// Application reducer. Every action yields a fresh snapshot; this
/// application never withholds the store's change signal.
pub fn reduce(state: &AppState, action: &Action) -> Option<AppState> {
    let mut next = state.clone();
    match action {
        Action::SetProgress { value, max } => {
            next.progress = Progress {
                value: *value,
                max: *max,
            };
        }
        Action::AddErrorLog { path, log } => {
            next.logs.insert(path.clone(), Arc::clone(log));
            next.global_log = merge_records(&state.global_log, &log.items);
        }
        Action::AddControllers(controllers) => {
            for controller in controllers {
                next.controllers
                    .insert(controller.path.clone(), Arc::clone(controller));
            }
            next.paths = next.controllers.keys().cloned().collect();
            next.paths.sort_unstable();
        }
    }
    Some(next)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn controller(path: &str) -> Arc<Controller> {
        Arc::new(Controller {
            name: path.rsplit('/').next().unwrap().to_owned(),
            path: path.to_owned(),
            online: true,
            properties: HashMap::new(),
        })
    }

    fn log_with(device: &str, timestamp: &str) -> Arc<ErrorLog> {
        Arc::new(ErrorLog {
            device: device.to_owned(),
            items: vec![Arc::new(LogRecord {
                device: device.to_owned(),
                line: Some(1),
                level: "ERROR".to_owned(),
                timestamp: timestamp.to_owned(),
                error_code: String::new(),
                tcb_addr: String::new(),
                prg_cntr: String::new(),
                data1: String::new(),
                data2: String::new(),
                error: String::new(),
            })],
            ..ErrorLog::default()
        })
    }

    #[test]
    fn initial_state_is_empty_with_unit_progress() {
        let state = AppState::default();
        assert!(state.paths.is_empty());
        assert!(state.controllers.is_empty());
        assert!(state.logs.is_empty());
        assert!(state.global_log.is_empty());
        assert_eq!(state.progress, Progress { value: 0, max: 1 });
        assert!(!state.progress.is_indeterminate());
    }

    #[test]
    fn add_controllers_keeps_paths_sorted_and_deduplicated() {
        let store = app_store();
        store.dispatch(Action::AddControllers(vec![
            controller("/srv/b"),
            controller("/srv/a"),
        ]));
        store.dispatch(Action::AddControllers(vec![
            controller("/srv/c"),
            controller("/srv/a"),
        ]));

        let state = store.state();
        assert_eq!(state.paths, vec!["/srv/a", "/srv/b", "/srv/c"]);
        assert_eq!(state.controllers.len(), 3);
    }

    #[test]
    fn add_error_log_stores_and_merges() {
        let store = app_store();
        store.dispatch(Action::AddErrorLog {
            path: "/srv/b".to_owned(),
            log: log_with("B", "2024-01-02 00:00"),
        });
        store.dispatch(Action::AddErrorLog {
            path: "/srv/a".to_owned(),
            log: log_with("A", "2024-01-01 00:00"),
        });

        let state = store.state();
        assert_eq!(state.logs.len(), 2);
        assert_eq!(state.global_log.len(), 2);
        assert_eq!(state.global_log[0].device, "A");
        assert_eq!(state.global_log[1].device, "B");
    }

    #[test]
    fn set_progress_replaces_the_pair() {
        let store = app_store();
        store.dispatch(Action::SetProgress { value: -1, max: 1 });
        assert!(store.state().progress.is_indeterminate());

        store.dispatch(Action::SetProgress { value: 4, max: 4 });
        let progress = store.state().progress;
        assert_eq!(progress, Progress { value: 4, max: 4 });
        assert!(progress.is_complete());
    }
}
