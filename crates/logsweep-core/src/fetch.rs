// ── Log fetch scheduling ──
//
// Admission-controlled acquisition: a cursor walks the discovered paths
// exactly once while at most `max_in_flight` reads are outstanding.
// Offline controllers advance progress without taking a slot. Completions
// arrive in any order; the device-keyed merge tolerates that.

use std::sync::Arc;

use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use tracing::warn;

use logsweep_api::HostApi;

use crate::config::ServiceConfig;
use crate::model::ErrorLog;
use crate::parse::parse_error_log;
use crate::state::{Action, AppStore};

/// Fetch every online controller's error log with bounded concurrency.
///
/// Dispatches one `AddErrorLog` per successful fetch and one progress
/// advancement per path, whether it was fetched, failed, or skipped.
pub(crate) async fn read_logs(host: &dyn HostApi, store: &AppStore, config: &ServiceConfig) {
    let state = store.state();
    let total = i32::try_from(state.paths.len()).unwrap_or(i32::MAX);
    store.dispatch(Action::SetProgress {
        value: 0,
        max: total,
    });

    let mut completed = 0;
    let mut pending = state.paths.iter();
    let mut in_flight = FuturesUnordered::new();

    loop {
        // Admit until the pool is full or the cursor is exhausted.
        while in_flight.len() < config.max_in_flight {
            let Some(path) = pending.next() else { break };
            let online = state.controllers.get(path).is_some_and(|c| c.online);
            if online {
                in_flight.push(fetch_one(host, path.clone(), config));
            } else {
                completed += 1;
                store.dispatch(Action::SetProgress {
                    value: completed,
                    max: total,
                });
            }
        }

        let Some(outcome) = in_flight.next().await else {
            break;
        };
        if let Some((path, log)) = outcome {
            store.dispatch(Action::AddErrorLog { path, log });
        }
        completed += 1;
        store.dispatch(Action::SetProgress {
            value: completed,
            max: total,
        });
    }
}

/// One admission slot: read the device's log file under the configured
/// deadline and parse it. Failures and timeouts yield `None`; the caller
/// advances progress either way.
async fn fetch_one(
    host: &dyn HostApi,
    path: String,
    config: &ServiceConfig,
) -> Option<(String, Arc<ErrorLog>)> {
    let file_path = format!("{path}/{}", config.log_file_path);
    match tokio::time::timeout(config.fetch_timeout, host.read_file(&file_path)).await {
        Ok(Ok(text)) => Some((path, Arc::new(parse_error_log(&text)))),
        Ok(Err(err)) => {
            warn!(path = %path, error = %err, "could not read error log");
            None
        }
        Err(_) => {
            warn!(
                path = %path,
                timeout_secs = config.fetch_timeout.as_secs(),
                "error log read timed out"
            );
            None
        }
    }
}
