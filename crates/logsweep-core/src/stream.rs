// ── Reactive state stream ──

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::state::AppState;

/// An async subscription to the application state.
///
/// Combines a point-in-time snapshot with change notification: await
/// [`changed`](Self::changed) in a loop, or convert into a [`Stream`] for
/// combinator-style consumption.
pub struct StateStream {
    current: Arc<AppState>,
    receiver: watch::Receiver<Arc<AppState>>,
}

impl StateStream {
    pub(crate) fn new(receiver: watch::Receiver<Arc<AppState>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot most recently observed through this subscription.
    pub fn current(&self) -> &Arc<AppState> {
        &self.current
    }

    /// The latest published snapshot, which may be newer than
    /// [`current`](Self::current).
    pub fn latest(&self) -> Arc<AppState> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change and return the new snapshot.
    ///
    /// Returns `None` once the publishing service has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<AppState>> {
        self.receiver.changed().await.ok()?;
        let snapshot = self.receiver.borrow_and_update().clone();
        self.current = Arc::clone(&snapshot);
        Some(snapshot)
    }

    /// Convert into a [`Stream`] of snapshots. The current snapshot is
    /// yielded first, then one item per change.
    pub fn into_stream(self) -> StateWatchStream {
        StateWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// [`Stream`] adapter over the state watch channel.
pub struct StateWatchStream {
    inner: WatchStream<Arc<AppState>>,
}

impl Stream for StateWatchStream {
    type Item = Arc<AppState>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
