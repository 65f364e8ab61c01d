// ── Generic state store ──
//
// A minimal reducer/subscriber container. One current state value; a
// dispatch runs the reducer and, when it reports a change, publishes the
// new snapshot and notifies subscribers synchronously in subscription
// order.
//
// Dispatches are serialized by a single lock held across reduce, publish
// and notify. The lock is not reentrant: observers must not dispatch or
// (un)subscribe from inside their callback.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;

type Reducer<S, A> = Box<dyn Fn(&S, &A) -> Option<S> + Send + Sync>;
type Observer<S> = Box<dyn Fn(&Arc<S>) + Send + Sync>;

struct Subscriber<S> {
    id: u64,
    observer: Observer<S>,
}

/// Reducer-driven store publishing immutable state snapshots.
///
/// The reducer returns `Some(next)` to publish a change and notify
/// subscribers, or `None` to leave the current snapshot in place without
/// notifying anyone.
pub struct Store<S, A> {
    state: ArcSwap<S>,
    reducer: Reducer<S, A>,
    subscribers: Arc<Mutex<Vec<Subscriber<S>>>>,
    next_id: AtomicU64,
}

impl<S, A> Store<S, A>
where
    S: Send + Sync + 'static,
{
    pub fn new(
        initial: S,
        reducer: impl Fn(&S, &A) -> Option<S> + Send + Sync + 'static,
    ) -> Self {
        Self {
            state: ArcSwap::from_pointee(initial),
            reducer: Box::new(reducer),
            subscribers: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(0),
        }
    }

    /// Current published snapshot. Lock-free.
    pub fn state(&self) -> Arc<S> {
        self.state.load_full()
    }

    /// Run one action through the reducer. On a reported change the new
    /// snapshot is published and every subscriber is notified before this
    /// call returns.
    pub fn dispatch(&self, action: A) {
        let subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let current = self.state.load_full();
        if let Some(next) = (self.reducer)(&current, &action) {
            let next = Arc::new(next);
            self.state.store(Arc::clone(&next));
            for subscriber in &*subscribers {
                (subscriber.observer)(&next);
            }
        }
    }

    /// Register an observer. The returned handle removes exactly that
    /// observer; dropping the handle does not unsubscribe.
    pub fn subscribe(&self, observer: impl Fn(&Arc<S>) + Send + Sync + 'static) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Subscriber {
                id,
                observer: Box::new(observer),
            });

        let subscribers = Arc::clone(&self.subscribers);
        Subscription {
            cancel: Box::new(move || {
                subscribers
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .retain(|s| s.id != id);
            }),
        }
    }
}

/// Handle returned by [`Store::subscribe`].
pub struct Subscription {
    cancel: Box<dyn Fn() + Send + Sync>,
}

impl Subscription {
    /// Remove the observer. Idempotent: further calls are no-ops.
    pub fn unsubscribe(&self) {
        (self.cancel)();
    }
}
