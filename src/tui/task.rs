// Async call plumbing for views
//
// Task<T> is the observable state of one outstanding call:
//
//   [Initial] ──begin──▶ [Pending] ──resolve(gen == latest)──▶ [Complete | Error]
//                            ▲                                        │
//                            └────────────────begin───────────────────┘
//
// Every begin() bumps a generation counter and aborts the previous call's
// task, so a superseded response can never overwrite a newer one. If an
// aborted call had already finished and queued its message, resolve() drops
// it by generation.
//
// Remote<M> spawns the actual calls. A view holds a Remote typed with its own
// message enum; map() lifts it into the parent's message type, so finished
// calls arrive at the event loop already addressed to the right view.

use super::events::Message;
use crate::client::CallError;
use crate::posts::PostsZome;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// State of a view's current call
#[derive(Debug, Clone, PartialEq)]
pub enum TaskStatus<T> {
    /// Never started
    Initial,
    /// Call outstanding
    Pending,
    /// Call succeeded
    Complete(T),
    /// Call failed
    Error(CallError),
}

/// One-call-at-a-time state holder with stale-result protection
#[derive(Debug)]
pub struct Task<T> {
    status: TaskStatus<T>,
    generation: u64,
    handle: Option<AbortHandle>,
}

impl<T> Task<T> {
    pub fn new() -> Self {
        Self {
            status: TaskStatus::Initial,
            generation: 0,
            handle: None,
        }
    }

    pub fn status(&self) -> &TaskStatus<T> {
        &self.status
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status, TaskStatus::Pending)
    }

    /// Value of the last successful call, if the latest call succeeded
    pub fn value(&self) -> Option<&T> {
        match &self.status {
            TaskStatus::Complete(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&CallError> {
        match &self.status {
            TaskStatus::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Start a new call, superseding any outstanding one
    ///
    /// Returns the generation the caller must hand back to `resolve`.
    pub fn begin(&mut self) -> u64 {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self.generation += 1;
        self.status = TaskStatus::Pending;
        self.generation
    }

    /// Remember the spawned call so a later `begin` can abort it
    pub fn track(&mut self, handle: AbortHandle) {
        self.handle = Some(handle);
    }

    /// Apply a finished call's result
    ///
    /// Returns false (and changes nothing) if a newer call has been started since.
    pub fn resolve(&mut self, generation: u64, result: Result<T, CallError>) -> bool {
        if generation != self.generation {
            tracing::debug!(
                "dropping stale result (generation {} < {})",
                generation,
                self.generation
            );
            return false;
        }

        self.handle = None;
        self.status = match result {
            Ok(value) => TaskStatus::Complete(value),
            Err(err) => TaskStatus::Error(err),
        };
        true
    }

    /// Stop caring about the outstanding call
    ///
    /// A pending task goes back to `Initial`; a finished one keeps its result.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        // Any late message will no longer match
        self.generation += 1;
        if self.is_pending() {
            self.status = TaskStatus::Initial;
        }
    }
}

impl<T> Default for Task<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts calls in flight; decremented when the spawned task ends or is aborted
#[derive(Debug, Clone, Default)]
pub struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn enter(&self) -> InFlightGuard {
        self.0.fetch_add(1, Ordering::SeqCst);
        InFlightGuard(self.0.clone())
    }
}

struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

type Wrap<M> = Arc<dyn Fn(M) -> Message + Send + Sync>;

/// Spawns backend calls on behalf of one view
pub struct Remote<M> {
    zome: PostsZome,
    tx: mpsc::UnboundedSender<Message>,
    in_flight: InFlight,
    wrap: Wrap<M>,
}

impl<M> Clone for Remote<M> {
    fn clone(&self) -> Self {
        Self {
            zome: self.zome.clone(),
            tx: self.tx.clone(),
            in_flight: self.in_flight.clone(),
            wrap: self.wrap.clone(),
        }
    }
}

impl Remote<Message> {
    /// Root handle owned by the shell
    pub fn root(zome: PostsZome, tx: mpsc::UnboundedSender<Message>, in_flight: InFlight) -> Self {
        Self {
            zome,
            tx,
            in_flight,
            wrap: Arc::new(|msg| msg),
        }
    }
}

impl<M: 'static> Remote<M> {
    /// Handle for a child view whose messages wrap into ours
    pub fn map<N: 'static>(&self, f: impl Fn(N) -> M + Send + Sync + 'static) -> Remote<N> {
        let outer = self.wrap.clone();
        Remote {
            zome: self.zome.clone(),
            tx: self.tx.clone(),
            in_flight: self.in_flight.clone(),
            wrap: Arc::new(move |msg| outer(f(msg))),
        }
    }

    /// Spawn a call; its output is turned into a message for this view
    ///
    /// `make` receives a clone of the zome handle and builds the call future.
    pub fn call<Fut, T, F, I>(&self, make: F, into: I) -> AbortHandle
    where
        F: FnOnce(PostsZome) -> Fut,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
        I: FnOnce(T) -> M + Send + 'static,
    {
        let future = make(self.zome.clone());
        let tx = self.tx.clone();
        let wrap = self.wrap.clone();
        let guard = self.in_flight.enter();

        let handle = tokio::spawn(async move {
            let output = future.await;
            // Receiver gone means the UI is shutting down
            let _ = tx.send(wrap(into(output)));
            drop(guard);
        });
        handle.abort_handle()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MemoryConductor;
    use crate::posts::Post;
    use crate::tui::events::CreateMsg;
    use std::time::Duration;

    #[test]
    fn test_begin_resolve_complete() {
        let mut task: Task<u32> = Task::new();
        assert_eq!(task.status(), &TaskStatus::Initial);

        let generation = task.begin();
        assert!(task.is_pending());
        assert!(task.resolve(generation, Ok(7)));
        assert_eq!(task.value(), Some(&7));
    }

    #[test]
    fn test_stale_result_is_dropped() {
        let mut task: Task<&str> = Task::new();
        let first = task.begin();
        let second = task.begin();

        // Second call resolves first, then the superseded one arrives late
        assert!(task.resolve(second, Ok("new")));
        assert!(!task.resolve(first, Ok("old")));
        assert_eq!(task.value(), Some(&"new"));
    }

    #[test]
    fn test_error_then_retry() {
        let mut task: Task<u32> = Task::new();
        let generation = task.begin();
        task.resolve(generation, Err(CallError::remote("x", "boom")));
        assert_eq!(task.error().map(|e| e.message()), Some("boom"));

        let generation = task.begin();
        assert!(task.resolve(generation, Ok(1)));
        assert!(task.error().is_none());
    }

    #[test]
    fn test_cancel_invalidates_outstanding_call() {
        let mut task: Task<u32> = Task::new();
        let generation = task.begin();
        task.cancel();
        assert_eq!(task.status(), &TaskStatus::Initial);
        assert!(!task.resolve(generation, Ok(1)));
    }

    #[test]
    fn test_cancel_keeps_finished_result() {
        let mut task: Task<u32> = Task::new();
        let generation = task.begin();
        task.resolve(generation, Ok(3));
        task.cancel();
        assert_eq!(task.value(), Some(&3));
    }

    #[tokio::test]
    async fn test_remote_delivers_wrapped_message() {
        let conductor = MemoryConductor::new();
        let zome = PostsZome::new(Arc::new(conductor), "forum", "posts");
        let (tx, mut rx) = mpsc::unbounded_channel();
        let in_flight = InFlight::default();
        let root = Remote::root(zome, tx, in_flight.clone());
        let remote: Remote<CreateMsg> = root.map(Message::Create);

        remote.call(
            |zome| async move { zome.create_post(&Post::new("t", "c")).await },
            CreateMsg::Created,
        );

        match rx.recv().await {
            Some(Message::Create(CreateMsg::Created(Ok(record)))) => {
                assert_eq!(record.decode_entry::<Post>().unwrap().title, "t");
            }
            other => panic!("unexpected message: {:?}", other),
        }
        // Guard drops right after the send
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(in_flight.count(), 0);
    }

    #[tokio::test]
    async fn test_aborted_call_releases_in_flight() {
        let conductor = MemoryConductor::new().with_latency(Duration::from_secs(60));
        let zome = PostsZome::new(Arc::new(conductor), "forum", "posts");
        let (tx, mut rx) = mpsc::unbounded_channel();
        let in_flight = InFlight::default();
        let root = Remote::root(zome, tx, in_flight.clone());
        let remote: Remote<CreateMsg> = root.map(Message::Create);

        let handle = remote.call(
            |zome| async move { zome.create_post(&Post::new("t", "c")).await },
            CreateMsg::Created,
        );
        assert_eq!(in_flight.count(), 1);

        handle.abort();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(in_flight.count(), 0);
        assert!(rx.try_recv().is_err());
    }
}
