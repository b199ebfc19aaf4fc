//! [`Gateway`] — asynchronous dispatch of store operations.
//!
//! Every store operation has an async counterpart here: the call is boxed
//! as a job, queued, and picked up by one of a fixed number of worker
//! tasks. The caller gets an [`OpHandle`] back — a future resolving to the
//! operation's result or failure. Overflow queues; the pool never grows.
//!
//! Ordering between two independently issued calls is not guaranteed; a
//! caller that needs ordering awaits the first handle before issuing the
//! second. Dropping a handle discards the result but never aborts the
//! operation.

use std::{
  future::Future,
  pin::Pin,
  sync::Arc,
  task::{Context, Poll},
  time::Duration,
};

use tokio::{
  sync::{Mutex, mpsc, oneshot},
  task::JoinHandle,
  time::{Instant, timeout},
};
use vitae_core::{NewResume, Resume, ResumeId, ResumeStore};

use crate::{
  config::ServiceConfig,
  error::Error,
  view::{ViewHandle, ViewOp, spawn_view},
};

type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
type Job = Box<dyn FnOnce() -> BoxFuture + Send>;

// ─── Gateway ─────────────────────────────────────────────────────────────────

/// Dispatches store operations onto a worker pool and keeps the
/// [synchronized view](crate::view) up to date as they complete.
///
/// Create one per process, share it across the UI, and call
/// [`shutdown`](Gateway::shutdown) exactly once at teardown.
pub struct Gateway<S> {
  store:            Arc<S>,
  jobs:             mpsc::UnboundedSender<Job>,
  view:             ViewHandle,
  view_ops:         mpsc::UnboundedSender<ViewOp>,
  workers:          Vec<JoinHandle<()>>,
  view_task:        JoinHandle<()>,
  shutdown_timeout: Duration,
}

impl<S> Gateway<S>
where
  S: ResumeStore + 'static,
{
  /// Spawn the worker pool and the view apply task around `store`.
  pub fn new(store: S, config: &ServiceConfig) -> Self {
    let (jobs_tx, jobs_rx) = mpsc::unbounded_channel::<Job>();
    let jobs_rx = Arc::new(Mutex::new(jobs_rx));

    let workers = (0..config.workers.max(1))
      .map(|n| {
        let rx = Arc::clone(&jobs_rx);
        tokio::spawn(async move {
          loop {
            // Hold the queue lock only while waiting, never while a job
            // runs, so jobs overlap up to the pool size.
            let job = { rx.lock().await.recv().await };
            match job {
              Some(job) => job().await,
              None => break,
            }
          }
          tracing::debug!(worker = n, "gateway worker stopped");
        })
      })
      .collect();

    let (view, view_ops, view_task) = spawn_view();

    Self {
      store: Arc::new(store),
      jobs: jobs_tx,
      view,
      view_ops,
      workers,
      view_task,
      shutdown_timeout: Duration::from_secs(config.shutdown_timeout_secs),
    }
  }

  /// A read handle onto the live mirror. Cheap to clone and hand to every
  /// UI component.
  pub fn view(&self) -> ViewHandle { self.view.clone() }

  // ── Async store operations ────────────────────────────────────────────────

  /// Persist a new résumé; appends it to the view on success.
  pub fn save(&self, resume: NewResume) -> OpHandle<Resume, S::Error> {
    let store = Arc::clone(&self.store);
    let view_ops = self.view_ops.clone();
    self.dispatch(move |done| {
      Box::new(move || {
        Box::pin(async move {
          let result = store.save(resume).await;
          if let Ok(saved) = &result {
            let _ = view_ops.send(ViewOp::Append(saved.clone()));
          }
          let _ = done.send(result.map_err(Error::Store));
        })
      })
    })
  }

  /// Re-persist an existing résumé; replaces its view entry on success.
  pub fn update(&self, resume: Resume) -> OpHandle<Resume, S::Error> {
    let store = Arc::clone(&self.store);
    let view_ops = self.view_ops.clone();
    self.dispatch(move |done| {
      Box::new(move || {
        Box::pin(async move {
          let result = store.update(resume).await;
          if let Ok(updated) = &result {
            let _ = view_ops.send(ViewOp::Replace(updated.clone()));
          }
          let _ = done.send(result.map_err(Error::Store));
        })
      })
    })
  }

  /// Delete a résumé; removes its view entry on success.
  pub fn delete(&self, id: ResumeId) -> OpHandle<(), S::Error> {
    let store = Arc::clone(&self.store);
    let view_ops = self.view_ops.clone();
    self.dispatch(move |done| {
      Box::new(move || {
        Box::pin(async move {
          let result = store.delete(id).await;
          if result.is_ok() {
            let _ = view_ops.send(ViewOp::Remove(id));
          }
          let _ = done.send(result.map_err(Error::Store));
        })
      })
    })
  }

  pub fn find_by_id(&self, id: ResumeId) -> OpHandle<Option<Resume>, S::Error> {
    let store = Arc::clone(&self.store);
    self.dispatch(move |done| {
      Box::new(move || {
        Box::pin(async move {
          let _ = done.send(store.find_by_id(id).await.map_err(Error::Store));
        })
      })
    })
  }

  pub fn find_all(&self) -> OpHandle<Vec<Resume>, S::Error> {
    let store = Arc::clone(&self.store);
    self.dispatch(move |done| {
      Box::new(move || {
        Box::pin(async move {
          let _ = done.send(store.find_all().await.map_err(Error::Store));
        })
      })
    })
  }

  pub fn search_by_name(
    &self,
    needle: impl Into<String>,
  ) -> OpHandle<Vec<Resume>, S::Error> {
    let needle = needle.into();
    let store = Arc::clone(&self.store);
    self.dispatch(move |done| {
      Box::new(move || {
        Box::pin(async move {
          let _ =
            done.send(store.search_by_name(&needle).await.map_err(Error::Store));
        })
      })
    })
  }

  /// Reconcile the view: bulk-replace its contents with a fresh
  /// [`find_all`](ResumeStore::find_all) result.
  pub fn refresh_view(&self) -> OpHandle<(), S::Error> {
    let store = Arc::clone(&self.store);
    let view_ops = self.view_ops.clone();
    self.dispatch(move |done| {
      Box::new(move || {
        Box::pin(async move {
          match store.find_all().await {
            Ok(all) => {
              let _ = view_ops.send(ViewOp::ReplaceAll(all));
              let _ = done.send(Ok(()));
            }
            Err(e) => {
              let _ = done.send(Err(Error::Store(e)));
            }
          }
        })
      })
    })
  }

  // ── Teardown ──────────────────────────────────────────────────────────────

  /// Stop accepting work, wait (bounded by the configured timeout) for
  /// in-flight and queued jobs, cancel stragglers, then stop the view
  /// apply task. Handles of cancelled jobs resolve to
  /// [`Error::Cancelled`].
  pub async fn shutdown(self) {
    let Self { jobs, view_ops, workers, view_task, shutdown_timeout, .. } =
      self;

    // Closing the queue lets workers drain what is already enqueued and
    // then exit on their own.
    drop(jobs);

    let deadline = Instant::now() + shutdown_timeout;
    for worker in workers {
      let abort = worker.abort_handle();
      let remaining = deadline.saturating_duration_since(Instant::now());
      if timeout(remaining, worker).await.is_err() {
        tracing::warn!("worker still busy at shutdown deadline; cancelling");
        abort.abort();
      }
    }

    // No worker is left to produce view ops; the apply task drains its
    // mailbox and stops.
    drop(view_ops);
    let _ = view_task.await;

    tracing::debug!("gateway shut down");
  }

  /// Abort the worker pool and wait for it to die, closing the job queue
  /// from the receiving side.
  #[cfg(test)]
  pub(crate) async fn halt_workers(&mut self) {
    for worker in &mut self.workers {
      worker.abort();
      let _ = worker.await;
    }
  }

  fn dispatch<T, F>(&self, make: F) -> OpHandle<T, S::Error>
  where
    T: Send + 'static,
    F: FnOnce(oneshot::Sender<Result<T, Error<S::Error>>>) -> Job,
  {
    let (done_tx, done_rx) = oneshot::channel();
    match self.jobs.send(make(done_tx)) {
      Ok(()) => OpHandle { state: HandleState::Pending(done_rx) },
      Err(_) => {
        OpHandle { state: HandleState::Rejected(Some(Error::Shutdown)) }
      }
    }
  }
}

// ─── OpHandle ────────────────────────────────────────────────────────────────

/// The awaitable result of one dispatched operation.
///
/// Dropping the handle discards the result; the operation itself still runs
/// to completion.
#[derive(Debug)]
pub struct OpHandle<T, E>
where
  E: std::error::Error + Send + Sync + 'static,
{
  state: HandleState<T, E>,
}

#[derive(Debug)]
enum HandleState<T, E>
where
  E: std::error::Error + Send + Sync + 'static,
{
  Pending(oneshot::Receiver<Result<T, Error<E>>>),
  Rejected(Option<Error<E>>),
}

// Nothing is structurally pinned; `poll` reaches the state through a plain
// mutable reference.
impl<T, E> Unpin for OpHandle<T, E> where
  E: std::error::Error + Send + Sync + 'static
{
}

impl<T, E> Future for OpHandle<T, E>
where
  E: std::error::Error + Send + Sync + 'static,
{
  type Output = Result<T, Error<E>>;

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    match &mut self.get_mut().state {
      HandleState::Pending(rx) => {
        Pin::new(rx).poll(cx).map(|received| match received {
          Ok(result) => result,
          // The worker dropped the reply channel without answering.
          Err(_) => Err(Error::Cancelled),
        })
      }
      HandleState::Rejected(slot) => {
        Poll::Ready(Err(slot.take().unwrap_or(Error::Shutdown)))
      }
    }
  }
}
