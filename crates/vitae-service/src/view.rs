//! The synchronized view — a mutation-observable mirror of the store.
//!
//! A single apply task owns the collection and drains a mailbox of
//! [`ViewOp`]s, so every mutation happens on exactly one task regardless of
//! which worker completed the originating operation. Readers hold a
//! [`ViewHandle`]: snapshot to render, `changed().await` to observe.
//!
//! The view is a best-effort presentation cache, never the source of truth.
//! `Gateway::refresh_view` reconciles it against the store at any time.

use tokio::{
  sync::{mpsc, watch},
  task::JoinHandle,
};
use vitae_core::{Resume, ResumeId};

/// A single mutation applied to the mirrored collection.
#[derive(Debug, Clone)]
pub enum ViewOp {
  /// A newly saved résumé; appended at the end.
  Append(Resume),
  /// Replace the first entry with a matching id in place. No-op when the
  /// id is not mirrored — a benign divergence, not an error.
  Replace(Resume),
  /// Remove the entry with a matching id, if mirrored.
  Remove(ResumeId),
  /// Bulk-replace the whole mirror, dropping any view-only state.
  ReplaceAll(Vec<Resume>),
}

/// Read access to the mirror.
#[derive(Debug, Clone)]
pub struct ViewHandle {
  rx: watch::Receiver<Vec<Resume>>,
}

impl ViewHandle {
  /// The mirror's current contents.
  pub fn snapshot(&self) -> Vec<Resume> { self.rx.borrow().clone() }

  /// Wait until the mirror changes. Returns `false` once the apply task
  /// has stopped (after shutdown) and no further change can come.
  pub async fn changed(&mut self) -> bool { self.rx.changed().await.is_ok() }
}

/// Spawn the apply task. Returns the read handle, the mutation mailbox, and
/// the task handle so shutdown can await it.
pub(crate) fn spawn_view()
-> (ViewHandle, mpsc::UnboundedSender<ViewOp>, JoinHandle<()>) {
  let (ops_tx, mut ops_rx) = mpsc::unbounded_channel::<ViewOp>();
  let (watch_tx, watch_rx) = watch::channel(Vec::new());

  let task = tokio::spawn(async move {
    while let Some(op) = ops_rx.recv().await {
      watch_tx.send_modify(|resumes| apply(resumes, op));
    }
    tracing::debug!("view apply task stopped");
  });

  (ViewHandle { rx: watch_rx }, ops_tx, task)
}

fn apply(resumes: &mut Vec<Resume>, op: ViewOp) {
  match op {
    ViewOp::Append(resume) => resumes.push(resume),
    ViewOp::Replace(resume) => {
      if let Some(slot) = resumes.iter_mut().find(|r| r.id == resume.id) {
        *slot = resume;
      }
    }
    ViewOp::Remove(id) => {
      if let Some(index) = resumes.iter().position(|r| r.id == id) {
        resumes.remove(index);
      }
    }
    ViewOp::ReplaceAll(all) => *resumes = all,
  }
}
