use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Runs work concurrently across chats and in arrival order within a chat.
///
/// Each chat keeps a completion signal for its most recently queued job; a
/// new job waits on that signal before running. A slow job therefore holds
/// up only later jobs for the same chat.
#[derive(Default)]
pub struct ChatQueue {
    /// chat_id -> (job sequence, done signal of the last queued job)
    tails: DashMap<i64, (u64, oneshot::Receiver<()>)>,
    next_seq: AtomicU64,
}

impl ChatQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run<F>(self: &Arc<Self>, chat_id: i64, work: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let (done_tx, done_rx) = oneshot::channel();
        let previous = self.tails.insert(chat_id, (seq, done_rx)).map(|(_, rx)| rx);

        let queue = Arc::clone(self);
        tokio::spawn(async move {
            // Err means the previous job panicked; the chat moves on regardless
            if let Some(previous) = previous {
                let _ = previous.await;
            }
            work.await;
            let _ = done_tx.send(());
            queue.tails.remove_if(&chat_id, |_, (tail, _)| *tail == seq);
        })
    }

    /// Chats with a job queued or running.
    pub fn active_chats(&self) -> usize {
        self.tails.len()
    }
}
