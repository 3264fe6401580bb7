//! Page task queue
//!
//! Script-visible state is owned by the page's thread. Work that originates
//! elsewhere is posted here and runs, in order, the next time the owner
//! drains the queue.

use smol::channel::{self, Receiver, Sender, TryRecvError};

use emu_js::Realm;

use crate::EngineError;

/// Task run against the page realm on the owning thread
pub type PageTask = Box<dyn FnOnce(&mut Realm) + Send + 'static>;

/// Receiving side, held by the page
pub struct PageQueue {
    sender: Sender<PageTask>,
    receiver: Receiver<PageTask>,
}

impl PageQueue {
    pub fn new() -> Self {
        let (sender, receiver) = channel::unbounded();
        Self { sender, receiver }
    }

    /// Handle for posting tasks from any thread
    pub fn sender(&self) -> TaskSender {
        TaskSender {
            sender: self.sender.clone(),
        }
    }

    /// Number of tasks waiting
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Run every queued task in FIFO order; returns how many ran
    ///
    /// Tasks posted while draining run in the same pass.
    pub fn drain(&self, realm: &mut Realm) -> usize {
        let mut ran = 0;
        loop {
            match self.receiver.try_recv() {
                Ok(task) => {
                    task(realm);
                    ran += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        if ran > 0 {
            tracing::debug!("Ran {} page tasks", ran);
        }
        ran
    }

    /// Wait for the next task without running it
    pub async fn next(&self) -> Option<PageTask> {
        self.receiver.recv().await.ok()
    }

    /// Stop accepting tasks; queued tasks can still be drained
    pub fn close(&self) {
        self.sender.close();
    }
}

impl Default for PageQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable, `Send` handle that posts tasks to a page
#[derive(Clone)]
pub struct TaskSender {
    sender: Sender<PageTask>,
}

impl TaskSender {
    /// Queue `task` for the page's owning thread
    pub fn post(&self, task: impl FnOnce(&mut Realm) + Send + 'static) -> Result<(), EngineError> {
        self.sender
            .try_send(Box::new(task))
            .map_err(|_| EngineError::PageClosed)
    }

    /// Async variant of [`post`](Self::post)
    pub async fn post_async(&self, task: impl FnOnce(&mut Realm) + Send + 'static) -> Result<(), EngineError> {
        self.sender
            .send(Box::new(task))
            .await
            .map_err(|_| EngineError::PageClosed)
    }
}
