use crate::response::Reply;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

struct Slot {
    reply: Reply,
    // Still waiting for the handler. Cleared by the first write of either flow.
    pending: bool,
}

/// The per-request slot the handler and the middleware steps share.
///
/// The slot is pending from creation, which is when the handler is invoked. A `set` issued while the handler
/// is still running takes the slot, and the handler's result is then dropped.
///
/// The slot lock is never held across an `.await`.
pub(crate) struct ResponseCell {
    slot: Mutex<Slot>,
    ready: watch::Sender<bool>,
}

impl ResponseCell {
    pub(crate) fn new() -> ResponseCell {
        let (ready, _) = watch::channel(false);
        ResponseCell {
            slot: Mutex::new(Slot {
                reply: Reply::Absent,
                pending: true,
            }),
            ready,
        }
    }

    /// Stores the handler's result unless a step has replaced the reply already, then fires the ready signal.
    pub(crate) fn fill(&self, reply: Reply) {
        {
            let mut slot = self.lock();
            if slot.pending {
                slot.reply = reply;
                slot.pending = false;
            }
        }
        self.ready.send_replace(true);
    }

    pub(crate) fn overwrite(&self, reply: Reply) {
        let mut slot = self.lock();
        slot.reply = reply;
        slot.pending = false;
    }

    pub(crate) async fn wait_ready(&self) {
        let mut rx = self.ready.subscribe();
        // The sender lives as long as `self`, so the channel cannot close here.
        let _ = rx.wait_for(|ready| *ready).await;
    }

    pub(crate) fn snapshot(&self) -> Reply {
        self.lock().reply.clone()
    }

    pub(crate) fn take(&self) -> Reply {
        std::mem::take(&mut self.lock().reply)
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
