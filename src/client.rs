//! Request layer between the screen and a [`DataSource`].
//!
//! Every operation runs on its own worker thread and reports back over a
//! channel, so the UI loop never blocks on the network. A write may name the
//! reads it makes stale; those are re-issued once the write succeeds.
//!
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

use crate::gql::{DataSource, FetchError, ReadOp, User, UserListView, WriteOp};

/// Monotonically increasing id of an issued request.
pub type RequestId = u64;

/// Outcome of a request, delivered on the client's channel.
#[derive(Debug)]
pub enum ClientEvent {
    Read {
        id: RequestId,
        op: ReadOp,
        result: Result<UserListView, FetchError>,
    },
    Write {
        id: RequestId,
        op: WriteOp,
        result: Result<Vec<User>, FetchError>,
    },
}

/// Shared by the client and its workers so refetches get fresh ids.
struct Dispatcher {
    source: Arc<dyn DataSource>,
    next_id: AtomicU64,
    tx: Sender<ClientEvent>,
}

impl Dispatcher {
    fn issue_read(self: &Arc<Self>, op: ReadOp) -> RequestId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        tracing::debug!(id, ?op, "issuing read");
        std::thread::spawn(move || {
            let result = source.read(op);
            // Receiver gone means the app is shutting down.
            let _ = tx.send(ClientEvent::Read { id, op, result });
        });
        id
    }

    fn issue_write(self: &Arc<Self>, op: WriteOp, refetch_queries: Vec<ReadOp>) -> RequestId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let this = Arc::clone(self);
        tracing::debug!(id, ?op, ?refetch_queries, "issuing write");
        std::thread::spawn(move || {
            let result = this.source.write(op);
            let succeeded = result.is_ok();
            if let Err(err) = &result {
                tracing::warn!(id, ?op, error = %err, "write failed");
            }
            let _ = this.tx.send(ClientEvent::Write { id, op, result });
            if succeeded {
                for read in refetch_queries {
                    this.issue_read(read);
                }
            }
        });
        id
    }
}

pub struct QueryClient {
    dispatcher: Arc<Dispatcher>,
    rx: Receiver<ClientEvent>,
}

impl QueryClient {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            dispatcher: Arc::new(Dispatcher {
                source,
                next_id: AtomicU64::new(1),
                tx,
            }),
            rx,
        }
    }

    /// Issue a read. The result arrives as [`ClientEvent::Read`].
    pub fn query(&self, op: ReadOp) -> RequestId {
        self.dispatcher.issue_read(op)
    }

    /// Issue a write; on success every op in `refetch_queries` is re-read.
    pub fn mutate(&self, op: WriteOp, refetch_queries: Vec<ReadOp>) -> RequestId {
        self.dispatcher.issue_write(op, refetch_queries)
    }

    /// Next finished request, if any, without blocking.
    pub fn try_next(&self) -> Option<ClientEvent> {
        match self.rx.try_recv() {
            Ok(ev) => Some(ev),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Wait up to `timeout` for the next finished request.
    pub fn next_timeout(&self, timeout: Duration) -> Option<ClientEvent> {
        match self.rx.recv_timeout(timeout) {
            Ok(ev) => Some(ev),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}
