//! Bounded crawl frontier
//!
//! A FIFO of pending URLs shared by all workers of one crawl job. Capacity
//! is enforced by dropping, never by blocking the producer, and the drain
//! state is tracked with an explicit in-flight counter rather than by
//! sampling the queue length: a URL counts from the moment it is accepted
//! until the worker that dequeued it has finished processing it, so the
//! frontier is only "drained" when nothing is queued *and* nothing is still
//! being worked on.
//!
//! Closing is reserved for the termination coordinator; workers only ever
//! enqueue, dequeue, and complete.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::mpsc;

/// Bounded pending-URL queue with in-flight accounting
pub struct Frontier {
    sender: Mutex<Option<mpsc::Sender<String>>>,
    receiver: tokio::sync::Mutex<mpsc::Receiver<String>>,
    in_flight: AtomicUsize,
    closed: AtomicBool,
}

impl Frontier {
    /// Creates a frontier holding at most `capacity` pending URLs
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity);
        Self {
            sender: Mutex::new(Some(sender)),
            receiver: tokio::sync::Mutex::new(receiver),
            in_flight: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Offers a URL to the frontier
    ///
    /// Returns false without blocking when the frontier is full or closed;
    /// the URL is simply dropped in that case.
    pub fn push(&self, url: String) -> bool {
        if self.closed.load(Ordering::Acquire) {
            return false;
        }

        let sender = match self.sender.lock().unwrap().clone() {
            Some(sender) => sender,
            None => return false,
        };

        match sender.try_send(url) {
            Ok(()) => {
                self.in_flight.fetch_add(1, Ordering::AcqRel);
                true
            }
            Err(_) => false,
        }
    }

    /// Takes the next pending URL, suspending while the frontier is empty
    ///
    /// Returns None once the frontier has been closed and emptied.
    pub async fn pop(&self) -> Option<String> {
        self.receiver.lock().await.recv().await
    }

    /// Marks one dequeued URL as fully processed
    ///
    /// Returns true when this completion drained the frontier (no pending
    /// URLs, no in-flight work).
    pub fn complete(&self) -> bool {
        self.in_flight.fetch_sub(1, Ordering::AcqRel) == 1
    }

    /// Closes the frontier: pending dequeues unblock, later pushes drop
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.sender.lock().unwrap().take();
    }

    /// Whether [`close`](Self::close) has been called
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Number of URLs accepted but not yet fully processed
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }
}
