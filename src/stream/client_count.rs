// SPDX-License-Identifier: GPL-3.0-or-later
use futures::task::{AtomicWaker, Context, Poll};
use futures::Future;

use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct InnerCount {
    count: AtomicUsize,
    waker: AtomicWaker,
}

/// A shared count of connected stream clients.
///
/// Every connection holds a [ClientToken]; dropping the token (including via
/// a transport error tearing down the response body) decrements the count, so
/// the count can never leak past the connection that owns it.
#[derive(Clone, Debug, Default)]
pub(crate) struct ClientCounter(Arc<InnerCount>);

impl ClientCounter {
    /// Return a [ClientToken], incrementing the count until it is dropped.
    pub(crate) fn token(&self) -> ClientToken {
        ClientToken::new(self)
    }

    /// The number of currently connected clients.
    pub(crate) fn count(&self) -> usize {
        self.0.count.load(Ordering::Acquire)
    }

    /// Wait until at least one client is connected.
    ///
    /// Resolves immediately with the current count if it is already positive.
    pub(crate) fn wait_for_clients(&self) -> WaitForClients {
        WaitForClients(self.clone())
    }
}

#[derive(Debug)]
pub(crate) struct WaitForClients(ClientCounter);

impl Future for WaitForClients {
    type Output = usize;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let count = self.0.count();
        if count > 0 {
            return Poll::Ready(count);
        }
        // Register, then check again in case a client connected between the
        // first check and the registration.
        (self.0).0.waker.register(cx.waker());
        match self.0.count() {
            0 => Poll::Pending,
            n => Poll::Ready(n),
        }
    }
}

#[derive(Debug)]
pub(crate) struct ClientToken {
    counter: Arc<InnerCount>,
}

impl ClientToken {
    fn new(counter: &ClientCounter) -> Self {
        let counter = Arc::clone(&counter.0);
        let old_count = counter.count.fetch_add(1, Ordering::AcqRel);
        if old_count == usize::MAX {
            panic!("Client count has overflowed");
        }
        counter.waker.wake();
        Self { counter }
    }
}

impl Drop for ClientToken {
    fn drop(&mut self) {
        let old_count = self.counter.count.fetch_sub(1, Ordering::AcqRel);
        if old_count == usize::MIN {
            panic!("Client count has underflowed");
        }
    }
}
