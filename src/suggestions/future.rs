use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use crate::core::error::{Error, ErrorKind, Result};
use crate::suggestions::types::SuggestionsList;

/// Producer half of a [`SuggestionFuture`]
pub struct SuggestionSender {
    tx: oneshot::Sender<Result<SuggestionsList>>,
}

impl SuggestionSender {
    /// True once the requester dropped its handle.
    pub fn is_abandoned(&self) -> bool {
        self.tx.is_closed()
    }

    /// Deliver the result. Returns false if nobody is waiting any more.
    pub fn send(self, result: Result<SuggestionsList>) -> bool {
        self.tx.send(result).is_ok()
    }
}

/// Single-resolution handle to a suggestion search running elsewhere.
///
/// Dropping the handle abandons the request; its result is then thrown
/// away instead of delivered.
#[must_use = "dropping a SuggestionFuture abandons the request"]
pub struct SuggestionFuture {
    rx: oneshot::Receiver<Result<SuggestionsList>>,
}

impl SuggestionFuture {
    pub fn channel() -> (SuggestionSender, SuggestionFuture) {
        let (tx, rx) = oneshot::channel();
        (SuggestionSender { tx }, SuggestionFuture { rx })
    }

    /// Already resolved handle.
    pub fn ready(result: Result<SuggestionsList>) -> Self {
        let (tx, future) = Self::channel();
        tx.send(result);
        future
    }

    /// Block the current thread until the result arrives. Must not be
    /// called from inside an async runtime; await the future there.
    pub fn wait(self) -> Result<SuggestionsList> {
        self.rx.blocking_recv().unwrap_or_else(|_| Err(worker_gone()))
    }
}

impl Future for SuggestionFuture {
    type Output = Result<SuggestionsList>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or_else(|_| Err(worker_gone())))
    }
}

fn worker_gone() -> Error {
    Error::new(ErrorKind::Cancelled, "Suggestion search ended without a result".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_future_resolves_immediately() {
        let list = SuggestionFuture::ready(Ok(Vec::new())).wait().unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn dropped_sender_resolves_as_cancelled() {
        let (tx, future) = SuggestionFuture::channel();
        drop(tx);
        assert_eq!(future.wait().unwrap_err().kind, ErrorKind::Cancelled);
    }

    #[test]
    fn sender_sees_abandoned_handle() {
        let (tx, future) = SuggestionFuture::channel();
        assert!(!tx.is_abandoned());
        drop(future);
        assert!(tx.is_abandoned());
        assert!(!tx.send(Ok(Vec::new())));
    }

    #[tokio::test]
    async fn awaits_result_from_another_thread() {
        let (tx, future) = SuggestionFuture::channel();
        std::thread::spawn(move || {
            tx.send(Ok(Vec::new()));
        });
        assert!(future.await.unwrap().is_empty());
    }
}
