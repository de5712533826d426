//! Completion callbacks for set-pin, open and initialize flows
//!
//! A flow reports to two paths: the primary `done` path once the session is
//! ready, and the `tx_done` path once the first history sync finished. A
//! failure is delivered to every registered path.

use coinspace_core::{CanonicalTransaction, Error, Result};
use tokio::sync::oneshot;

type DoneFn = Box<dyn FnOnce(Result<()>) + Send>;
type TxDoneFn = Box<dyn FnOnce(Result<Vec<CanonicalTransaction>>) + Send>;

/// Callbacks registered for one flow
#[derive(Default)]
pub struct Completion {
    done: Option<DoneFn>,
    tx_done: Option<TxDoneFn>,
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("done", &self.done.is_some())
            .field("tx_done", &self.tx_done.is_some())
            .finish()
    }
}

/// Receiving halves of [`Completion::channels`]
pub struct CompletionReceivers {
    /// Primary completion
    pub done: oneshot::Receiver<Result<()>>,
    /// Transaction-sync completion
    pub tx_done: oneshot::Receiver<Result<Vec<CanonicalTransaction>>>,
}

impl Completion {
    /// No callbacks
    pub fn none() -> Self {
        Self::default()
    }

    /// Set the primary completion
    pub fn on_done(mut self, f: impl FnOnce(Result<()>) + Send + 'static) -> Self {
        self.done = Some(Box::new(f));
        self
    }

    /// Set the transaction-sync completion
    pub fn on_tx_done(
        mut self,
        f: impl FnOnce(Result<Vec<CanonicalTransaction>>) + Send + 'static,
    ) -> Self {
        self.tx_done = Some(Box::new(f));
        self
    }

    /// Completion that forwards both paths to oneshot channels
    pub fn channels() -> (Self, CompletionReceivers) {
        let (done_tx, done) = oneshot::channel();
        let (tx_done_tx, tx_done) = oneshot::channel();
        let completion = Self::none()
            .on_done(move |result| {
                let _ = done_tx.send(result);
            })
            .on_tx_done(move |result| {
                let _ = tx_done_tx.send(result);
            });
        (completion, CompletionReceivers { done, tx_done })
    }

    pub(crate) fn done(&mut self, result: Result<()>) {
        if let Some(f) = self.done.take() {
            f(result);
        }
    }

    pub(crate) fn tx_done(&mut self, result: Result<Vec<CanonicalTransaction>>) {
        if let Some(f) = self.tx_done.take() {
            f(result);
        }
    }

    /// Deliver `err` to every path that has not fired yet, and hand it back
    pub(crate) fn fail(mut self, err: Error) -> Error {
        self.done(Err(err.clone()));
        self.tx_done(Err(err.clone()));
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fail_reaches_both_paths() {
        let (completion, rx) = Completion::channels();
        let err = completion.fail(Error::Auth("rejected".to_string()));

        assert_eq!(err, Error::Auth("rejected".to_string()));
        assert_eq!(rx.done.await.unwrap(), Err(err.clone()));
        assert_eq!(rx.tx_done.await.unwrap(), Err(err));
    }

    #[tokio::test]
    async fn test_fail_after_done_only_reaches_tx_path() {
        let (mut completion, rx) = Completion::channels();
        completion.done(Ok(()));
        completion.fail(Error::Transport("offline".to_string()));

        assert_eq!(rx.done.await.unwrap(), Ok(()));
        assert!(matches!(rx.tx_done.await.unwrap(), Err(Error::Transport(_))));
    }

    #[test]
    fn test_none_is_silent() {
        let err = Completion::none().fail(Error::NoSession);
        assert_eq!(err, Error::NoSession);
    }
}
