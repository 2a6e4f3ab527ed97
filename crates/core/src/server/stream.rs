//! Payload stream adapter.
//!
//! Wraps the file byte stream handed to the HTTP body so the package status
//! reaches a terminal value however the transfer ends: a clean end of stream
//! is a successful install hand-off, a read error is a failure, and dropping
//! the stream before exhaustion (client disconnect) is a failure too.

use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Bytes;
use futures::Stream;

use crate::installer::{InstallOutcome, InstallerStatus, StatusHandle};
use crate::metrics::PAYLOADS_SERVED;

pub(crate) struct PayloadStream<S> {
    inner: S,
    status: StatusHandle,
    finished: bool,
}

impl<S> PayloadStream<S> {
    pub(crate) fn new(inner: S, status: StatusHandle) -> Self {
        Self {
            inner,
            status,
            finished: false,
        }
    }

    fn finish(&mut self, outcome: InstallOutcome) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.status.advance(InstallerStatus::Completed { outcome });
        let result = match outcome {
            InstallOutcome::Success => "success",
            InstallOutcome::Failure => "failure",
        };
        PAYLOADS_SERVED.with_label_values(&[result]).inc();
    }
}

impl<S> Stream for PayloadStream<S>
where
    S: Stream<Item = std::io::Result<Bytes>> + Unpin,
{
    type Item = std::io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Some(Ok(chunk))) => Poll::Ready(Some(Ok(chunk))),
            Poll::Ready(Some(Err(e))) => {
                tracing::warn!(error = %e, "payload stream failed mid-transfer");
                this.finish(InstallOutcome::Failure);
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                this.finish(InstallOutcome::Success);
                Poll::Ready(None)
            }
        }
    }
}

impl<S> Drop for PayloadStream<S> {
    fn drop(&mut self) {
        // Stream dropped before exhaustion: the client went away.
        self.finish(InstallOutcome::Failure);
    }
}
