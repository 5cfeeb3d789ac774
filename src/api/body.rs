use std::{
    io,
    pin::Pin,
    task::{Context, Poll},
};

use bytes::{Buf, Bytes};
use tokio::io::{AsyncRead, ReadBuf};
use tracing::warn;

/// Response body that logs a warning when it is dropped before every byte
/// was handed to the connection.
pub struct TrackedBody {
    func_name: &'static str,
    data: Bytes,
    len: usize,
}

impl TrackedBody {
    pub fn new(func_name: &'static str, data: Bytes) -> Self {
        let len = data.len();
        Self {
            func_name,
            data,
            len,
        }
    }

    pub fn sent(&self) -> usize {
        self.len - self.data.len()
    }
}

impl AsyncRead for TrackedBody {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let n = buf.remaining().min(self.data.len());
        buf.put_slice(&self.data[..n]);
        self.data.advance(n);
        Poll::Ready(Ok(()))
    }
}

impl Drop for TrackedBody {
    fn drop(&mut self) {
        if !self.data.is_empty() {
            warn!(
                "{}: sent {} of {} bytes",
                self.func_name,
                self.sent(),
                self.len
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::LogCapture;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn yields_all_bytes() {
        let mut body = TrackedBody::new("test", Bytes::from_static(b"hello world"));
        let mut out = Vec::new();
        body.read_to_end(&mut out).await.unwrap();

        assert_eq!(out, b"hello world");
        assert_eq!(body.sent(), 11);
    }

    #[tokio::test]
    async fn counts_partial_reads() {
        let mut body = TrackedBody::new("test", Bytes::from_static(b"0123456789"));
        let mut chunk = [0u8; 4];
        body.read_exact(&mut chunk).await.unwrap();

        assert_eq!(&chunk, b"0123");
        assert_eq!(body.sent(), 4);
    }

    #[tokio::test]
    async fn warns_when_dropped_with_unsent_bytes() {
        let mut body = TrackedBody::new("resizeImage", Bytes::from_static(b"0123456789"));
        let mut chunk = [0u8; 4];
        body.read_exact(&mut chunk).await.unwrap();

        let logs = LogCapture::install();
        drop(body);

        let out = logs.contents();
        assert!(out.contains("WARN"), "{out}");
        assert!(out.contains("resizeImage: sent 4 of 10 bytes"), "{out}");
    }

    #[tokio::test]
    async fn silent_when_fully_sent() {
        let mut body = TrackedBody::new("compressImage", Bytes::from_static(b"abc"));
        let mut out = Vec::new();
        body.read_to_end(&mut out).await.unwrap();

        let logs = LogCapture::install();
        drop(body);

        assert_eq!(logs.contents(), "");
    }
}
