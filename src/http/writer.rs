use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

/// Serializes a response: status line, header lines, blank line, body.
pub fn serialize_response(resp: &Response) -> Bytes {
    let body = resp.body.as_bytes();
    let mut buf = BytesMut::with_capacity(256 + body.len());

    // Status line
    buf.put_slice(resp.version.as_bytes());
    buf.put_u8(b' ');
    buf.put_slice(resp.status.as_u16().to_string().as_bytes());
    buf.put_u8(b' ');
    buf.put_slice(resp.status.reason_phrase().as_bytes());
    buf.put_slice(b"\r\n");

    // Headers
    for (k, v) in resp.headers.iter() {
        buf.put_slice(k.as_bytes());
        buf.put_slice(b": ");
        buf.put_slice(v.as_bytes());
        buf.put_slice(b"\r\n");
    }

    // Header/body separator
    buf.put_slice(b"\r\n");

    buf.put_slice(body);

    buf.freeze()
}

pub struct ResponseWriter {
    buffer: Bytes,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: serialize_response(response),
            written: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        stream.flush().await?;

        Ok(())
    }
}
