use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::http::message::{Body, Headers};
use crate::http::request::{Method, Request};

/// Longest request or header line accepted, terminator included.
pub const MAX_LINE_LEN: usize = 8 * 1024;

/// Most header lines accepted in one request.
pub const MAX_HEADERS: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("malformed request line: {0:?}")]
    MalformedRequestLine(String),
    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),
    #[error("malformed header line: {0:?}")]
    MalformedHeaderLine(String),
    #[error("stream ended before the request head was complete")]
    UnexpectedEndOfStream,
    #[error("line longer than {} bytes", MAX_LINE_LEN)]
    LineTooLong,
    #[error("more than {} header lines", MAX_HEADERS)]
    TooManyHeaders,
    #[error("request head is not valid UTF-8")]
    InvalidEncoding,
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads exactly one request head (request line plus headers) from `reader`.
///
/// Lines may end in CRLF or a bare LF. Parsing stops at the first empty line;
/// nothing after it is consumed, so a request body is never read.
pub async fn parse_request<R>(reader: &mut R) -> Result<Request, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let request_line = read_line(reader)
        .await?
        .ok_or(ParseError::UnexpectedEndOfStream)?;

    let (method, path, version) = parse_request_line(&request_line)?;

    let mut headers = Headers::new();

    loop {
        let line = read_line(reader)
            .await?
            .ok_or(ParseError::UnexpectedEndOfStream)?;

        if line.is_empty() {
            break;
        }

        if headers.len() >= MAX_HEADERS {
            return Err(ParseError::TooManyHeaders);
        }

        let (key, value) = line
            .split_once(": ")
            .ok_or_else(|| ParseError::MalformedHeaderLine(line.clone()))?;

        headers.insert(key, value);
    }

    Ok(Request {
        method,
        path,
        version,
        headers,
        body: Body::Empty,
    })
}

fn parse_request_line(line: &str) -> Result<(Method, String, String), ParseError> {
    let parts: Vec<&str> = line.split(' ').collect();

    let [method_str, path, version] = parts.as_slice() else {
        return Err(ParseError::MalformedRequestLine(line.to_string()));
    };

    if !path.starts_with('/') || version.is_empty() {
        return Err(ParseError::MalformedRequestLine(line.to_string()));
    }

    let method = Method::from_str(method_str)
        .ok_or_else(|| ParseError::UnsupportedMethod(method_str.to_string()))?;

    Ok((method, path.to_string(), version.to_string()))
}

/// Next line without its terminator, or `None` at end of stream.
///
/// Reads at most `MAX_LINE_LEN` bytes, so a client that never sends a line
/// break cannot grow the buffer without bound.
async fn read_line<R>(reader: &mut R) -> Result<Option<String>, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let n = (&mut *reader)
        .take(MAX_LINE_LEN as u64)
        .read_until(b'\n', &mut buf)
        .await?;

    if n == 0 {
        return Ok(None);
    }

    if n == MAX_LINE_LEN && !buf.ends_with(b"\n") {
        return Err(ParseError::LineTooLong);
    }

    if buf.ends_with(b"\n") {
        buf.pop();
        if buf.ends_with(b"\r") {
            buf.pop();
        }
    }

    String::from_utf8(buf)
        .map(Some)
        .map_err(|_| ParseError::InvalidEncoding)
}
