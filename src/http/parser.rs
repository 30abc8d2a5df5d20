use crate::http::request::{Method, RequestLine};

/// Largest request prefix the server reads. The request line must fit.
pub const MAX_REQUEST_BYTES: usize = 4096;

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Nothing was received.
    Empty,
    /// The first line is not exactly `METHOD SP TARGET SP VERSION`.
    InvalidRequestLine,
}

/// Parses the request line out of the bytes received so far.
///
/// The line ends at the first `\n` (a preceding `\r` is dropped) or at the
/// end of `buf`. Non-UTF-8 bytes are replaced rather than rejected.
pub fn parse_request_line(buf: &[u8]) -> Result<RequestLine, ParseError> {
    if buf.is_empty() {
        return Err(ParseError::Empty);
    }

    let line_end = buf.iter().position(|&b| b == b'\n').unwrap_or(buf.len());
    let line = String::from_utf8_lossy(&buf[..line_end]);

    let mut parts = line.split_whitespace();
    let (Some(method), Some(target), Some(version), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ParseError::InvalidRequestLine);
    };

    Ok(RequestLine {
        method: Method::parse(method),
        target: target.to_string(),
        version: version.to_string(),
    })
}

/// True once `buf` holds a whole request line or the read limit is reached.
pub fn has_request_line(buf: &[u8]) -> bool {
    buf.len() >= MAX_REQUEST_BYTES || buf.contains(&b'\n')
}
