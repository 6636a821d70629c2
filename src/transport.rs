//! Raw-socket HTTP/1.1 request/response client.
//!
//! One request per call, no connection reuse. The whole exchange runs inside
//! a single future raced against the caller's deadline, so exactly one of
//! {timeout, transport error, success} is ever delivered; the losing side of
//! the race is dropped without effect.

use std::time::Duration;

use log::debug;
use serde_json::Value;

use crate::errors::Error;
use crate::runtime::{self, AsyncTcpStream, TcpStream};

type Result<T> = std::result::Result<T, Error>;

/// HTTP methods the device API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Method {
    Get,
    Post,
}

impl Method {
    fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// Minimal HTTP client bound to one device authority (`host:port`).
#[derive(Debug, Clone)]
pub(crate) struct HttpClient {
    authority: String,
}

impl HttpClient {
    pub fn new(authority: String) -> Self {
        HttpClient { authority }
    }

    /// Perform one request and parse the response body as JSON.
    ///
    /// The deadline covers the whole exchange: connect, write, and body
    /// accumulation. Statuses outside [200, 400) fail with
    /// [`Error::HttpStatus`] after the body has been drained.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        timeout: Duration,
    ) -> Result<Value> {
        debug!("request -> {} {} {}", method.as_str(), self.authority, path);
        match runtime::timeout(timeout, self.exchange(method, path, body)).await {
            Ok(result) => result,
            Err(_) => {
                debug!("request timed out after {:?} -> {}", timeout, path);
                Err(Error::Timeout)
            }
        }
    }

    async fn exchange(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        let body_bytes = match body {
            Some(value) => Some(serde_json::to_vec(value).map_err(Error::JsonDump)?),
            None => None,
        };

        let mut stream = TcpStream::connect(&self.authority)
            .await
            .map_err(|e| Error::connection("connect", e))?;

        let mut head = format!(
            "{} {} HTTP/1.1\r\nHost: {}\r\nAccept: application/json\r\nConnection: close\r\n",
            method.as_str(),
            path,
            self.authority,
        );
        if let Some(bytes) = &body_bytes {
            // Content-Length must be the exact serialized byte length.
            head.push_str("Content-Type: application/json\r\n");
            head.push_str(&format!("Content-Length: {}\r\n", bytes.len()));
        }
        head.push_str("\r\n");

        stream
            .write_all(head.as_bytes())
            .await
            .map_err(|e| Error::connection("write", e))?;
        if let Some(bytes) = &body_bytes {
            stream
                .write_all(bytes)
                .await
                .map_err(|e| Error::connection("write", e))?;
        }

        let (status, response_body) = read_response(&mut stream).await?;
        debug!("response status -> {}", status);

        // The body is accumulated regardless; an error status only decides
        // what the caller sees once the stream has ended.
        if !(200..400).contains(&status) {
            return Err(Error::HttpStatus(status));
        }

        let data: Value = serde_json::from_slice(&response_body).map_err(Error::JsonLoad)?;
        debug!("response body -> {}", data);
        Ok(data)
    }
}

/// Read an entire HTTP response, returning the status code and body bytes.
///
/// The body is framed by Content-Length when the device sends one, and by
/// end-of-stream otherwise (we request `Connection: close`).
async fn read_response(stream: &mut TcpStream) -> Result<(u16, Vec<u8>)> {
    let mut raw = Vec::new();
    let mut buffer = [0u8; 4096];
    let mut header_end = None;

    loop {
        let n = stream
            .read(&mut buffer)
            .await
            .map_err(|e| Error::connection("read", e))?;
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&buffer[..n]);

        if header_end.is_none() {
            header_end = find_header_end(&raw);
        }
        if let Some(end) = header_end
            && let Some(length) = content_length(&raw[..end])?
            && raw.len() >= end + length
        {
            raw.truncate(end + length);
            break;
        }
    }

    let end = header_end
        .ok_or_else(|| Error::MalformedResponse("missing header terminator".to_string()))?;
    let status = parse_status_line(&raw[..end])?;
    Ok((status, raw[end..].to_vec()))
}

fn find_header_end(raw: &[u8]) -> Option<usize> {
    raw.windows(4).position(|w| w == b"\r\n\r\n").map(|p| p + 4)
}

fn parse_status_line(head: &[u8]) -> Result<u16> {
    let head = std::str::from_utf8(head)
        .map_err(|_| Error::MalformedResponse("header is not utf-8".to_string()))?;
    let status_line = head.lines().next().unwrap_or_default();
    status_line
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| Error::MalformedResponse(format!("bad status line: {status_line:?}")))
}

fn content_length(head: &[u8]) -> Result<Option<usize>> {
    let head = std::str::from_utf8(head)
        .map_err(|_| Error::MalformedResponse("header is not utf-8".to_string()))?;
    for line in head.lines().skip(1) {
        if let Some((name, value)) = line.split_once(':')
            && name.trim().eq_ignore_ascii_case("content-length")
        {
            let length = value
                .trim()
                .parse::<usize>()
                .map_err(|_| Error::MalformedResponse(format!("bad content-length: {line:?}")))?;
            return Ok(Some(length));
        }
    }
    Ok(None)
}
