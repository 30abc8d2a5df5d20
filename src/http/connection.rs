use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use bytes::BytesMut;
use percent_encoding::utf8_percent_encode;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::config::StaticFilesConfig;
use crate::content::listing::{PATH, render_listing};
use crate::content::resolver::{normalize_target, resolve};
use crate::hits::HitCounter;
use crate::http::mime::{content_type_for, dotted_extension};
use crate::http::parser::{MAX_REQUEST_BYTES, has_request_line, parse_request_line};
use crate::http::request::RequestLine;
use crate::http::response::{HTML, Response};
use crate::http::writer::ResponseWriter;
use crate::server::state::ServerState;

/// Upper bound on draining unread input after the response went out.
const LINGER_TIMEOUT: Duration = Duration::from_secs(2);

/// One accepted client, driven from admission to close.
pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
    shared: Arc<ServerState>,
    buffer: BytesMut,
    state: ConnectionState,
}

/// Every path through the machine ends in `Closed`; nothing loops back.
#[derive(Debug)]
pub enum ConnectionState {
    Admission,
    Reading,
    Processing(RequestLine),
    Writing(ResponseWriter),
    Closed,
}

impl Connection {
    pub fn new(stream: TcpStream, peer: SocketAddr, shared: Arc<ServerState>) -> Self {
        Self {
            stream,
            peer,
            shared,
            buffer: BytesMut::with_capacity(MAX_REQUEST_BYTES),
            state: ConnectionState::Admission,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);
            self.state = match state {
                ConnectionState::Admission => {
                    if self.shared.limiter.admit(self.peer.ip()).await {
                        let delay = self.shared.config.simulation.pre_read_delay();
                        if !delay.is_zero() {
                            tokio::time::sleep(delay).await;
                        }
                        ConnectionState::Reading
                    } else {
                        tracing::warn!(peer = %self.peer, "Rate limit exceeded");
                        ConnectionState::Writing(ResponseWriter::new(&Response::too_many_requests()))
                    }
                }

                ConnectionState::Reading => {
                    if !self.read_request().await? {
                        // Peer closed without sending anything.
                        ConnectionState::Closed
                    } else {
                        match parse_request_line(&self.buffer) {
                            Ok(req) => ConnectionState::Processing(req),
                            Err(e) => {
                                tracing::debug!(peer = %self.peer, error = ?e, "Malformed request line");
                                ConnectionState::Writing(ResponseWriter::new(&Response::bad_request()))
                            }
                        }
                    }
                }

                ConnectionState::Processing(req) => {
                    let response = self.handle_request(&req).await;
                    tracing::info!(
                        peer = %self.peer,
                        method = %req.method,
                        target = %req.target,
                        status = response.status.as_u16(),
                        "Request served"
                    );
                    ConnectionState::Writing(ResponseWriter::new(&response))
                }

                ConnectionState::Writing(writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    self.linger_close().await;
                    ConnectionState::Closed
                }

                ConnectionState::Closed => break,
            };
        }

        Ok(())
    }

    /// Reads until a full request line, the size limit, or EOF.
    ///
    /// Returns `false` if the peer sent nothing at all.
    async fn read_request(&mut self) -> anyhow::Result<bool> {
        while !has_request_line(&self.buffer) {
            let remaining = (MAX_REQUEST_BYTES - self.buffer.len()) as u64;
            let n = (&mut self.stream)
                .take(remaining)
                .read_buf(&mut self.buffer)
                .await?;

            if n == 0 {
                break;
            }
        }

        Ok(!self.buffer.is_empty())
    }

    async fn handle_request(&self, req: &RequestLine) -> Response {
        if !req.is_get() {
            return Response::method_not_allowed();
        }

        let target = normalize_target(&req.target);
        // Counted before any routing decision, errors included.
        self.shared.hits.bump(&target).await;

        let path = match resolve(&target, &self.shared.root).await {
            Ok(path) => path,
            Err(rejected) => {
                tracing::debug!(peer = %self.peer, target = %target, reason = ?rejected, "Target rejected");
                return Response::not_found();
            }
        };

        let meta = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta,
            Err(_) => return Response::not_found(),
        };

        if meta.is_dir() {
            directory_response(&target, &path, &self.shared.hits).await
        } else if meta.is_file() {
            file_response(&path, &self.shared.config.static_files).await
        } else {
            Response::not_found()
        }
    }

    /// Half-closes and drains what the peer still sends, so it sees our FIN
    /// after the response rather than a reset that could discard it.
    async fn linger_close(&mut self) {
        if self.stream.shutdown().await.is_err() {
            return;
        }
        let mut scratch = [0u8; 1024];
        let stream = &mut self.stream;
        let _ = tokio::time::timeout(LINGER_TIMEOUT, async {
            while let Ok(n) = stream.read(&mut scratch).await {
                if n == 0 {
                    break;
                }
            }
        })
        .await;
    }
}

/// Redirect for a directory target without its trailing `/`, otherwise the
/// listing of `dir`. A listing that cannot be read is a 500.
pub async fn directory_response(target: &str, dir: &Path, hits: &HitCounter) -> Response {
    if !target.ends_with('/') {
        // A leading `//` would make the Location scheme-relative.
        let canonical = format!("/{}/", target.trim_start_matches('/'));
        let location = utf8_percent_encode(&canonical, PATH).to_string();
        return Response::moved_permanently(&location);
    }

    match render_listing(target, dir, hits).await {
        Ok(body) => Response::ok(HTML, body),
        Err(e) => {
            tracing::error!(dir = %dir.display(), error = %e, "Failed to list directory");
            Response::internal_error()
        }
    }
}

/// Body of the regular file at `path`, subject to the extension allowlist.
///
/// Disallowed or untyped extensions are a 404; a failed read is a 500.
pub async fn file_response(path: &Path, files: &StaticFilesConfig) -> Response {
    let Some(ext) = dotted_extension(path) else {
        return Response::not_found();
    };
    if !files.is_allowed(&ext) {
        return Response::not_found();
    }
    let Some(content_type) = content_type_for(&ext[1..]) else {
        return Response::not_found();
    };

    match tokio::fs::read(path).await {
        Ok(body) => Response::ok(content_type, body),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Failed to read file");
            Response::internal_error()
        }
    }
}
