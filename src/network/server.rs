//! HTTP Server
//!
//! Accepts requests and dispatches them to worker threads.

use std::io::Read;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam::channel::{self, Receiver};
use tiny_http::{Header, Request, Response};

use crate::config::Config;
use crate::engine::Engine;
use crate::error::{CepError, Result};

use super::handler::{route, HttpReply};

/// Requests queued per worker before the acceptor blocks
const QUEUE_DEPTH_PER_WORKER: usize = 4;

/// Signals a running server to stop
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Ask the acceptor to stop; in-flight requests finish first
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// HTTP server for the lookup service
pub struct Server {
    config: Config,
    engine: Arc<Engine>,
    http: tiny_http::Server,
    shutdown: ShutdownHandle,
}

impl Server {
    /// Bind the listen address from the config
    pub fn bind(config: Config, engine: Arc<Engine>) -> Result<Self> {
        config.validate()?;

        let http = tiny_http::Server::http(config.listen_addr.as_str()).map_err(|e| {
            CepError::Network(format!("failed to bind {}: {}", config.listen_addr, e))
        })?;

        Ok(Self {
            config,
            engine,
            http,
            shutdown: ShutdownHandle {
                flag: Arc::new(AtomicBool::new(false)),
            },
        })
    }

    /// Address actually bound (useful when listening on port 0)
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.http.server_addr().to_ip()
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Serve requests until shutdown is signalled (blocking)
    pub fn run(&self) -> Result<()> {
        let workers = self.config.worker_threads;
        let poll = Duration::from_millis(self.config.poll_interval_ms);
        let (tx, rx) = channel::bounded::<Request>(workers * QUEUE_DEPTH_PER_WORKER);

        tracing::info!(
            "Listening on {} with {} workers",
            self.local_addr()
                .map(|a| a.to_string())
                .unwrap_or_else(|| self.config.listen_addr.clone()),
            workers
        );

        let outcome = crossbeam::thread::scope(|scope| {
            for id in 0..workers {
                let rx = rx.clone();
                let engine = self.engine.as_ref();
                let max_body = self.config.max_body_bytes;
                scope.spawn(move |_| worker_loop(id, rx, engine, max_body));
            }
            drop(rx);

            let result = loop {
                if self.shutdown.is_shutdown() {
                    break Ok(());
                }
                match self.http.recv_timeout(poll) {
                    Ok(Some(request)) => {
                        if tx.send(request).is_err() {
                            break Err(CepError::Network("worker pool closed".to_string()));
                        }
                    }
                    Ok(None) => continue,
                    Err(e) => break Err(CepError::Io(e)),
                }
            };

            // Closing the channel lets workers drain the queue and exit
            drop(tx);
            result
        });

        match outcome {
            Ok(result) => result,
            Err(_) => Err(CepError::Network("worker thread panicked".to_string())),
        }
    }
}

fn worker_loop(id: usize, requests: Receiver<Request>, engine: &Engine, max_body: usize) {
    tracing::trace!("Worker {} started", id);
    for request in requests.iter() {
        handle_request(engine, max_body, request);
    }
    tracing::trace!("Worker {} stopped", id);
}

/// Read, route and answer one request
fn handle_request(engine: &Engine, max_body: usize, mut request: Request) {
    let method = request.method().clone();
    let url = request.url().to_string();
    let peer = request
        .remote_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    tracing::trace!("{} {} from {}", method, url, peer);

    let reply = match read_body(&mut request, max_body) {
        Ok(body) => route(engine, &method, &url, &body),
        Err(reply) => reply,
    };
    let status = reply.status;

    let mut response = Response::from_data(reply.body).with_status_code(reply.status);
    if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], reply.content_type.as_bytes()) {
        response = response.with_header(header);
    }

    if let Err(e) = request.respond(response) {
        // Client went away before the response was written
        tracing::debug!("Could not respond to {}: {}", peer, e);
        return;
    }

    tracing::debug!("{} {} -> {}", method, url, status);
}

/// Read the request body, refusing anything over `max_body` bytes
fn read_body(request: &mut Request, max_body: usize) -> std::result::Result<Vec<u8>, HttpReply> {
    if request.body_length().is_some_and(|len| len > max_body) {
        return Err(HttpReply::text(413, "Payload Too Large"));
    }

    let mut body = Vec::new();
    request
        .as_reader()
        .take(max_body as u64 + 1)
        .read_to_end(&mut body)
        .map_err(|e| HttpReply::text(400, &format!("Bad Request: {}", e)))?;

    if body.len() > max_body {
        return Err(HttpReply::text(413, "Payload Too Large"));
    }
    Ok(body)
}
