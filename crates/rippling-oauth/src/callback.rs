use std::{
    convert::Infallible,
    fmt,
    io::ErrorKind,
    net::{Ipv4Addr, SocketAddr},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use http_body_util::Full;
use hyper::{
    body::{Bytes, Incoming},
    header,
    server::conn::http1,
    service::service_fn,
    Method, Request, Response, StatusCode,
};
use hyper_util::rt::TokioIo;
use tokio::{
    net::{TcpListener, TcpStream},
    task::{JoinHandle, JoinSet},
};
use tokio_util::sync::CancellationToken;

use crate::{
    session::{Redirect, RedirectSink},
    OAuthError,
};

/// How long in-flight responses get to finish once the listener has been
/// asked to stop, before their connections are dropped.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

const SUCCESS_PAGE: &str = "<html><body><h1>Authorization successful.</h1><p>You can close this window and return to the terminal.</p></body></html>";
const DENIED_PAGE: &str = "<html><body><h1>Authorization was denied.</h1><p>You can close this window and return to the terminal.</p></body></html>";
const ALREADY_COMPLETE_PAGE: &str = "<html><body><h1>This login has already completed.</h1></body></html>";
const MISSING_CODE_PAGE: &str = "<html><body><h1>No authorization code was found in this request.</h1></body></html>";
const NOT_FOUND_PAGE: &str = "<html><body><h1>Not found.</h1></body></html>";

/// A short-lived HTTP server on the loopback interface that catches the
/// authorization redirect.
#[derive(Debug, Clone, Copy)]
pub struct CallbackListener {
    port: u16,
}

impl CallbackListener {
    pub const fn new(port: u16) -> Self {
        Self { port }
    }

    /// Binds the port and starts accepting on a background task. Fails
    /// fast with [`OAuthError::PortInUse`] when another process holds it.
    pub async fn bind(self, sink: RedirectSink) -> Result<ListenerHandle, OAuthError> {
        // IPv4 loopback only
        let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, self.port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| self.bind_error(source))?;
        let addr = listener
            .local_addr()
            .map_err(|source| self.bind_error(source))?;
        tracing::debug!(%addr, "callback listener bound");

        let stop = CancellationToken::new();
        let abort = CancellationToken::new();
        let task = tokio::spawn(accept_loop(listener, sink, stop.clone(), abort.clone()));

        Ok(ListenerHandle {
            addr,
            stop,
            abort,
            task: Some(task),
        })
    }

    fn bind_error(&self, source: std::io::Error) -> OAuthError {
        if source.kind() == ErrorKind::AddrInUse {
            OAuthError::PortInUse { port: self.port }
        } else {
            OAuthError::Bind {
                port: self.port,
                source,
            }
        }
    }
}

/// Owner's handle on a running listener. Shutting down goes through
/// here, from the thread that was waiting on the session.
pub struct ListenerHandle {
    addr: SocketAddr,
    /// stop accepting and finish what's in flight
    stop: CancellationToken,
    /// drop everything now
    abort: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl ListenerHandle {
    pub const fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stops the listener and waits until its socket is closed, so the
    /// port can be bound again as soon as this returns.
    pub async fn shutdown(mut self) {
        self.stop.cancel();
        let Some(mut task) = self.task.take() else {
            return;
        };
        if tokio::time::timeout(SHUTDOWN_GRACE, &mut task).await.is_err() {
            tracing::debug!("callback listener did not drain in time, aborting connections");
            self.abort.cancel();
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "callback listener task failed");
            }
        }
        tracing::debug!(addr = %self.addr, "callback listener shut down");
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        // only reached without `shutdown` when the owner was cancelled
        self.stop.cancel();
        self.abort.cancel();
    }
}

impl fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("addr", &self.addr)
            .field("stopped", &self.stop.is_cancelled())
            .finish()
    }
}

async fn accept_loop(
    listener: TcpListener,
    sink: RedirectSink,
    stop: CancellationToken,
    abort: CancellationToken,
) {
    let mut connections = JoinSet::new();
    loop {
        tokio::select! {
            _ = stop.cancelled() => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    tracing::trace!(%peer, "accepted callback connection");
                    connections.spawn(serve(stream, sink.clone(), stop.clone()));
                }
                Err(e) => tracing::debug!(error = %e, "failed to accept callback connection"),
            },
            Some(_) = connections.join_next(), if !connections.is_empty() => {}
        }
    }
    // release the port before draining
    drop(listener);

    tokio::select! {
        _ = async { while connections.join_next().await.is_some() {} } => {}
        _ = abort.cancelled() => connections.shutdown().await,
    }
}

async fn serve(stream: TcpStream, sink: RedirectSink, stop: CancellationToken) {
    let busy = Arc::new(AtomicBool::new(false));
    let service = {
        let busy = busy.clone();
        let stop = stop.clone();
        service_fn(move |req| {
            busy.store(true, Ordering::SeqCst);
            let response = respond(&req, &sink, &stop);
            async move { Ok::<_, Infallible>(response) }
        })
    };
    let conn = http1::Builder::new()
        .keep_alive(false)
        .serve_connection(TokioIo::new(stream), service);
    tokio::pin!(conn);

    let result = tokio::select! {
        result = conn.as_mut() => result,
        _ = stop.cancelled() => {
            if !busy.load(Ordering::SeqCst) {
                // nothing was asked of this connection yet
                return;
            }
            conn.as_mut().graceful_shutdown();
            conn.as_mut().await
        }
    };
    if let Err(e) = result {
        tracing::debug!(error = %e, "callback connection ended with an error");
    }
}

/// The handler never tears the listener down itself; it records the
/// redirect and asks the accept loop to stop.
fn respond(
    req: &Request<Incoming>,
    sink: &RedirectSink,
    stop: &CancellationToken,
) -> Response<Full<Bytes>> {
    if sink.is_completed() {
        tracing::debug!(uri = %req.uri(), "ignoring request after the redirect was received");
        return page(StatusCode::GONE, ALREADY_COMPLETE_PAGE);
    }
    if req.method() != Method::GET {
        return page(StatusCode::METHOD_NOT_ALLOWED, NOT_FOUND_PAGE);
    }
    if req.uri().path() != "/" {
        return page(StatusCode::NOT_FOUND, NOT_FOUND_PAGE);
    }
    let Some(redirect) = Redirect::from_query(req.uri().query()) else {
        return page(StatusCode::BAD_REQUEST, MISSING_CODE_PAGE);
    };

    let body = match &redirect {
        Redirect::Code(_) => SUCCESS_PAGE,
        Redirect::Denied { .. } => DENIED_PAGE,
    };
    if sink.deliver(redirect) {
        stop.cancel();
        page(StatusCode::OK, body)
    } else {
        page(StatusCode::GONE, ALREADY_COMPLETE_PAGE)
    }
}

fn page(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from_static(body.as_bytes())));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("text/html; charset=utf-8"),
    );
    response
}
