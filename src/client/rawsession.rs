use bytes::{BufMut, Bytes, BytesMut};
use flurry::HashMap;
use std::{
    collections::HashMap as StdHashMap,
    sync::{
        atomic::{AtomicBool, AtomicU16, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::{
    io::{self, AsyncRead, AsyncWrite, AsyncWriteExt, ReadHalf, WriteHalf},
    sync::{mpsc, RwLock},
    time,
};
use tokio_util::sync::CancellationToken;

use super::{error::Error, Transport, XrdResult};
use crate::{
    protocol::{Request, ServerError, KXR_ERROR, KXR_OK, KXR_OKSOFAR},
    utils::{read_response, ResponseFrame},
};

type SharedRequests = HashMap<u16, mpsc::Sender<XrdResult<Bytes>>>;

pub(crate) struct Options {
    timeout: RwLock<u64>,
}

fn session_closed() -> Error {
    Error::UnexpectedBehavior("session closed".into())
}

/// Implements the request-response exchange over one stream.
///
/// Every request is tagged with a stream id no other pending request holds;
/// a background task reads responses and hands each one to the caller
/// waiting on that id, so any number of requests may be in flight at once.
/// The stream is expected to be past the protocol handshake and login.
pub struct RawSession {
    tx: mpsc::UnboundedSender<Bytes>,
    requests: Arc<SharedRequests>,
    closed: Arc<AtomicBool>,
    next_stream_id: AtomicU16,
    options: Options,
}

/// Folds one response frame into the answer of its request.
/// Returns `None` while the answer is still incomplete.
fn dispatch(
    frame: ResponseFrame,
    partial: &mut StdHashMap<u16, BytesMut>,
) -> Option<XrdResult<Bytes>> {
    let ResponseFrame {
        stream_id,
        status,
        mut body,
    } = frame;

    match status {
        KXR_OKSOFAR => {
            partial.entry(stream_id).or_default().put_slice(&body);
            None
        }
        KXR_OK => match partial.remove(&stream_id) {
            Some(mut data) => {
                data.put_slice(&body);
                Some(Ok(data.freeze()))
            }
            None => Some(Ok(body)),
        },
        KXR_ERROR => {
            let _ = partial.remove(&stream_id);
            Some(match ServerError::try_from(&mut body) {
                Ok(err) => Err(err.into()),
                Err(err) => Err(err.into()),
            })
        }
        status => {
            let _ = partial.remove(&stream_id);
            Some(Err(Error::UnexpectedStatus(status)))
        }
    }
}

/// Hands a frame to the caller waiting on its stream id.
///
/// A stream whose caller gave up keeps its id until the server's final
/// answer arrives; its partial data is dropped as it comes in.
fn route(
    frame: ResponseFrame,
    requests: &SharedRequests,
    partial: &mut StdHashMap<u16, BytesMut>,
) {
    let stream_id = frame.stream_id;
    let last = frame.status != KXR_OKSOFAR;
    let pending = requests.pin();

    let Some(sender) = pending.get(&stream_id) else {
        let _ = partial.remove(&stream_id);
        warn!("response for unknown stream {}", stream_id);
        return;
    };

    if sender.is_closed() {
        debug!("dropping response for abandoned stream {}", stream_id);
        let _ = partial.remove(&stream_id);
        if last {
            let _ = pending.remove(&stream_id);
        }
        return;
    }

    let Some(result) = dispatch(frame, partial) else {
        return;
    };

    if let Some(sender) = pending.remove(&stream_id) {
        if sender.try_send(result).is_err() {
            debug!("caller of stream {} is gone", stream_id);
        }
    }
}

/// Fails every request still waiting for an answer
fn fail_pending(requests: &SharedRequests) {
    let pending = requests.pin();
    let ids: Vec<u16> = pending.keys().copied().collect();

    for id in ids {
        if let Some(sender) = pending.remove(&id) {
            let _ = sender.try_send(Err(session_closed()));
        }
    }
}

async fn receive<S>(
    mut stream: ReadHalf<S>,
    requests: Arc<SharedRequests>,
    closed: Arc<AtomicBool>,
) where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let mut partial = StdHashMap::new();

    loop {
        let frame = match read_response(&mut stream).await {
            Ok(frame) => frame,
            Err(crate::Error::UnexpectedEof) => break,
            Err(err) => {
                warn!("{}", err);
                break;
            }
        };

        trace!("response status {} for stream {}", frame.status, frame.stream_id);
        route(frame, &requests, &mut partial);
    }

    closed.store(true, Ordering::SeqCst);
    fail_pending(&requests);
    debug!("xrootd stream ended");
}

async fn transmit<S>(mut stream: WriteHalf<S>, mut rx: mpsc::UnboundedReceiver<Bytes>)
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    while let Some(data) = rx.recv().await {
        if data.is_empty() {
            let _ = stream.shutdown().await;
            break;
        }

        if let Err(err) = stream.write_all(&data[..]).await {
            warn!("{}", err);
            break;
        }
    }
}

impl RawSession {
    pub fn new<S>(stream: S) -> Self
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let requests = Arc::new(HashMap::new());
        let closed = Arc::new(AtomicBool::new(false));
        let (reader, writer) = io::split(stream);
        let (tx, rx) = mpsc::unbounded_channel::<Bytes>();

        let _receiver = tokio::spawn(receive(reader, requests.clone(), closed.clone()));
        let _transmitter = tokio::spawn(transmit(writer, rx));

        Self {
            tx,
            requests,
            closed,
            next_stream_id: AtomicU16::new(1),
            options: Options {
                timeout: RwLock::new(10),
            },
        }
    }

    /// Set the maximum response time in seconds.
    /// Default: 10 seconds
    pub async fn set_timeout(&self, secs: u64) {
        *self.options.timeout.write().await = secs;
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst) || self.tx.is_closed()
    }

    /// Takes the next stream id not held by a pending request
    fn register(&self, sender: mpsc::Sender<XrdResult<Bytes>>) -> XrdResult<u16> {
        let pending = self.requests.pin();

        for _ in 0..=u16::MAX {
            let stream_id = self.next_stream_id.fetch_add(1, Ordering::SeqCst);
            if !pending.contains_key(&stream_id) {
                let _ = pending.insert(stream_id, sender);
                return Ok(stream_id);
            }
        }

        Err(Error::UnexpectedBehavior("no free stream id".into()))
    }

    fn unregister(&self, stream_id: u16) {
        let _ = self.requests.pin().remove(&stream_id);
    }

    /// Closes the inner stream. Called by [`Drop`]
    pub fn close_session(&self) -> XrdResult<()> {
        if self.tx.is_closed() {
            return Ok(());
        }

        Ok(self.tx.send(Bytes::new())?)
    }

    async fn wait(
        &self,
        ctx: &CancellationToken,
        rx: &mut mpsc::Receiver<XrdResult<Bytes>>,
    ) -> XrdResult<Bytes> {
        let timeout = *self.options.timeout.read().await;

        tokio::select! {
            () = ctx.cancelled() => Err(Error::Cancelled),
            result = time::timeout(Duration::from_secs(timeout), rx.recv()) => match result {
                Ok(Some(result)) => result,
                Ok(None) => Err(session_closed()),
                Err(error) => Err(error.into()),
            },
        }
    }
}

#[async_trait]
impl Transport for RawSession {
    async fn call(&self, ctx: &CancellationToken, request: Request) -> XrdResult<Bytes> {
        if ctx.is_cancelled() {
            return Err(Error::Cancelled);
        }

        if self.is_closed() {
            return Err(session_closed());
        }

        let body = Bytes::try_from(&request)?;
        let (tx, mut rx) = mpsc::channel(1);
        let stream_id = self.register(tx)?;

        // the reader may have drained the map between the check and the insert
        if self.is_closed() {
            self.unregister(stream_id);
            return Err(session_closed());
        }

        let mut frame = BytesMut::with_capacity(2 + body.len());
        frame.put_u16(stream_id);
        frame.put_slice(&body);

        trace!("request {} on stream {}", request.request_id(), stream_id);

        if let Err(err) = self.tx.send(frame.freeze()) {
            self.unregister(stream_id);
            return Err(err.into());
        }

        // on cancellation or timeout the id stays registered until the
        // server's answer arrives, so it is not reused while still in flight
        self.wait(ctx, &mut rx).await
    }
}

impl Drop for RawSession {
    fn drop(&mut self) {
        let _ = self.close_session();
    }
}
