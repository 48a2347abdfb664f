use bytes::Bytes;
use tokio_util::sync::CancellationToken;

use super::XrdResult;
use crate::{error, protocol::Request};

/// Sends requests to a server and hands back its answers.
///
/// Implementations must be safe to use from many callers at once and must
/// stop waiting as soon as `ctx` is cancelled.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request and returns the body of the server's `kXR_ok`
    /// answer. Partial (`kXR_oksofar`) answers are already joined.
    async fn call(&self, ctx: &CancellationToken, request: Request) -> XrdResult<Bytes>;

    /// Sends one request and decodes the answer into `R`
    async fn send<R>(&self, ctx: &CancellationToken, request: Request) -> XrdResult<R>
    where
        R: for<'a> TryFrom<&'a mut Bytes, Error = error::Error> + Send,
    {
        let mut body = self.call(ctx, request).await?;
        Ok(R::try_from(&mut body)?)
    }
}
