use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::Error;

/// One response as it arrives on the stream
#[derive(Debug)]
pub struct ResponseFrame {
    pub stream_id: u16,
    pub status: u16,
    pub body: Bytes,
}

/// Reads `streamid[2] status(u16) dlen(i32) data[dlen]`
pub async fn read_response<S: AsyncRead + Unpin>(stream: &mut S) -> Result<ResponseFrame, Error> {
    let stream_id = stream.read_u16().await?;
    let status = stream.read_u16().await?;
    let length = stream.read_i32().await?;

    let length = usize::try_from(length)
        .map_err(|_| Error::BadMessage(format!("negative response length {length}")))?;

    let mut buf = vec![0; length];
    stream.read_exact(&mut buf).await?;

    Ok(ResponseFrame {
        stream_id,
        status,
        body: Bytes::from(buf),
    })
}
