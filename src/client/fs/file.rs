use std::fmt;
use tokio_util::sync::CancellationToken;

use super::FileSystem;
use crate::{
    client::{Transport, XrdResult},
    file::{EntryStat, FileCompression, FileHandle, VirtualFSStat},
    protocol::{
        Close, Fsync, Read, Stat, StatOptions, StatReply, Truncate, VirtualStatReply, Write,
    },
};

/// A file opened on the server.
///
/// Created by [`FileSystem::open`]. Holds the server-assigned handle and the
/// information returned with the open reply. The handle stays valid on the
/// server until [`File::close`] is called; dropping a `File` without closing
/// it leaks the handle for the lifetime of the session.
pub struct File<T: Transport> {
    fs: FileSystem<T>,
    handle: FileHandle,
    compression: FileCompression,
    info: Option<EntryStat>,
    closed: bool,
}

impl<T: Transport> File<T> {
    pub(crate) fn new(
        fs: FileSystem<T>,
        handle: FileHandle,
        compression: FileCompression,
        info: Option<EntryStat>,
    ) -> Self {
        Self {
            fs,
            handle,
            compression,
            info,
            closed: false,
        }
    }

    #[must_use]
    pub const fn handle(&self) -> FileHandle {
        self.handle
    }

    #[must_use]
    pub const fn compression(&self) -> &FileCompression {
        &self.compression
    }

    /// Stat information captured when the file was opened.
    /// Present only if the open asked for [`OpenOptions::RETURN_STATUS`]
    ///
    /// [`OpenOptions::RETURN_STATUS`]: crate::file::OpenOptions::RETURN_STATUS
    #[must_use]
    pub const fn info(&self) -> Option<&EntryStat> {
        self.info.as_ref()
    }

    /// Reads up to `len` bytes starting at `offset`.
    /// Fewer bytes are returned at the end of the file
    pub async fn read_at(
        &self,
        ctx: &CancellationToken,
        len: u32,
        offset: u64,
    ) -> XrdResult<Vec<u8>> {
        let data = self
            .fs
            .transport()
            .call(ctx, Read::new(self.handle, offset, len).into())
            .await?;

        Ok(data.to_vec())
    }

    /// Writes all of `data` at `offset`
    pub async fn write_at(
        &self,
        ctx: &CancellationToken,
        data: &[u8],
        offset: u64,
    ) -> XrdResult<()> {
        self.fs
            .transport()
            .call(ctx, Write::new(self.handle, offset, data.to_vec()).into())
            .await
            .map(|_| ())
    }

    /// Commits pending writes to stable storage on the server
    pub async fn sync(&self, ctx: &CancellationToken) -> XrdResult<()> {
        self.fs
            .transport()
            .call(ctx, Fsync::new(self.handle).into())
            .await
            .map(|_| ())
    }

    pub async fn truncate(&self, ctx: &CancellationToken, size: u64) -> XrdResult<()> {
        self.fs
            .transport()
            .call(ctx, Truncate::with_handle(self.handle, size).into())
            .await
            .map(|_| ())
    }

    /// Fetches fresh stat information. [`File::info`] is not updated
    pub async fn stat(&self, ctx: &CancellationToken) -> XrdResult<EntryStat> {
        let reply: StatReply = self
            .fs
            .transport()
            .send(ctx, Stat::with_handle(self.handle, StatOptions::empty()).into())
            .await?;

        Ok(reply.stat)
    }

    pub async fn stat_virtual_fs(&self, ctx: &CancellationToken) -> XrdResult<VirtualFSStat> {
        let reply: VirtualStatReply = self
            .fs
            .transport()
            .send(ctx, Stat::with_handle(self.handle, StatOptions::VFS).into())
            .await?;

        Ok(reply.stat)
    }

    /// Releases the handle on the server
    pub async fn close(mut self, ctx: &CancellationToken) -> XrdResult<()> {
        self.fs
            .transport()
            .call(ctx, Close::new(self.handle).into())
            .await?;

        self.closed = true;
        Ok(())
    }
}

impl<T: Transport> fmt::Debug for File<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("File")
            .field("handle", &self.handle)
            .field("compression", &self.compression)
            .field("info", &self.info)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> Drop for File<T> {
    fn drop(&mut self) {
        if !self.closed {
            warn!("file handle {:?} dropped without close", self.handle);
        }
    }
}
