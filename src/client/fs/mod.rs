//! Filesystem manipulation operations.
//!
//! This module contains methods for interacting with remote entities on high-level.
//! Each method is exactly one request/response exchange with the server;
//! nothing is validated or retried locally and server errors come back unchanged.

mod file;

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::{Transport, XrdResult};
use crate::{
    file::{EntryStat, OpenMode, OpenOptions, VirtualFSStat},
    protocol::{
        Chmod, Dirlist, DirlistOptions, DirlistReply, Mkdir, MkdirOptions, Mv, Open, OpenReply,
        Rm, Rmdir, Stat, StatOptions, StatReply, Truncate, VirtualStatReply,
    },
};

pub use file::File;

/// Filesystem façade over a shared [`Transport`].
///
/// Holds nothing but the transport, so any number of façades may share one
/// and every method may be called concurrently.
pub struct FileSystem<T> {
    transport: Arc<T>,
}

impl<T> Clone for FileSystem<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
        }
    }
}

impl<T: Transport> FileSystem<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the entries of a directory together with their stat information.
    pub async fn dirlist<P: Into<String>>(
        &self,
        ctx: &CancellationToken,
        path: P,
    ) -> XrdResult<Vec<EntryStat>> {
        let reply: DirlistReply = self
            .transport
            .send(ctx, Dirlist::new(path, DirlistOptions::STAT).into())
            .await?;

        Ok(reply.entries)
    }

    /// Opens a file with the given mode and options, passed to the server as is.
    ///
    /// The returned [`File`] owns the server handle and must be released with
    /// [`File::close`].
    pub async fn open<P: Into<String>>(
        &self,
        ctx: &CancellationToken,
        path: P,
        mode: OpenMode,
        options: OpenOptions,
    ) -> XrdResult<File<T>> {
        let reply: OpenReply = self
            .transport
            .send(ctx, Open::new(path, mode, options).into())
            .await?;

        Ok(File::new(
            self.clone(),
            reply.handle,
            reply.compression.unwrap_or_default(),
            reply.stat,
        ))
    }

    /// Removes a file.
    pub async fn remove_file<P: Into<String>>(
        &self,
        ctx: &CancellationToken,
        path: P,
    ) -> XrdResult<()> {
        self.transport
            .call(ctx, Rm::new(path).into())
            .await
            .map(|_| ())
    }

    /// Changes the size of the named file.
    pub async fn truncate<P: Into<String>>(
        &self,
        ctx: &CancellationToken,
        path: P,
        size: u64,
    ) -> XrdResult<()> {
        self.transport
            .call(ctx, Truncate::new(path, size).into())
            .await
            .map(|_| ())
    }

    /// Returns the stat information of the entry at `path`.
    pub async fn stat<P: Into<String>>(
        &self,
        ctx: &CancellationToken,
        path: P,
    ) -> XrdResult<EntryStat> {
        let reply: StatReply = self
            .transport
            .send(ctx, Stat::new(path, StatOptions::empty()).into())
            .await?;

        Ok(reply.stat)
    }

    /// Returns the virtual filesystem stat information for `path`.
    ///
    /// The path needs not name an existing object: it is a prefix used to
    /// select the servers and partitions that could hold objects under it.
    pub async fn virtual_stat<P: Into<String>>(
        &self,
        ctx: &CancellationToken,
        path: P,
    ) -> XrdResult<VirtualFSStat> {
        let reply: VirtualStatReply = self
            .transport
            .send(ctx, Stat::new(path, StatOptions::VFS).into())
            .await?;

        Ok(reply.stat)
    }

    /// Creates a new directory. Fails if its parent does not exist.
    pub async fn mkdir<P: Into<String>>(
        &self,
        ctx: &CancellationToken,
        path: P,
        perm: OpenMode,
    ) -> XrdResult<()> {
        self.transport
            .call(ctx, Mkdir::new(path, perm, MkdirOptions::empty()).into())
            .await
            .map(|_| ())
    }

    /// Creates a directory along with any missing parents.
    ///
    /// The server creates the intermediate directories; this is still a
    /// single request.
    pub async fn mkdir_all<P: Into<String>>(
        &self,
        ctx: &CancellationToken,
        path: P,
        perm: OpenMode,
    ) -> XrdResult<()> {
        self.transport
            .call(ctx, Mkdir::new(path, perm, MkdirOptions::MAKE_PATH).into())
            .await
            .map(|_| ())
    }

    /// Removes a directory. The directory must be empty.
    pub async fn remove_dir<P: Into<String>>(
        &self,
        ctx: &CancellationToken,
        path: P,
    ) -> XrdResult<()> {
        self.transport
            .call(ctx, Rmdir::new(path).into())
            .await
            .map(|_| ())
    }

    /// Renames (moves) `old_path` to `new_path`.
    ///
    /// Nothing is sent if `old_path` does not fit the request's length field.
    pub async fn rename<O, N>(
        &self,
        ctx: &CancellationToken,
        old_path: O,
        new_path: N,
    ) -> XrdResult<()>
    where
        O: Into<String>,
        N: Into<String>,
    {
        let request = Mv::new(old_path, new_path)?;

        self.transport
            .call(ctx, request.into())
            .await
            .map(|_| ())
    }

    /// Changes the permissions of the named file to `perm`.
    pub async fn chmod<P: Into<String>>(
        &self,
        ctx: &CancellationToken,
        path: P,
        perm: OpenMode,
    ) -> XrdResult<()> {
        self.transport
            .call(ctx, Chmod::new(path, perm).into())
            .await
            .map(|_| ())
    }
}
