//! In-memory server namespace answering requests the way an XRootD data
//! server would, for tests of the filesystem façade.

use bytes::{BufMut, Bytes, BytesMut};
use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};
use tokio_util::sync::CancellationToken;

use super::{error::Error, Transport, XrdResult};
use crate::{
    file::{FileHandle, OpenMode, OpenOptions, StatFlags, VirtualFSStat},
    protocol::{DirlistOptions, ErrorCode, MkdirOptions, Request, ServerError, StatOptions},
};

const MTIME: i64 = 1_528_801_206;

pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

struct Node {
    id: i64,
    dir: bool,
    mode: OpenMode,
    data: Vec<u8>,
}

impl Node {
    fn stat_text(&self) -> String {
        let flags = if self.dir {
            StatFlags::DIR | StatFlags::EXECUTABLE | StatFlags::READABLE | StatFlags::WRITABLE
        } else {
            StatFlags::READABLE | StatFlags::WRITABLE
        };

        format!(
            "{} {} {} {MTIME} {MTIME} {MTIME} {:04o} xrootd xrootd",
            self.id,
            self.data.len(),
            flags.bits(),
            self.mode.to_octal()
        )
    }
}

#[derive(Default)]
struct Namespace {
    nodes: BTreeMap<String, Node>,
    handles: HashMap<FileHandle, String>,
    next_id: i64,
    next_handle: u32,
}

type Reply = Result<Bytes, ServerError>;

fn fail<T>(code: ErrorCode, path: &str) -> Result<T, ServerError> {
    Err(ServerError::new(code, path))
}

fn parent(path: &str) -> &str {
    match path.rsplit_once('/') {
        Some(("", _)) | None => "/",
        Some((parent, _)) => parent,
    }
}

fn text(text: String) -> Reply {
    Ok(Bytes::from(text.into_bytes()))
}

impl Namespace {
    fn insert(&mut self, path: &str, dir: bool, mode: OpenMode, data: Vec<u8>) {
        self.next_id += 1;
        let node = Node {
            id: self.next_id,
            dir,
            mode,
            data,
        };
        let _ = self.nodes.insert(path.to_owned(), node);
    }

    fn node(&self, path: &str) -> Result<&Node, ServerError> {
        self.nodes
            .get(path)
            .ok_or_else(|| ServerError::new(ErrorCode::NotFound, path))
    }

    fn node_mut(&mut self, path: &str) -> Result<&mut Node, ServerError> {
        self.nodes
            .get_mut(path)
            .ok_or_else(|| ServerError::new(ErrorCode::NotFound, path))
    }

    fn open_path(&self, handle: FileHandle) -> Result<String, ServerError> {
        self.handles
            .get(&handle)
            .cloned()
            .ok_or_else(|| ServerError::new(ErrorCode::FileNotOpen, format!("{handle:?}")))
    }

    fn require_dir(&self, path: &str) -> Result<(), ServerError> {
        match self.nodes.get(path) {
            Some(node) if node.dir => Ok(()),
            Some(_) => fail(ErrorCode::ItExists, path),
            None => fail(ErrorCode::NotFound, path),
        }
    }

    fn make_path(&mut self, path: &str, mode: OpenMode) -> Result<(), ServerError> {
        if path == "/" {
            return Ok(());
        }

        match self.nodes.get(path) {
            Some(node) if node.dir => Ok(()),
            Some(_) => fail(ErrorCode::ItExists, path),
            None => {
                self.make_path(parent(path), mode)?;
                self.insert(path, true, mode, Vec::new());
                Ok(())
            }
        }
    }

    fn stat(&self, path: &str, handle: FileHandle, options: StatOptions) -> Reply {
        if options.contains(StatOptions::VFS) {
            return text(MockTransport::VFS_STAT.to_string());
        }

        let path = if path.is_empty() {
            self.open_path(handle)?
        } else {
            path.to_owned()
        };

        text(self.node(&path)?.stat_text())
    }

    fn dirlist(&self, path: &str, options: DirlistOptions) -> Reply {
        if !self.node(path)?.dir {
            return fail(ErrorCode::ArgInvalid, path);
        }

        let with_stat = options.contains(DirlistOptions::STAT);
        let mut listing = if with_stat {
            String::from(".\n0 0 0 0\n")
        } else {
            String::new()
        };

        let children = self
            .nodes
            .iter()
            .filter(|(child, _)| child.as_str() != "/" && parent(child) == path);

        for (child, node) in children {
            let name = child.rsplit('/').next().unwrap_or_default();
            listing.push_str(name);
            listing.push('\n');
            if with_stat {
                listing.push_str(&node.stat_text());
                listing.push('\n');
            }
        }

        listing.push('\0');
        text(listing)
    }

    fn mkdir(&mut self, path: &str, mode: OpenMode, options: MkdirOptions) -> Reply {
        if options.contains(MkdirOptions::MAKE_PATH) {
            self.make_path(path, mode)?;
            return Ok(Bytes::new());
        }

        if self.nodes.contains_key(path) {
            return fail(ErrorCode::ItExists, path);
        }

        self.require_dir(parent(path)).or_else(|_| fail(ErrorCode::NotFound, path))?;
        self.insert(path, true, mode, Vec::new());
        Ok(Bytes::new())
    }

    fn open(&mut self, path: &str, mode: OpenMode, options: OpenOptions) -> Reply {
        match self.nodes.get(path) {
            Some(_) if options.contains(OpenOptions::NEW) => return fail(ErrorCode::ItExists, path),
            Some(node) if node.dir => return fail(ErrorCode::IsDirectory, path),
            Some(_) => {}
            None if options.contains(OpenOptions::NEW) => {
                if options.contains(OpenOptions::MAKE_PATH) {
                    self.make_path(parent(path), OpenMode::from_octal(0o755))?;
                }
                self.require_dir(parent(path))
                    .or_else(|_| fail(ErrorCode::NotFound, path))?;
                self.insert(path, false, mode, Vec::new());
            }
            None => return fail(ErrorCode::NotFound, path),
        }

        self.next_handle += 1;
        let handle = FileHandle::new(self.next_handle.to_be_bytes());
        let _ = self.handles.insert(handle, path.to_owned());

        let mut reply = BytesMut::new();
        reply.put_slice(handle.as_bytes());
        if options.contains(OpenOptions::RETURN_STATUS) {
            reply.put_slice(&[0; 8]);
            reply.put_slice(self.node(path)?.stat_text().as_bytes());
            reply.put_u8(0);
        }

        Ok(reply.freeze())
    }

    fn remove(&mut self, path: &str, dir: bool) -> Reply {
        let node = self.node(path)?;

        if dir && !node.dir {
            return fail(ErrorCode::NotFile, path);
        }
        if !dir && node.dir {
            return fail(ErrorCode::IsDirectory, path);
        }
        if dir && self.nodes.keys().any(|child| parent(child) == path && child != path) {
            return fail(ErrorCode::FsError, path);
        }

        let _ = self.nodes.remove(path);
        Ok(Bytes::new())
    }

    fn rename(&mut self, old: &str, new: &str) -> Reply {
        let _ = self.node(old)?;
        self.require_dir(parent(new))
            .or_else(|_| fail(ErrorCode::NotFound, new))?;

        let prefix = format!("{old}/");
        let moved: Vec<String> = self
            .nodes
            .keys()
            .filter(|path| path.as_str() == old || path.starts_with(&prefix))
            .cloned()
            .collect();

        for path in moved {
            if let Some(node) = self.nodes.remove(&path) {
                let target = format!("{new}{}", &path[old.len()..]);
                let _ = self.nodes.insert(target, node);
            }
        }

        Ok(Bytes::new())
    }

    fn truncate(&mut self, path: &str, handle: FileHandle, size: u64) -> Reply {
        let path = if path.is_empty() {
            self.open_path(handle)?
        } else {
            path.to_owned()
        };

        let node = self.node_mut(&path)?;
        if node.dir {
            return fail(ErrorCode::IsDirectory, &path);
        }

        node.data.resize(size as usize, 0);
        Ok(Bytes::new())
    }

    fn answer(&mut self, request: Request) -> Reply {
        match request {
            Request::Stat(stat) => self.stat(&stat.path, stat.handle, stat.options),
            Request::Dirlist(dirlist) => self.dirlist(&dirlist.path, dirlist.options),
            Request::Mkdir(mkdir) => self.mkdir(&mkdir.path, mkdir.mode, mkdir.options),
            Request::Open(open) => self.open(&open.path, open.mode, open.options),
            Request::Rm(rm) => self.remove(&rm.path, false),
            Request::Rmdir(rmdir) => self.remove(&rmdir.path, true),
            Request::Mv(mv) => self.rename(mv.old_path(), mv.new_path()),
            Request::Truncate(truncate) => {
                self.truncate(&truncate.path, truncate.handle, truncate.size)
            }
            Request::Chmod(chmod) => {
                self.node_mut(&chmod.path)?.mode = chmod.mode;
                Ok(Bytes::new())
            }
            Request::Read(read) => {
                let path = self.open_path(read.handle)?;
                let data = &self.node(&path)?.data;
                let start = (read.offset as usize).min(data.len());
                let end = (start + read.len as usize).min(data.len());
                Ok(Bytes::copy_from_slice(&data[start..end]))
            }
            Request::Write(write) => {
                let path = self.open_path(write.handle)?;
                let data = &mut self.node_mut(&path)?.data;
                let start = write.offset as usize;
                let end = start + write.data.len();
                if data.len() < end {
                    data.resize(end, 0);
                }
                data[start..end].copy_from_slice(&write.data);
                Ok(Bytes::new())
            }
            Request::Fsync(fsync) => self.open_path(fsync.handle).map(|_| Bytes::new()),
            Request::Close(close) => match self.handles.remove(&close.handle) {
                Some(_) => Ok(Bytes::new()),
                None => fail(ErrorCode::FileNotOpen, &format!("{:?}", close.handle)),
            },
        }
    }
}

/// [`Transport`] backed by an in-memory namespace holding only `/`
pub(crate) struct MockTransport {
    namespace: Mutex<Namespace>,
    requests: Mutex<Vec<Request>>,
    stalled: AtomicBool,
}

impl Default for MockTransport {
    fn default() -> Self {
        let mut namespace = Namespace::default();
        namespace.insert("/", true, OpenMode::from_octal(0o755), Vec::new());

        Self {
            namespace: Mutex::new(namespace),
            requests: Mutex::default(),
            stalled: AtomicBool::new(false),
        }
    }
}

impl MockTransport {
    pub(crate) const VFS_STAT: VirtualFSStat = VirtualFSStat {
        number_rw: 1,
        free_rw: 2048,
        utilization_rw: 37,
        number_staging: 0,
        free_staging: 0,
        utilization_staging: 0,
    };

    pub(crate) fn add_file(&self, path: &str, data: &[u8]) {
        self.namespace
            .lock()
            .unwrap()
            .insert(path, false, OpenMode::from_octal(0o644), data.to_vec());
    }

    pub(crate) fn contents(&self, path: &str) -> Option<Vec<u8>> {
        let namespace = self.namespace.lock().unwrap();
        namespace.nodes.get(path).map(|node| node.data.clone())
    }

    /// Requests received so far, in arrival order
    pub(crate) fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    /// Stop answering; pending calls only return once cancelled
    pub(crate) fn stall(&self) {
        self.stalled.store(true, Ordering::SeqCst);
    }

    fn answer(&self, request: Request) -> XrdResult<Bytes> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self.namespace.lock().unwrap().answer(request);
        Ok(reply?)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn call(&self, ctx: &CancellationToken, request: Request) -> XrdResult<Bytes> {
        if ctx.is_cancelled() {
            return Err(Error::Cancelled);
        }

        if self.stalled.load(Ordering::SeqCst) {
            self.requests.lock().unwrap().push(request);
            ctx.cancelled().await;
            return Err(Error::Cancelled);
        }

        self.answer(request)
    }
}
