//! File resolution for control files and the resources they name
//!
//! Control files refer to coefficient files and input data by name. A
//! [`FileResolver`] turns those names into readers and writers, so the same
//! parsing code runs against a directory on disk or an in-memory fixture.

use crate::{Error, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// Opens named resources for reading and writing
pub trait FileResolver: Send + Sync {
    /// Open a named resource for reading
    fn resolve_for_input(&self, name: &str) -> Result<Box<dyn BufRead>>;

    /// Open a named resource for writing, replacing any previous content
    fn resolve_for_output(&self, name: &str) -> Result<Box<dyn Write>>;

    /// Human readable location of a named resource
    fn describe(&self, name: &str) -> String;

    /// A resolver for names relative to `path`
    fn relative(&self, path: &str) -> Result<Box<dyn FileResolver>>;
}

/// Resolves names against a base directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSystemResolver {
    base: PathBuf,
}

impl FileSystemResolver {
    /// Resolve names relative to `base`
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Resolve names relative to the directory containing `file`
    pub fn for_file(file: &Path) -> Self {
        let base = file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(base)
    }

    /// Full path of a named resource; absolute names are used as given
    pub fn to_path(&self, name: &str) -> PathBuf {
        self.base.join(name)
    }

    /// Base directory
    pub fn base(&self) -> &Path {
        &self.base
    }
}

impl FileResolver for FileSystemResolver {
    fn resolve_for_input(&self, name: &str) -> Result<Box<dyn BufRead>> {
        let path = self.to_path(name);
        debug!("Opening {} for input", path.display());
        match File::open(&path) {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(Error::resource_not_found(path.display().to_string()))
            }
            Err(e) => Err(Error::io(format!("Failed to open {}", path.display()), e)),
        }
    }

    fn resolve_for_output(&self, name: &str) -> Result<Box<dyn Write>> {
        let path = self.to_path(name);
        debug!("Opening {} for output", path.display());
        let file = File::create(&path)
            .map_err(|e| Error::io(format!("Failed to create {}", path.display()), e))?;
        Ok(Box::new(file))
    }

    fn describe(&self, name: &str) -> String {
        self.to_path(name).display().to_string()
    }

    fn relative(&self, path: &str) -> Result<Box<dyn FileResolver>> {
        Ok(Box::new(Self::new(self.to_path(path))))
    }
}

const POISONED_STORAGE: &str = "memory resolver storage is poisoned";

/// Resolves names against an in-memory set of files
///
/// Clones share the same storage, so output written through one handle can be
/// read back through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    prefix: String,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file
    pub fn with_file(self, name: &str, content: impl Into<Vec<u8>>) -> Result<Self> {
        self.insert(name, content)?;
        Ok(self)
    }

    /// Add or replace a file
    pub fn insert(&self, name: &str, content: impl Into<Vec<u8>>) -> Result<()> {
        self.files()?.insert(self.full_name(name), content.into());
        Ok(())
    }

    /// Remove a file, returning its content
    pub fn remove(&self, name: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.files()?.remove(&self.full_name(name)))
    }

    /// Content of a file, if it exists
    pub fn content(&self, name: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.files()?.get(&self.full_name(name)).cloned())
    }

    fn files(&self) -> Result<MutexGuard<'_, HashMap<String, Vec<u8>>>> {
        self.files.lock().map_err(|_| {
            Error::io(
                "Failed to access in-memory files",
                std::io::Error::other(POISONED_STORAGE),
            )
        })
    }

    fn full_name(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }
}

/// Writer that stores its content in the shared map when dropped
struct MemoryWriter {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    name: String,
    buffer: Vec<u8>,
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| std::io::Error::other(POISONED_STORAGE))?;
        files.insert(self.name.clone(), self.buffer.clone());
        Ok(())
    }
}

impl Drop for MemoryWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

impl FileResolver for MemoryResolver {
    fn resolve_for_input(&self, name: &str) -> Result<Box<dyn BufRead>> {
        let content = self
            .content(name)?
            .ok_or_else(|| Error::resource_not_found(self.describe(name)))?;
        Ok(Box::new(Cursor::new(content)))
    }

    fn resolve_for_output(&self, name: &str) -> Result<Box<dyn Write>> {
        Ok(Box::new(MemoryWriter {
            files: Arc::clone(&self.files),
            name: self.full_name(name),
            buffer: Vec::new(),
        }))
    }

    fn describe(&self, name: &str) -> String {
        format!("memory:{}", self.full_name(name))
    }

    fn relative(&self, path: &str) -> Result<Box<dyn FileResolver>> {
        let mut prefix = self.full_name(path);
        if !prefix.is_empty() && !prefix.ends_with('/') {
            prefix.push('/');
        }
        Ok(Box::new(Self {
            files: Arc::clone(&self.files),
            prefix,
        }))
    }
}
