use std::{fs::File, ops::Deref, path::Path};

use memmap2::{Mmap, MmapOptions};
use tracing::{debug, warn};

use crate::error::{Error, Result};

enum Backing {
    Mapped(Mmap),
    Owned(Box<[u8]>),
}

/// The whole input, read-only, for the length of a run.
///
/// Normally a private memory map of the file. Nothing ever writes through it, so every worker
/// can read it at once without any locking. Tables hold slices borrowed from here, so it has to
/// stay alive until they've been turned into a [`crate::Summary`].
pub struct RawBuffer {
    backing: Backing,
}

impl RawBuffer {
    /// Map `path` into memory. The file must not change while it's mapped.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_owned(),
            source,
        })?;
        // SAFETY: the map is read-only, and files that change underneath us aren't supported.
        let mmap = unsafe { MmapOptions::new().map(&file) }.map_err(|source| Error::Map {
            path: path.to_owned(),
            source,
        })?;
        advise(&mmap);
        debug!(path = %path.display(), len = mmap.len(), "mapped input");
        Ok(Self {
            backing: Backing::Mapped(mmap),
        })
    }

    /// Wrap bytes that are already in memory.
    pub fn from_bytes(bytes: impl Into<Box<[u8]>>) -> Self {
        Self {
            backing: Backing::Owned(bytes.into()),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match &self.backing {
            Backing::Mapped(mmap) => &mmap[..],
            Backing::Owned(bytes) => &bytes[..],
        }
    }

    #[cfg(test)]
    fn is_mapped(&self) -> bool {
        matches!(self.backing, Backing::Mapped(_))
    }
}

impl Deref for RawBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

// we read front to back exactly once, tell the kernel so it can read ahead
#[cfg(unix)]
fn advise(mmap: &Mmap) {
    use memmap2::Advice;

    for advice in [Advice::Sequential, Advice::WillNeed] {
        if let Err(err) = mmap.advise(advice) {
            warn!(?advice, %err, "madvise failed, continuing without it");
        }
    }
}

#[cfg(not(unix))]
fn advise(_mmap: &Mmap) {}
