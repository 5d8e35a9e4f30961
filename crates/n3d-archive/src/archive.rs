//! N3D container reader over memory-mapped index and data files.

use std::ffi::OsString;
use std::fs::File;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use n3d_common::BinaryReader;

use crate::entry::{SegmentDescriptor, SegmentEntry};
use crate::kind::{classify, SegmentKind};
use crate::{Error, Result, DATA_EXTENSION, HEADER_EXTENSION, SEGMENT_COUNT_OFFSET};

/// Backing bytes of the data file.
enum Storage {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl Deref for Storage {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Storage::Mapped(mmap) => mmap,
            Storage::Owned(data) => data,
        }
    }
}

/// Strip the final extension from a container path.
///
/// `stage1.n3dhdr`, `stage1.n3ddta` and `stage1` all resolve to `stage1`.
/// A path that would strip down to nothing (such as `.n3dhdr`) is kept as-is.
pub fn container_stem(path: &Path) -> PathBuf {
    let stripped = path.with_extension("");
    match stripped.file_name() {
        Some(name) if !name.is_empty() => stripped,
        _ => path.to_path_buf(),
    }
}

fn sibling(stem: &Path, extension: &str) -> PathBuf {
    let mut path = OsString::from(stem.as_os_str());
    path.push(".");
    path.push(extension);
    PathBuf::from(path)
}

fn map_file(path: &Path) -> Result<Mmap> {
    let file = File::open(path)?;
    // SAFETY: the map is read-only and the containers are not expected to
    // change while being extracted.
    Ok(unsafe { Mmap::map(&file)? })
}

/// A segment resolved from the data file.
///
/// The bytes are borrowed straight from the archive; nothing is copied.
#[derive(Debug, Clone)]
pub struct Segment<'a> {
    descriptor: SegmentDescriptor,
    data: &'a [u8],
    kind: SegmentKind,
}

impl<'a> Segment<'a> {
    /// Table position, offset, length and name.
    #[inline]
    pub fn descriptor(&self) -> &SegmentDescriptor {
        &self.descriptor
    }

    /// The segment bytes, starting with the embedded name.
    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Sniffed kind.
    #[inline]
    pub fn kind(&self) -> SegmentKind {
        self.kind
    }

    /// Position of the segment in the table.
    #[inline]
    pub fn index(&self) -> usize {
        self.descriptor.index()
    }

    /// Segment name.
    #[inline]
    pub fn name(&self) -> &str {
        self.descriptor.name()
    }
}

/// An opened N3D container.
///
/// The segment table is parsed up front; segment bytes are resolved lazily
/// through [`segments`](Self::segments). The data file stays mapped until the
/// archive is dropped.
pub struct N3dArchive {
    name: String,
    data: Storage,
    entries: Vec<SegmentEntry>,
}

impl N3dArchive {
    /// Open a container from the path of either file, or from the bare stem.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let stem = container_stem(path.as_ref());

        let name = stem
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        let header = map_file(&sibling(&stem, HEADER_EXTENSION))?;
        let entries = Self::parse_entries(&header)?;
        let data = map_file(&sibling(&stem, DATA_EXTENSION))?;

        tracing::debug!(
            container = %name,
            segments = entries.len(),
            data_len = data.len(),
            "opened container"
        );

        Ok(Self {
            name,
            data: Storage::Mapped(data),
            entries,
        })
    }

    /// Build a container from in-memory index and data files.
    pub fn from_bytes(name: impl Into<String>, header: &[u8], data: Vec<u8>) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            entries: Self::parse_entries(header)?,
            data: Storage::Owned(data),
        })
    }

    /// Read the segment count and the full segment table.
    ///
    /// The table must be complete; a short index means nothing in it can be
    /// trusted.
    fn parse_entries(header: &[u8]) -> Result<Vec<SegmentEntry>> {
        let mut reader = BinaryReader::new_at(header, SEGMENT_COUNT_OFFSET);

        let count = reader.read_i32()?;
        let count = usize::try_from(count).map_err(|_| Error::InvalidSegmentCount(count))?;

        let table_len = count.saturating_mul(SegmentEntry::SIZE);
        if reader.remaining() < table_len {
            return Err(n3d_common::Error::UnexpectedEof {
                needed: table_len,
                available: reader.remaining(),
            }
            .into());
        }

        (0..count)
            .map(|_| reader.read_struct::<SegmentEntry>().map_err(Error::from))
            .collect()
    }

    /// Container name (the file stem).
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of segments declared by the index.
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.entries.len()
    }

    /// Raw table entries, in table order.
    #[inline]
    pub fn entries(&self) -> &[SegmentEntry] {
        &self.entries
    }

    /// Iterate over segments in table order.
    ///
    /// Each item is resolved on demand. Errors for which
    /// [`Error::is_fatal`] is false only concern that one segment.
    #[inline]
    pub fn segments(&self) -> Segments<'_> {
        Segments {
            archive: self,
            next: 0,
        }
    }

    /// Resolve a single segment by table index.
    pub fn segment(&self, index: usize) -> Result<Segment<'_>> {
        let entry = self.entries.get(index).ok_or(Error::SegmentNotFound {
            index,
            count: self.entries.len(),
        })?;
        self.resolve(index, *entry)
    }

    fn resolve(&self, index: usize, entry: SegmentEntry) -> Result<Segment<'_>> {
        let data: &[u8] = &self.data;

        let in_bounds = (entry.offset as usize)
            .checked_add(entry.length as usize)
            .is_some_and(|end| end <= data.len());
        if !in_bounds {
            return Err(Error::MissingDataSegment {
                index,
                offset: entry.offset,
                length: entry.length,
                available: data.len(),
            });
        }

        // The name is peeked, not consumed: it is also the start of the payload.
        let mut reader = BinaryReader::new_at(data, entry.offset as usize);
        let name = reader.peek_display_cstring()?;
        let bytes = reader.read_bytes(entry.length as usize)?;

        Ok(Segment {
            descriptor: SegmentDescriptor::new(index, entry, name),
            data: bytes,
            kind: classify(bytes),
        })
    }
}

/// Lazy iterator over the segments of an [`N3dArchive`].
pub struct Segments<'a> {
    archive: &'a N3dArchive,
    next: usize,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Result<Segment<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = *self.archive.entries.get(self.next)?;
        let index = self.next;
        self.next += 1;
        Some(self.archive.resolve(index, entry))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.archive.entries.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Segments<'_> {}
