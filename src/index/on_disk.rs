//! On-disk persistence of inverted lists.
//!
//! An index named `words` occupies two files in a [`Storage`]:
//!
//! - `words.dl`: the encoded posting lists, concatenated in term order.
//! - `words.hd`: the header locating every list inside the payload.
//!
//! Header layout, all integers little-endian:
//!
//! ```text
//! u32 term_count
//! term_count x { varint term_len, term bytes, u64 offset, u32 byte_length, u32 element_count }
//! u32 crc32 of all preceding header bytes
//! ```
//!
//! The codec is not recorded; the reader must be opened with the codec the
//! writer used.

use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use std::sync::Arc;
use std::time::Instant;

use ahash::AHashMap;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::{debug, info};
use parking_lot::Mutex;

use crate::compression::{Codec, Position, PostingList};
use crate::error::{Result, SuggestError};
use crate::index::InvertedLists;
use crate::merger::ListIterator;
use crate::storage::{Storage, StorageInput};
use crate::util::varint;

/// Extension of the header file.
pub const HEADER_EXTENSION: &str = "hd";

/// Extension of the payload file.
pub const PAYLOAD_EXTENSION: &str = "dl";

const CHECKSUM_LEN: usize = 4;

/// Smallest header entry: one byte term length, offset, byte length, count.
const MIN_ENTRY_LEN: usize = 1 + 8 + 4 + 4;

/// Name of the header file of index `name`.
pub fn header_file_name(name: &str) -> String {
    format!("{name}.{HEADER_EXTENSION}")
}

/// Name of the payload file of index `name`.
pub fn payload_file_name(name: &str) -> String {
    format!("{name}.{PAYLOAD_EXTENSION}")
}

/// Location of one posting list inside the payload file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderEntry {
    /// Byte offset of the list in the payload.
    pub offset: u64,
    /// Encoded size in bytes.
    pub length: u32,
    /// Number of positions in the list.
    pub count: u32,
}

/// Writes inverted lists into a storage.
#[derive(Debug)]
pub struct OnDiskWriter {
    storage: Arc<dyn Storage>,
    codec: Codec,
    name: String,
}

impl OnDiskWriter {
    pub fn new<S: Into<String>>(storage: Arc<dyn Storage>, codec: Codec, name: S) -> Self {
        OnDiskWriter {
            storage,
            codec,
            name: name.into(),
        }
    }

    /// Persist `lists`, replacing any index stored under the same name.
    pub fn save(&self, lists: &InvertedLists) -> Result<()> {
        let start = Instant::now();

        let mut sorted: Vec<(&String, &PostingList)> = lists.iter().collect();
        sorted.sort_unstable_by(|a, b| a.0.cmp(b.0));

        let mut header = Vec::new();
        header.write_u32::<LittleEndian>(Self::checked_u32(sorted.len(), "term count")?)?;

        let mut payload = self.storage.create_output(&payload_file_name(&self.name))?;
        let mut offset = 0u64;

        for (term, list) in sorted {
            let bytes = self.codec.encode(list);
            payload.write_all(&bytes)?;

            varint::write_u32(&mut header, Self::checked_u32(term.len(), "term length")?)?;
            header.write_all(term.as_bytes())?;
            header.write_u64::<LittleEndian>(offset)?;
            header.write_u32::<LittleEndian>(Self::checked_u32(bytes.len(), "list size")?)?;
            header.write_u32::<LittleEndian>(Self::checked_u32(list.len(), "list length")?)?;

            offset += bytes.len() as u64;
        }
        payload.close()?;

        let checksum = crc32fast::hash(&header);
        header.write_u32::<LittleEndian>(checksum)?;

        let mut output = self.storage.create_output(&header_file_name(&self.name))?;
        output.write_all(&header)?;
        output.close()?;

        info!(
            "Saved index '{}': {} terms, {} payload bytes, {} header bytes ({}) in {:?}",
            self.name,
            lists.len(),
            offset,
            header.len(),
            self.codec.codec().name(),
            start.elapsed()
        );

        Ok(())
    }

    fn checked_u32(value: usize, what: &str) -> Result<u32> {
        u32::try_from(value)
            .map_err(|_| SuggestError::index(format!("{what} {value} does not fit in 32 bits")))
    }
}

/// Source of encoded posting lists.
#[derive(Debug)]
enum Payload {
    /// Addressable input, sliced without locking.
    Mapped(Box<dyn StorageInput>),
    /// Stream input, one seek and read at a time.
    Streamed(Mutex<Box<dyn StorageInput>>),
}

impl Payload {
    fn new(input: Box<dyn StorageInput>) -> Self {
        if input.as_slice().is_some() {
            Payload::Mapped(input)
        } else {
            Payload::Streamed(Mutex::new(input))
        }
    }

    fn read(&self, entry: &HeaderEntry, codec: Codec) -> Result<PostingList> {
        match self {
            Payload::Mapped(input) => {
                let data = input
                    .as_slice()
                    .ok_or_else(|| SuggestError::storage("Payload is no longer addressable"))?;
                let bytes = usize::try_from(entry.offset)
                    .ok()
                    .and_then(|start| Some(start..start.checked_add(entry.length as usize)?))
                    .and_then(|range| data.get(range))
                    .ok_or_else(|| {
                        SuggestError::index(format!(
                            "List at offset {} overruns the payload",
                            entry.offset
                        ))
                    })?;
                codec.decode(bytes)
            }
            Payload::Streamed(input) => {
                let mut bytes = vec![0u8; entry.length as usize];
                {
                    let mut input = input.lock();
                    input.seek(SeekFrom::Start(entry.offset))?;
                    input.read_exact(&mut bytes)?;
                }
                codec.decode(&bytes)
            }
        }
    }
}

/// Reads posting lists written by [`OnDiskWriter`].
///
/// The header is loaded and verified on open; lists are read from the
/// payload on demand. Memory-mapped and in-memory payloads are sliced
/// directly, so concurrent reads do not contend.
#[derive(Debug)]
pub struct OnDiskReader {
    codec: Codec,
    name: String,
    entries: AHashMap<String, HeaderEntry>,
    payload: Payload,
}

impl OnDiskReader {
    /// Open the index `name` stored in `storage`.
    pub fn open<S: Into<String>>(storage: Arc<dyn Storage>, codec: Codec, name: S) -> Result<Self> {
        let name = name.into();
        let start = Instant::now();

        let mut header = Vec::new();
        storage
            .open_input(&header_file_name(&name))?
            .read_to_end(&mut header)?;

        let payload = storage.open_input(&payload_file_name(&name))?;
        let payload_size = payload.size()?;

        let entries = Self::parse_header(&header, payload_size)?;

        info!(
            "Opened index '{}': {} terms in {:?}",
            name,
            entries.len(),
            start.elapsed()
        );

        Ok(OnDiskReader {
            codec,
            name,
            entries,
            payload: Payload::new(payload),
        })
    }

    fn parse_header(header: &[u8], payload_size: u64) -> Result<AHashMap<String, HeaderEntry>> {
        if header.len() < 4 + CHECKSUM_LEN {
            return Err(SuggestError::index(format!(
                "Header too short: {} bytes",
                header.len()
            )));
        }

        let (body, stored) = header.split_at(header.len() - CHECKSUM_LEN);
        let stored = Cursor::new(stored).read_u32::<LittleEndian>()?;
        let computed = crc32fast::hash(body);
        if stored != computed {
            return Err(SuggestError::index(format!(
                "Header checksum mismatch: stored {stored:08x}, computed {computed:08x}"
            )));
        }

        let mut cursor = Cursor::new(body);
        let term_count = cursor.read_u32::<LittleEndian>()?;
        let max_terms = (body.len() - 4) / MIN_ENTRY_LEN;
        if term_count as usize > max_terms {
            return Err(SuggestError::index(format!(
                "Header declares {term_count} terms but holds at most {max_terms}"
            )));
        }
        let mut entries = AHashMap::with_capacity(term_count as usize);

        for _ in 0..term_count {
            let term_len = varint::read_u32(&mut cursor)? as u64;
            let remaining = body.len() as u64 - cursor.position();
            if term_len > remaining {
                return Err(SuggestError::index(format!(
                    "Term length {term_len} exceeds the {remaining} remaining header bytes"
                )));
            }
            let mut term = vec![0u8; term_len as usize];
            cursor.read_exact(&mut term)?;
            let term = String::from_utf8(term)
                .map_err(|e| SuggestError::index(format!("Term is not valid UTF-8: {e}")))?;

            let entry = HeaderEntry {
                offset: cursor.read_u64::<LittleEndian>()?,
                length: cursor.read_u32::<LittleEndian>()?,
                count: cursor.read_u32::<LittleEndian>()?,
            };

            let end = entry.offset.saturating_add(entry.length as u64);
            if end > payload_size {
                return Err(SuggestError::index(format!(
                    "List of term {term:?} ends at {end} beyond payload size {payload_size}"
                )));
            }

            entries.insert(term, entry);
        }

        if cursor.position() != body.len() as u64 {
            return Err(SuggestError::index("Trailing bytes after header entries"));
        }

        Ok(entries)
    }

    /// Name of the index.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Codec the payload is decoded with.
    pub fn codec(&self) -> Codec {
        self.codec
    }

    /// Number of terms in the index.
    pub fn term_count(&self) -> usize {
        self.entries.len()
    }

    /// All terms, sorted.
    pub fn terms(&self) -> Vec<&str> {
        let mut terms: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        terms.sort_unstable();
        terms
    }

    /// Header entry of `term`.
    pub fn entry(&self, term: &str) -> Option<HeaderEntry> {
        self.entries.get(term).copied()
    }

    /// Read and decode the posting list of `term`.
    pub fn get(&self, term: &str) -> Result<Option<PostingList>> {
        match self.entries.get(term) {
            Some(entry) => self.read_list(entry).map(Some),
            None => Ok(None),
        }
    }

    /// Read and decode every posting list.
    pub fn load(&self) -> Result<InvertedLists> {
        let mut lists = InvertedLists::with_capacity(self.entries.len());
        for (term, entry) in &self.entries {
            lists.insert(term.clone(), self.read_list(entry)?);
        }
        Ok(lists)
    }

    /// A lazy iterator over the posting list of `term`.
    ///
    /// Nothing is read until the iterator is first used.
    pub fn iterator(&self, term: &str) -> Option<OnDiskListIterator<'_>> {
        self.entries
            .get(term)
            .map(|entry| OnDiskListIterator::new(self, *entry))
    }

    /// Whether lists are sliced from an addressable payload.
    pub fn is_mapped(&self) -> bool {
        matches!(self.payload, Payload::Mapped(_))
    }

    fn read_list(&self, entry: &HeaderEntry) -> Result<PostingList> {
        let list = self.payload.read(entry, self.codec)?;
        if list.len() != entry.count as usize {
            return Err(SuggestError::index(format!(
                "Decoded {} positions at offset {}, header records {}",
                list.len(),
                entry.offset,
                entry.count
            )));
        }

        debug!("Read {} positions from offset {}", list.len(), entry.offset);
        Ok(list)
    }
}

/// A forward-only iterator over one stored posting list.
///
/// The list is read and decoded on first access, so storage and codec
/// errors surface from the [`ListIterator`] methods.
#[derive(Debug)]
pub struct OnDiskListIterator<'a> {
    reader: &'a OnDiskReader,
    entry: HeaderEntry,
    list: Option<PostingList>,
    index: usize,
}

impl<'a> OnDiskListIterator<'a> {
    fn new(reader: &'a OnDiskReader, entry: HeaderEntry) -> Self {
        OnDiskListIterator {
            reader,
            entry,
            list: None,
            index: 0,
        }
    }

    /// Whether the list has been read from storage yet.
    pub fn is_loaded(&self) -> bool {
        self.list.is_some()
    }

    fn list(&mut self) -> Result<&[Position]> {
        if self.list.is_none() {
            self.list = Some(self.reader.read_list(&self.entry)?);
        }
        Ok(self.list.as_deref().unwrap_or_default())
    }
}

impl ListIterator for OnDiskListIterator<'_> {
    fn len(&self) -> usize {
        self.entry.count as usize
    }

    fn current(&mut self) -> Result<Option<Position>> {
        let index = self.index;
        Ok(self.list()?.get(index).copied())
    }

    fn advance(&mut self) -> Result<Option<Position>> {
        let len = self.list()?.len();
        if self.index < len {
            self.index += 1;
        }
        self.current()
    }

    fn lower_bound(&mut self, target: Position) -> Result<Option<Position>> {
        let index = self.index;
        let list = self.list()?;
        if index >= list.len() {
            return Ok(None);
        }

        let found = index + list[index..].partition_point(|&position| position < target);
        self.index = found;
        Ok(self.list()?.get(found).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::file::{FileStorage, FileStorageConfig};
    use crate::storage::memory::MemoryStorage;

    fn sample_lists() -> InvertedLists {
        let mut lists = InvertedLists::new();
        lists.insert("$a".to_string(), vec![0, 3, 9]);
        lists.insert("ab".to_string(), vec![1, 2, 3, 1000, 70_000]);
        lists.insert("b$".to_string(), vec![7]);
        lists
    }

    fn saved(codec: Codec) -> (Arc<MemoryStorage>, OnDiskReader) {
        let storage = Arc::new(MemoryStorage::new_default());
        OnDiskWriter::new(storage.clone(), codec, "sample")
            .save(&sample_lists())
            .unwrap();
        let reader = OnDiskReader::open(storage.clone(), codec, "sample").unwrap();
        (storage, reader)
    }

    #[test]
    fn test_save_and_load() {
        for codec in [Codec::FixedWidth, Codec::DeltaVarint] {
            let (storage, reader) = saved(codec);

            assert!(storage.file_exists("sample.hd"));
            assert!(storage.file_exists("sample.dl"));
            assert_eq!(reader.term_count(), 3);
            assert_eq!(reader.terms(), vec!["$a", "ab", "b$"]);
            assert_eq!(reader.load().unwrap(), sample_lists());
            assert_eq!(reader.get("ab").unwrap(), Some(vec![1, 2, 3, 1000, 70_000]));
            assert_eq!(reader.get("zz").unwrap(), None);
        }
    }

    #[test]
    fn test_payload_is_concatenated_in_term_order() {
        let (storage, reader) = saved(Codec::FixedWidth);

        assert_eq!(storage.file_size("sample.dl").unwrap(), 4 * 9);
        assert_eq!(
            reader.entry("$a"),
            Some(HeaderEntry { offset: 0, length: 12, count: 3 })
        );
        assert_eq!(
            reader.entry("b$"),
            Some(HeaderEntry { offset: 32, length: 4, count: 1 })
        );
    }

    #[test]
    fn test_corrupted_header() {
        let (storage, _) = saved(Codec::DeltaVarint);

        let mut header = Vec::new();
        storage
            .open_input("sample.hd")
            .unwrap()
            .read_to_end(&mut header)
            .unwrap();
        header[5] ^= 0xFF;
        storage.put("sample.hd", header);

        let error = OnDiskReader::open(storage, Codec::DeltaVarint, "sample").unwrap_err();
        assert!(error.to_string().contains("checksum"));
    }

    fn put_header(storage: &MemoryStorage, mut body: Vec<u8>) {
        let checksum = crc32fast::hash(&body);
        body.write_u32::<LittleEndian>(checksum).unwrap();
        storage.put("sample.hd", body);
    }

    #[test]
    fn test_header_with_oversized_term_count() {
        let (storage, _) = saved(Codec::DeltaVarint);
        put_header(&storage, u32::MAX.to_le_bytes().to_vec());

        let error = OnDiskReader::open(storage, Codec::DeltaVarint, "sample").unwrap_err();
        assert!(matches!(error, SuggestError::Index(_)), "{error}");
    }

    #[test]
    fn test_header_with_oversized_term_length() {
        let (storage, _) = saved(Codec::DeltaVarint);

        let mut body = 1u32.to_le_bytes().to_vec();
        varint::write_u32(&mut body, u32::MAX).unwrap();
        body.extend_from_slice(&[0u8; MIN_ENTRY_LEN]);
        put_header(&storage, body);

        let error = OnDiskReader::open(storage, Codec::DeltaVarint, "sample").unwrap_err();
        assert!(matches!(error, SuggestError::Index(_)), "{error}");
    }

    #[test]
    fn test_concurrent_reads() {
        let dir = tempfile::TempDir::new().unwrap();

        for use_mmap in [false, true] {
            let mut config = FileStorageConfig::new(dir.path());
            config.use_mmap = use_mmap;
            let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(config).unwrap());

            OnDiskWriter::new(storage.clone(), Codec::DeltaVarint, "sample")
                .save(&sample_lists())
                .unwrap();
            let reader = OnDiskReader::open(storage, Codec::DeltaVarint, "sample").unwrap();
            assert_eq!(reader.is_mapped(), use_mmap);

            std::thread::scope(|scope| {
                for _ in 0..4 {
                    scope.spawn(|| {
                        for _ in 0..50 {
                            assert_eq!(reader.load().unwrap(), sample_lists());
                        }
                    });
                }
            });
        }
    }

    #[test]
    fn test_missing_index() {
        let storage = Arc::new(MemoryStorage::new_default());
        assert!(OnDiskReader::open(storage, Codec::DeltaVarint, "absent").is_err());
    }

    #[test]
    fn test_lazy_iterator() {
        let (_, reader) = saved(Codec::DeltaVarint);
        let mut iter = reader.iterator("ab").unwrap();

        assert!(!iter.is_loaded());
        assert_eq!(iter.len(), 5);
        assert!(!iter.is_loaded());

        assert_eq!(iter.current().unwrap(), Some(1));
        assert!(iter.is_loaded());
        assert_eq!(iter.advance().unwrap(), Some(2));
        assert_eq!(iter.lower_bound(4).unwrap(), Some(1000));
        assert_eq!(iter.lower_bound(10).unwrap(), Some(1000));
        assert_eq!(iter.lower_bound(70_001).unwrap(), None);
        assert_eq!(iter.advance().unwrap(), None);

        assert!(reader.iterator("zz").is_none());
    }

    #[test]
    fn test_empty_index() {
        let storage = Arc::new(MemoryStorage::new_default());
        OnDiskWriter::new(storage.clone(), Codec::FixedWidth, "empty")
            .save(&InvertedLists::new())
            .unwrap();

        let reader = OnDiskReader::open(storage, Codec::FixedWidth, "empty").unwrap();
        assert_eq!(reader.term_count(), 0);
        assert!(reader.load().unwrap().is_empty());
    }
}
