//! File-based storage implementation.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use memmap2::Mmap;

use crate::error::{Result, SuggestError};
use crate::storage::{Storage, StorageInput, StorageOutput};

/// Configuration for [`FileStorage`].
#[derive(Debug, Clone)]
pub struct FileStorageConfig {
    /// Root directory of the storage.
    pub path: PathBuf,

    /// Buffer size for I/O operations.
    pub buffer_size: usize,

    /// Whether to sync writes immediately.
    pub sync_writes: bool,

    /// Whether inputs are served from memory-mapped files.
    pub use_mmap: bool,
}

impl FileStorageConfig {
    /// Create a configuration rooted at `path` with default settings.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        FileStorageConfig {
            path: path.as_ref().to_path_buf(),
            buffer_size: 65536, // 64KB buffer for better I/O performance
            sync_writes: false,
            use_mmap: false,
        }
    }
}

/// A file-based storage implementation.
#[derive(Debug)]
pub struct FileStorage {
    /// The root directory for storage.
    directory: PathBuf,
    /// Storage configuration.
    config: FileStorageConfig,
}

impl FileStorage {
    /// Create a new file storage, creating its directory if needed.
    pub fn new(config: FileStorageConfig) -> Result<Self> {
        let directory = config.path.clone();

        if !directory.exists() {
            std::fs::create_dir_all(&directory)
                .map_err(|e| SuggestError::storage(format!("Failed to create directory: {e}")))?;
        }

        if !directory.is_dir() {
            return Err(SuggestError::storage(format!(
                "Path is not a directory: {}",
                directory.display()
            )));
        }

        Ok(FileStorage { directory, config })
    }

    /// Get the root directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Get the full path for a file name.
    fn file_path(&self, name: &str) -> PathBuf {
        self.directory.join(name)
    }

    fn open_file(&self, name: &str) -> Result<File> {
        File::open(self.file_path(name)).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SuggestError::not_found(name)
            } else {
                SuggestError::Io(e)
            }
        })
    }
}

impl Storage for FileStorage {
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>> {
        let file = self.open_file(name)?;

        if self.config.use_mmap {
            Ok(Box::new(MmapInput::new(&file)?))
        } else {
            Ok(Box::new(FileInput::new(file, self.config.buffer_size)?))
        }
    }

    fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.file_path(name))?;

        Ok(Box::new(FileOutput::new(
            file,
            self.config.buffer_size,
            self.config.sync_writes,
        )))
    }

    fn file_exists(&self, name: &str) -> bool {
        self.file_path(name).is_file()
    }

    fn delete_file(&self, name: &str) -> Result<()> {
        let path = self.file_path(name);
        if path.exists() {
            std::fs::remove_file(&path)
                .map_err(|e| SuggestError::storage(format!("Failed to delete file: {e}")))?;
        }

        Ok(())
    }

    fn list_files(&self) -> Result<Vec<String>> {
        let mut files = Vec::new();

        for entry in std::fs::read_dir(&self.directory)? {
            let path = entry?.path();

            if path.is_file()
                && let Some(name) = path.file_name().and_then(|n| n.to_str())
            {
                files.push(name.to_string());
            }
        }

        files.sort();
        Ok(files)
    }

    fn file_size(&self, name: &str) -> Result<u64> {
        let metadata = self.file_path(name).metadata().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SuggestError::not_found(name)
            } else {
                SuggestError::Io(e)
            }
        })?;

        Ok(metadata.len())
    }
}

/// A buffered file input implementation.
#[derive(Debug)]
pub struct FileInput {
    reader: BufReader<File>,
    size: u64,
}

impl FileInput {
    fn new(file: File, buffer_size: usize) -> Result<Self> {
        let size = file
            .metadata()
            .map_err(|e| SuggestError::storage(format!("Failed to get file metadata: {e}")))?
            .len();

        Ok(FileInput {
            reader: BufReader::with_capacity(buffer_size, file),
            size,
        })
    }
}

impl Read for FileInput {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}

impl Seek for FileInput {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.reader.seek(pos)
    }
}

impl StorageInput for FileInput {
    fn size(&self) -> Result<u64> {
        Ok(self.size)
    }
}

/// A memory-mapped file input.
#[derive(Debug)]
pub struct MmapInput {
    mmap: Option<Mmap>,
    position: u64,
}

impl MmapInput {
    fn new(file: &File) -> Result<Self> {
        // Mapping an empty file fails on some platforms.
        let mmap = if file.metadata()?.len() == 0 {
            None
        } else {
            // SAFETY: index files are written once and never modified while a
            // reader has them open.
            Some(unsafe { Mmap::map(file)? })
        };

        Ok(MmapInput { mmap, position: 0 })
    }

    fn data(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or(&[])
    }
}

impl Read for MmapInput {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let data = self.data();
        let start = (self.position as usize).min(data.len());
        let n = buf.len().min(data.len() - start);

        buf[..n].copy_from_slice(&data[start..start + n]);
        self.position += n as u64;
        Ok(n)
    }
}

impl Seek for MmapInput {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        let len = self.data().len() as i64;
        let target = match pos {
            SeekFrom::Start(offset) => offset as i64,
            SeekFrom::End(offset) => len + offset,
            SeekFrom::Current(offset) => self.position as i64 + offset,
        };

        if target < 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Seek before start of file",
            ));
        }

        self.position = target as u64;
        Ok(self.position)
    }
}

impl StorageInput for MmapInput {
    fn size(&self) -> Result<u64> {
        Ok(self.data().len() as u64)
    }

    fn as_slice(&self) -> Option<&[u8]> {
        Some(self.data())
    }
}

/// A buffered file output implementation.
#[derive(Debug)]
pub struct FileOutput {
    writer: BufWriter<File>,
    sync_writes: bool,
    position: u64,
}

impl FileOutput {
    fn new(file: File, buffer_size: usize, sync_writes: bool) -> Self {
        FileOutput {
            writer: BufWriter::with_capacity(buffer_size, file),
            sync_writes,
            position: 0,
        }
    }
}

impl Write for FileOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let bytes_written = self.writer.write(buf)?;
        self.position += bytes_written as u64;

        if self.sync_writes {
            self.writer.flush()?;
        }

        Ok(bytes_written)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

impl StorageOutput for FileOutput {
    fn flush_and_sync(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| SuggestError::storage(format!("Failed to flush: {e}")))?;

        self.writer
            .get_ref()
            .sync_all()
            .map_err(|e| SuggestError::storage(format!("Failed to sync: {e}")))?;

        Ok(())
    }

    fn position(&self) -> u64 {
        self.position
    }

    fn close(&mut self) -> Result<()> {
        self.flush_and_sync()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage(use_mmap: bool) -> (TempDir, FileStorage) {
        let dir = TempDir::new().unwrap();
        let mut config = FileStorageConfig::new(dir.path());
        config.use_mmap = use_mmap;
        let storage = FileStorage::new(config).unwrap();
        (dir, storage)
    }

    #[test]
    fn test_file_storage_round_trip() {
        for use_mmap in [false, true] {
            let (_dir, storage) = storage(use_mmap);

            let mut output = storage.create_output("test.dl").unwrap();
            output.write_all(b"Hello, World!").unwrap();
            assert_eq!(output.position(), 13);
            output.close().unwrap();

            assert!(storage.file_exists("test.dl"));
            assert_eq!(storage.file_size("test.dl").unwrap(), 13);

            let mut input = storage.open_input("test.dl").unwrap();
            assert_eq!(input.size().unwrap(), 13);

            input.seek(SeekFrom::Start(7)).unwrap();
            let mut buffer = String::new();
            input.read_to_string(&mut buffer).unwrap();
            assert_eq!(buffer, "World!");
        }
    }

    #[test]
    fn test_mmap_input_seek_and_slice() {
        let (_dir, storage) = storage(true);

        let mut output = storage.create_output("words.dl").unwrap();
        output.write_all(b"0123456789").unwrap();
        output.close().unwrap();

        let mut input = storage.open_input("words.dl").unwrap();
        assert_eq!(input.as_slice(), Some(&b"0123456789"[..]));

        assert_eq!(input.seek(SeekFrom::End(-3)).unwrap(), 7);
        let mut tail = Vec::new();
        input.read_to_end(&mut tail).unwrap();
        assert_eq!(tail, b"789");

        input.seek(SeekFrom::Start(2)).unwrap();
        assert_eq!(input.seek(SeekFrom::Current(3)).unwrap(), 5);
        let mut buffer = [0u8; 2];
        input.read_exact(&mut buffer).unwrap();
        assert_eq!(&buffer, b"56");

        assert!(input.seek(SeekFrom::Current(-10)).is_err());
    }

    #[test]
    fn test_buffered_input_is_not_addressable() {
        let (_dir, storage) = storage(false);

        let mut output = storage.create_output("words.dl").unwrap();
        output.write_all(b"abc").unwrap();
        output.close().unwrap();

        assert!(storage.open_input("words.dl").unwrap().as_slice().is_none());
    }

    #[test]
    fn test_mmap_empty_file() {
        let (_dir, storage) = storage(true);

        let mut output = storage.create_output("empty").unwrap();
        output.close().unwrap();

        let mut input = storage.open_input("empty").unwrap();
        let mut buffer = Vec::new();
        input.read_to_end(&mut buffer).unwrap();
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let (_dir, storage) = storage(false);
        assert!(!storage.file_exists("missing"));
        assert!(storage.open_input("missing").is_err());
        assert!(storage.delete_file("missing").is_ok());
    }

    #[test]
    fn test_list_files() {
        let (_dir, storage) = storage(false);

        for name in ["b.hd", "a.dl"] {
            let mut output = storage.create_output(name).unwrap();
            output.write_all(b"x").unwrap();
            output.close().unwrap();
        }

        assert_eq!(storage.list_files().unwrap(), vec!["a.dl", "b.hd"]);

        storage.delete_file("a.dl").unwrap();
        assert_eq!(storage.list_files().unwrap(), vec!["b.hd"]);
    }
}
