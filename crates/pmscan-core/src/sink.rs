//! Output sinks: report and CSV files written through tmp → rename

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Buffered file writer with atomic tmp → rename on `finish`.
///
/// Until `finish` succeeds the final path is untouched, so a failed run
/// never leaves a half-written report behind.
pub struct AtomicFile {
    writer: BufWriter<File>,
    tmp_path: PathBuf,
    final_path: PathBuf,
    bytes: u64,
}

impl std::fmt::Debug for AtomicFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtomicFile")
            .field("final_path", &self.final_path)
            .field("bytes", &self.bytes)
            .finish_non_exhaustive()
    }
}

impl AtomicFile {
    /// Create `<path>.tmp` next to `path`, removing a stale one first.
    pub fn create(path: &Path) -> io::Result<Self> {
        let file_name = path.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a file path: {}", path.display()),
            )
        })?;
        let mut tmp_name = file_name.to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = path.with_file_name(tmp_name);

        if tmp_path.exists() {
            fs::remove_file(&tmp_path)?;
        }

        let file = File::create(&tmp_path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            tmp_path,
            final_path: path.to_path_buf(),
            bytes: 0,
        })
    }

    /// Destination path (where the file lands after `finish`)
    pub fn path(&self) -> &Path {
        &self.final_path
    }

    /// Flush and atomically rename tmp → final. Returns bytes written.
    pub fn finish(mut self) -> io::Result<u64> {
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;
        fs::rename(&self.tmp_path, &self.final_path)?;
        Ok(self.bytes)
    }
}

impl Write for AtomicFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.writer.write(buf)?;
        self.bytes += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Write a whole report string atomically.
pub fn write_atomic(path: &Path, contents: &str) -> io::Result<u64> {
    let mut file = AtomicFile::create(path)?;
    file.write_all(contents.as_bytes())?;
    file.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn finish_renames_tmp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.txt");

        let mut file = AtomicFile::create(&path).unwrap();
        assert!(dir.path().join("report.txt.tmp").exists());
        assert!(!path.exists());

        file.write_all(b"hello\n").unwrap();
        assert_eq!(file.finish().unwrap(), 6);

        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
        assert!(!dir.path().join("report.txt.tmp").exists());
    }

    #[test]
    fn dropped_file_leaves_destination_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("article_ids.csv");
        fs::write(&path, "old").unwrap();

        {
            let mut file = AtomicFile::create(&path).unwrap();
            file.write_all(b"new").unwrap();
        }

        assert_eq!(fs::read_to_string(&path).unwrap(), "old");
    }

    #[test]
    fn stale_tmp_is_replaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(dir.path().join("out.txt.tmp"), "stale garbage").unwrap();

        write_atomic(&path, "fresh").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh");
    }

    #[test]
    fn create_rejects_directory_like_path() {
        let err = AtomicFile::create(Path::new("/")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
