use super::{relative_path, DirEntry, FileSystem, FileType};
use crate::error::FsError;
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Workspace accessor rooted at a directory on disk.
pub struct ChrootFileSystem {
    base: PathBuf,
}

impl ChrootFileSystem {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, FsError> {
        let path = path.as_ref();
        let base = path.canonicalize().map_err(|source| FsError::RootNotFound {
            path: path.to_path_buf(),
            source,
        })?;

        if !base.is_dir() {
            return Err(FsError::NotADirectory(base));
        }

        Ok(Self { base })
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Joins a relative path onto the root. Symlinks pointing outside the
    /// root are rejected once they exist on disk.
    fn resolve(&self, path: &Path) -> Option<PathBuf> {
        let relative = relative_path(path)?;
        let joined = self.base.join(relative);

        match joined.canonicalize() {
            Ok(real) if !real.starts_with(&self.base) => None,
            _ => Some(joined),
        }
    }

    fn resolve_or_err(&self, path: &Path) -> Result<PathBuf> {
        self.resolve(path)
            .ok_or_else(|| anyhow!(FsError::Escape(path.to_path_buf())))
    }

    fn strip_base(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.base)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

impl FileSystem for ChrootFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).map(|p| p.exists()).unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.resolve(path).map(|p| p.is_dir()).unwrap_or(false)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.resolve(path).map(|p| p.is_file()).unwrap_or(false)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let full = self.resolve_or_err(path)?;
        fs::read_to_string(&full).context(format!("Failed to read file {:?}", path))
    }

    fn read_bytes(&self, path: &Path, max_bytes: usize) -> Result<Vec<u8>> {
        let full = self.resolve_or_err(path)?;
        let mut file = fs::File::open(&full).context(format!("Failed to open file {:?}", path))?;
        let mut buffer = vec![0u8; max_bytes];
        let bytes_read = file
            .read(&mut buffer)
            .context(format!("Failed to read bytes from {:?}", path))?;
        buffer.truncate(bytes_read);
        Ok(buffer)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let full = self.resolve_or_err(path)?;
        let entries = fs::read_dir(&full).context(format!("Failed to read directory {:?}", path))?;

        let mut result = Vec::new();
        for entry in entries {
            let entry = entry.context("Failed to read directory entry")?;
            let entry_path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            let file_type = if entry_path.is_file() {
                FileType::File
            } else if entry_path.is_dir() {
                FileType::Directory
            } else {
                FileType::Symlink
            };

            result.push(DirEntry {
                path: self.strip_base(&entry_path),
                name,
                file_type,
            });
        }

        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let relative = relative_path(Path::new(pattern))
            .ok_or_else(|| anyhow!(FsError::Escape(PathBuf::from(pattern))))?;

        let escaped_base = glob::Pattern::escape(&self.base.to_string_lossy());
        let full_pattern = format!("{}/{}", escaped_base, relative.to_string_lossy());

        let mut matches = Vec::new();
        for entry in glob::glob(&full_pattern).context(format!("Invalid glob pattern {:?}", pattern))? {
            let matched = entry.context("Failed to read glob match")?;
            if self.resolve(&self.strip_base(&matched)).is_some() {
                matches.push(self.strip_base(&matched));
            }
        }

        matches.sort();
        Ok(matches)
    }
}
