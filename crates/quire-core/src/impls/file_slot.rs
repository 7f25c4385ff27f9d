//! FileSlot - JSON ファイルによるスロット
//!
//! 書き込みは一時ファイルに書いて fsync してから rename し、最後にディレクトリも
//! fsync します。途中でクラッシュしても、前回の一覧か今回の一覧のどちらかが残ります。

use std::fs::File;
use std::io::{ErrorKind as IoErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::domain::PersistenceError;
use crate::ports::TaskSlot;

#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "tasks".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl TaskSlot for FileSlot {
    fn read(&self) -> Result<Option<String>, PersistenceError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, contents: &str) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.temp_path();
        let mut file = File::create(&tmp)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
        drop(file);
        std::fs::rename(&tmp, &self.path)?;
        sync_parent(&self.path)
    }
}

/// Persist the rename itself.
#[cfg(unix)]
fn sync_parent(path: &Path) -> Result<(), PersistenceError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    File::open(dir)?.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn sync_parent(_path: &Path) -> Result<(), PersistenceError> {
    Ok(())
}
