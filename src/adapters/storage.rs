use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Files under a base directory on the local disk.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
    excluded: Vec<PathBuf>,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self {
            base_path,
            excluded: Vec::new(),
        }
    }

    /// Leaves `dir` and everything under it out of [`Storage::list_files`],
    /// e.g. an output directory nested inside the input.
    pub fn exclude_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.excluded.push(dir.into());
        self
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }
}

/// Directory walk state shared by every level of the recursion.
struct Walk<'a> {
    root: &'a Path,
    extension: &'a str,
    excluded: Vec<PathBuf>,
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = fs::read(full_path)?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }

    async fn list_files(&self, extension: &str) -> Result<Vec<String>> {
        let root = PathBuf::from(&self.base_path);
        // 不存在的排除目錄直接忽略
        let excluded = self
            .excluded
            .iter()
            .filter_map(|dir| fs::canonicalize(dir).ok())
            .collect();
        let walk = Walk {
            root: &root,
            extension,
            excluded,
        };

        let mut found = Vec::new();
        collect_files(&walk, &root, &mut found)?;
        found.sort();
        Ok(found)
    }
}

fn collect_files(walk: &Walk<'_>, dir: &Path, found: &mut Vec<String>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;

        // 不跟隨目錄的符號連結，避免循環
        if file_type.is_symlink() && path.is_dir() {
            tracing::debug!("Skipping symlinked directory {}", path.display());
            continue;
        }

        if file_type.is_dir() {
            if walk.excluded.contains(&fs::canonicalize(&path)?) {
                tracing::debug!("Skipping excluded directory {}", path.display());
                continue;
            }
            collect_files(walk, &path, found)?;
            continue;
        }

        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(walk.extension));
        if !matches {
            continue;
        }

        if let Ok(relative) = path.strip_prefix(walk.root) {
            // 統一用 `/`，讓頁面路徑可以直接拼成 URL
            let parts: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            found.push(parts.join("/"));
        }
    }
    Ok(())
}
