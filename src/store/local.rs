//! Directory-backed object store: container `c` is `root/c/`, key `a/b.csv` is `root/c/a/b.csv`.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use super::{ObjectStore, StoreError};
use crate::RawObject;

pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a container/key pair to a path under the root. Keys that would escape the
    /// container (`..`, absolute paths, drive prefixes) are refused.
    pub fn resolve(&self, container_id: &str, object_key: &str) -> Result<PathBuf, StoreError> {
        let location = format!("{container_id}/{object_key}");
        let mut path = self.root.clone();
        for part in [container_id, object_key] {
            let rel = Path::new(part);
            for component in rel.components() {
                match component {
                    Component::Normal(c) => path.push(c),
                    Component::CurDir => {}
                    Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                        return Err(StoreError::AccessDenied(location));
                    }
                }
            }
        }
        Ok(path)
    }
}

fn to_store_error(location: String, e: std::io::Error) -> StoreError {
    match e.kind() {
        ErrorKind::NotFound => StoreError::NotFound(location),
        ErrorKind::PermissionDenied => StoreError::AccessDenied(location),
        // Directories and other non-files read as missing objects.
        ErrorKind::IsADirectory => StoreError::NotFound(location),
        _ => StoreError::Unavailable(format!("{location}: {e}")),
    }
}

impl ObjectStore for LocalObjectStore {
    fn fetch(&self, container_id: &str, object_key: &str) -> Result<RawObject, StoreError> {
        let path = self.resolve(container_id, object_key)?;
        std::fs::read(&path)
            .map(RawObject::new)
            .map_err(|e| to_store_error(format!("{container_id}/{object_key}"), e))
    }

    /// File length from metadata, so oversized files are rejected before they are read.
    fn head(&self, container_id: &str, object_key: &str) -> Result<Option<u64>, StoreError> {
        let path = self.resolve(container_id, object_key)?;
        let location = format!("{container_id}/{object_key}");
        let meta = std::fs::metadata(&path).map_err(|e| to_store_error(location.clone(), e))?;
        if !meta.is_file() {
            return Err(StoreError::NotFound(location));
        }
        Ok(Some(meta.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_nests_key_under_container() {
        let store = LocalObjectStore::new("/data");
        assert_eq!(
            store.resolve("bucket", "a/q1 sales.csv").unwrap(),
            PathBuf::from("/data/bucket/a/q1 sales.csv")
        );
    }

    #[test]
    fn resolve_refuses_parent_components() {
        let store = LocalObjectStore::new("/data");
        assert!(matches!(
            store.resolve("bucket", "../other/x.csv"),
            Err(StoreError::AccessDenied(_))
        ));
        assert!(matches!(
            store.resolve("..", "x.csv"),
            Err(StoreError::AccessDenied(_))
        ));
    }

    #[test]
    fn resolve_refuses_absolute_key() {
        let store = LocalObjectStore::new("/data");
        assert!(matches!(
            store.resolve("bucket", "/etc/passwd"),
            Err(StoreError::AccessDenied(_))
        ));
    }

    #[test]
    fn head_reports_file_length() {
        let dir = std::env::temp_dir().join(format!("tabmeta_local_head_{}", std::process::id()));
        std::fs::create_dir_all(dir.join("bucket/sub")).unwrap();
        std::fs::write(dir.join("bucket/a.csv"), b"a,b\n1,2\n").unwrap();
        let store = LocalObjectStore::new(&dir);

        assert_eq!(store.head("bucket", "a.csv").unwrap(), Some(8));
        assert!(matches!(
            store.head("bucket", "sub"),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.head("bucket", "gone.csv"),
            Err(StoreError::NotFound(_))
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn fetch_missing_is_not_found() {
        let dir = std::env::temp_dir().join(format!("tabmeta_local_{}", std::process::id()));
        let store = LocalObjectStore::new(&dir);
        assert!(matches!(
            store.fetch("bucket", "nope.csv"),
            Err(StoreError::NotFound(_))
        ));
    }
}
