use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;

use tracing::debug;

use crate::error::Error;
use crate::geometry::NaturalSize;
use crate::meta;

/// Resolves an image source to its natural pixel size.
pub trait ImageLoader {
    fn natural_size(&self, src: &str) -> impl Future<Output = Result<NaturalSize, Error>>;
}

impl<T: ImageLoader + ?Sized> ImageLoader for &T {
    fn natural_size(&self, src: &str) -> impl Future<Output = Result<NaturalSize, Error>> {
        (**self).natural_size(src)
    }
}

/// Treats sources as filesystem paths and reads dimensions from the header.
#[derive(Debug, Clone, Default)]
pub struct FileLoader {
    root: Option<PathBuf>,
}

impl FileLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative sources against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, src: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(src),
            None => PathBuf::from(src),
        }
    }
}

impl ImageLoader for FileLoader {
    async fn natural_size(&self, src: &str) -> Result<NaturalSize, Error> {
        let path = self.resolve(src);
        let res = tokio::task::spawn_blocking(move || meta::read_image_meta(&path, false)).await;
        match res {
            Ok(Ok(m)) => {
                let (w, h) = (m.natural.natural_width, m.natural.natural_height);
                debug!(src, w, h, "decoded header");
                m.natural.check().map_err(|e| Error::image_load(src, e))?;
                Ok(m.natural)
            }
            Ok(Err(e)) => Err(Error::image_load(src, format!("{e:#}"))),
            Err(join) => Err(Error::image_load(src, join)),
        }
    }
}

/// Natural sizes keyed by source string.
#[derive(Debug, Default)]
pub struct NaturalSizeCache {
    entries: RefCell<HashMap<String, NaturalSize>>,
}

impl NaturalSizeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, src: &str) -> Option<NaturalSize> {
        self.entries.borrow().get(src).copied()
    }

    pub fn insert(&self, src: &str, natural: NaturalSize) {
        self.entries.borrow_mut().insert(src.to_owned(), natural);
    }

    pub fn evict(&self, src: &str) -> Option<NaturalSize> {
        self.entries.borrow_mut().remove(src)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Cached value for `src`, loading and storing it on a miss. Failed loads
    /// are not cached.
    pub async fn resolve<L: ImageLoader>(
        &self,
        loader: &L,
        src: &str,
    ) -> Result<NaturalSize, Error> {
        if let Some(hit) = self.get(src) {
            debug!(src, "natural size cache hit");
            return Ok(hit);
        }
        debug!(src, "natural size cache miss");
        let natural = loader.natural_size(src).await?;
        self.insert(src, natural);
        Ok(natural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingLoader {
        calls: Cell<usize>,
        fail: bool,
    }

    impl ImageLoader for CountingLoader {
        async fn natural_size(&self, src: &str) -> Result<NaturalSize, Error> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(Error::image_load(src, "boom"));
            }
            Ok(NaturalSize::new(1200, 800))
        }
    }

    #[tokio::test]
    async fn cache_loads_each_source_once() {
        let loader = CountingLoader {
            calls: Cell::new(0),
            fail: false,
        };
        let cache = NaturalSizeCache::new();
        let a = cache.resolve(&loader, "a.jpg").await.unwrap();
        let again = cache.resolve(&loader, "a.jpg").await.unwrap();
        assert_eq!(a, again);
        assert_eq!(loader.calls.get(), 1);

        cache.resolve(&loader, "b.jpg").await.unwrap();
        assert_eq!(loader.calls.get(), 2);
        assert_eq!(cache.len(), 2);

        assert!(cache.evict("a.jpg").is_some());
        cache.resolve(&loader, "a.jpg").await.unwrap();
        assert_eq!(loader.calls.get(), 3);
    }

    #[tokio::test]
    async fn failed_loads_are_not_cached() {
        let loader = CountingLoader {
            calls: Cell::new(0),
            fail: true,
        };
        let cache = NaturalSizeCache::new();
        assert!(cache.resolve(&loader, "x.jpg").await.is_err());
        assert!(cache.resolve(&loader, "x.jpg").await.is_err());
        assert_eq!(loader.calls.get(), 2);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn file_loader_reads_png_header() {
        let dir = tempfile::tempdir().unwrap();
        image::RgbaImage::new(30, 20)
            .save(dir.path().join("wide.png"))
            .unwrap();
        let loader = FileLoader::with_root(dir.path());
        let natural = loader.natural_size("wide.png").await.unwrap();
        assert_eq!(natural, NaturalSize::new(30, 20));

        let err = loader.natural_size("missing.png").await.unwrap_err();
        assert!(matches!(err, Error::ImageLoad { ref src, .. } if src == "missing.png"));
    }
}
