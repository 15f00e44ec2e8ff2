//! Script source resolution and caching.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Failure to produce the source text behind a script reference.
#[derive(Debug, thiserror::Error)]
pub enum ScriptLoadError {
    #[error("script `{reference}` not found at {}", path.display())]
    NotFound { reference: String, path: PathBuf },

    #[error("script reference `{0}` must be a relative path inside the scripts root")]
    OutsideRoot(String),

    #[error("failed to read script `{reference}`: {source}")]
    Io {
        reference: String,
        #[source]
        source: std::io::Error,
    },
}

/// Resolves script references relative to a root directory and caches the
/// sources as shared `Arc<str>`.
///
/// A library built with [`ScriptLibrary::in_memory`] never touches the
/// filesystem; only sources added with [`ScriptLibrary::insert`] resolve.
#[derive(Debug, Default)]
pub struct ScriptLibrary {
    root: Option<PathBuf>,
    cache: RwLock<HashMap<String, Arc<str>>>,
}

impl ScriptLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            cache: RwLock::default(),
        }
    }

    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Registers a source under `reference`, replacing any cached text.
    pub fn insert(&self, reference: impl Into<String>, source: impl Into<Arc<str>>) {
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(reference.into(), source.into());
        }
    }

    #[must_use]
    pub fn with_source(self, reference: impl Into<String>, source: impl Into<Arc<str>>) -> Self {
        self.insert(reference, source);
        self
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Returns the source for `reference`, reading it on first use.
    pub fn load(&self, reference: &str) -> Result<Arc<str>, ScriptLoadError> {
        if let Some(source) = self
            .cache
            .read()
            .ok()
            .and_then(|cache| cache.get(reference).cloned())
        {
            return Ok(source);
        }

        let path = self.resolve(reference)?;
        let source: Arc<str> = match std::fs::read_to_string(&path) {
            Ok(text) => Arc::from(text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(ScriptLoadError::NotFound {
                    reference: reference.to_string(),
                    path,
                });
            }
            Err(source) => {
                return Err(ScriptLoadError::Io {
                    reference: reference.to_string(),
                    source,
                });
            }
        };

        tracing::debug!(reference, path = %path.display(), "loaded script");
        self.insert(reference, source.clone());
        Ok(source)
    }

    /// Loads every reference up front so a missing file fails setup instead of
    /// a turn.
    pub fn preload<'a, I>(&self, references: I) -> Result<usize, ScriptLoadError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut count = 0;
        for reference in references {
            self.load(reference)?;
            count += 1;
        }
        Ok(count)
    }

    fn resolve(&self, reference: &str) -> Result<PathBuf, ScriptLoadError> {
        let relative = Path::new(reference);
        let escapes = relative
            .components()
            .any(|part| !matches!(part, Component::Normal(_) | Component::CurDir));
        if reference.is_empty() || escapes {
            return Err(ScriptLoadError::OutsideRoot(reference.to_string()));
        }

        match &self.root {
            Some(root) => Ok(root.join(relative)),
            None => Err(ScriptLoadError::NotFound {
                reference: reference.to_string(),
                path: relative.to_path_buf(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_sources_resolve() {
        let library = ScriptLibrary::in_memory().with_source("attack.lua", "return 1");
        assert_eq!(&*library.load("attack.lua").unwrap(), "return 1");
        assert!(matches!(
            library.load("missing.lua"),
            Err(ScriptLoadError::NotFound { .. })
        ));
    }

    #[test]
    fn reads_and_caches_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("abilities")).unwrap();
        std::fs::write(dir.path().join("abilities/heal.lua"), "-- heal").unwrap();

        let library = ScriptLibrary::new(dir.path());
        let first = library.load("abilities/heal.lua").unwrap();

        std::fs::remove_file(dir.path().join("abilities/heal.lua")).unwrap();
        let second = library.load("abilities/heal.lua").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn rejects_paths_outside_root() {
        let library = ScriptLibrary::new("/tmp/scripts");
        assert!(matches!(
            library.load("../secret.lua"),
            Err(ScriptLoadError::OutsideRoot(_))
        ));
        assert!(matches!(
            library.load("/etc/passwd"),
            Err(ScriptLoadError::OutsideRoot(_))
        ));
    }
}
