//! Startup discovery of extension descriptors.
//!
//! # Responsibilities
//! - Scan the four category directories for descriptor files matching the
//!   active artifact suffix
//! - Sort scan results for deterministic load order across platforms
//! - Parse each descriptor, build its handler, register it
//!
//! # Design Decisions
//! - Any failure aborts startup: a broken extension module must not
//!   silently produce a server missing capabilities
//! - A missing category directory is treated as empty
//! - Synchronous I/O: runs once at boot, before the runtime serves

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::extensions::catalog::{CatalogError, HandlerCatalog};
use crate::extensions::manifest::PluginManifest;
use crate::registry::{ExtensionKind, HostRegistry, RegistryError};

/// Suffix for packaged descriptor artifacts.
pub const PACKAGED_SUFFIX: &str = ".toml";

/// Suffix for development descriptor artifacts.
pub const DEV_SUFFIX: &str = ".dev.toml";

/// Error type for extension loading. All variants are startup-fatal.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("failed to scan extension directory {path}: {source}")]
    Scan {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read extension descriptor {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse extension descriptor {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("extension descriptor {path} declares kind {declared} but was found under the {expected} directory")]
    KindMismatch {
        path: String,
        declared: ExtensionKind,
        expected: ExtensionKind,
    },

    #[error("extension descriptor {path}: {source}")]
    Handler {
        path: String,
        #[source]
        source: CatalogError,
    },

    #[error("extension descriptor {path}: {source}")]
    Registration {
        path: String,
        #[source]
        source: RegistryError,
    },
}

/// Count of extensions loaded per category.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoadSummary {
    pub hooks: usize,
    pub proxies: usize,
    pub customizes: usize,
    pub functions: usize,
}

impl LoadSummary {
    pub fn total(&self) -> usize {
        self.hooks + self.proxies + self.customizes + self.functions
    }

    fn count_mut(&mut self, kind: ExtensionKind) -> &mut usize {
        match kind {
            ExtensionKind::Hook => &mut self.hooks,
            ExtensionKind::Proxy => &mut self.proxies,
            ExtensionKind::Customize => &mut self.customizes,
            ExtensionKind::Function => &mut self.functions,
        }
    }
}

/// Discovers descriptor files and registers the extensions they describe.
pub struct ExtensionLoader {
    root: PathBuf,
    dev_artifacts: bool,
    catalog: Arc<HandlerCatalog>,
}

impl ExtensionLoader {
    pub fn new(root: impl Into<PathBuf>, dev_artifacts: bool, catalog: Arc<HandlerCatalog>) -> Self {
        Self {
            root: root.into(),
            dev_artifacts,
            catalog,
        }
    }

    /// Load every category directory into the registry.
    pub fn load_all(&self, registry: &mut HostRegistry) -> Result<LoadSummary, LoaderError> {
        let mut summary = LoadSummary::default();
        for kind in ExtensionKind::ALL {
            *summary.count_mut(kind) = self.load_category(kind, registry)?;
        }
        Ok(summary)
    }

    fn load_category(
        &self,
        kind: ExtensionKind,
        registry: &mut HostRegistry,
    ) -> Result<usize, LoaderError> {
        let dir = self.root.join(kind.directory());

        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(directory = %dir.display(), kind = %kind, "No extension directory");
                return Ok(0);
            }
            Err(err) => {
                return Err(LoaderError::Scan {
                    path: dir.display().to_string(),
                    source: err,
                })
            }
        };

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| LoaderError::Scan {
                path: dir.display().to_string(),
                source: err,
            })?;
            let path = entry.path();
            if path.is_file() && self.matches_suffix(&path) {
                paths.push(path);
            }
        }
        // Directory enumeration order is platform-dependent; sort so load
        // order (and duplicate detection) is deterministic.
        paths.sort();

        for path in &paths {
            self.load_file(kind, path, registry)?;
        }
        Ok(paths.len())
    }

    fn matches_suffix(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        if self.dev_artifacts {
            name.ends_with(DEV_SUFFIX)
        } else {
            name.ends_with(PACKAGED_SUFFIX) && !name.ends_with(DEV_SUFFIX)
        }
    }

    fn load_file(
        &self,
        kind: ExtensionKind,
        path: &Path,
        registry: &mut HostRegistry,
    ) -> Result<(), LoaderError> {
        let descriptor_path = path.display().to_string();

        let content = std::fs::read_to_string(path).map_err(|err| LoaderError::Read {
            path: descriptor_path.clone(),
            source: err,
        })?;
        let manifest: PluginManifest =
            toml::from_str(&content).map_err(|err| LoaderError::Parse {
                path: descriptor_path.clone(),
                source: err,
            })?;

        if let Some(declared) = manifest.kind {
            if declared != kind {
                return Err(LoaderError::KindMismatch {
                    path: descriptor_path,
                    declared,
                    expected: kind,
                });
            }
        }

        let handler =
            self.catalog
                .build(kind, &manifest)
                .map_err(|err| LoaderError::Handler {
                    path: descriptor_path.clone(),
                    source: err,
                })?;
        registry
            .register(kind, manifest.name.clone(), handler)
            .map_err(|err| LoaderError::Registration {
                path: descriptor_path.clone(),
                source: err,
            })?;

        tracing::info!(
            kind = %kind,
            name = %manifest.name,
            handler = %manifest.handler,
            path = %descriptor_path,
            "Extension loaded"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    fn loader(root: &Path, dev: bool) -> ExtensionLoader {
        ExtensionLoader::new(root, dev, Arc::new(HandlerCatalog::new()))
    }

    #[test]
    fn test_loads_categories_in_sorted_order() {
        let tmp = tempfile::tempdir().unwrap();
        let hooks = tmp.path().join("hooks");
        fs::create_dir(&hooks).unwrap();
        write(&hooks, "b-second.toml", "name = \"second\"\nhandler = \"echo\"\n");
        write(&hooks, "a-first.toml", "name = \"first\"\nhandler = \"echo\"\n");

        let mut registry = HostRegistry::new();
        let summary = loader(tmp.path(), false).load_all(&mut registry).unwrap();

        assert_eq!(summary.hooks, 2);
        assert_eq!(summary.total(), 2);
        assert_eq!(
            registry.category(ExtensionKind::Hook).list_names(),
            vec!["first", "second"]
        );
    }

    #[test]
    fn test_missing_directories_are_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let mut registry = HostRegistry::new();
        let summary = loader(tmp.path(), false).load_all(&mut registry).unwrap();
        assert_eq!(summary.total(), 0);
    }

    #[test]
    fn test_dev_flag_selects_artifact_suffix() {
        let tmp = tempfile::tempdir().unwrap();
        let functions = tmp.path().join("functions");
        fs::create_dir(&functions).unwrap();
        write(&functions, "report.toml", "name = \"report\"\nhandler = \"echo\"\n");
        write(
            &functions,
            "report.dev.toml",
            "name = \"report-dev\"\nhandler = \"echo\"\n",
        );

        let mut packaged = HostRegistry::new();
        loader(tmp.path(), false).load_all(&mut packaged).unwrap();
        assert_eq!(
            packaged.category(ExtensionKind::Function).list_names(),
            vec!["report"]
        );

        let mut dev = HostRegistry::new();
        loader(tmp.path(), true).load_all(&mut dev).unwrap();
        assert_eq!(
            dev.category(ExtensionKind::Function).list_names(),
            vec!["report-dev"]
        );
    }

    #[test]
    fn test_duplicate_name_aborts_startup() {
        let tmp = tempfile::tempdir().unwrap();
        let hooks = tmp.path().join("hooks");
        fs::create_dir(&hooks).unwrap();
        write(&hooks, "one.toml", "name = \"audit\"\nhandler = \"echo\"\n");
        write(&hooks, "two.toml", "name = \"audit\"\nhandler = \"echo\"\n");

        let mut registry = HostRegistry::new();
        let err = loader(tmp.path(), false)
            .load_all(&mut registry)
            .unwrap_err();
        assert!(matches!(err, LoaderError::Registration { .. }));
    }

    #[test]
    fn test_kind_mismatch_aborts_startup() {
        let tmp = tempfile::tempdir().unwrap();
        let hooks = tmp.path().join("hooks");
        fs::create_dir(&hooks).unwrap();
        write(
            &hooks,
            "orders.toml",
            "name = \"orders\"\nhandler = \"echo\"\nkind = \"proxy\"\n",
        );

        let mut registry = HostRegistry::new();
        let err = loader(tmp.path(), false)
            .load_all(&mut registry)
            .unwrap_err();
        assert!(matches!(err, LoaderError::KindMismatch { .. }));
    }

    #[test]
    fn test_unparseable_descriptor_aborts_startup() {
        let tmp = tempfile::tempdir().unwrap();
        let proxies = tmp.path().join("proxies");
        fs::create_dir(&proxies).unwrap();
        write(&proxies, "broken.toml", "name = not quoted toml");

        let mut registry = HostRegistry::new();
        let err = loader(tmp.path(), false)
            .load_all(&mut registry)
            .unwrap_err();
        assert!(matches!(err, LoaderError::Parse { .. }));
    }
}
