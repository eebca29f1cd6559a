//! ファイルベースのモデルレジストリ
//!
//! `<home>/registry/<name>/v<N>.json` に 1 バージョン 1 ファイルで保存する。
//! バージョンファイルは排他的に新規作成し、同時登録で番号が衝突したら次の番号で再試行する。

use std::path::{Path, PathBuf};
use std::sync::Arc;

use common::error::Error;
use common::ports::outbound::{now_iso8601, EnvResolver, FileSystem};

use crate::domain::{ArtifactName, PosterConfig, RegisteredModel};
use crate::ports::outbound::ModelRegistry;

pub struct FileModelRegistry {
    fs: Arc<dyn FileSystem>,
    env_resolver: Arc<dyn EnvResolver>,
}

impl FileModelRegistry {
    pub fn new(fs: Arc<dyn FileSystem>, env_resolver: Arc<dyn EnvResolver>) -> Self {
        Self { fs, env_resolver }
    }

    fn model_dir(&self, name: &ArtifactName) -> Result<PathBuf, Error> {
        Ok(self.env_resolver.resolve_registry_dir()?.join(name.as_ref()))
    }
}

/// 番号の衝突が続いたときに諦めるまでの試行回数
const MAX_REGISTER_ATTEMPTS: u32 = 64;

fn version_file_name(version: u32) -> String {
    format!("v{}.json", version)
}

/// `v<N>.json` から N を取り出す（それ以外のファイルは無視）
fn parse_version_file_name(path: &Path) -> Option<u32> {
    let file_name = path.file_name()?.to_str()?;
    let n = file_name.strip_prefix('v')?.strip_suffix(".json")?;
    n.parse::<u32>().ok().filter(|v| *v > 0)
}

impl ModelRegistry for FileModelRegistry {
    fn register(&self, name: &ArtifactName, config: &PosterConfig) -> Result<RegisteredModel, Error> {
        let dir = self.model_dir(name)?;
        self.fs.create_dir_all(&dir)?;
        let mut next = self.versions(name)?.last().copied().unwrap_or(0) + 1;
        for _ in 0..MAX_REGISTER_ATTEMPTS {
            let model = RegisteredModel {
                name: name.to_string(),
                version: next,
                registered_at: now_iso8601(),
                config: config.clone(),
            };
            let json = serde_json::to_string_pretty(&model)?;
            if self.fs.write_new(&dir.join(version_file_name(next)), &json)? {
                return Ok(model);
            }
            next += 1;
        }
        Err(Error::io_msg(format!(
            "could not allocate a new version for model '{}' after {} attempts",
            name, MAX_REGISTER_ATTEMPTS
        )))
    }

    fn load(&self, name: &ArtifactName, version: Option<u32>) -> Result<RegisteredModel, Error> {
        let version = match version {
            Some(v) => v,
            None => self
                .versions(name)?
                .last()
                .copied()
                .ok_or_else(|| Error::configuration(format!("model '{}' is not registered", name)))?,
        };
        let path = self.model_dir(name)?.join(version_file_name(version));
        if !self.fs.exists(&path) {
            return Err(Error::configuration(format!(
                "model '{}@{}' is not registered",
                name, version
            )));
        }
        let contents = self.fs.read_to_string(&path)?;
        serde_json::from_str(&contents)
            .map_err(|e| Error::configuration(format!("{}: {}", path.display(), e)))
    }

    fn versions(&self, name: &ArtifactName) -> Result<Vec<u32>, Error> {
        let dir = self.model_dir(name)?;
        if !self.fs.exists(&dir) {
            return Ok(Vec::new());
        }
        let mut versions: Vec<u32> = self
            .fs
            .read_dir(&dir)?
            .iter()
            .filter_map(|p| parse_version_file_name(p))
            .collect();
        versions.sort_unstable();
        Ok(versions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::adapter::StdFileSystem;
    use common::domain::HomeDir;

    struct FixedHome(PathBuf);

    impl EnvResolver for FixedHome {
        fn resolve_home_dir(&self) -> Result<HomeDir, Error> {
            Ok(HomeDir::new(self.0.clone()))
        }
        fn var(&self, _name: &str) -> Option<String> {
            None
        }
    }

    fn registry(home: &Path) -> FileModelRegistry {
        FileModelRegistry::new(Arc::new(StdFileSystem), Arc::new(FixedHome(home.to_path_buf())))
    }

    #[test]
    fn test_parse_version_file_name() {
        assert_eq!(parse_version_file_name(Path::new("/r/x/v12.json")), Some(12));
        assert_eq!(parse_version_file_name(Path::new("v0.json")), None);
        assert_eq!(parse_version_file_name(Path::new("v1.tmp")), None);
        assert_eq!(parse_version_file_name(Path::new("notes.json")), None);
    }

    #[test]
    fn test_register_increments_versions() {
        let dir = tempfile::tempdir().unwrap();
        let reg = registry(dir.path());
        let name = ArtifactName::parse("linkedin").unwrap();
        assert!(reg.versions(&name).unwrap().is_empty());

        let first = reg.register(&name, &PosterConfig::default()).unwrap();
        let mut changed = PosterConfig::default();
        changed.model_name = "gemini-1.5-pro".to_string();
        let second = reg.register(&name, &changed).unwrap();

        assert_eq!((first.version, second.version), (1, 2));
        assert_eq!(reg.versions(&name).unwrap(), vec![1, 2]);
        assert!(dir.path().join("registry/linkedin/v2.json").is_file());

        assert_eq!(reg.load(&name, None).unwrap().config.model_name, "gemini-1.5-pro");
        assert_eq!(reg.load(&name, Some(1)).unwrap().config, PosterConfig::default());
    }

    /// 一覧が古い（別プロセスが書いた版が見えていない）ファイルシステム
    struct StaleListing(StdFileSystem);

    impl FileSystem for StaleListing {
        fn read_to_string(&self, path: &Path) -> Result<String, Error> {
            self.0.read_to_string(path)
        }
        fn write(&self, path: &Path, contents: &str) -> Result<(), Error> {
            self.0.write(path, contents)
        }
        fn rename(&self, from: &Path, to: &Path) -> Result<(), Error> {
            self.0.rename(from, to)
        }
        fn create_dir_all(&self, path: &Path) -> Result<(), Error> {
            self.0.create_dir_all(path)
        }
        fn metadata(&self, path: &Path) -> Result<common::ports::outbound::FileMetadata, Error> {
            self.0.metadata(path)
        }
        fn read_dir(&self, _path: &Path) -> Result<Vec<PathBuf>, Error> {
            Ok(Vec::new())
        }
        fn open_append(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>, Error> {
            self.0.open_append(path)
        }
        fn write_new(&self, path: &Path, contents: &str) -> Result<bool, Error> {
            self.0.write_new(path, contents)
        }
    }

    #[test]
    fn test_register_skips_version_taken_concurrently() {
        let dir = tempfile::tempdir().unwrap();
        let name = ArtifactName::parse("linkedin").unwrap();
        registry(dir.path()).register(&name, &PosterConfig::default()).unwrap();

        let stale = FileModelRegistry::new(
            Arc::new(StaleListing(StdFileSystem)),
            Arc::new(FixedHome(dir.path().to_path_buf())),
        );
        let mut changed = PosterConfig::default();
        changed.model_name = "other".to_string();
        assert_eq!(stale.register(&name, &changed).unwrap().version, 2);

        let reg = registry(dir.path());
        assert_eq!(reg.load(&name, Some(1)).unwrap().config, PosterConfig::default());
        assert_eq!(reg.load(&name, Some(2)).unwrap().config.model_name, "other");
    }

    #[test]
    fn test_parallel_registers_get_distinct_versions() {
        let dir = tempfile::tempdir().unwrap();
        let reg = registry(dir.path());
        let name = ArtifactName::parse("linkedin").unwrap();
        let (reg, name) = (&reg, &name);
        let mut versions: Vec<u32> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    s.spawn(move || reg.register(name, &PosterConfig::default()).unwrap().version)
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        versions.sort_unstable();
        assert_eq!(versions, (1..=8).collect::<Vec<u32>>());
        assert_eq!(reg.versions(name).unwrap(), versions);
    }

    #[test]
    fn test_load_missing() {
        let dir = tempfile::tempdir().unwrap();
        let reg = registry(dir.path());
        let name = ArtifactName::parse("none").unwrap();
        let e = reg.load(&name, None).unwrap_err();
        assert!(matches!(e, Error::Configuration(_)));

        reg.register(&name, &PosterConfig::default()).unwrap();
        let e = reg.load(&name, Some(5)).unwrap_err();
        assert!(e.to_string().contains("none@5"));
    }

    #[test]
    fn test_load_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let reg = registry(dir.path());
        let name = ArtifactName::parse("bad").unwrap();
        std::fs::create_dir_all(dir.path().join("registry/bad")).unwrap();
        std::fs::write(dir.path().join("registry/bad/v1.json"), "{").unwrap();
        let e = reg.load(&name, None).unwrap_err();
        assert!(matches!(e, Error::Configuration(_)));
        assert!(e.to_string().contains("v1.json"));
    }
}
