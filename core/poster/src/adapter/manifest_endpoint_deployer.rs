//! エンドポイント記録のファイル実装
//!
//! `<home>/endpoints/<endpoint>.json` に現在の提供版を 1 レコードで持つ。

use std::path::{Path, PathBuf};
use std::sync::Arc;

use common::error::Error;
use common::ports::outbound::{now_iso8601, EnvResolver, FileSystem};

use crate::domain::{ArtifactName, DeployOutcome, EndpointRecord};
use crate::ports::outbound::EndpointDeployer;

pub struct ManifestEndpointDeployer {
    fs: Arc<dyn FileSystem>,
    env_resolver: Arc<dyn EnvResolver>,
}

impl ManifestEndpointDeployer {
    pub fn new(fs: Arc<dyn FileSystem>, env_resolver: Arc<dyn EnvResolver>) -> Self {
        Self { fs, env_resolver }
    }

    fn record_path(&self, endpoint: &ArtifactName) -> Result<PathBuf, Error> {
        Ok(self
            .env_resolver
            .resolve_endpoints_dir()?
            .join(format!("{}.json", endpoint)))
    }

    fn save(&self, path: &Path, record: &EndpointRecord) -> Result<(), Error> {
        if let Some(parent) = path.parent() {
            self.fs.create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(record)?;
        self.fs.write_atomic(path, &json)
    }
}

impl EndpointDeployer for ManifestEndpointDeployer {
    fn deploy_or_update(
        &self,
        endpoint: &ArtifactName,
        model_name: &ArtifactName,
        model_version: u32,
    ) -> Result<DeployOutcome, Error> {
        let path = self.record_path(endpoint)?;
        let now = now_iso8601();
        match self.get(endpoint)? {
            None => {
                let record = EndpointRecord {
                    endpoint_name: endpoint.to_string(),
                    model_name: model_name.to_string(),
                    model_version,
                    revision: 1,
                    created_at: now.clone(),
                    updated_at: now,
                };
                self.save(&path, &record)?;
                Ok(DeployOutcome::Created(record))
            }
            Some(prev) => {
                let previous_version = prev.model_version;
                let record = EndpointRecord {
                    model_name: model_name.to_string(),
                    model_version,
                    revision: prev.revision + 1,
                    updated_at: now,
                    ..prev
                };
                self.save(&path, &record)?;
                Ok(DeployOutcome::Updated {
                    previous_version,
                    record,
                })
            }
        }
    }

    fn get(&self, endpoint: &ArtifactName) -> Result<Option<EndpointRecord>, Error> {
        let path = self.record_path(endpoint)?;
        if !self.fs.exists(&path) {
            return Ok(None);
        }
        let contents = self.fs.read_to_string(&path)?;
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| Error::configuration(format!("{}: {}", path.display(), e)))
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

    #[test]
    fn test_create_then_update() {
        let dir = tempfile::tempdir().unwrap();
        let deployer = ManifestEndpointDeployer::new(
            Arc::new(StdFileSystem),
            Arc::new(FixedHome(dir.path().to_path_buf())),
        );
        let ep = ArtifactName::parse("linkedin-prod").unwrap();
        let model = ArtifactName::parse("linkedin").unwrap();
        assert!(deployer.get(&ep).unwrap().is_none());

        let created = deployer.deploy_or_update(&ep, &model, 1).unwrap();
        assert!(matches!(created, DeployOutcome::Created(_)));
        assert_eq!(created.record().revision, 1);
        assert!(dir.path().join("endpoints/linkedin-prod.json").is_file());

        let updated = deployer.deploy_or_update(&ep, &model, 3).unwrap();
        match &updated {
            DeployOutcome::Updated {
                previous_version,
                record,
            } => {
                assert_eq!(*previous_version, 1);
                assert_eq!(record.revision, 2);
                assert_eq!(record.model_version, 3);
                assert_eq!(record.created_at, created.record().created_at);
            }
            other => panic!("expected update, got {:?}", other),
        }
        assert_eq!(deployer.get(&ep).unwrap().as_ref(), Some(updated.record()));
    }
}
