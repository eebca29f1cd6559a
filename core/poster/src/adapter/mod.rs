//! アダプター（Outbound ポートの標準実装）

pub mod config_loader;
pub mod file_model_registry;
pub mod manifest_endpoint_deployer;
pub mod profile_lister;
pub mod provider_text_generator;
pub mod resolve_profile_and_model;
pub mod stub_generator;

pub use config_loader::StdPosterConfigLoader;
pub use file_model_registry::FileModelRegistry;
pub use manifest_endpoint_deployer::ManifestEndpointDeployer;
pub use profile_lister::StdProfileLister;
pub use provider_text_generator::StdTextGeneratorFactory;
pub use resolve_profile_and_model::StdResolveProfileAndModel;
#[cfg(test)]
pub use stub_generator::{StubGenerator, StubGeneratorFactory};
