//! Outbound ポート: アプリが外界（モデル API・レジストリ・設定）を使うための trait

pub mod endpoint_deployer;
pub mod model_registry;
pub mod poster_config_loader;
pub mod profile_lister;
pub mod resolve_profile_and_model;
pub mod text_generator;

pub use endpoint_deployer::EndpointDeployer;
pub use model_registry::ModelRegistry;
pub use poster_config_loader::PosterConfigLoader;
pub use profile_lister::ProfileLister;
pub use resolve_profile_and_model::ResolveProfileAndModel;
pub use text_generator::{GeneratorSpec, TextGenerator, TextGeneratorFactory};
