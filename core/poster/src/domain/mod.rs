//! ドメイン型

pub mod artifact;
pub mod command;
pub mod poster_config;
pub mod request;
pub mod template;

pub use artifact::{ArtifactName, DeployOutcome, EndpointRecord, ModelRef, RegisteredModel};
pub use command::{ConfigSource, PostInput, PosterCommand, ProviderOverrides};
pub use poster_config::PosterConfig;
pub use request::{GenerationRequest, GenerationResult, RenderedPrompt};
pub use template::{split_examples, PromptRenderer};
