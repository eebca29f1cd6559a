//! LLMドライバーとプロバイダの実装
//!
//! このモジュールは、異なるLLMプロバイダ（Gemini、OpenAI互換など）で共通する処理を提供します。

pub mod config;
pub mod driver;
pub mod echo;
pub mod factory;
pub mod gemini;
mod http;
pub mod openai_compat;
pub mod provider;
pub mod resolver;

pub use config::{ProfilesConfig, ProviderProfile};
pub use driver::LlmDriver;
pub use factory::{create_driver, create_provider, AnyProvider, ProviderSettings, ProviderType};
pub use provider::LlmProvider;
pub use resolver::{list_available_profiles, load_profiles_config, resolve_provider, ResolvedProvider};
