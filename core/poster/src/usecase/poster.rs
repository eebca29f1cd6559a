//! StyleTransferPoster: 設定 + テンプレート済みの 1 回のモデル呼び出し
//!
//! 構築時に設定を検証してから生成器を作る。generate は応答テキストを加工せずに返す。

use std::sync::Arc;

use common::error::Error;

use crate::domain::{GenerationRequest, GenerationResult, PosterConfig, PromptRenderer, RenderedPrompt};
use crate::ports::outbound::{GeneratorSpec, TextGenerator, TextGeneratorFactory};

pub struct StyleTransferPoster {
    renderer: PromptRenderer,
    generator: Arc<dyn TextGenerator>,
}

impl std::fmt::Debug for StyleTransferPoster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleTransferPoster")
            .field("provider", &self.generator.provider())
            .field("model", &self.generator.model())
            .finish()
    }
}

impl StyleTransferPoster {
    /// 設定を検証し、生成器を作る。
    ///
    /// テンプレートと system prompt の検証はファクトリより先に行うので、
    /// 不正な設定ではクライアントを作らない。
    pub fn new(config: PosterConfig, factory: &dyn TextGeneratorFactory) -> Result<Self, Error> {
        let renderer = PromptRenderer::new(&config)?;
        if config.model_provider.trim().is_empty() {
            return Err(Error::configuration("model_provider is empty"));
        }
        if config.model_name.trim().is_empty() {
            return Err(Error::configuration("model_name is empty"));
        }
        let generator = factory.create(&GeneratorSpec {
            provider: config.model_provider.clone(),
            model: config.model_name.clone(),
            timeout: config.timeout(),
        })?;
        Ok(Self {
            renderer,
            generator,
        })
    }

    pub fn provider(&self) -> &str {
        self.generator.provider()
    }

    pub fn model(&self) -> &str {
        self.generator.model()
    }

    /// ネットワークを使わずにプロンプトだけ組み立てる
    pub fn render(&self, request: &GenerationRequest) -> Result<RenderedPrompt, Error> {
        self.renderer.render(request)
    }

    /// system prompt + 組み立てたテンプレートを 1 ターンで送り、応答をそのまま返す。
    ///
    /// - context が空: InvalidRequest（生成器は呼ばない）
    /// - 通信失敗・非 2xx: ModelUnavailable
    /// - 空応答・安全フィルタ: ModelRefusal
    pub fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, Error> {
        let prompt = self.renderer.render(request)?;
        let text = self
            .generator
            .generate(&prompt.system_instruction, &prompt.user_prompt)?;
        if text.trim().is_empty() {
            return Err(Error::refusal("Empty text in response"));
        }
        Ok(GenerationResult {
            generated_text: text,
            provider: self.generator.provider().to_string(),
            model: self.generator.model().to_string(),
        })
    }
}
