//! 1 回の生成リクエストと結果

use common::error::Error;

/// 生成リクエスト（呼び出しごとに作って捨てる）
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationRequest {
    /// 文体の手本にする投稿（空でもよい）
    pub example_posts: Vec<String>,
    /// 投稿のトピック
    pub context: String,
    pub additional_instructions: Option<String>,
}

impl GenerationRequest {
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            ..Default::default()
        }
    }

    pub fn with_examples(mut self, posts: Vec<String>) -> Self {
        self.example_posts = posts;
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.additional_instructions = Some(instructions.into());
        self
    }

    /// context が空（空白のみを含む）なら InvalidRequest
    pub fn validate(&self) -> Result<(), Error> {
        if self.context.trim().is_empty() {
            return Err(Error::invalid_request("context is empty"));
        }
        Ok(())
    }
}

/// 組み立て済みプロンプト（system + user 1 ターン）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    pub system_instruction: String,
    pub user_prompt: String,
}

/// 生成結果。generated_text はモデルの応答そのまま
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub generated_text: String,
    pub provider: String,
    pub model: String,
}
