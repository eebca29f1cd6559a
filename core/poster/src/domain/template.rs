//! プロンプトテンプレートとレンダリング
//!
//! `{example_posts}` / `{context}` / `{additional_instructions}` を 1 パスで置換する。
//! `{{` / `}}` はリテラルの波括弧。置換した値の中身は再走査しない。

use common::error::Error;
use regex::{Captures, Regex};

use crate::domain::poster_config::PosterConfig;
use crate::domain::request::{GenerationRequest, RenderedPrompt};

/// テンプレートが受け付けるプレースホルダ名
pub const PLACEHOLDERS: [&str; 3] = ["example_posts", "context", "additional_instructions"];

/// 複数の例文を 1 つのブロックにするときの区切り
pub const EXAMPLE_SEPARATOR: &str = "\n\n---\n\n";

const TOKEN_PATTERN: &str = r"\{\{|\}\}|\{([^{}]*)\}";

/// 例文を 1 つのテキストブロックに結合する（1 件ならそのまま）
pub fn join_examples(posts: &[String]) -> String {
    posts.join(EXAMPLE_SEPARATOR)
}

/// 例文ファイルの中身を分割する（`---` だけの行が区切り。前後の空行は除く）
pub fn split_examples(text: &str) -> Vec<String> {
    let mut posts = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut flush = |lines: &mut Vec<&str>| {
        let post = lines.join("\n").trim_matches('\n').to_string();
        if !post.trim().is_empty() {
            posts.push(post);
        }
        lines.clear();
    };
    for line in text.lines() {
        if line.trim() == "---" {
            flush(&mut current);
        } else {
            current.push(line);
        }
    }
    flush(&mut current);
    posts
}

/// 置換する値
#[derive(Debug, Clone, Copy)]
pub struct TemplateValues<'a> {
    pub example_posts: &'a str,
    pub context: &'a str,
    pub additional_instructions: &'a str,
}

impl<'a> TemplateValues<'a> {
    fn get(&self, name: &str) -> &'a str {
        match name {
            "example_posts" => self.example_posts,
            "context" => self.context,
            "additional_instructions" => self.additional_instructions,
            _ => "",
        }
    }
}

/// 検証済みのプロンプトテンプレート
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    source: String,
    token: Regex,
}

impl PromptTemplate {
    /// テンプレートを検証して作る。空・未知のプレースホルダは Configuration エラー。
    pub fn parse(source: &str) -> Result<Self, Error> {
        if source.trim().is_empty() {
            return Err(Error::configuration("prompt_template is empty"));
        }
        let token = Regex::new(TOKEN_PATTERN)
            .map_err(|e| Error::system(format!("invalid placeholder pattern: {}", e)))?;
        for caps in token.captures_iter(source) {
            if let Some(name) = caps.get(1) {
                if !PLACEHOLDERS.contains(&name.as_str()) {
                    return Err(Error::configuration(format!(
                        "unknown placeholder '{{{}}}' in prompt_template (allowed: {})",
                        name.as_str(),
                        PLACEHOLDERS.join(", ")
                    )));
                }
            }
        }
        Ok(Self {
            source: source.to_string(),
            token,
        })
    }

    pub fn render(&self, values: &TemplateValues<'_>) -> String {
        self.token
            .replace_all(&self.source, |caps: &Captures<'_>| match caps.get(1) {
                Some(name) => values.get(name.as_str()).to_string(),
                None if &caps[0] == "{{" => "{".to_string(),
                None => "}".to_string(),
            })
            .into_owned()
    }
}

/// system prompt + テンプレートからプロンプトを組み立てる（ネットワーク不要）
#[derive(Debug, Clone)]
pub struct PromptRenderer {
    system_prompt: String,
    template: PromptTemplate,
}

impl PromptRenderer {
    /// 設定の system_prompt / prompt_template を検証して作る
    pub fn new(config: &PosterConfig) -> Result<Self, Error> {
        if config.system_prompt.trim().is_empty() {
            return Err(Error::configuration("system_prompt is empty"));
        }
        let template = PromptTemplate::parse(&config.prompt_template)?;
        Ok(Self {
            system_prompt: config.system_prompt.clone(),
            template,
        })
    }

    /// リクエストを検証してプロンプトを組み立てる。context が空なら InvalidRequest。
    pub fn render(&self, request: &GenerationRequest) -> Result<RenderedPrompt, Error> {
        request.validate()?;
        let example_posts = join_examples(&request.example_posts);
        let values = TemplateValues {
            example_posts: &example_posts,
            context: &request.context,
            additional_instructions: request.additional_instructions.as_deref().unwrap_or(""),
        };
        Ok(RenderedPrompt {
            system_instruction: self.system_prompt.clone(),
            user_prompt: self.template.render(&values),
        })
    }
}
