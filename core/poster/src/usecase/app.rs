//! poster のユースケース（アダプター経由で I/O を行う）

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use common::error::Error;
use common::ports::outbound::{FileSystem, Log, LogLevel, LogRecord};

use crate::domain::{
    split_examples, ArtifactName, ConfigSource, DeployOutcome, GenerationRequest, GenerationResult,
    ModelRef, PostInput, PosterConfig, PromptRenderer, ProviderOverrides, RegisteredModel,
    RenderedPrompt,
};
use crate::ports::outbound::{
    PosterConfigLoader, ProfileLister, ResolveProfileAndModel, TextGeneratorFactory,
};
use crate::usecase::poster::StyleTransferPoster;
use crate::usecase::serving::ServingUseCase;

// --- 責務別 Deps（usecase が定義を所有し、wiring は組み立てるだけ）

pub struct PosterDeps {
    pub config: ConfigDeps,
    pub model: ModelDeps,
    pub serving: ServingUseCase,
    pub obs: ObsDeps,
}

pub struct ConfigDeps {
    pub fs: Arc<dyn FileSystem>,
    pub config_loader: Arc<dyn PosterConfigLoader>,
}

pub struct ModelDeps {
    pub profile_lister: Arc<dyn ProfileLister>,
    pub resolve_profile_and_model: Arc<dyn ResolveProfileAndModel>,
    pub generator_factory: Arc<dyn TextGeneratorFactory>,
}

pub struct ObsDeps {
    pub log: Arc<dyn Log>,
}

pub struct PosterUseCase {
    deps: PosterDeps,
}

impl PosterUseCase {
    pub fn new(deps: PosterDeps) -> Self {
        Self { deps }
    }

    fn log(&self, record: LogRecord) {
        let _ = self.deps.obs.log.log(&record.layer("usecase"));
    }

    /// 現在有効なプロファイル一覧（表示は CLI の責務）
    pub fn list_profiles(&self) -> Result<(Vec<String>, Option<String>), Error> {
        self.deps.model.profile_lister.list_profiles()
    }

    /// 設定を読み、-p / -m / -t を反映する。
    ///
    /// -p だけ指定された場合、モデルはプロファイルの model（無ければ種別の既定モデル）になる。
    pub fn resolve_config(
        &self,
        source: &ConfigSource,
        overrides: &ProviderOverrides,
    ) -> Result<PosterConfig, Error> {
        let mut config = match source {
            ConfigSource::Home => self.deps.config.config_loader.load(None)?,
            ConfigSource::File(path) => self.deps.config.config_loader.load(Some(path.as_path()))?,
            ConfigSource::Registered(model) => self.deps.serving.load(model)?.config,
        };
        if let Some(profile) = &overrides.profile {
            let (profile_name, model_name) = self
                .deps
                .model
                .resolve_profile_and_model
                .resolve(profile, overrides.model.as_ref())?;
            config.model_provider = profile_name;
            config.model_name = model_name;
        } else if let Some(model) = &overrides.model {
            config.model_name = model.to_string();
        }
        if let Some(secs) = overrides.timeout_secs {
            config.timeout_secs = Some(secs);
        }
        Ok(config)
    }

    /// 入力から GenerationRequest を作る（-f の例文は -e の後ろに続ける）
    pub fn build_request(&self, input: &PostInput) -> Result<GenerationRequest, Error> {
        let mut examples = input.examples.clone();
        if let Some(path) = &input.examples_file {
            examples.extend(self.read_examples_file(path)?);
        }
        let mut request = GenerationRequest::new(input.context.clone()).with_examples(examples);
        if let Some(instructions) = &input.instructions {
            request = request.with_instructions(instructions.clone());
        }
        Ok(request)
    }

    fn read_examples_file(&self, path: &Path) -> Result<Vec<String>, Error> {
        if !self.deps.config.fs.exists(path) {
            return Err(Error::io_msg(format!(
                "examples file not found: {}",
                path.display()
            )));
        }
        Ok(split_examples(&self.deps.config.fs.read_to_string(path)?))
    }

    /// モデルを呼ばずにプロンプトを組み立てる（生成器も作らない）
    pub fn show_prompt(
        &self,
        source: &ConfigSource,
        overrides: &ProviderOverrides,
        input: &PostInput,
    ) -> Result<RenderedPrompt, Error> {
        let config = self.resolve_config(source, overrides)?;
        let request = self.build_request(input)?;
        PromptRenderer::new(&config)?.render(&request)
    }

    pub fn generate(
        &self,
        source: &ConfigSource,
        overrides: &ProviderOverrides,
        input: &PostInput,
    ) -> Result<GenerationResult, Error> {
        let config = self.resolve_config(source, overrides)?;
        let request = self.build_request(input)?;
        let poster = StyleTransferPoster::new(config, self.deps.model.generator_factory.as_ref())?;
        let prompt = poster.render(&request)?;

        self.log(
            LogRecord::new(LogLevel::Info, "generation started")
                .kind("generation")
                .field("provider", poster.provider())
                .field("model", poster.model())
                .field("examples", request.example_posts.len())
                .field("prompt_chars", prompt.user_prompt.chars().count()),
        );
        let started = Instant::now();
        let result = poster.generate(&request);
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(r) => self.log(
                LogRecord::new(LogLevel::Info, "generation finished")
                    .kind("generation")
                    .field("provider", r.provider.as_str())
                    .field("model", r.model.as_str())
                    .field("response_chars", r.generated_text.chars().count())
                    .field("elapsed_ms", elapsed_ms),
            ),
            Err(e) => self.log(
                LogRecord::new(LogLevel::Warn, "generation failed")
                    .kind("generation")
                    .field("error_kind", e.kind())
                    .field("elapsed_ms", elapsed_ms),
            ),
        }
        result
    }

    pub fn register(
        &self,
        name: &ArtifactName,
        source: &ConfigSource,
        overrides: &ProviderOverrides,
    ) -> Result<RegisteredModel, Error> {
        let config = self.resolve_config(source, overrides)?;
        let registered = self.deps.serving.register(name, &config)?;
        self.log(
            LogRecord::new(LogLevel::Info, "model registered")
                .kind("registry")
                .field("name", registered.name.as_str())
                .field("version", registered.version),
        );
        Ok(registered)
    }

    pub fn deploy(&self, endpoint: &ArtifactName, model: &ModelRef) -> Result<DeployOutcome, Error> {
        let outcome = self.deps.serving.deploy(endpoint, model)?;
        let record = outcome.record();
        self.log(
            LogRecord::new(LogLevel::Info, "endpoint deployed")
                .kind("registry")
                .field("endpoint", record.endpoint_name.as_str())
                .field("model", record.model_name.as_str())
                .field("version", record.model_version)
                .field("revision", record.revision),
        );
        Ok(outcome)
    }
}
