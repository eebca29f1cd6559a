//! 配線: 標準アダプタで UseCase を組み立てる

use std::sync::Arc;

use common::adapter::{FanoutLog, FileJsonLog, NoopLog, StderrLog, StdEnvResolver, StdFileSystem};
use common::ports::outbound::{EnvResolver, FileSystem, Log};

use crate::adapter::{
    FileModelRegistry, ManifestEndpointDeployer, StdPosterConfigLoader, StdProfileLister,
    StdResolveProfileAndModel, StdTextGeneratorFactory,
};
use crate::usecase::app::{ConfigDeps, ModelDeps, ObsDeps, PosterDeps, PosterUseCase};
use crate::usecase::serving::ServingUseCase;

/// main が使う組み立て済みアプリ
pub struct App {
    pub poster_use_case: PosterUseCase,
    pub logger: Arc<dyn Log>,
}

/// 配線: 標準アダプタ（実環境変数）で App を組み立てる
pub fn wire_poster(verbose: bool) -> App {
    wire_poster_with(Arc::new(StdEnvResolver), verbose)
}

/// 配線: EnvResolver を差し替えて App を組み立てる（テストではホームを一時ディレクトリにする）
pub fn wire_poster_with(env_resolver: Arc<dyn EnvResolver>, verbose: bool) -> App {
    let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
    let logger = build_logger(Arc::clone(&fs), env_resolver.as_ref(), verbose);

    let serving = ServingUseCase::new(
        Arc::new(FileModelRegistry::new(Arc::clone(&fs), Arc::clone(&env_resolver))),
        Arc::new(ManifestEndpointDeployer::new(Arc::clone(&fs), Arc::clone(&env_resolver))),
    );
    let deps = PosterDeps {
        config: ConfigDeps {
            fs: Arc::clone(&fs),
            config_loader: Arc::new(StdPosterConfigLoader::new(
                Arc::clone(&fs),
                Arc::clone(&env_resolver),
            )),
        },
        model: ModelDeps {
            profile_lister: Arc::new(StdProfileLister::new(Arc::clone(&fs), Arc::clone(&env_resolver))),
            resolve_profile_and_model: Arc::new(StdResolveProfileAndModel::new(
                Arc::clone(&fs),
                Arc::clone(&env_resolver),
            )),
            generator_factory: Arc::new(StdTextGeneratorFactory::new(
                Arc::clone(&fs),
                Arc::clone(&env_resolver),
            )),
        },
        serving,
        obs: ObsDeps {
            log: Arc::clone(&logger),
        },
    };
    App {
        poster_use_case: PosterUseCase::new(deps),
        logger,
    }
}

/// JSONL ファイルログ（-v なら stderr にも）。ホームが解決できなければファイルには書かない
fn build_logger(fs: Arc<dyn FileSystem>, env_resolver: &dyn EnvResolver, verbose: bool) -> Arc<dyn Log> {
    let mut sinks: Vec<Arc<dyn Log>> = Vec::new();
    if let Ok(path) = env_resolver.resolve_log_path() {
        sinks.push(Arc::new(FileJsonLog::new(fs, path)));
    }
    if verbose {
        sinks.push(Arc::new(StderrLog));
    }
    match sinks.len() {
        0 => Arc::new(NoopLog),
        1 => sinks.remove(0),
        _ => Arc::new(FanoutLog::new(sinks)),
    }
}
