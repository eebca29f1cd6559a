use std::path::PathBuf;

use clap::builder::ArgAction;
use clap::value_parser;
use clap_complete::Shell;
use common::domain::{ModelName, ProviderName};
use common::error::Error;

use crate::domain::{
    ArtifactName, ConfigSource, ModelRef, PostInput, PosterCommand, ProviderOverrides,
};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub help: bool,
    /// -L / --list-profiles: 現在有効なプロファイル一覧を表示
    pub list_profiles: bool,
    /// -v / --verbose: 構造化ログを stderr にも出す
    pub verbose: bool,
    /// --show-prompt: モデルを呼ばずに組み立てたプロンプトを表示
    pub show_prompt: bool,
    /// --register <name>: 設定を登録する
    pub register: Option<String>,
    /// --deploy <endpoint>: -r の登録済みモデルをエンドポイントに割り当てる
    pub deploy: Option<String>,
    /// -C / --config <path>
    pub config_path: Option<PathBuf>,
    /// -r / --registered <name[@version]>
    pub registered: Option<String>,
    pub profile: Option<ProviderName>,
    pub model: Option<ModelName>,
    /// -t / --timeout <secs>
    pub timeout: Option<u64>,
    pub examples: Vec<String>,
    pub examples_file: Option<PathBuf>,
    pub instructions: Option<String>,
    /// 残りの引数（空白で連結して context にする）
    pub context_args: Vec<String>,
}

/// 解析結果: 通常の Config / 補完スクリプト生成
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    GenerateCompletion(Shell),
}

fn build_clap_command() -> clap::Command {
    clap::Command::new("poster")
        .about("Generate a social media post in the style of example posts")
        .disable_help_flag(true)
        .arg(
            clap::Arg::new("help")
                .short('h')
                .long("help")
                .help("Show this help message")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("list-profiles")
                .short('L')
                .long("list-profiles")
                .help("List currently available provider profiles")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Also write structured logs to stderr")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("example")
                .short('e')
                .long("example")
                .value_name("post")
                .help("Example post to imitate (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            clap::Arg::new("examples-file")
                .short('f')
                .long("examples-file")
                .value_name("path")
                .help("File with example posts separated by lines containing only ---")
                .value_parser(value_parser!(PathBuf))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("instructions")
                .short('i')
                .long("instructions")
                .value_name("text")
                .help("Additional instructions for this post")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("profile")
                .short('p')
                .long("profile")
                .value_name("profile")
                .help("Override model provider (gemini, gpt, echo, or a profiles.json profile)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("model")
                .short('m')
                .long("model")
                .value_name("model")
                .help("Override model name")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("secs")
                .help("HTTP timeout in seconds")
                .value_parser(value_parser!(u64))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("config")
                .short('C')
                .long("config")
                .value_name("path")
                .help("Poster configuration JSON file")
                .value_parser(value_parser!(PathBuf))
                .num_args(1)
                .conflicts_with("registered"),
        )
        .arg(
            clap::Arg::new("registered")
                .short('r')
                .long("registered")
                .value_name("name[@version]")
                .help("Use a registered configuration")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("show-prompt")
                .long("show-prompt")
                .help("Print the rendered prompt without calling the model")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("register")
                .long("register")
                .value_name("name")
                .help("Register the configuration as the next version of <name>")
                .num_args(1)
                .conflicts_with_all([
                    "deploy",
                    "show-prompt",
                    "example",
                    "examples-file",
                    "instructions",
                    "context",
                ]),
        )
        .arg(
            clap::Arg::new("deploy")
                .long("deploy")
                .value_name("endpoint")
                .help("Create or update <endpoint> to serve the model given with -r")
                .num_args(1)
                .conflicts_with("show-prompt"),
        )
        .arg(
            clap::Arg::new("generate")
                .long("generate")
                .value_name("shell")
                .help("Generate shell completion script")
                .value_parser(value_parser!(Shell))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("context")
                .index(1)
                .help("Topic / context of the post")
                .num_args(0..)
                .trailing_var_arg(true),
        )
}

fn matches_to_config(matches: &clap::ArgMatches) -> Config {
    let strings = |id: &str| -> Vec<String> {
        matches
            .get_many::<String>(id)
            .map(|i| i.cloned().collect())
            .unwrap_or_default()
    };
    Config {
        help: matches.get_flag("help"),
        list_profiles: matches.get_flag("list-profiles"),
        verbose: matches.get_flag("verbose"),
        show_prompt: matches.get_flag("show-prompt"),
        register: matches.get_one::<String>("register").cloned(),
        deploy: matches.get_one::<String>("deploy").cloned(),
        config_path: matches.get_one::<PathBuf>("config").cloned(),
        registered: matches.get_one::<String>("registered").cloned(),
        profile: matches
            .get_one::<String>("profile")
            .map(|s| ProviderName::new(s.clone())),
        model: matches
            .get_one::<String>("model")
            .map(|s| ModelName::new(s.clone())),
        timeout: matches.get_one::<u64>("timeout").copied(),
        examples: strings("example"),
        examples_file: matches.get_one::<PathBuf>("examples-file").cloned(),
        instructions: matches.get_one::<String>("instructions").cloned(),
        context_args: strings("context"),
    }
}

/// コマンドラインを解析する。補完生成が要求された場合は ParseOutcome::GenerateCompletion を返す。
pub fn parse_args() -> Result<ParseOutcome, Error> {
    let matches = build_clap_command()
        .try_get_matches()
        .map_err(|e| Error::invalid_argument(e.to_string()))?;

    if let Some(&shell) = matches.get_one::<Shell>("generate") {
        return Ok(ParseOutcome::GenerateCompletion(shell));
    }
    Ok(ParseOutcome::Config(matches_to_config(&matches)))
}

/// テスト用: 引数スライスから解析する
#[allow(dead_code)]
pub fn parse_args_from(args: &[String]) -> Result<Config, Error> {
    let matches = build_clap_command()
        .try_get_matches_from(args)
        .map_err(|e| Error::invalid_argument(e.to_string()))?;
    Ok(matches_to_config(&matches))
}

/// 補完スクリプトを標準出力に出力する。
pub fn print_completion(shell: Shell) {
    let mut cmd = build_clap_command();
    clap_complete::generate(shell, &mut cmd, "poster", &mut std::io::stdout());
}

/// Config を PosterCommand に変換する。名前の形式チェックもここで行う。
pub fn config_to_command(config: Config) -> Result<PosterCommand, Error> {
    if config.help {
        return Ok(PosterCommand::Help);
    }
    if config.list_profiles {
        return Ok(PosterCommand::ListProfiles);
    }

    let registered = config
        .registered
        .as_deref()
        .map(ModelRef::parse)
        .transpose()?;

    if let Some(endpoint) = config.deploy {
        let model = registered.ok_or_else(|| {
            Error::invalid_argument("--deploy requires -r/--registered <name[@version]>")
        })?;
        return Ok(PosterCommand::Deploy {
            endpoint: ArtifactName::parse(&endpoint)?,
            model,
        });
    }

    let source = match (config.config_path, registered) {
        (Some(_), Some(_)) => {
            return Err(Error::invalid_argument(
                "-C/--config and -r/--registered cannot be used together",
            ))
        }
        (Some(path), None) => ConfigSource::File(path),
        (None, Some(model)) => ConfigSource::Registered(model),
        (None, None) => ConfigSource::Home,
    };
    let overrides = ProviderOverrides {
        profile: config.profile,
        model: config.model,
        timeout_secs: config.timeout,
    };

    if let Some(name) = config.register {
        if !config.context_args.is_empty()
            || !config.examples.is_empty()
            || config.examples_file.is_some()
            || config.instructions.is_some()
        {
            return Err(Error::invalid_argument(
                "--register takes no context, -e, -f or -i (only the configuration is registered)",
            ));
        }
        return Ok(PosterCommand::Register {
            name: ArtifactName::parse(&name)?,
            source,
            overrides,
        });
    }

    if config.context_args.is_empty() {
        return Err(Error::invalid_argument("No context provided."));
    }
    let input = PostInput {
        examples: config.examples,
        examples_file: config.examples_file,
        context: config.context_args.join(" "),
        instructions: config.instructions,
    };
    if config.show_prompt {
        Ok(PosterCommand::ShowPrompt {
            source,
            overrides,
            input,
        })
    } else {
        Ok(PosterCommand::Generate {
            source,
            overrides,
            input,
        })
    }
}
