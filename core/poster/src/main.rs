mod adapter;
mod cli;
mod domain;
mod ports;
mod usecase;
mod wiring;

#[cfg(test)]
mod tests;

use std::io::Write;
use std::process;

use cli::{config_to_command, parse_args, print_completion, Config, ParseOutcome};
use common::error::Error;
use common::ports::outbound::{LogLevel, LogRecord};
use domain::{DeployOutcome, PosterCommand};
use ports::inbound::RunPosterApp;
use wiring::{wire_poster, App};

/// Command をディスパッチする Runner（match は main レイヤーに集約）
pub(crate) struct Runner {
    app: App,
}

impl Runner {
    pub(crate) fn new(app: App) -> Self {
        Self { app }
    }

    fn log(&self, record: LogRecord) {
        let _ = self.app.logger.log(&record.layer("cli"));
    }

    /// コマンドを実行し、結果を out に書く
    pub(crate) fn execute(&self, cmd: PosterCommand, out: &mut dyn Write) -> Result<i32, Error> {
        let uc = &self.app.poster_use_case;
        let io = |e: std::io::Error| Error::io_msg(e.to_string());
        match cmd {
            PosterCommand::Help => {
                print_help(out).map_err(io)?;
                Ok(0)
            }
            PosterCommand::ListProfiles => {
                let (names, default) = uc.list_profiles()?;
                for name in &names {
                    if default.as_deref() == Some(name.as_str()) {
                        writeln!(out, "{} (default)", name).map_err(io)?;
                    } else {
                        writeln!(out, "{}", name).map_err(io)?;
                    }
                }
                Ok(0)
            }
            PosterCommand::ShowPrompt {
                source,
                overrides,
                input,
            } => {
                let prompt = uc.show_prompt(&source, &overrides, &input)?;
                write!(
                    out,
                    "[system]\n{}\n\n[user]\n{}",
                    prompt.system_instruction, prompt.user_prompt
                )
                .map_err(io)?;
                Ok(0)
            }
            PosterCommand::Generate {
                source,
                overrides,
                input,
            } => {
                let result = uc.generate(&source, &overrides, &input)?;
                // 応答は加工せずに出力する
                out.write_all(result.generated_text.as_bytes()).map_err(io)?;
                out.flush().map_err(io)?;
                Ok(0)
            }
            PosterCommand::Register {
                name,
                source,
                overrides,
            } => {
                let registered = uc.register(&name, &source, &overrides)?;
                writeln!(
                    out,
                    "registered {}@{} ({} / {})",
                    registered.name,
                    registered.version,
                    registered.config.model_provider,
                    registered.config.model_name
                )
                .map_err(io)?;
                Ok(0)
            }
            PosterCommand::Deploy { endpoint, model } => {
                let written = match uc.deploy(&endpoint, &model)? {
                    DeployOutcome::Created(r) => writeln!(
                        out,
                        "created endpoint {} -> {}@{} (revision {})",
                        r.endpoint_name, r.model_name, r.model_version, r.revision
                    ),
                    DeployOutcome::Updated {
                        previous_version,
                        record: r,
                    } => writeln!(
                        out,
                        "updated endpoint {}: {}@{} -> {}@{} (revision {})",
                        r.endpoint_name,
                        r.model_name,
                        previous_version,
                        r.model_name,
                        r.model_version,
                        r.revision
                    ),
                };
                written.map_err(io)?;
                Ok(0)
            }
        }
    }
}

impl RunPosterApp for Runner {
    fn run(&self, config: Config) -> Result<i32, Error> {
        let cmd = config_to_command(config)?;
        let command_name = cmd_name_for_log(&cmd);
        self.log(
            LogRecord::new(LogLevel::Info, "command started")
                .kind("lifecycle")
                .field("command", command_name),
        );

        let result = self.execute(cmd, &mut std::io::stdout());

        let code = match &result {
            Ok(c) => *c,
            Err(e) => e.exit_code(),
        };
        self.log(
            LogRecord::new(LogLevel::Info, "command finished")
                .kind("lifecycle")
                .field("command", command_name)
                .field("exit_code", code),
        );
        if let Err(ref e) = result {
            self.log(
                LogRecord::new(LogLevel::Error, e.to_string())
                    .kind("error")
                    .field("error_kind", e.kind()),
            );
        }
        result
    }
}

fn cmd_name_for_log(cmd: &PosterCommand) -> &'static str {
    match cmd {
        PosterCommand::Help => "help",
        PosterCommand::ListProfiles => "list-profiles",
        PosterCommand::ShowPrompt { .. } => "show-prompt",
        PosterCommand::Generate { .. } => "generate",
        PosterCommand::Register { .. } => "register",
        PosterCommand::Deploy { .. } => "deploy",
    }
}

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("poster: {}", e);
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

pub fn run() -> Result<i32, Error> {
    let config = match parse_args()? {
        ParseOutcome::Config(c) => c,
        ParseOutcome::GenerateCompletion(shell) => {
            print_completion(shell);
            return Ok(0);
        }
    };
    let runner = Runner::new(wire_poster(config.verbose));
    runner.run(config)
}

fn print_usage() {
    eprintln!("Usage: poster [options] <context...>");
}

fn print_help(out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "Usage: poster [options] <context...>")?;
    writeln!(out, "Options:")?;
    writeln!(out, "  -h, --help                    Show this help message")?;
    writeln!(out, "  -L, --list-profiles           List currently available provider profiles (from profiles.json + built-ins)")?;
    writeln!(out, "  -e, --example <post>          Example post to imitate (repeatable)")?;
    writeln!(out, "  -f, --examples-file <path>    File with example posts separated by lines containing only ---")?;
    writeln!(out, "  -i, --instructions <text>     Additional instructions for this post")?;
    writeln!(out, "  -p, --profile <profile>       Override model provider (gemini, gpt, openai_compat, echo, or a profile)")?;
    writeln!(out, "  -m, --model <model>           Override model name")?;
    writeln!(out, "  -t, --timeout <secs>          HTTP timeout in seconds")?;
    writeln!(out, "  -C, --config <path>           Poster configuration JSON (default: $POSTER_HOME/poster.json, else built-in)")?;
    writeln!(out, "  -r, --registered <name[@N]>   Use a registered configuration (latest version when @N is omitted)")?;
    writeln!(out, "  --show-prompt                 Print the rendered prompt without calling the model")?;
    writeln!(out, "  --register <name>             Register the configuration as the next version of <name>")?;
    writeln!(out, "  --deploy <endpoint>           Create or update <endpoint> to serve the model given with -r")?;
    writeln!(out, "  -v, --verbose                 Also write structured logs to stderr")?;
    writeln!(out, "  --generate <shell>            Generate shell completion script (bash, zsh, fish, ...)")?;
    writeln!(out)?;
    writeln!(out, "Environment:")?;
    writeln!(out, "  POSTER_HOME     Home directory (profiles.json, poster.json, registry/, endpoints/, logs/).")?;
    writeln!(out, "                  If unset, $XDG_CONFIG_HOME/poster (e.g. ~/.config/poster) is used.")?;
    writeln!(out, "  GEMINI_API_KEY  API key for gemini (or the profile's api_key_env)")?;
    writeln!(out, "  OPENAI_API_KEY  API key for gpt")?;
    writeln!(out)?;
    writeln!(out, "Examples:")?;
    writeln!(out, "  poster -e \"Great day at the office! #teamwork\" launching a product")?;
    writeln!(out, "  poster -f my_posts.txt -i \"under 100 words\" AI in healthcare")?;
    writeln!(out, "  poster --show-prompt -p echo remote work tips")?;
    writeln!(out, "  poster --register linkedin -p gpt && poster --deploy prod -r linkedin")?;
    Ok(())
}
