use std::path::PathBuf;
use std::sync::Arc;

use common::domain::{ModelName, ProviderName};
use common::error::Error;

use super::FixedEnvResolver;
use crate::cli::{config_to_command, Config};
use crate::domain::PosterConfig;
use crate::ports::inbound::RunPosterApp;
use crate::wiring;
use crate::Runner;

/// 一時ホームで App を組み立て、Runner で実行して stdout 相当の出力を返す
fn run_app_in(env: FixedEnvResolver, config: Config) -> Result<(i32, String), Error> {
    let app = wiring::wire_poster_with(Arc::new(env), config.verbose);
    let runner = Runner::new(app);
    let mut out: Vec<u8> = Vec::new();
    let code = runner.execute(config_to_command(config)?, &mut out)?;
    Ok((code, String::from_utf8(out).unwrap()))
}

fn run_app(home: &std::path::Path, config: Config) -> Result<(i32, String), Error> {
    run_app_in(FixedEnvResolver::new(home), config)
}

fn write_config(home: &std::path::Path, file: &str, config: &PosterConfig) -> PathBuf {
    let path = home.join(file);
    std::fs::write(&path, config.to_json_pretty().unwrap()).unwrap();
    path
}

fn echo_config(template: &str) -> PosterConfig {
    PosterConfig {
        prompt_template: template.to_string(),
        model_provider: "echo".to_string(),
        model_name: "echo".to_string(),
        ..Default::default()
    }
}

#[test]
fn test_run_app_with_help() {
    let dir = tempfile::tempdir().unwrap();
    let (code, out) = run_app(
        dir.path(),
        Config {
            help: true,
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(code, 0);
    assert!(out.starts_with("Usage: poster"));
}

#[test]
fn test_run_app_without_context() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_app(dir.path(), Config::default()).unwrap_err();
    assert!(err.to_string().contains("No context provided"));
    assert_eq!(err.exit_code(), 64);
}

#[test]
fn test_run_app_list_profiles() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("profiles.json"),
        r#"{ "default": "dry", "providers": { "dry": { "type": "echo" } } }"#,
    )
    .unwrap();
    let (_, out) = run_app(
        dir.path(),
        Config {
            list_profiles: true,
            ..Default::default()
        },
    )
    .unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines.contains(&"dry (default)"));
    assert!(lines.contains(&"gemini"));
    assert!(lines.contains(&"echo"));
}

#[test]
fn test_run_app_uses_profiles_default_provider() {
    // poster.json も -C も無ければ、-L で (default) と表示されるプロファイルで生成する
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("profiles.json"),
        r#"{ "default_provider": "local", "providers": { "local": { "type": "echo", "model": "m" } } }"#,
    )
    .unwrap();
    let (_, listed) = run_app(
        dir.path(),
        Config {
            list_profiles: true,
            ..Default::default()
        },
    )
    .unwrap();
    assert!(listed.lines().any(|l| l == "local (default)"));

    let (code, out) = run_app(
        dir.path(),
        Config {
            context_args: vec!["topic".to_string()],
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(code, 0);
    assert!(out.contains("context:\ntopic\n"), "{}", out);

    let (_, out) = run_app(
        dir.path(),
        Config {
            register: Some("dflt".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(out, "registered dflt@1 (local / m)\n");
}

#[test]
fn test_run_app_generate_with_echo_config_file() {
    // echo プロバイダはネットワーク無しで user プロンプトをそのまま返す
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        "short.json",
        &echo_config("posts:{example_posts} topic:{context} extra:{additional_instructions}"),
    );
    let (code, out) = run_app(
        dir.path(),
        Config {
            config_path: Some(path),
            examples: vec!["Great day!".to_string()],
            context_args: vec!["launching".to_string(), "a".to_string(), "product".to_string()],
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(code, 0);
    assert_eq!(out, "posts:Great day! topic:launching a product extra:");
}

#[test]
fn test_run_app_examples_file_and_home_config() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), "poster.json", &echo_config("[{example_posts}] {context} ({additional_instructions})"));
    let examples = dir.path().join("examples.txt");
    std::fs::write(&examples, "first\n---\nsecond\n").unwrap();
    let (_, out) = run_app(
        dir.path(),
        Config {
            examples: vec!["zero".to_string()],
            examples_file: Some(examples),
            instructions: Some("short".to_string()),
            context_args: vec!["AI".to_string()],
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(out, "[zero\n\n---\n\nfirst\n\n---\n\nsecond] AI (short)");
}

#[test]
fn test_run_app_missing_examples_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_app(
        dir.path(),
        Config {
            profile: Some(ProviderName::new("echo")),
            examples_file: Some(dir.path().join("nope.txt")),
            context_args: vec!["AI".to_string()],
            ..Default::default()
        },
    )
    .unwrap_err();
    assert_eq!(err.exit_code(), 74);
}

#[test]
fn test_run_app_show_prompt_does_not_need_credentials() {
    // 既定設定は gemini だが、--show-prompt は生成器を作らないので API キー不要
    let dir = tempfile::tempdir().unwrap();
    let (code, out) = run_app(
        dir.path(),
        Config {
            show_prompt: true,
            examples: vec!["Loved speaking at RustConf!".to_string()],
            context_args: vec!["AI".to_string(), "in".to_string(), "healthcare".to_string()],
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(code, 0);
    assert!(out.starts_with("[system]\n"));
    assert!(out.contains("[user]\nexample posts:\nLoved speaking at RustConf!\ncontext:\nAI in healthcare\n"));
}

#[test]
fn test_run_app_gemini_without_key_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_app(
        dir.path(),
        Config {
            context_args: vec!["AI".to_string()],
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(err.to_string().contains("GEMINI_API_KEY"));
    assert_eq!(err.exit_code(), 78);
}

#[test]
fn test_run_app_unreachable_provider_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("profiles.json"),
        r#"{ "providers": { "local": { "type": "openai_compat", "base_url": "http://127.0.0.1:9/v1" } } }"#,
    )
    .unwrap();
    let err = run_app(
        dir.path(),
        Config {
            profile: Some(ProviderName::new("local")),
            model: Some(ModelName::new("llama3")),
            timeout: Some(5),
            context_args: vec!["AI".to_string()],
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, Error::ModelUnavailable(_)), "{:?}", err);
    assert_eq!(err.exit_code(), 69);
}

#[test]
fn test_run_app_blank_context_is_invalid_request() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_app(
        dir.path(),
        Config {
            profile: Some(ProviderName::new("echo")),
            context_args: vec!["  ".to_string()],
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidRequest(_)));
}

#[test]
fn test_run_app_register_deploy_and_generate_registered() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "c.json", &echo_config("about {context}"));

    let (_, out) = run_app(
        dir.path(),
        Config {
            register: Some("echoer".to_string()),
            config_path: Some(path),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(out, "registered echoer@1 (echo / echo)\n");

    let (_, out) = run_app(
        dir.path(),
        Config {
            deploy: Some("prod".to_string()),
            registered: Some("echoer".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(out, "created endpoint prod -> echoer@1 (revision 1)\n");

    let (_, out) = run_app(
        dir.path(),
        Config {
            registered: Some("echoer@1".to_string()),
            context_args: vec!["hiring".to_string()],
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(out, "about hiring");
}

#[test]
fn test_run_app_register_applies_profile_override() {
    let dir = tempfile::tempdir().unwrap();
    let (_, out) = run_app(
        dir.path(),
        Config {
            register: Some("gpt-style".to_string()),
            profile: Some(ProviderName::new("gpt")),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(out, "registered gpt-style@1 (gpt / gpt-4o-mini)\n");
}

#[test]
fn test_run_writes_jsonl_log() {
    let dir = tempfile::tempdir().unwrap();
    let app = wiring::wire_poster_with(Arc::new(FixedEnvResolver::new(dir.path())), false);
    let runner = Runner::new(app);
    let code = runner
        .run(Config {
            list_profiles: true,
            ..Default::default()
        })
        .unwrap();
    assert_eq!(code, 0);

    let log = std::fs::read_to_string(dir.path().join("logs/poster.jsonl")).unwrap();
    let records: Vec<serde_json::Value> = log
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(records[0]["message"], "command started");
    assert_eq!(records[0]["fields"]["command"], "list-profiles");
    assert_eq!(records[1]["message"], "command finished");
    assert_eq!(records[1]["fields"]["exit_code"], 0);
}

#[test]
fn test_run_app_with_api_key_builds_gemini() {
    // キーがあれば構築まで進む（--show-prompt ではないので生成器が作られる）。
    // base_url を到達不能にして実際の API には接続しない
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("profiles.json"),
        r#"{ "providers": { "g": { "type": "gemini", "base_url": "http://127.0.0.1:9" } } }"#,
    )
    .unwrap();
    let env = FixedEnvResolver::new(dir.path()).with_var("GEMINI_API_KEY", "test-key");
    let err = run_app_in(
        env,
        Config {
            profile: Some(ProviderName::new("g")),
            timeout: Some(5),
            context_args: vec!["AI".to_string()],
            ..Default::default()
        },
    )
    .unwrap_err();
    assert_eq!(err.exit_code(), 69);
    assert!(!err.to_string().contains("test-key"));
}
