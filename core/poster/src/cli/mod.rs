//! コマンドライン解析

mod args;

#[allow(unused_imports)]
pub use args::{config_to_command, parse_args, parse_args_from, print_completion, Config, ParseOutcome};
