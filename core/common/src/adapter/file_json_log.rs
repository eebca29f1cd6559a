//! Log 実装: ファイルへ JSONL 追記 / stderr への要点出力 / 複数出力先への分配

use crate::error::Error;
use crate::ports::outbound::{FileSystem, Log, LogRecord};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// ファイルへ JSONL を追記する Log 実装
pub struct FileJsonLog {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl FileJsonLog {
    /// ログファイルパスへ追記する logger を生成する。
    /// 親ディレクトリが無ければ作成する（初回書き込み時）。
    pub fn new(fs: Arc<dyn FileSystem>, path: impl AsRef<Path>) -> Self {
        Self {
            fs,
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl Log for FileJsonLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            self.fs.create_dir_all(parent)?;
        }
        let mut w = self.fs.open_append(&self.path)?;
        let line = serde_json::to_string(record)?;
        w.write_all(line.as_bytes())
            .map_err(|e| Error::io_msg(e.to_string()))?;
        w.write_all(b"\n")
            .map_err(|e| Error::io_msg(e.to_string()))?;
        w.flush().map_err(|e| Error::io_msg(e.to_string()))?;
        Ok(())
    }
}

/// 人間向けに 1 行へ整形する（`--verbose` 時の stderr 出力用）
pub fn format_human(record: &LogRecord) -> String {
    let mut line = format!("[{}] {}", record.level.as_str(), record.message);
    if let Some(fields) = &record.fields {
        for (k, v) in fields {
            match v.as_str() {
                Some(s) => line.push_str(&format!(" {}={}", k, s)),
                None => line.push_str(&format!(" {}={}", k, v)),
            }
        }
    }
    line
}

/// stderr に要点だけ出す Log 実装
#[derive(Debug, Clone, Default)]
pub struct StderrLog;

impl Log for StderrLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        eprintln!("{}", format_human(record));
        Ok(())
    }
}

/// 複数の Log に同じレコードを流す。どれかが失敗しても残りには書く（最初のエラーを返す）
pub struct FanoutLog {
    sinks: Vec<Arc<dyn Log>>,
}

impl FanoutLog {
    pub fn new(sinks: Vec<Arc<dyn Log>>) -> Self {
        Self { sinks }
    }
}

impl Log for FanoutLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        let mut first_err = None;
        for sink in &self.sinks {
            if let Err(e) = sink.log(record) {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// 何も出力しない Log 実装（テスト用）
#[derive(Debug, Clone, Default)]
pub struct NoopLog;

impl Log for NoopLog {
    fn log(&self, _record: &LogRecord) -> Result<(), Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::StdFileSystem;
    use crate::ports::outbound::LogLevel;
    use std::sync::Mutex;

    struct CollectLog(Mutex<Vec<String>>);

    impl Log for CollectLog {
        fn log(&self, record: &LogRecord) -> Result<(), Error> {
            self.0.lock().unwrap().push(record.message.clone());
            Ok(())
        }
    }

    struct FailingLog;

    impl Log for FailingLog {
        fn log(&self, _record: &LogRecord) -> Result<(), Error> {
            Err(Error::io_msg("disk full"))
        }
    }

    #[test]
    fn test_noop_log() {
        let log = NoopLog;
        assert!(log.log(&LogRecord::new(LogLevel::Info, "test")).is_ok());
    }

    #[test]
    fn test_file_json_log_creates_parent_and_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("poster.jsonl");
        let log = FileJsonLog::new(Arc::new(StdFileSystem), &path);
        log.log(&LogRecord::new(LogLevel::Info, "first")).unwrap();
        log.log(&LogRecord::new(LogLevel::Error, "second")).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let v: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(v["level"], "error");
        assert_eq!(v["message"], "second");
    }

    #[test]
    fn test_format_human_includes_fields() {
        let rec = LogRecord::new(LogLevel::Warn, "generation failed")
            .field("provider", "gemini")
            .field("elapsed_ms", 12);
        assert_eq!(
            format_human(&rec),
            "[warn] generation failed elapsed_ms=12 provider=gemini"
        );
    }

    #[test]
    fn test_fanout_writes_to_all_and_reports_first_error() {
        let collect = Arc::new(CollectLog(Mutex::new(Vec::new())));
        let fanout = FanoutLog::new(vec![
            Arc::new(FailingLog),
            Arc::clone(&collect) as Arc<dyn Log>,
        ]);
        let err = fanout.log(&LogRecord::new(LogLevel::Info, "hello")).unwrap_err();
        assert_eq!(err.to_string(), "disk full");
        assert_eq!(*collect.0.lock().unwrap(), vec!["hello".to_string()]);
    }
}
