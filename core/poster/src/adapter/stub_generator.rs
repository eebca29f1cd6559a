//! テスト用: 固定の応答を返す TextGenerator / 作成回数を数える TextGeneratorFactory

#[cfg(test)]
mod stub {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use common::error::Error;

    use crate::ports::outbound::{GeneratorSpec, TextGenerator, TextGeneratorFactory};

    /// テスト用: 固定の結果を返し、受け取ったプロンプトを記録する Stub
    pub struct StubGenerator {
        result: Result<String, Error>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl StubGenerator {
        pub fn new(result: Result<String, Error>) -> Self {
            Self {
                result,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn text(text: &str) -> Self {
            Self::new(Ok(text.to_string()))
        }

        /// (system_instruction, user_prompt) の呼び出し履歴
        pub fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl TextGenerator for StubGenerator {
        fn provider(&self) -> &str {
            "stub"
        }

        fn model(&self) -> &str {
            "stub-model"
        }

        fn generate(&self, system_instruction: &str, user_prompt: &str) -> Result<String, Error> {
            self.calls
                .lock()
                .unwrap()
                .push((system_instruction.to_string(), user_prompt.to_string()));
            self.result.clone()
        }
    }

    /// テスト用: 常に同じ StubGenerator を返すファクトリ
    pub struct StubGeneratorFactory {
        generator: Arc<StubGenerator>,
        created: AtomicUsize,
        specs: Mutex<Vec<GeneratorSpec>>,
    }

    impl StubGeneratorFactory {
        pub fn new(generator: Arc<StubGenerator>) -> Self {
            Self {
                generator,
                created: AtomicUsize::new(0),
                specs: Mutex::new(Vec::new()),
            }
        }

        pub fn created(&self) -> usize {
            self.created.load(Ordering::SeqCst)
        }

        pub fn specs(&self) -> Vec<GeneratorSpec> {
            self.specs.lock().unwrap().clone()
        }
    }

    impl TextGeneratorFactory for StubGeneratorFactory {
        fn create(&self, spec: &GeneratorSpec) -> Result<Arc<dyn TextGenerator>, Error> {
            self.created.fetch_add(1, Ordering::SeqCst);
            self.specs.lock().unwrap().push(spec.clone());
            Ok(Arc::clone(&self.generator) as Arc<dyn TextGenerator>)
        }
    }
}

#[cfg(test)]
pub use stub::{StubGenerator, StubGeneratorFactory};
