//! poster 共通ライブラリ
//!
//! `poster` コマンドが使うエラー型・ドメイン型・LLM プロバイダ・ポートとアダプタを提供します。

/// エラーハンドリング
pub mod error;

/// ドメイン型（Newtype）
pub mod domain;

/// LLMドライバーとプロバイダ
pub mod llm;

/// Outbound ポート
pub mod ports;

/// ポートの標準実装
pub mod adapter;
