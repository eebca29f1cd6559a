//! プロバイダ共通の HTTP ヘルパー（reqwest::blocking）

use crate::error::Error;
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;

/// タイムアウトを反映した HTTP クライアントを作る（None のときは reqwest の既定値）
pub(crate) fn build_client(timeout: Option<Duration>) -> Result<Client, Error> {
    let mut builder = Client::builder();
    if let Some(t) = timeout {
        builder = builder.timeout(t);
    }
    builder
        .build()
        .map_err(|e| Error::configuration(format!("Failed to build HTTP client: {}", e)))
}

/// JSON を POST して本文を返す。接続失敗・非 2xx はすべて ModelUnavailable。
pub(crate) fn post_json(
    client: &Client,
    url: &str,
    headers: &[(&str, String)],
    body: &str,
    api_label: &str,
) -> Result<String, Error> {
    let mut builder = client
        .post(url)
        .header("Content-Type", "application/json")
        .body(body.to_string());
    for (name, value) in headers {
        builder = builder.header(*name, value);
    }

    let response = builder
        .send()
        .map_err(|e| Error::unavailable(format!("HTTP request failed: {}", e)))?;

    let status = response.status();
    let response_text = response
        .text()
        .map_err(|e| Error::unavailable(format!("Failed to read response: {}", e)))?;

    if !status.is_success() {
        return Err(Error::unavailable(format!(
            "{} API error: {}",
            api_label,
            error_message(status.as_u16(), &response_text)
        )));
    }
    Ok(response_text)
}

/// エラーレスポンスからメッセージを取り出す（`error.message` が無ければ本文をそのまま）
pub(crate) fn error_message(status: u16, response_text: &str) -> String {
    serde_json::from_str::<Value>(response_text)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(|s| s.to_string()))
        .unwrap_or_else(|| format!("HTTP {}: {}", status, response_text))
}

/// プロバイダの応答 JSON をパースする（壊れた本文はプロバイダ障害扱い）
pub(crate) fn parse_body(response_json: &str) -> Result<Value, Error> {
    serde_json::from_str(response_json)
        .map_err(|e| Error::unavailable(format!("Failed to parse response JSON: {}", e)))
}
