use crate::shared::config::environment::ApiConfig;
/// 汎用APIクライアント
///
/// ストアフロントのRESTバックエンドと通信する薄いクライアント。
/// 失敗時の自動リトライは行わず、呼び出し元で通知に変換する。
use crate::shared::errors::{AppError, AppResult};
use log::{debug, info, warn};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use url::Url;

/// APIクライアント設定
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        let api_config = ApiConfig::default();
        Self {
            base_url: api_config.base_url,
            timeout_seconds: api_config.timeout_seconds,
        }
    }
}

impl From<ApiConfig> for ApiClientConfig {
    fn from(api_config: ApiConfig) -> Self {
        Self {
            base_url: api_config.base_url,
            timeout_seconds: api_config.timeout_seconds,
        }
    }
}

impl ApiClientConfig {
    /// 環境設定からAPIクライアント設定を作成
    pub fn from_env() -> Self {
        ApiConfig::from_env().into()
    }
}

/// 汎用APIクライアント
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: ApiClientConfig,
}

impl ApiClient {
    /// 環境変数の設定でAPIクライアントを作成
    pub fn new() -> AppResult<Self> {
        Self::new_with_config(ApiClientConfig::from_env())
    }

    /// 設定を指定してAPIクライアントを作成
    pub fn new_with_config(config: ApiClientConfig) -> AppResult<Self> {
        let mut builder = Client::builder();
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        let client = builder
            .build()
            .map_err(|e| AppError::configuration(format!("HTTPクライアント初期化失敗: {e}")))?;

        Ok(Self { client, config })
    }

    /// ベースURL
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// エンドポイントとクエリパラメータから完全なURLを組み立てる
    ///
    /// 値が空のパラメータは送信しない
    pub fn endpoint_url(&self, endpoint: &str, query: &[(&str, String)]) -> AppResult<Url> {
        let raw = format!("{}{endpoint}", self.config.base_url.trim_end_matches('/'));
        let mut url = Url::parse(&raw)
            .map_err(|e| AppError::configuration(format!("不正なURLです: {raw} ({e})")))?;

        let params: Vec<&(&str, String)> = query.iter().filter(|(_, v)| !v.is_empty()).collect();
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// GETリクエストを送信
    pub async fn get<T>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
        auth_token: Option<&str>,
    ) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint_url(endpoint, query)?;
        info!("GETリクエスト送信: url={url}");
        let request = self.authorized(self.client.get(url), auth_token);
        self.send(request, "GET", endpoint).await
    }

    /// POSTリクエストを送信
    pub async fn post<B, T>(
        &self,
        endpoint: &str,
        body: &B,
        auth_token: Option<&str>,
    ) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_with_body(Method::POST, endpoint, body, auth_token).await
    }

    /// PUTリクエストを送信
    pub async fn put<B, T>(
        &self,
        endpoint: &str,
        body: &B,
        auth_token: Option<&str>,
    ) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_with_body(Method::PUT, endpoint, body, auth_token).await
    }

    /// DELETEリクエストを送信
    pub async fn delete<T>(&self, endpoint: &str, auth_token: Option<&str>) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint_url(endpoint, &[])?;
        info!("DELETEリクエスト送信: url={url}");
        let request = self.authorized(self.client.delete(url), auth_token);
        self.send(request, "DELETE", endpoint).await
    }

    async fn send_with_body<B, T>(
        &self,
        method: Method,
        endpoint: &str,
        body: &B,
        auth_token: Option<&str>,
    ) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint_url(endpoint, &[])?;
        info!("{method}リクエスト送信: url={url}");
        let label = method.to_string();
        let request = self.authorized(self.client.request(method, url).json(body), auth_token);
        self.send(request, &label, endpoint).await
    }

    fn authorized(&self, request: RequestBuilder, auth_token: Option<&str>) -> RequestBuilder {
        match auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// リクエストを一度だけ送信し、レスポンスを解析する
    async fn send<T>(&self, request: RequestBuilder, method: &str, endpoint: &str) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await.map_err(|e| {
            warn!("APIサーバーへの接続に失敗しました: {method} {endpoint}: {e}");
            AppError::network(format!("APIサーバーへの接続に失敗しました: {e}"))
        })?;

        if !response.status().is_success() {
            return Err(self.handle_error_response(response).await);
        }

        let result: T = response.json().await.map_err(|e| {
            AppError::external_service(format!("Invalid response from server: {e}"))
        })?;

        info!("{method}リクエスト成功: endpoint={endpoint}");
        Ok(result)
    }

    /// エラーレスポンスを処理し、ユーザーに表示できるメッセージを取り出す
    async fn handle_error_response(&self, response: Response) -> AppError {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "レスポンス読み取り失敗".to_string());

        match extract_error_message(&body) {
            Some(message) => {
                debug!("APIサーバーからエラーメッセージを受信: status={status}, message={message}");
                if status == 404 {
                    AppError::NotFound(message)
                } else {
                    AppError::ExternalService(message)
                }
            }
            None => {
                warn!("APIサーバーから非構造化エラーレスポンス: status={status}, body={body}");
                let message = fallback_message(status);
                if status == 404 {
                    AppError::NotFound(message.to_string())
                } else {
                    AppError::ExternalService(message.to_string())
                }
            }
        }
    }
}

/// エラーボディからメッセージを取り出す
///
/// `{"message": ".."}`、`{"error": ".."}`、`{"error": {"message": ".."}}`に対応する
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    let candidate = value
        .get("message")
        .and_then(|v| v.as_str())
        .or_else(|| value.get("error").and_then(|v| v.as_str()))
        .or_else(|| {
            value
                .get("error")
                .and_then(|v| v.get("message"))
                .and_then(|v| v.as_str())
        })?;

    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// ステータスコードごとの汎用メッセージ
pub fn fallback_message(status: u16) -> &'static str {
    match status {
        400 => "The request was invalid",
        401 => "Please log in again",
        403 => "You do not have permission to do that",
        404 => "The requested resource was not found",
        409 => "The request conflicts with the current state",
        429 => "Too many requests. Please wait a moment",
        500..=599 => "The server encountered an error",
        _ => "Something went wrong",
    }
}
