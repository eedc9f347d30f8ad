use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;

use crate::client::ClientError;
use crate::models::{CreateVideoInput, ListParams, PageResult, VideoRecord};

/// 默认请求超时
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// 列表数据来源
///
/// [`SyncController`](crate::client::SyncController) 只依赖这个接口，测试中可以替换为假实现。
pub trait VideoSource: Send + Sync + 'static {
    fn fetch_videos(
        &self,
        params: &ListParams,
    ) -> impl Future<Output = Result<PageResult, ClientError>> + Send;
}

/// 访问视频目录 HTTP 接口的客户端
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
    timeout: Duration,
}

impl ApiClient {
    /// 使用默认超时创建客户端
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `GET /videos`，空参数不发送，缺省的排序与分页参数自动补齐
    pub async fn list_videos(&self, params: &ListParams) -> Result<PageResult, ClientError> {
        let request = self
            .http
            .get(self.url("/videos"))
            .query(&params.query_pairs());
        self.execute(request).await
    }

    /// `POST /videos`
    pub async fn create_video(&self, input: &CreateVideoInput) -> Result<VideoRecord, ClientError> {
        let request = self.http.post(self.url("/videos")).json(input);
        self.execute(request).await
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await.map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response.json::<T>().await.map_err(|e| self.classify(e))
    }

    fn classify(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(self.timeout)
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl VideoSource for ApiClient {
    async fn fetch_videos(&self, params: &ListParams) -> Result<PageResult, ClientError> {
        self.list_videos(params).await
    }
}

/// 从错误响应体中取出可读的提示
///
/// 支持 `{"error": {"message": "..."}}` 和 `{"error": "..."}` 两种形式。
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let error = value.get("error")?;
    error
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| error.as_str())
        .map(str::to_string)
}
