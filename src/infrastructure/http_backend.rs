//! 基于 reqwest 的后端实现
//!
//! 基础 URL 在构建时解析一次，之后所有接口路径都相对它拼接。

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ApiError, ApiResult, ConfigError};
use crate::infrastructure::backend::ConsultantBackend;
use crate::models::{
    ApprovalDecision, ConsultationRequest, ConsultationResponse, DeepDiveRequest, PendingUser,
    RegistrationRequest, ServerMessage, SpecsUpload, UploadReceipt,
};

/// HTTP 后端
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// 根据配置创建后端，基础 URL 不合法时失败
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let base_url = config.base_url()?;

        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint_url(&self, path: &str) -> ApiResult<Url> {
        self.base_url.join(path).map_err(|e| ApiError::Connection {
            endpoint: format!("/{}", path),
            message: e.to_string(),
        })
    }

    fn get(&self, path: &str) -> ApiResult<RequestBuilder> {
        Ok(self.client.get(self.endpoint_url(path)?))
    }

    fn post(&self, path: &str) -> ApiResult<RequestBuilder> {
        Ok(self.client.post(self.endpoint_url(path)?))
    }

    /// 发送请求并解析 JSON 响应
    ///
    /// 非 2xx 时尽量读出服务端的 `detail`/`message`。
    async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> ApiResult<T> {
        debug!("➡️ 请求后端: {}", endpoint);

        let response = request.send().await.map_err(|e| {
            warn!("⚠️ 无法连接到后端 ({}): {}", endpoint, e);
            ApiError::Connection {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ServerMessage>()
                .await
                .ok()
                .and_then(ServerMessage::into_text);
            warn!("⚠️ 后端返回 HTTP {} ({})", status.as_u16(), endpoint);
            return Err(ApiError::RequestFailed {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                detail,
            });
        }

        let body = response.json::<T>().await.map_err(|e| ApiError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })?;

        debug!("✓ 后端响应成功: {}", endpoint);
        Ok(body)
    }
}

/// 报告下载地址 `/reports/{filename}`
///
/// 由界面直接打开，不经过任何协调器。文件名会被百分号编码。
pub fn report_url(base_url: &Url, filename: &str) -> ApiResult<Url> {
    let mut url = base_url.join("reports/").map_err(|e| ApiError::Connection {
        endpoint: "/reports".to_string(),
        message: e.to_string(),
    })?;
    url.path_segments_mut()
        .map_err(|_| ApiError::Connection {
            endpoint: "/reports".to_string(),
            message: format!("无法在 {} 下拼接路径", base_url),
        })?
        .pop_if_empty()
        .push(filename);
    Ok(url)
}

#[async_trait]
impl ConsultantBackend for HttpBackend {
    async fn consult(&self, request: &ConsultationRequest) -> ApiResult<ConsultationResponse> {
        let builder = self.post("consult")?.json(request);
        self.execute("/consult", builder).await
    }

    async fn deep_dive(&self, request: &DeepDiveRequest) -> ApiResult<ConsultationResponse> {
        let builder = self.post("deep_dive")?.json(request);
        self.execute("/deep_dive", builder).await
    }

    async fn list_specs(&self) -> ApiResult<Vec<String>> {
        let builder = self.get("list_specs")?;
        self.execute("/list_specs", builder).await
    }

    async fn upload_specs(&self, upload: &SpecsUpload) -> ApiResult<UploadReceipt> {
        let part = Part::bytes(upload.bytes.clone()).file_name(upload.file_name.clone());
        let form = Form::new().part("file", part);
        let builder = self.post("upload_specs")?.multipart(form);

        match self.execute::<UploadReceipt>("/upload_specs", builder).await {
            Err(ApiError::RequestFailed { status, .. }) => Err(ApiError::UploadFailed { status }),
            other => other,
        }
    }

    async fn register(&self, request: &RegistrationRequest) -> ApiResult<ServerMessage> {
        let builder = self.post("register")?.json(request);
        self.execute("/register", builder).await
    }

    async fn list_pending_users(&self) -> ApiResult<Vec<PendingUser>> {
        let builder = self.get("list_pending_users")?;
        self.execute("/list_pending_users", builder).await
    }

    async fn approve_user(&self, decision: &ApprovalDecision) -> ApiResult<ServerMessage> {
        let builder = self.post("approve_user")?.json(decision);
        self.execute("/approve_user", builder).await
    }
}
