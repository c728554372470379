//! 后端接口 - 基础设施层
//!
//! 协调器之间唯一共享的东西就是这份 HTTP 契约。

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::models::{
    ApprovalDecision, ConsultationRequest, ConsultationResponse, DeepDiveRequest, PendingUser,
    RegistrationRequest, ServerMessage, SpecsUpload, UploadReceipt,
};

/// 后端协作者
///
/// 职责：
/// - 每个方法对应一个后端接口，只发一次请求
/// - 不重试、不缓存
/// - 不持有任何界面状态
#[async_trait]
pub trait ConsultantBackend: Send + Sync {
    /// POST /consult
    async fn consult(&self, request: &ConsultationRequest) -> ApiResult<ConsultationResponse>;

    /// POST /deep_dive
    async fn deep_dive(&self, request: &DeepDiveRequest) -> ApiResult<ConsultationResponse>;

    /// GET /list_specs
    async fn list_specs(&self) -> ApiResult<Vec<String>>;

    /// POST /upload_specs（multipart，字段名 `file`）
    async fn upload_specs(&self, upload: &SpecsUpload) -> ApiResult<UploadReceipt>;

    /// POST /register
    async fn register(&self, request: &RegistrationRequest) -> ApiResult<ServerMessage>;

    /// GET /list_pending_users
    async fn list_pending_users(&self) -> ApiResult<Vec<PendingUser>>;

    /// POST /approve_user
    async fn approve_user(&self, decision: &ApprovalDecision) -> ApiResult<ServerMessage>;
}
