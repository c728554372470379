//! 用户注册与审批的数据模型

use serde::{Deserialize, Serialize};

/// 待审批用户
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingUser {
    pub id: i64,
    pub email: String,
}

/// 审批决定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ApprovalDecision {
    pub user_id: i64,
    pub approve: bool,
}

/// 注册请求
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// 服务端返回的提示消息
///
/// 成功时为 `{message}`；失败时可能是 `{detail}` 或 `{message}`。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServerMessage {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ServerMessage {
    /// 优先取 `detail`，其次 `message`
    pub fn into_text(self) -> Option<String> {
        self.detail
            .filter(|d| !d.is_empty())
            .or(self.message.filter(|m| !m.is_empty()))
    }
}
