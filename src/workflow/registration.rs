//! 用户注册流程
//!
//! 注册后账号进入待审批列表，由管理员处理。

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};

use crate::error::{AppResult, ErrorKind};
use crate::infrastructure::ConsultantBackend;
use crate::models::RegistrationRequest;
use crate::workflow::operation::{
    failure_message, success_message, OperationState, Outcome, RequestGuard, CONNECTION_FAILED,
};

pub const REGISTRATION_SUBMITTED: &str = "Registration submitted";
pub const REGISTRATION_FAILED: &str = "Registration failed";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationState {
    pub operation: OperationState,
    pub message: Option<String>,
    guard: RequestGuard,
}

/// 注册协调器
pub struct RegistrationCoordinator {
    backend: Arc<dyn ConsultantBackend>,
    state: watch::Sender<RegistrationState>,
}

impl RegistrationCoordinator {
    pub fn new(backend: Arc<dyn ConsultantBackend>) -> Self {
        let (state, _) = watch::channel(RegistrationState::default());
        Self { backend, state }
    }

    pub fn snapshot(&self) -> RegistrationState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<RegistrationState> {
        self.state.subscribe()
    }

    /// 提交注册，返回服务端提示
    pub async fn register(&self, email: &str, password: &str) -> AppResult<String> {
        let mut ticket = 0;
        self.state.send_modify(|s| {
            ticket = s.guard.begin();
            s.operation = OperationState::InFlight;
        });

        let request = RegistrationRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        info!("🆕 注册账号: {}", request.email);

        let reply = self.backend.register(&request).await;
        let (outcome, message, result): (Outcome, String, AppResult<String>) = match reply {
            Ok(reply) => {
                let text = reply
                    .into_text()
                    .unwrap_or_else(|| REGISTRATION_SUBMITTED.to_string());
                info!("✓ 注册成功: {}", text);
                (Outcome::Success, success_message(&text), Ok(text))
            }
            Err(e) => {
                error!("❌ 注册失败: {}", e);
                let text = match (e.server_detail(), e.kind()) {
                    (Some(detail), _) => detail.to_string(),
                    (None, ErrorKind::Connection) => CONNECTION_FAILED.to_string(),
                    (None, _) => REGISTRATION_FAILED.to_string(),
                };
                (Outcome::Failure, failure_message(text), Err(e.into()))
            }
        };

        self.state.send_if_modified(|s| {
            if !s.guard.is_current(ticket) {
                return false;
            }
            s.operation = OperationState::Settled(outcome);
            s.message = Some(message);
            true
        });

        result
    }
}
