//! 普通咨询流程
//!
//! 单次提交：问题 + 行业 + 角色 → `/consult` → 答案。

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::error::AppResult;
use crate::infrastructure::ConsultantBackend;
use crate::models::{ConsultationRequest, ConsultationResponse};
use crate::utils::logging::truncate_text;
use crate::workflow::operation::{failure_message, OperationState, Outcome, RequestGuard};

/// 咨询失败时展示给用户的提示
pub const CONSULT_FAILED: &str = "Error connecting to AI system for consultation.";

/// 咨询协调器对外暴露的状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsultationState {
    pub operation: OperationState,
    pub response: Option<ConsultationResponse>,
    /// 失败提示，与 `response` 互斥
    pub message: Option<String>,
    guard: RequestGuard,
}

/// 咨询协调器
pub struct ConsultationCoordinator {
    backend: Arc<dyn ConsultantBackend>,
    state: watch::Sender<ConsultationState>,
}

impl ConsultationCoordinator {
    pub fn new(backend: Arc<dyn ConsultantBackend>) -> Self {
        let (state, _) = watch::channel(ConsultationState::default());
        Self { backend, state }
    }

    /// 当前状态的快照
    pub fn snapshot(&self) -> ConsultationState {
        self.state.borrow().clone()
    }

    /// 订阅状态变化
    pub fn subscribe(&self) -> watch::Receiver<ConsultationState> {
        self.state.subscribe()
    }

    /// 提交咨询
    ///
    /// 字段原样转发（包括空问题）。开始时清空上一次的答案和错误，
    /// 结束时只写入答案或错误之一。失败不重试。
    pub async fn submit(&self, request: ConsultationRequest) -> AppResult<ConsultationResponse> {
        let mut ticket = 0;
        self.state.send_modify(|s| {
            ticket = s.guard.begin();
            s.operation = OperationState::InFlight;
            s.response = None;
            s.message = None;
        });

        info!(
            "🔍 提交咨询 [{} / {}]: {}",
            request.industry,
            request.role,
            truncate_text(&request.question, 80)
        );

        match self.backend.consult(&request).await {
            Ok(response) => {
                info!("✓ 咨询完成，答案长度: {} 字符", response.answer.len());
                let applied = self.state.send_if_modified(|s| {
                    if !s.guard.is_current(ticket) {
                        return false;
                    }
                    s.operation = OperationState::Settled(Outcome::Success);
                    s.response = Some(response.clone());
                    s.message = None;
                    true
                });
                if !applied {
                    debug!("丢弃过期的咨询响应 (票据 {})", ticket);
                }
                Ok(response)
            }
            Err(e) => {
                error!("❌ 咨询失败: {}", e);
                let applied = self.state.send_if_modified(|s| {
                    if !s.guard.is_current(ticket) {
                        return false;
                    }
                    s.operation = OperationState::Settled(Outcome::Failure);
                    s.response = None;
                    s.message = Some(failure_message(CONSULT_FAILED));
                    true
                });
                if !applied {
                    debug!("丢弃过期的咨询错误 (票据 {})", ticket);
                }
                Err(e.into())
            }
        }
    }
}
