//! 管理员审批流程
//!
//! 先拉取待审批列表，再逐个批准/拒绝。审批成功后直接从本地列表移除，不重新拉取。

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::error::{ApiError, AppResult, ErrorKind};
use crate::infrastructure::ConsultantBackend;
use crate::models::{ApprovalDecision, PendingUser};
use crate::workflow::operation::{
    failure_message, success_message, OperationState, Outcome, RequestGuard, CONNECTION_FAILED,
};

/// 拉取列表失败（服务端拒绝）时的提示
pub const FETCH_PENDING_FAILED: &str = "Failed to fetch pending users";
/// 服务端没有给出原因时的审批失败提示
pub const DECISION_FAILED: &str = "Failed to update user";

/// 管理员审批协调器对外暴露的状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminState {
    pub pending: Vec<PendingUser>,
    pub operation: OperationState,
    pub message: Option<String>,
    guard: RequestGuard,
}

/// 管理员审批协调器
pub struct AdminApprovalCoordinator {
    backend: Arc<dyn ConsultantBackend>,
    state: watch::Sender<AdminState>,
}

impl AdminApprovalCoordinator {
    pub fn new(backend: Arc<dyn ConsultantBackend>) -> Self {
        let (state, _) = watch::channel(AdminState::default());
        Self { backend, state }
    }

    pub fn snapshot(&self) -> AdminState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AdminState> {
        self.state.subscribe()
    }

    /// 拉取待审批用户
    ///
    /// 成功时整体替换列表并清空提示；失败时保留原列表。
    pub async fn fetch_pending(&self) -> AppResult<Vec<PendingUser>> {
        let ticket = self.begin();

        match self.backend.list_pending_users().await {
            Ok(users) => {
                info!("👥 待审批用户: {} 个", users.len());
                self.state.send_if_modified(|s| {
                    if !s.guard.is_current(ticket) {
                        return false;
                    }
                    s.pending = users.clone();
                    s.operation = OperationState::Settled(Outcome::Success);
                    s.message = None;
                    true
                });
                Ok(users)
            }
            Err(e) => {
                error!("❌ 拉取待审批用户失败: {}", e);
                let text = match e.kind() {
                    ErrorKind::Connection => CONNECTION_FAILED,
                    _ => FETCH_PENDING_FAILED,
                };
                self.settle(ticket, Outcome::Failure, failure_message(text));
                Err(e.into())
            }
        }
    }

    /// 批准或拒绝用户
    ///
    /// 只对当前列表中存在的 id 有定义。成功时移除该 id，其余条目顺序不变；
    /// 失败时列表不变。返回服务端的提示消息。
    pub async fn decide(&self, id: i64, approve: bool) -> AppResult<String> {
        let ticket = self.begin();
        let decision = ApprovalDecision {
            user_id: id,
            approve,
        };
        info!(
            "📝 {} 用户 #{}",
            if approve { "批准" } else { "拒绝" },
            id
        );

        match self.backend.approve_user(&decision).await {
            Ok(reply) => {
                let text = reply
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| default_decision_text(approve).to_string());
                info!("✓ 用户 #{} 已处理: {}", id, text);

                let message = success_message(&text);
                self.state.send_modify(|s| {
                    s.pending.retain(|u| u.id != id);
                    if s.guard.is_current(ticket) {
                        s.operation = OperationState::Settled(Outcome::Success);
                        s.message = Some(message);
                    }
                });
                Ok(text)
            }
            Err(e) => {
                error!("❌ 处理用户 #{} 失败: {}", id, e);
                self.settle(ticket, Outcome::Failure, failure_message(decision_failure_text(&e)));
                Err(e.into())
            }
        }
    }

    fn begin(&self) -> u64 {
        let mut ticket = 0;
        self.state.send_modify(|s| {
            ticket = s.guard.begin();
            s.operation = OperationState::InFlight;
        });
        ticket
    }

    fn settle(&self, ticket: u64, outcome: Outcome, message: String) {
        let applied = self.state.send_if_modified(|s| {
            if !s.guard.is_current(ticket) {
                return false;
            }
            s.operation = OperationState::Settled(outcome);
            s.message = Some(message);
            true
        });
        if !applied {
            debug!("丢弃过期的审批结果 (票据 {})", ticket);
        }
    }
}

fn default_decision_text(approve: bool) -> &'static str {
    if approve {
        "User approved"
    } else {
        "User denied"
    }
}

fn decision_failure_text(e: &ApiError) -> String {
    match e.server_detail() {
        Some(detail) => detail.to_string(),
        None if e.kind() == ErrorKind::Connection => CONNECTION_FAILED.to_string(),
        None => DECISION_FAILED.to_string(),
    }
}
