//! 深度分析流程
//!
//! 把三件事合成一个可提交的请求：
//! 1. 规格文件列表（以服务端为准，整体替换）
//! 2. 上传新文件（成功后自动选中，并重新拉取列表）
//! 3. 手动选择已有文件
//!
//! 上传和刷新是串联的：上传响应只保证给出新文件名，完整列表必须再向服务端要一次。

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::error::AppResult;
use crate::infrastructure::ConsultantBackend;
use crate::models::{
    ConsultationResponse, DeepDiveRequest, DeepDiveSelection, FileStatus, Industry, SpecsUpload,
    SystemType,
};
use crate::utils::logging::truncate_text;
use crate::workflow::operation::{
    failure_message, success_message, OperationState, Outcome, RequestGuard,
};

/// 未选择文件时的提示
pub const SELECT_SPECS_PROMPT: &str = "Please select or upload a specs file first.";
/// 上传失败提示
pub const UPLOAD_FAILED: &str = "Failed to upload specs file.";
/// 深度分析失败提示
pub const DEEP_DIVE_FAILED: &str = "Error running deep dive.";

/// 深度分析协调器对外暴露的状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeepDiveState {
    /// 服务端已知的规格文件
    pub catalog: Vec<String>,
    pub selection: DeepDiveSelection,
    pub operation: OperationState,
    pub response: Option<ConsultationResponse>,
    /// 用户可见的提示（✅ / ❌）
    pub message: Option<String>,
    /// 深度分析票据，只有它能写 `response`
    guard: RequestGuard,
    upload_guard: RequestGuard,
    catalog_guard: RequestGuard,
}

impl DeepDiveState {
    pub fn file_status(&self) -> FileStatus {
        self.selection.file_status()
    }
}

/// 深度分析协调器
pub struct DeepDiveCoordinator {
    backend: Arc<dyn ConsultantBackend>,
    state: watch::Sender<DeepDiveState>,
}

impl DeepDiveCoordinator {
    /// 创建协调器，不拉取列表
    pub fn new(backend: Arc<dyn ConsultantBackend>) -> Self {
        let (state, _) = watch::channel(DeepDiveState::default());
        Self { backend, state }
    }

    /// 创建协调器并拉取一次规格文件列表
    pub async fn initialize(backend: Arc<dyn ConsultantBackend>) -> Self {
        let coordinator = Self::new(backend);
        coordinator.refresh_catalog().await;
        coordinator
    }

    pub fn snapshot(&self) -> DeepDiveState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DeepDiveState> {
        self.state.subscribe()
    }

    /// 刷新规格文件列表
    ///
    /// 成功时整体替换；失败只记录日志，列表保持不变，不打扰用户。
    /// 返回刷新后的列表。
    pub async fn refresh_catalog(&self) -> Vec<String> {
        let mut ticket = 0;
        self.state.send_if_modified(|s| {
            ticket = s.catalog_guard.begin();
            false
        });

        match self.backend.list_specs().await {
            Ok(list) => {
                info!("📄 规格文件列表已刷新，共 {} 个", list.len());
                self.state.send_if_modified(|s| {
                    if !s.catalog_guard.is_current(ticket) || s.catalog == list {
                        return false;
                    }
                    s.catalog = list;
                    true
                });
            }
            Err(e) => {
                warn!("⚠️ 刷新规格文件列表失败，保留原列表: {}", e);
            }
        }

        self.state.borrow().catalog.clone()
    }

    /// 上传规格文件
    ///
    /// 没有文件时直接返回 `Ok(None)`。成功后选中服务端返回的文件名并刷新列表；
    /// 刷新失败不影响上传结果。上传失败时保留原来的选择。
    pub async fn upload(&self, file: Option<SpecsUpload>) -> AppResult<Option<String>> {
        let Some(upload) = file else {
            return Ok(None);
        };

        let mut ticket = 0;
        self.state.send_modify(|s| {
            ticket = s.upload_guard.begin();
            s.operation = OperationState::InFlight;
            s.message = None;
        });
        info!(
            "📁 上传规格文件: {} ({} 字节)",
            upload.file_name,
            upload.bytes.len()
        );

        let receipt = match self.backend.upload_specs(&upload).await {
            Ok(receipt) => receipt,
            Err(e) => {
                error!("❌ 上传规格文件失败: {}", e);
                let applied = self.state.send_if_modified(|s| {
                    if !s.upload_guard.is_current(ticket) {
                        return false;
                    }
                    s.operation = OperationState::Settled(Outcome::Failure);
                    s.message = Some(failure_message(UPLOAD_FAILED));
                    true
                });
                if !applied {
                    debug!("丢弃过期的上传失败结果 (票据 {})", ticket);
                }
                return Err(e.into());
            }
        };

        info!("✓ 上传成功，服务端文件名: {}", receipt.filename);
        self.state.send_modify(|s| {
            s.selection.select(receipt.filename.clone());
            if s.upload_guard.is_current(ticket) {
                s.message = Some(success_message(format!("Uploaded: {}", receipt.filename)));
            }
        });

        self.refresh_catalog().await;

        self.state.send_if_modified(|s| {
            if !s.upload_guard.is_current(ticket) {
                return false;
            }
            s.operation = OperationState::Settled(Outcome::Success);
            true
        });

        Ok(Some(receipt.filename))
    }

    /// 选择文件，纯状态变更，不发请求
    ///
    /// 空字符串表示取消选择。
    pub fn select_file(&self, filename: &str) {
        debug!("选择规格文件: {:?}", filename);
        self.state.send_modify(|s| s.selection.select(filename));
    }

    /// 执行深度分析
    ///
    /// 没有选中文件时在本地拒绝，不发请求，并使之前未完成的深度分析结果作废。
    /// 选中的文件不要求出现在列表里。
    pub async fn perform_deep_dive(
        &self,
        question: &str,
        industry: Industry,
        system_type: SystemType,
    ) -> AppResult<ConsultationResponse> {
        let filename = self
            .state
            .borrow()
            .selection
            .selected_filename()
            .unwrap_or_default()
            .to_string();

        let request = match DeepDiveRequest::new(question, industry, system_type, filename) {
            Ok(request) => request,
            Err(e) => {
                warn!("⚠️ 深度分析被拒绝: {}", e);
                self.state.send_modify(|s| {
                    s.guard.begin();
                    s.operation = OperationState::Settled(Outcome::Failure);
                    s.response = None;
                    s.message = Some(failure_message(SELECT_SPECS_PROMPT));
                });
                return Err(e.into());
            }
        };

        let ticket = self.begin();
        info!(
            "🔬 深度分析 [{} / {} / {}]: {}",
            request.industry,
            request.system_type,
            request.specs_filename,
            truncate_text(&request.question, 80)
        );

        match self.backend.deep_dive(&request).await {
            Ok(response) => {
                info!("✓ 深度分析完成，答案长度: {} 字符", response.answer.len());
                let applied = self.state.send_if_modified(|s| {
                    if !s.guard.is_current(ticket) {
                        return false;
                    }
                    // 提示在 begin 时已清空，之后写入的只会来自上传
                    s.operation = OperationState::Settled(Outcome::Success);
                    s.response = Some(response.clone());
                    true
                });
                if !applied {
                    debug!("丢弃过期的深度分析响应 (票据 {})", ticket);
                }
                Ok(response)
            }
            Err(e) => {
                error!("❌ 深度分析失败: {}", e);
                self.settle_failure(ticket, DEEP_DIVE_FAILED);
                Err(e.into())
            }
        }
    }

    /// 开始一次深度分析：领取票据，清空上一次的答案和提示
    fn begin(&self) -> u64 {
        let mut ticket = 0;
        self.state.send_modify(|s| {
            ticket = s.guard.begin();
            s.operation = OperationState::InFlight;
            s.response = None;
            s.message = None;
        });
        ticket
    }

    fn settle_failure(&self, ticket: u64, text: &str) {
        let applied = self.state.send_if_modified(|s| {
            if !s.guard.is_current(ticket) {
                return false;
            }
            s.operation = OperationState::Settled(Outcome::Failure);
            s.response = None;
            s.message = Some(failure_message(text));
            true
        });
        if !applied {
            debug!("丢弃过期的失败结果 (票据 {})", ticket);
        }
    }
}
