//! # AI Consultant Client
//!
//! AI 咨询应用的客户端工作流编排
//!
//! ## 架构设计
//!
//! 本系统采用三层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 后端 HTTP 契约
//! - `ConsultantBackend` - 每个接口一个方法，不重试、不持有界面状态
//! - `HttpBackend` - 基于 reqwest 的实现，基础 URL 只解析一次
//!
//! ### ② 流程层（Workflow）
//! - `workflow/` - 每条工作流一个协调器，独占自己的状态
//! - `ConsultationCoordinator` - 普通咨询
//! - `DeepDiveCoordinator` - 规格文件列表 / 上传 / 选择 / 深度分析
//! - `AdminApprovalCoordinator` - 待审批用户的拉取与审批
//! - `RegistrationCoordinator` - 账号注册
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/console` - 交互式控制台，只负责调用协调器并渲染状态
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{ApiError, AppError, AppResult, ErrorKind, ValidationError};
pub use infrastructure::{ConsultantBackend, HttpBackend};
pub use orchestrator::App;
pub use workflow::{
    AdminApprovalCoordinator, ConsultationCoordinator, DeepDiveCoordinator, OperationState,
    Outcome, RegistrationCoordinator,
};
