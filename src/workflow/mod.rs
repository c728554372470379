//! 流程层（Workflow Layer）
//!
//! 每个协调器独占一条工作流的状态和它的网络交互：
//!
//! - `consultation` - 普通咨询
//! - `deep_dive` - 规格文件列表 / 上传 / 选择 / 深度分析
//! - `admin` - 待审批用户的拉取与审批
//! - `registration` - 账号注册
//!
//! 协调器之间互不调用，只共享 `ConsultantBackend` 契约。
//! 状态通过 `snapshot()` / `subscribe()` 暴露给界面层。

pub mod admin;
pub mod consultation;
pub mod deep_dive;
pub mod operation;
pub mod registration;

pub use admin::{AdminApprovalCoordinator, AdminState};
pub use consultation::{ConsultationCoordinator, ConsultationState};
pub use deep_dive::{DeepDiveCoordinator, DeepDiveState};
pub use operation::{OperationState, Outcome, RequestGuard};
pub use registration::{RegistrationCoordinator, RegistrationState};
