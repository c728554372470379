//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 把协调器接到一个交互式控制台上：读命令、调协调器、渲染状态。
//!
//! ## 模块划分
//!
//! ### `command` - 命令解析
//! - 一行输入 → `Command`
//! - 纯函数，不碰网络
//!
//! ### `console` - 控制台应用
//! - 构建 HTTP 后端（基础 URL 只解析一次）
//! - 持有四个协调器和表单的下拉框取值
//! - 按协调器暴露的状态输出结果
//!
//! ## 层次关系
//!
//! ```text
//! console::App (展示)
//!     ↓
//! workflow (协调器：consultation / deep_dive / admin / registration)
//!     ↓
//! infrastructure (ConsultantBackend / HttpBackend)
//! ```

pub mod command;
pub mod console;

pub use command::{parse_command, Command};
pub use console::{App, FormSelections};
