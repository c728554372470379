//! 操作状态
//!
//! 所有协调器共用的状态机：`Idle → InFlight → Settled(Success | Failure)`，
//! 下一次操作开始时再回到 `InFlight`。

use std::fmt;

/// 一次操作的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// 协调器的操作状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationState {
    #[default]
    Idle,
    InFlight,
    Settled(Outcome),
}

impl fmt::Display for OperationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationState::Idle => f.write_str("idle"),
            OperationState::InFlight => f.write_str("⏳ processing"),
            OperationState::Settled(Outcome::Success) => f.write_str("done"),
            OperationState::Settled(Outcome::Failure) => f.write_str("failed"),
        }
    }
}

/// 请求票据
///
/// 每次开始操作领取一个递增的票据；只有最新票据的响应可以写入展示字段，
/// 旧请求晚到的结果被丢弃。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestGuard {
    latest: u64,
}

impl RequestGuard {
    /// 领取新票据
    pub fn begin(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    /// 票据是否仍是最新的
    pub fn is_current(&self, ticket: u64) -> bool {
        self.latest == ticket
    }
}

/// 无法连接后端时的通用提示
pub const CONNECTION_FAILED: &str = "Error connecting to server";

/// 成功提示
pub fn success_message(text: impl fmt::Display) -> String {
    format!("✅ {}", text)
}

/// 失败提示
pub fn failure_message(text: impl fmt::Display) -> String {
    format!("❌ {}", text)
}
