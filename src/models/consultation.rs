//! 咨询相关的数据模型
//!
//! 请求体字段名与后端接口保持一致（`user_question`、`system_type`、`specs_filename`）。

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 行业
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Industry {
    #[default]
    Automotive,
    Aerospace,
    Healthcare,
    Energy,
    Manufacturing,
    IT,
}

impl Industry {
    pub const ALL: [Industry; 6] = [
        Industry::Automotive,
        Industry::Aerospace,
        Industry::Healthcare,
        Industry::Energy,
        Industry::Manufacturing,
        Industry::IT,
    ];

    /// 后端使用的名称
    pub fn as_str(self) -> &'static str {
        match self {
            Industry::Automotive => "Automotive",
            Industry::Aerospace => "Aerospace",
            Industry::Healthcare => "Healthcare",
            Industry::Energy => "Energy",
            Industry::Manufacturing => "Manufacturing",
            Industry::IT => "IT",
        }
    }
}

impl FromStr for Industry {
    type Err = String;

    /// 不区分大小写
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Industry::ALL
            .into_iter()
            .find(|i| i.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("未知行业: {}", s))
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 咨询角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    General,
    Embedded,
    Cloud,
    Manufacturing,
    Security,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::General,
        Role::Embedded,
        Role::Cloud,
        Role::Manufacturing,
        Role::Security,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::General => "general",
            Role::Embedded => "embedded",
            Role::Cloud => "cloud",
            Role::Manufacturing => "manufacturing",
            Role::Security => "security",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("未知角色: {}", s))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 深度分析的系统类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemType {
    #[default]
    Embedded,
    Cloud,
    Manufacturing,
}

impl SystemType {
    pub const ALL: [SystemType; 3] = [
        SystemType::Embedded,
        SystemType::Cloud,
        SystemType::Manufacturing,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SystemType::Embedded => "embedded",
            SystemType::Cloud => "cloud",
            SystemType::Manufacturing => "manufacturing",
        }
    }
}

impl FromStr for SystemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SystemType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("未知系统类型: {}", s))
    }
}

impl fmt::Display for SystemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 普通咨询请求
///
/// 问题文本原样转发，不在这里校验是否为空。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsultationRequest {
    #[serde(rename = "user_question")]
    pub question: String,
    pub industry: Industry,
    pub role: Role,
}

impl ConsultationRequest {
    pub fn new(question: impl Into<String>, industry: Industry, role: Role) -> Self {
        Self {
            question: question.into(),
            industry,
            role,
        }
    }
}

/// `/consult` 与 `/deep_dive` 的响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsultationResponse {
    pub answer: String,
    /// 报告文件名，通过 `/reports/{filename}` 单独下载
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
}

/// 深度分析请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeepDiveRequest {
    #[serde(rename = "user_question")]
    pub question: String,
    pub industry: Industry,
    pub system_type: SystemType,
    pub specs_filename: String,
}

impl DeepDiveRequest {
    /// 构建深度分析请求
    ///
    /// `specs_filename` 为空时直接拒绝，不会产生网络请求。
    pub fn new(
        question: impl Into<String>,
        industry: Industry,
        system_type: SystemType,
        specs_filename: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let specs_filename = specs_filename.into();
        if specs_filename.is_empty() {
            return Err(ValidationError::MissingSpecsFile);
        }
        Ok(Self {
            question: question.into(),
            industry,
            system_type,
            specs_filename,
        })
    }
}
