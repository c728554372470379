//! 错误类型
//!
//! 所有协调器的失败最终都归入三类：连接错误、请求失败（非 2xx）、客户端校验失败。
//! 协调器在边界处把它们渲染为带 ❌ 前缀的提示，不再向外传播。

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 后端调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 客户端前置条件校验失败
    #[error("校验错误: {0}")]
    Validation(#[from] ValidationError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 后端调用错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 网络/传输失败，没有拿到任何 HTTP 响应
    #[error("无法连接到后端 ({endpoint}): {message}")]
    Connection { endpoint: String, message: String },
    /// 后端返回了非 2xx 状态码
    #[error("请求失败 ({endpoint}): HTTP {status}")]
    RequestFailed {
        endpoint: String,
        status: u16,
        /// 服务端给出的 `detail` 或 `message`
        detail: Option<String>,
    },
    /// 上传规格文件时后端返回非 2xx
    #[error("上传失败: HTTP {status}")]
    UploadFailed { status: u16 },
    /// 2xx 响应但响应体无法解析
    #[error("响应解析失败 ({endpoint}): {message}")]
    Decode { endpoint: String, message: String },
}

/// 错误分类，与用户可见的三种失败一一对应
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connection,
    RequestFailed,
    Validation,
}

impl ApiError {
    /// 归类到对外的错误分类
    ///
    /// 解析失败说明拿到了响应但内容不可用，按请求失败处理。
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Connection { .. } => ErrorKind::Connection,
            ApiError::RequestFailed { .. }
            | ApiError::UploadFailed { .. }
            | ApiError::Decode { .. } => ErrorKind::RequestFailed,
        }
    }

    /// 服务端提供的错误说明（如果有）
    pub fn server_detail(&self) -> Option<&str> {
        match self {
            ApiError::RequestFailed { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

/// 客户端校验错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 深度分析前没有选择或上传规格文件
    #[error("未选择规格文件")]
    MissingSpecsFile,
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 基础 URL 不合法
    #[error("基础URL不合法 '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    /// 配置文件读取失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// HTTP 客户端构建失败
    #[error("HTTP客户端构建失败: {0}")]
    HttpClient(String),
}

impl AppError {
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            AppError::Api(e) => Some(e.kind()),
            AppError::Validation(_) => Some(ErrorKind::Validation),
            AppError::Config(_) => None,
        }
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

/// 后端调用结果类型
pub type ApiResult<T> = Result<T, ApiError>;
