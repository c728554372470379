use crate::error::ConfigError;
use reqwest::Url;
use serde::Deserialize;
use std::path::Path;

/// 默认后端地址
pub const DEFAULT_API_BASE_URL: &str = "https://ai-systems-backend-2.onrender.com";

/// 程序配置
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// 后端基础 URL，所有接口路径都相对于它解析
    pub api_base_url: String,
    /// 传输层超时（秒），为空时不设置
    pub request_timeout_secs: Option<u64>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: None,
            verbose_logging: false,
        }
    }
}

/// TOML 配置文件结构，所有字段可选
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    api_base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    verbose_logging: Option<bool>,
}

impl Config {
    /// 读取配置文件（`CONSULTANT_CONFIG` 指定时），再用环境变量覆盖
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var("CONSULTANT_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Self::from_toml_file(Path::new(&path))?,
            _ => Self::default(),
        };
        base.overlay_env()
    }

    /// 从 TOML 文件加载配置
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse_toml(&content, &path.display().to_string())
    }

    /// 从 TOML 字符串加载配置
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse_toml(content, "<inline>")
    }

    fn parse_toml(content: &str, path: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|source| ConfigError::TomlParseFailed {
                path: path.to_string(),
                source,
            })?;
        let default = Self::default();
        Ok(Self {
            api_base_url: file.api_base_url.unwrap_or(default.api_base_url),
            request_timeout_secs: file.request_timeout_secs.or(default.request_timeout_secs),
            verbose_logging: file.verbose_logging.unwrap_or(default.verbose_logging),
        })
    }

    fn overlay_env(self) -> Result<Self, ConfigError> {
        let api_base_url = std::env::var("API_BASE_URL")
            .or_else(|_| std::env::var("NEXT_PUBLIC_API_BASE_URL"))
            .unwrap_or(self.api_base_url);

        let request_timeout_secs = match std::env::var("REQUEST_TIMEOUT_SECS") {
            Ok(v) => Some(parse_env("REQUEST_TIMEOUT_SECS", &v, "u64")?),
            Err(_) => self.request_timeout_secs,
        };

        let verbose_logging = match std::env::var("VERBOSE_LOGGING") {
            Ok(v) => parse_env("VERBOSE_LOGGING", &v, "bool")?,
            Err(_) => self.verbose_logging,
        };

        Ok(Self {
            api_base_url,
            request_timeout_secs,
            verbose_logging,
        })
    }

    /// 解析并规范化基础 URL
    ///
    /// 结尾补上 `/`，这样 `join("consult")` 会追加路径段而不是替换最后一段。
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let trimmed = self.api_base_url.trim();
        let normalized = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{}/", trimmed)
        };

        let url = Url::parse(&normalized).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.api_base_url.clone(),
            reason: e.to_string(),
        })?;

        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.api_base_url.clone(),
                reason: "必须是 http(s) 地址".to_string(),
            });
        }

        Ok(url)
    }
}

fn parse_env<T: std::str::FromStr>(
    var_name: &str,
    value: &str,
    expected_type: &str,
) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value: value.to_string(),
            expected_type: expected_type.to_string(),
        })
}
