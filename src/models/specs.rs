//! 规格文件相关的数据模型

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// 待上传的规格文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecsUpload {
    /// 本地文件名，作为 multipart 的 filename
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl SpecsUpload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// 从本地路径读取文件
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("无法读取规格文件: {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .with_context(|| format!("路径没有文件名: {}", path.display()))?;
        Ok(Self { file_name, bytes })
    }
}

/// `/upload_specs` 的响应
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadReceipt {
    /// 服务端分配的文件名
    pub filename: String,
}

/// 文件选择状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileStatus {
    #[default]
    NoFileChosen,
    FileSelected,
}

impl FileStatus {
    /// 界面展示文本
    pub fn label(self) -> &'static str {
        match self {
            FileStatus::NoFileChosen => "No file chosen",
            FileStatus::FileSelected => "✅ File selected",
        }
    }
}

/// 当前选中的规格文件
///
/// 状态由文件名推导，两者不会出现不一致。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeepDiveSelection {
    selected_filename: Option<String>,
}

impl DeepDiveSelection {
    /// 选择文件，空字符串等同于清空选择
    pub fn select(&mut self, filename: impl Into<String>) {
        let filename = filename.into();
        self.selected_filename = if filename.is_empty() {
            None
        } else {
            Some(filename)
        };
    }

    pub fn selected_filename(&self) -> Option<&str> {
        self.selected_filename.as_deref()
    }

    pub fn file_status(&self) -> FileStatus {
        match self.selected_filename {
            Some(_) => FileStatus::FileSelected,
            None => FileStatus::NoFileChosen,
        }
    }
}
