// ==========================================
// 物流 NT 看板 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换导入错误为用户友好的错误消息
// 红线: 预期内的"无数据"不是错误, 走 ScreenOutcome::NoData
// ==========================================

use crate::importer::error::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 外部协作方错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),

    #[error("SAP 刷新失败: {0}")]
    SapRefreshFailed(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::InternalError(msg) => ApiError::InternalError(msg),
            ImportError::Other(err) => ApiError::Other(err),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
