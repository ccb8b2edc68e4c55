use thiserror::Error;

/// 应用程序错误类型
///
/// 只在内部边界上做分类与传递。对外契约里被吸收的失败
/// （存储不可达、AI 返回非法 JSON）不会以该类型向上传播，
/// 只转成空结果或 false 并记日志。
#[derive(Debug, Error)]
pub enum AppError {
    /// 图片处理错误
    #[error("图片处理错误: {0}")]
    Image(#[from] image::ImageError),

    /// IO 错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 序列化/解析错误
    #[error("JSON解析失败: {0}")]
    Json(#[from] serde_json::Error),
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
