//! 错题存储服务 - 业务能力层
//!
//! 只追加的记录存储，非图片记录按 `content` 去重。
//! 后端可以是远程表格（整表读写），也可以是本地 JSON 文件
//! （两者契约完全一致）。
//!
//! 所有失败都在本层吸收：读失败返回空列表，写失败返回 false，
//! 不向调用方抛错（"页面永不崩溃"策略）。

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{info, warn};

use crate::clients::SheetClient;
use crate::config::Config;
use crate::models::mistake::{MistakeRecord, SHEET_COLUMNS};
use crate::utils::logging::truncate_text;

/// 存储后端
pub enum StoreBackend {
    /// 远程表格
    Sheet(SheetClient),
    /// 本地 JSON 文件（早期版本的后端，契约相同）
    File(PathBuf),
}

/// 错题存储
pub struct MistakeStore {
    backend: StoreBackend,
}

impl MistakeStore {
    /// 按配置选择后端：配置了表格地址用远程表格，否则用本地文件
    pub fn new(config: &Config) -> Self {
        if config.use_sheet_backend() {
            info!("错题本后端: 远程表格 ({})", config.sheet_api_base_url);
            Self::with_sheet(SheetClient::new(config))
        } else {
            info!("错题本后端: 本地文件 ({})", config.mistakes_file);
            Self::with_file(&config.mistakes_file)
        }
    }

    /// 使用远程表格后端
    pub fn with_sheet(client: SheetClient) -> Self {
        Self {
            backend: StoreBackend::Sheet(client),
        }
    }

    /// 使用本地文件后端
    pub fn with_file(path: impl AsRef<Path>) -> Self {
        Self {
            backend: StoreBackend::File(path.as_ref().to_path_buf()),
        }
    }

    /// 读取全部错题
    ///
    /// 存储不可达或尚未初始化时返回空列表，失败不上抛。
    pub async fn load_all(&self) -> Vec<MistakeRecord> {
        match self.read_records().await {
            Ok(records) => records,
            Err(e) => {
                warn!("读取错题本失败，按空错题本处理: {}", e);
                Vec::new()
            }
        }
    }

    /// 追加一条错题
    ///
    /// # 返回
    /// - `false`: 存储不可达，或非图片记录的 `content` 已存在
    /// - `true`: 已写入（整表读 → 内存追加 → 整表写）
    ///
    /// 注意：整表读改写之间没有锁，两个会话并发追加可能互相覆盖，
    /// 与线上行为保持一致。
    pub async fn append(&self, mut record: MistakeRecord) -> bool {
        let mut records = match self.read_records().await {
            Ok(records) => records,
            Err(e) => {
                warn!("错题本不可达，放弃写入: {}", e);
                return false;
            }
        };

        // 图片记录允许占位文本重复，跳过去重
        if !record.is_image_upload
            && records.iter().any(|m| m.content == record.content)
        {
            info!(
                "内容重复，跳过入库: {}",
                truncate_text(&record.content, 30)
            );
            return false;
        }

        record.ensure_defaults(Local::now().date_naive());
        records.push(record);

        match self.write_records(&records).await {
            Ok(()) => true,
            Err(e) => {
                warn!("错题本写入失败: {}", e);
                false
            }
        }
    }

    async fn read_records(&self) -> Result<Vec<MistakeRecord>> {
        match &self.backend {
            StoreBackend::Sheet(client) => {
                let rows = client.fetch_rows().await?;
                Ok(rows
                    .iter()
                    .filter(|row| !is_header_row(row))
                    .map(|row| MistakeRecord::from_row(row))
                    .collect())
            }
            StoreBackend::File(path) => {
                if !path.exists() {
                    return Ok(Vec::new());
                }
                let text = fs::read_to_string(path)
                    .with_context(|| format!("读取文件失败: {}", path.display()))?;
                let records = serde_json::from_str(&text)
                    .with_context(|| format!("文件内容不是合法 JSON: {}", path.display()))?;
                Ok(records)
            }
        }
    }

    async fn write_records(&self, records: &[MistakeRecord]) -> Result<()> {
        match &self.backend {
            StoreBackend::Sheet(client) => {
                let mut rows = Vec::with_capacity(records.len() + 1);
                rows.push(SHEET_COLUMNS.iter().map(|c| c.to_string()).collect());
                rows.extend(records.iter().map(|r| r.to_row()));
                client.overwrite_rows(&rows).await
            }
            StoreBackend::File(path) => {
                let text = serde_json::to_string_pretty(records)?;
                fs::write(path, text)
                    .with_context(|| format!("写入文件失败: {}", path.display()))
            }
        }
    }
}

/// 表头行判定：首列等于第一个列名
fn is_header_row(row: &[String]) -> bool {
    row.first().map(|c| c == SHEET_COLUMNS[0]).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_row_detection() {
        let header: Vec<String> = SHEET_COLUMNS.iter().map(|c| c.to_string()).collect();
        assert!(is_header_row(&header));
        assert!(!is_header_row(&["数学".to_string()]));
        assert!(!is_header_row(&[]));
    }
}
