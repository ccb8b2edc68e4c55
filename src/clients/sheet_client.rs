//! 远程表格 API 客户端
//!
//! 封装对工作表服务的整表读写。表格没有按行操作的接口，
//! 读和写都以全表为单位。

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::Config;

/// 远程表格客户端
pub struct SheetClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl SheetClient {
    /// 创建新的表格客户端
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.sheet_api_base_url.trim_end_matches('/').to_string(),
            token: config.sheet_token.clone(),
        }
    }

    /// 读取整张表
    ///
    /// # 返回
    /// 返回所有行（含表头行，若有）
    pub async fn fetch_rows(&self) -> Result<Vec<Vec<String>>> {
        let url = format!("{}/values", self.base_url);
        debug!("读取表格: {}", url);

        let response = self
            .http
            .get(&url)
            .header("sheettoken", &self.token)
            .send()
            .await
            .with_context(|| format!("表格请求失败: {}", url))?
            .error_for_status()
            .with_context(|| format!("表格返回错误状态: {}", url))?;

        let rows: Vec<Vec<String>> = response
            .json()
            .await
            .context("表格响应不是合法的行数组")?;

        debug!("读取到 {} 行", rows.len());
        Ok(rows)
    }

    /// 整表覆写
    ///
    /// 注意：没有锁也没有版本号，两个会话并发覆写时后写者胜出。
    pub async fn overwrite_rows(&self, rows: &[Vec<String>]) -> Result<()> {
        let url = format!("{}/values", self.base_url);
        debug!("覆写表格: {} ({} 行)", url, rows.len());

        self.http
            .put(&url)
            .header("sheettoken", &self.token)
            .json(rows)
            .send()
            .await
            .with_context(|| format!("表格请求失败: {}", url))?
            .error_for_status()
            .with_context(|| format!("表格返回错误状态: {}", url))?;

        Ok(())
    }
}
