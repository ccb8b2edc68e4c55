use serde::Deserialize;
use std::fs;
use std::path::Path;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    // --- 远程表格（错题本后端）配置 ---
    /// 表格 API 地址，为空时退回本地 JSON 文件后端
    pub sheet_api_base_url: String,
    pub sheet_token: String,
    // --- 本地文件配置 ---
    pub mistakes_file: String,
    pub daily_cache_dir: String,
    // --- 复习与倒计时 ---
    /// 中考日期（YYYY-MM-DD）
    pub exam_date: String,
    // --- 图片归档参数 ---
    pub image_max_width: u32,
    pub image_jpeg_quality: u8,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.deepseek.com".to_string(),
            llm_model_name: "deepseek-chat".to_string(),
            sheet_api_base_url: String::new(),
            sheet_token: String::new(),
            mistakes_file: "mistakes.json".to_string(),
            daily_cache_dir: "daily_cache".to_string(),
            exam_date: "2026-06-16".to_string(),
            image_max_width: 800,
            image_jpeg_quality: 75,
            verbose_logging: false,
        }
    }
}

/// config.toml 中的可选覆盖项
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    llm_api_key: Option<String>,
    llm_api_base_url: Option<String>,
    llm_model_name: Option<String>,
    sheet_api_base_url: Option<String>,
    sheet_token: Option<String>,
    mistakes_file: Option<String>,
    daily_cache_dir: Option<String>,
    exam_date: Option<String>,
    image_max_width: Option<u32>,
    image_jpeg_quality: Option<u8>,
    verbose_logging: Option<bool>,
}

impl Config {
    /// 加载配置：默认值 ← config.toml ← 环境变量
    pub fn load() -> Self {
        Self::from_file("config.toml").from_env()
    }

    /// 读取 TOML 配置文件覆盖默认值，文件不存在或解析失败时使用默认值
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        let default = Self::default();
        let file: ConfigFile = match fs::read_to_string(path.as_ref()) {
            Ok(text) => toml::from_str(&text).unwrap_or_default(),
            Err(_) => ConfigFile::default(),
        };
        Self {
            llm_api_key: file.llm_api_key.unwrap_or(default.llm_api_key),
            llm_api_base_url: file.llm_api_base_url.unwrap_or(default.llm_api_base_url),
            llm_model_name: file.llm_model_name.unwrap_or(default.llm_model_name),
            sheet_api_base_url: file.sheet_api_base_url.unwrap_or(default.sheet_api_base_url),
            sheet_token: file.sheet_token.unwrap_or(default.sheet_token),
            mistakes_file: file.mistakes_file.unwrap_or(default.mistakes_file),
            daily_cache_dir: file.daily_cache_dir.unwrap_or(default.daily_cache_dir),
            exam_date: file.exam_date.unwrap_or(default.exam_date),
            image_max_width: file.image_max_width.unwrap_or(default.image_max_width),
            image_jpeg_quality: file.image_jpeg_quality.unwrap_or(default.image_jpeg_quality),
            verbose_logging: file.verbose_logging.unwrap_or(default.verbose_logging),
        }
    }

    /// 环境变量覆盖
    pub fn from_env(self) -> Self {
        Self {
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(self.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(self.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(self.llm_model_name),
            sheet_api_base_url: std::env::var("SHEET_API_BASE_URL").unwrap_or(self.sheet_api_base_url),
            sheet_token: std::env::var("SHEET_TOKEN").unwrap_or(self.sheet_token),
            mistakes_file: std::env::var("MISTAKES_FILE").unwrap_or(self.mistakes_file),
            daily_cache_dir: std::env::var("DAILY_CACHE_DIR").unwrap_or(self.daily_cache_dir),
            exam_date: std::env::var("EXAM_DATE").unwrap_or(self.exam_date),
            image_max_width: std::env::var("IMAGE_MAX_WIDTH").ok().and_then(|v| v.parse().ok()).unwrap_or(self.image_max_width),
            image_jpeg_quality: std::env::var("IMAGE_JPEG_QUALITY").ok().and_then(|v| v.parse().ok()).unwrap_or(self.image_jpeg_quality),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
        }
    }

    /// 是否配置了远程表格后端
    pub fn use_sheet_backend(&self) -> bool {
        !self.sheet_api_base_url.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.mistakes_file, "mistakes.json");
        assert_eq!(config.image_max_width, 800);
        assert!(!config.use_sheet_backend());
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let config = Config::from_file("no_such_config.toml");
        assert_eq!(config.llm_model_name, "deepseek-chat");
        assert_eq!(config.exam_date, "2026-06-16");
    }
}
