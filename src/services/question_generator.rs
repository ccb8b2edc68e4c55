//! 出题服务 - 业务能力层
//!
//! 构造中文提示词 → 调用 LLM → 剥除 Markdown 代码围栏 → 解析 JSON 数组。
//! 任何失败（网络、服务、解析）都收敛为空列表，不重试、不补救。
//!
//! 另含"今日日报"：每天一套固定搭配的晨测小卷，按天缓存到本地，
//! 同一天内只生成一次。

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::clients::LlmClient;
use crate::config::Config;
use crate::error::AppResult;
use crate::models::draft::QuestionDraft;
use crate::models::subject::Subject;

/// 约束模型只输出 JSON 数组的系统消息
const SYSTEM_MESSAGE: &str = "JSON Array Only";

/// 剥除 ```json 围栏的固定模式
const CODE_FENCE_PATTERN: &str = r"```json\s*|\s*```";

/// 出题服务
pub struct QuestionGenerator {
    llm: LlmClient,
    daily_cache_dir: PathBuf,
}

impl QuestionGenerator {
    /// 创建新的出题服务
    pub fn new(config: &Config) -> Self {
        Self {
            llm: LlmClient::new(config),
            daily_cache_dir: PathBuf::from(&config.daily_cache_dir),
        }
    }

    /// 定向刷题：生成指定科目、题型、数量的题目草稿
    ///
    /// 失败时返回空列表。
    pub async fn generate(
        &self,
        subject: Subject,
        question_type: &str,
        count: u32,
    ) -> Vec<QuestionDraft> {
        let prompt = build_batch_prompt(subject, question_type, count);
        debug!("定向刷题提示词:\n{}", prompt);
        self.request_drafts(&prompt).await
    }

    /// 今日日报：生成一套固定搭配的晨测小卷（1数学 + 1英语 + 1物理）
    pub async fn generate_daily(&self) -> Vec<QuestionDraft> {
        self.request_drafts(DAILY_MIX_PROMPT).await
    }

    /// 读取当天已缓存的日报，没有则返回 None
    pub fn load_daily_tasks(&self, today: NaiveDate) -> Option<Vec<QuestionDraft>> {
        let path = self.daily_cache_path(today);
        let text = fs::read_to_string(&path).ok()?;
        serde_json::from_str(&text).ok()
    }

    /// 取当天日报：命中缓存直接返回，否则生成一次并写入缓存
    pub async fn daily_tasks(&self, today: NaiveDate) -> Vec<QuestionDraft> {
        if let Some(cached) = self.load_daily_tasks(today) {
            info!("✅ 今日任务已准备就绪（命中缓存）");
            return cached;
        }

        info!("🤖 AI 正在出题 (数学+英语+物理)...");
        let drafts = self.generate_daily().await;

        if !drafts.is_empty() {
            if let Err(e) = self.write_daily_cache(today, &drafts) {
                warn!("日报缓存写入失败: {}", e);
            }
        }
        drafts
    }

    async fn request_drafts(&self, prompt: &str) -> Vec<QuestionDraft> {
        let raw = match self.llm.chat(prompt, Some(SYSTEM_MESSAGE)).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("AI 连接出错: {}", e);
                return Vec::new();
            }
        };
        parse_drafts(&raw)
    }

    fn daily_cache_path(&self, today: NaiveDate) -> PathBuf {
        self.daily_cache_dir
            .join(format!("daily_tasks_{}.json", today.format("%Y-%m-%d")))
    }

    fn write_daily_cache(&self, today: NaiveDate, drafts: &[QuestionDraft]) -> AppResult<()> {
        if !self.daily_cache_dir.exists() {
            fs::create_dir_all(&self.daily_cache_dir)?;
        }
        fs::write(
            self.daily_cache_path(today),
            serde_json::to_string_pretty(drafts)?,
        )?;
        Ok(())
    }
}

/// 构造定向刷题提示词
fn build_batch_prompt(subject: Subject, question_type: &str, count: u32) -> String {
    let no_image_instruction = if subject.forbids_diagram_questions() {
        "严禁出识图题。几何题请文字描述。函数题请含function_formula。"
    } else {
        ""
    };

    format!(
        r#"你是盐城中考出题专家。出 {count} 道【{subject}】【{question_type}】。
要求：难度中考冲刺级。{no_image_instruction}
格式：JSON List:
[{{ "content": "内容", "options": [], "answer": "答案", "analysis": "解析", "function_formula": null }}]"#,
        count = count,
        subject = subject,
        question_type = question_type,
        no_image_instruction = no_image_instruction,
    )
}

/// 今日日报提示词（固定搭配）
const DAILY_MIX_PROMPT: &str = r#"请为盐城初三学生生成一份"今日晨测"小卷，包含3道题：
1. 数学题 (压轴题或填空题，带难度)
2. 英语题 (单项选择或语法填空)
3. 物理题 (电学或力学计算)

要求：
- 严禁出识图题。
- 严格返回 JSON List 格式。
- 包含字段: content, options, answer, analysis, subject(标明科目), function_formula(如有)"#;

/// 剥除响应文本中的 Markdown 代码围栏
pub(crate) fn strip_code_fences(raw: &str) -> String {
    if let Ok(re) = Regex::new(CODE_FENCE_PATTERN) {
        re.replace_all(raw, "").into_owned()
    } else {
        raw.to_string()
    }
}

/// 解析响应为题目草稿数组，失败时返回空列表
pub(crate) fn parse_drafts(raw: &str) -> Vec<QuestionDraft> {
    let cleaned = strip_code_fences(raw);
    match serde_json::from_str::<Vec<QuestionDraft>>(cleaned.trim()) {
        Ok(drafts) => {
            info!("✓ AI 返回 {} 道题目", drafts.len());
            drafts
        }
        Err(e) => {
            warn!("AI 返回内容解析失败: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences() {
        let raw = "```json\n[{\"content\": \"题\"}]\n```";
        let cleaned = strip_code_fences(raw);
        assert!(!cleaned.contains("```"));
        assert!(cleaned.contains("content"));

        // 无围栏的文本原样保留
        assert_eq!(strip_code_fences("[1, 2]"), "[1, 2]");
    }

    #[test]
    fn test_parse_drafts_with_fences() {
        let raw = r#"```json
[{"content": "解方程", "options": [], "answer": "x=2", "analysis": "移项", "function_formula": null}]
```"#;
        let drafts = parse_drafts(raw);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].content.as_deref(), Some("解方程"));
        assert!(drafts[0].function_formula.is_none());
    }

    #[test]
    fn test_parse_drafts_not_json_returns_empty() {
        assert!(parse_drafts("not json").is_empty());
    }

    #[test]
    fn test_parse_drafts_object_not_array_returns_empty() {
        assert!(parse_drafts(r#"{"content": "单个对象"}"#).is_empty());
    }

    #[test]
    fn test_batch_prompt_embeds_parameters() {
        let prompt = build_batch_prompt(Subject::Math, "选择题", 3);
        assert!(prompt.contains("3 道"));
        assert!(prompt.contains("数学"));
        assert!(prompt.contains("选择题"));
        assert!(prompt.contains("严禁出识图题"));

        // 非数学物理不附加识图约束
        let prompt = build_batch_prompt(Subject::English, "填空题", 2);
        assert!(!prompt.contains("严禁出识图题"));
    }
}
