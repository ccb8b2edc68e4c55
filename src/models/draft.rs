use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::mistake::MistakeRecord;

/// 展示时替代 AI 漏填字段的占位文本
pub const MISSING_FIELD_PLACEHOLDER: &str = "（AI 未提供）";

/// 生成服务返回的未校验题目草稿
///
/// 字段全部可缺，未知键忽略。草稿只在 [`QuestionDraft::normalize`]
/// 这一个入库边界上收敛为严格的 [`MistakeRecord`]，不在展示层
/// 零散地做字段检查。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionDraft {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub analysis: Option<String>,
    #[serde(default)]
    pub function_formula: Option<String>,
}

impl QuestionDraft {
    /// 归一化为严格的错题记录
    ///
    /// 缺失字段按 空串 / 空列表 / false / 0 / 今天 补默认值；
    /// 草稿未标科目时使用 `fallback_subject`。
    pub fn normalize(&self, fallback_subject: &str, today: NaiveDate) -> MistakeRecord {
        MistakeRecord {
            subject: self
                .subject
                .clone()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| fallback_subject.to_string()),
            content: self.content.clone().unwrap_or_default(),
            options: self.options.clone().unwrap_or_default(),
            answer: self.answer.clone().unwrap_or_default(),
            analysis: self.analysis.clone().unwrap_or_default(),
            function_formula: self.function_formula.clone().unwrap_or_default(),
            added_date: today.format("%Y-%m-%d").to_string(),
            review_count: 0,
            is_image_upload: false,
            image_payload: String::new(),
        }
    }
}

/// 展示用：空字段替换为占位文本
pub fn field_or_placeholder(value: &str) -> &str {
    if value.is_empty() {
        MISSING_FIELD_PLACEHOLDER
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
    }

    #[test]
    fn test_normalize_fills_defaults() {
        let draft = QuestionDraft {
            content: Some("计算 1+1".to_string()),
            ..Default::default()
        };
        let record = draft.normalize("数学", today());
        assert_eq!(record.subject, "数学");
        assert_eq!(record.content, "计算 1+1");
        assert!(record.options.is_empty());
        assert_eq!(record.answer, "");
        assert_eq!(record.added_date, "2024-01-08");
        assert_eq!(record.review_count, 0);
        assert!(!record.is_image_upload);
    }

    #[test]
    fn test_normalize_keeps_draft_subject() {
        let draft = QuestionDraft {
            subject: Some("英语".to_string()),
            content: Some("选词填空".to_string()),
            ..Default::default()
        };
        assert_eq!(draft.normalize("综合", today()).subject, "英语");
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let draft: QuestionDraft = serde_json::from_str(
            r#"{"content": "题干", "difficulty": "hard", "score": 5}"#,
        )
        .unwrap();
        assert_eq!(draft.content.as_deref(), Some("题干"));
    }

    #[test]
    fn test_field_or_placeholder() {
        assert_eq!(field_or_placeholder(""), MISSING_FIELD_PLACEHOLDER);
        assert_eq!(field_or_placeholder("答案"), "答案");
    }
}
