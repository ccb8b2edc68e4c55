use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 远程表格的列顺序
///
/// 存储层所有列均为字符串：`options` 持久化为 JSON 列表字面量，
/// 布尔列为 "true"/"false"，计数列为十进制字符串。
pub const SHEET_COLUMNS: [&str; 10] = [
    "subject",
    "content",
    "options",
    "answer",
    "analysis",
    "function_formula",
    "added_date",
    "review_count",
    "is_image_upload",
    "image_payload",
];

/// 一条错题记录
///
/// 持久化后的形态总是全字段填充的；`content` 是非图片记录的去重键。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MistakeRecord {
    pub subject: String,
    pub content: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub analysis: String,
    /// 函数图像表达式（无则为空串）
    #[serde(default)]
    pub function_formula: String,
    /// 录入日期（YYYY-MM-DD），创建后不再修改
    #[serde(default)]
    pub added_date: String,
    /// 预留字段：写入时固定为 0，当前没有任何流程会递增它
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub is_image_upload: bool,
    /// base64 编码的图片内容（非图片记录为空串）
    #[serde(default)]
    pub image_payload: String,
}

impl Default for MistakeRecord {
    fn default() -> Self {
        Self {
            subject: String::new(),
            content: String::new(),
            options: Vec::new(),
            answer: String::new(),
            analysis: String::new(),
            function_formula: String::new(),
            added_date: String::new(),
            review_count: 0,
            is_image_upload: false,
            image_payload: String::new(),
        }
    }
}

impl MistakeRecord {
    /// 入库前补齐缺省字段：空的录入日期补为今天，计数归零
    pub fn ensure_defaults(&mut self, today: NaiveDate) {
        if self.added_date.is_empty() {
            self.added_date = today.format("%Y-%m-%d").to_string();
        }
        self.review_count = 0;
    }

    /// 编码为一行表格数据（列顺序见 [`SHEET_COLUMNS`]）
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.subject.clone(),
            self.content.clone(),
            serde_json::to_string(&self.options).unwrap_or_else(|_| "[]".to_string()),
            self.answer.clone(),
            self.analysis.clone(),
            self.function_formula.clone(),
            self.added_date.clone(),
            self.review_count.to_string(),
            self.is_image_upload.to_string(),
            self.image_payload.clone(),
        ]
    }

    /// 从一行表格数据解码
    ///
    /// 缺失的列与解析失败的值回落到各自的默认值，保证读出的记录
    /// 始终是全字段填充的。
    pub fn from_row(row: &[String]) -> Self {
        let col = |i: usize| row.get(i).cloned().unwrap_or_default();
        Self {
            subject: col(0),
            content: col(1),
            options: serde_json::from_str(&col(2)).unwrap_or_default(),
            answer: col(3),
            analysis: col(4),
            function_formula: col(5),
            added_date: col(6),
            review_count: col(7).parse().unwrap_or(0),
            is_image_upload: col(8).parse().unwrap_or(false),
            image_payload: col(9),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MistakeRecord {
        MistakeRecord {
            subject: "数学".to_string(),
            content: "解方程 2x+3=7".to_string(),
            options: vec!["x=1".to_string(), "x=2".to_string()],
            answer: "x=2".to_string(),
            analysis: "移项后两边除以 2".to_string(),
            added_date: "2024-01-01".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_row_round_trip() {
        let record = sample();
        let row = record.to_row();
        assert_eq!(row.len(), SHEET_COLUMNS.len());
        assert_eq!(MistakeRecord::from_row(&row), record);
    }

    #[test]
    fn test_options_persisted_as_list_literal() {
        let row = sample().to_row();
        assert_eq!(row[2], r#"["x=1","x=2"]"#);
    }

    #[test]
    fn test_from_row_tolerates_short_and_bad_rows() {
        let record = MistakeRecord::from_row(&["物理".to_string(), "浮力".to_string()]);
        assert_eq!(record.subject, "物理");
        assert_eq!(record.content, "浮力");
        assert!(record.options.is_empty());
        assert_eq!(record.review_count, 0);
        assert!(!record.is_image_upload);

        let mut row = sample().to_row();
        row[2] = "不是列表".to_string();
        row[7] = "many".to_string();
        let record = MistakeRecord::from_row(&row);
        assert!(record.options.is_empty());
        assert_eq!(record.review_count, 0);
    }

    #[test]
    fn test_ensure_defaults_fills_date_once() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        let mut record = MistakeRecord {
            content: "题目".to_string(),
            review_count: 9,
            ..Default::default()
        };
        record.ensure_defaults(today);
        assert_eq!(record.added_date, "2024-01-08");
        assert_eq!(record.review_count, 0);

        // 已有日期不被覆盖
        let mut dated = sample();
        dated.ensure_defaults(today);
        assert_eq!(dated.added_date, "2024-01-01");
    }
}
