//! 复习调度模块
//!
//! 纯函数：根据录入日期和今天的日期差，套用固定的遗忘曲线
//! 检查点集合 {1, 3, 7, 15, 30} 判断是否到期复习。

use chrono::NaiveDate;

/// 遗忘曲线检查点（录入后第 N 天到期复习）
///
/// 固定配置常量，不做按题难度的动态调整。
pub const REVIEW_CHECKPOINTS: [i64; 5] = [1, 3, 7, 15, 30];

/// 计算一条错题的复习状态
///
/// # 参数
/// - `added_date`: 录入日期字符串（YYYY-MM-DD）
/// - `today`: 今天的日期
///
/// # 返回
/// 返回 `(是否到期, 状态标签)`。日期无法解析时视为永不到期（fail-open）。
/// 负的日期差（录入日期在未来）落入"记忆保鲜中"分支。
pub fn review_status(added_date: &str, today: NaiveDate) -> (bool, String) {
    let added = match NaiveDate::parse_from_str(added_date, "%Y-%m-%d") {
        Ok(date) => date,
        Err(_) => return (false, "日期错误".to_string()),
    };

    let days_diff = (today - added).num_days();

    if REVIEW_CHECKPOINTS.contains(&days_diff) {
        (true, format!("⚠️ 遗忘临界点 (第{}天)", days_diff))
    } else if days_diff == 0 {
        (false, "🆕 今日新题".to_string())
    } else if days_diff > 30 {
        (true, "📅 长期复习".to_string())
    } else {
        (false, format!("✅ 记忆保鲜中 (已过{}天)", days_diff))
    }
}

/// 中考倒计时天数
pub fn exam_countdown(exam_date: NaiveDate, today: NaiveDate) -> i64 {
    (exam_date - today).num_days()
}

/// 解析配置中的考试日期字符串
pub fn parse_exam_date(exam_date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(exam_date, "%Y-%m-%d").ok()
}
