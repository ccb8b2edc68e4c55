/// 科目枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Subject {
    /// 语文
    Chinese,
    /// 数学
    Math,
    /// 英语
    English,
    /// 物理
    Physics,
    /// 化学
    Chemistry,
    /// 历史
    History,
    /// 政治
    Politics,
}

impl Subject {
    /// 刷题菜单可选科目
    pub const ALL: [Subject; 7] = [
        Subject::Math,
        Subject::Physics,
        Subject::Chemistry,
        Subject::English,
        Subject::Chinese,
        Subject::History,
        Subject::Politics,
    ];

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            Subject::Chinese => "语文",
            Subject::Math => "数学",
            Subject::English => "英语",
            Subject::Physics => "物理",
            Subject::Chemistry => "化学",
            Subject::History => "历史",
            Subject::Politics => "政治",
        }
    }

    /// 尝试从字符串解析科目（精确匹配）
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "语文" | "语" => Some(Subject::Chinese),
            "数学" | "数" => Some(Subject::Math),
            "英语" | "英" => Some(Subject::English),
            "物理" | "物" => Some(Subject::Physics),
            "化学" | "化" => Some(Subject::Chemistry),
            "历史" | "历" => Some(Subject::History),
            "政治" | "政" => Some(Subject::Politics),
            _ => None,
        }
    }

    /// 智能查找科目（支持包含匹配）
    pub fn find(s: &str) -> Option<Self> {
        if let Some(subject) = Self::from_str(s.trim()) {
            return Some(subject);
        }
        Self::ALL
            .into_iter()
            .find(|subject| s.contains(subject.name()))
    }

    /// 出题时是否需要附加"严禁识图题"约束
    ///
    /// 数学和物理容易生成依赖图形的题目，而纯文本通道无法呈现图片。
    pub fn forbids_diagram_questions(self) -> bool {
        matches!(self, Subject::Math | Subject::Physics)
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_exact() {
        assert_eq!(Subject::from_str("数学"), Some(Subject::Math));
        assert_eq!(Subject::from_str("物"), Some(Subject::Physics));
        assert_eq!(Subject::from_str("体育"), None);
    }

    #[test]
    fn test_find_contains() {
        assert_eq!(Subject::find("初三物理"), Some(Subject::Physics));
        assert_eq!(Subject::find(" 英语 "), Some(Subject::English));
        assert_eq!(Subject::find("未知科目"), None);
    }

    #[test]
    fn test_diagram_rule() {
        assert!(Subject::Math.forbids_diagram_questions());
        assert!(Subject::Physics.forbids_diagram_questions());
        assert!(!Subject::English.forbids_diagram_questions());
    }
}
