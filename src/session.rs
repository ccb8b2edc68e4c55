//! 会话上下文
//!
//! 原来的角色和页面选择散落在全局可变状态里，这里收敛成一个
//! 显式传给各处理函数的上下文对象，并定义退出登录时的重置转移。

use crate::models::draft::QuestionDraft;
use crate::models::subject::Subject;

/// 登录角色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// 学生：全功能
    Student,
    /// 家长：只读（作战大屏 + 错题本）
    Parent,
}

impl Role {
    /// 是否允许写操作（生成、入库）
    pub fn can_edit(self) -> bool {
        matches!(self, Role::Student)
    }

    pub fn name(self) -> &'static str {
        match self {
            Role::Student => "学生",
            Role::Parent => "家长",
        }
    }
}

/// 会话上下文：当前角色 + 页面间的临时选择
#[derive(Debug)]
pub struct SessionContext {
    pub role: Role,
    /// 最近一次定向刷题的结果，供"存错题"复用
    pub generated: Vec<QuestionDraft>,
    /// 最近一次选择的科目
    pub selected_subject: Option<Subject>,
}

impl SessionContext {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            generated: Vec::new(),
            selected_subject: None,
        }
    }

    /// 退出登录：清空全部临时状态
    pub fn logout(&mut self) {
        self.generated.clear();
        self.selected_subject = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_permissions() {
        assert!(Role::Student.can_edit());
        assert!(!Role::Parent.can_edit());
    }

    #[test]
    fn test_logout_clears_transient_state() {
        let mut session = SessionContext::new(Role::Student);
        session.generated.push(QuestionDraft::default());
        session.selected_subject = Some(Subject::Math);

        session.logout();

        assert!(session.generated.is_empty());
        assert!(session.selected_subject.is_none());
    }
}
