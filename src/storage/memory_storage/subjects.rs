//! 科目存储操作

use super::{MemoryStorage, next_id};
use crate::errors::{AttendanceError, Result};
use crate::models::subjects::{
    entities::Subject,
    requests::{CreateSubjectRequest, SubjectListQuery, UpdateSubjectRequest},
};

impl MemoryStorage {
    /// 创建科目（code 全局唯一，调用方已大写归一化）
    pub async fn create_subject_impl(&self, req: CreateSubjectRequest) -> Result<Subject> {
        let mut inner = self.state();
        let now = chrono::Utc::now();

        if inner.subjects.iter().any(|s| s.code == req.code) {
            return Err(AttendanceError::uniqueness_violation(format!(
                "科目代码已存在: {}",
                req.code
            )));
        }

        let subject = Subject {
            id: next_id(&mut inner.next_subject_id),
            name: req.name,
            code: req.code,
            description: req.description,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        inner.subjects.push(subject.clone());

        Ok(subject)
    }

    /// 通过 ID 获取科目（包含已删除科目）
    pub async fn get_subject_by_id_impl(&self, subject_id: i64) -> Result<Option<Subject>> {
        let inner = self.state();
        Ok(inner.subjects.iter().find(|s| s.id == subject_id).cloned())
    }

    /// 通过代码获取科目
    pub async fn get_subject_by_code_impl(&self, code: &str) -> Result<Option<Subject>> {
        let inner = self.state();
        Ok(inner.subjects.iter().find(|s| s.code == code).cloned())
    }

    /// 列出科目（默认排除已删除科目；code 为子串匹配）
    pub async fn list_subjects_impl(&self, query: SubjectListQuery) -> Result<Vec<Subject>> {
        let inner = self.state();
        Ok(inner
            .subjects
            .iter()
            .filter(|s| query.include_inactive || s.is_active)
            .filter(|s| {
                query
                    .code
                    .as_ref()
                    .is_none_or(|code| s.code.contains(code.as_str()))
            })
            .cloned()
            .collect())
    }

    /// 更新科目信息
    pub async fn update_subject_impl(
        &self,
        subject_id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        let mut inner = self.state();

        if let Some(ref code) = update.code
            && inner
                .subjects
                .iter()
                .any(|s| s.id != subject_id && &s.code == code)
        {
            return Err(AttendanceError::uniqueness_violation(format!(
                "科目代码已存在: {code}"
            )));
        }

        let Some(subject) = inner.subjects.iter_mut().find(|s| s.id == subject_id) else {
            return Ok(None);
        };

        if let Some(name) = update.name {
            subject.name = name;
        }
        if let Some(code) = update.code {
            subject.code = code;
        }
        if let Some(description) = update.description {
            subject.description = Some(description);
        }
        subject.updated_at = chrono::Utc::now();

        Ok(Some(subject.clone()))
    }

    /// 删除科目（软删除，幂等）
    ///
    /// 引用完整性检查不在这里做：调用边界先调 subject_in_use。
    pub async fn delete_subject_impl(&self, subject_id: i64) -> Result<bool> {
        let mut inner = self.state();
        let Some(subject) = inner.subjects.iter_mut().find(|s| s.id == subject_id) else {
            return Ok(false);
        };
        subject.is_active = false;
        subject.updated_at = chrono::Utc::now();
        Ok(true)
    }

    /// 科目是否被未删除的课程表条目或任意考勤记录引用
    pub async fn subject_in_use_impl(&self, subject_id: i64) -> Result<bool> {
        let inner = self.state();
        let referenced = inner
            .schedules
            .iter()
            .any(|s| s.is_active && s.subject_id == subject_id)
            || inner.attendance.iter().any(|r| r.subject_id == subject_id);
        Ok(referenced)
    }
}
