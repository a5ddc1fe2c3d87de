//! 考勤存储操作
//!
//! 业务键为 (class_id, subject_id, date) 三元组的 upsert。
//! 查找-再-写入必须在同一次持锁内完成，否则两次并发提交
//! 可能都通过 "不存在" 检查而产生重复记录。

use super::{MemoryStorage, StoreInner, next_id};
use crate::errors::Result;
use crate::models::attendance::{
    entities::AttendanceRecord,
    requests::{AttendanceQuery, SubmitAttendanceRequest, UpdateAttendanceRequest},
};
use crate::models::classes::entities::Class;
use tracing::debug;

/// 按当前在读花名册计算派生字段：出勤名单 = 花名册减缺勤名单
///
/// 花名册是调用时刻的快照而非首次提交时刻：之后的花名册变动会在
/// 记录下一次被改写时反映到派生字段里。这是刻意保留的行为。
fn derive_presence(class: Option<&Class>, absent: &[i64]) -> (Vec<i64>, i64) {
    match class {
        Some(class) => {
            let roster = class.active_roster_ids();
            let total = roster.len() as i64;
            let present = roster
                .into_iter()
                .filter(|id| !absent.contains(id))
                .collect();
            (present, total)
        }
        // 班级不存在不是错误：派生字段为空/零，由调用方预先校验存在性
        None => (Vec::new(), 0),
    }
}

impl MemoryStorage {
    /// 提交考勤（按三元组 upsert）
    ///
    /// 已存在同三元组记录时保留其 id 和 created_at，覆盖全部可变字段
    /// （含最近提交者）；否则分配新 id 追加。整个过程单次持锁。
    pub async fn submit_attendance_impl(
        &self,
        req: SubmitAttendanceRequest,
    ) -> Result<AttendanceRecord> {
        let mut inner = self.state();
        let now = chrono::Utc::now();

        let StoreInner {
            classes,
            attendance,
            next_attendance_id,
            ..
        } = &mut *inner;

        let class = classes.iter().find(|c| c.id == req.class_id);
        let (present_students, total_students) = derive_presence(class, &req.absent_students);

        if let Some(record) = attendance
            .iter_mut()
            .find(|r| r.matches_key(req.class_id, req.subject_id, req.date))
        {
            debug!(
                "考勤重复提交，覆盖记录 {} ({}/{}/{})",
                record.id, req.class_id, req.subject_id, req.date
            );
            record.teacher_id = req.teacher_id;
            record.absent_students = req.absent_students;
            record.present_students = present_students;
            record.total_students = total_students;
            record.notes = req.notes;
            record.submitted_by = req.teacher_id;
            record.submitted_at = now;
            record.updated_at = now;
            return Ok(record.clone());
        }

        let record = AttendanceRecord {
            id: next_id(next_attendance_id),
            teacher_id: req.teacher_id,
            class_id: req.class_id,
            subject_id: req.subject_id,
            date: req.date,
            absent_students: req.absent_students,
            present_students,
            total_students,
            notes: req.notes,
            submitted_by: req.teacher_id,
            submitted_at: now,
            created_at: now,
            updated_at: now,
        };
        attendance.push(record.clone());

        Ok(record)
    }

    /// 通过 ID 获取考勤记录
    pub async fn get_attendance_by_id_impl(&self, id: i64) -> Result<Option<AttendanceRecord>> {
        let inner = self.state();
        Ok(inner.attendance.iter().find(|r| r.id == id).cloned())
    }

    /// 列出考勤记录，按日期倒序（同日按 id 倒序，保证顺序稳定）
    pub async fn list_attendance_impl(&self, query: AttendanceQuery) -> Result<Vec<AttendanceRecord>> {
        let inner = self.state();
        let mut records: Vec<AttendanceRecord> = inner
            .attendance
            .iter()
            .filter(|r| query.matches(r))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(records)
    }

    /// 字段级更新：仅缺勤名单与备注
    ///
    /// 缺勤名单变化时按 *当前* 花名册重算派生字段；
    /// 三元组字段不可变，记录不能移动到别的键。
    pub async fn update_attendance_impl(
        &self,
        id: i64,
        update: UpdateAttendanceRequest,
    ) -> Result<Option<AttendanceRecord>> {
        let mut inner = self.state();
        let StoreInner {
            classes,
            attendance,
            ..
        } = &mut *inner;

        let Some(record) = attendance.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };

        if let Some(absent_students) = update.absent_students {
            let class = classes.iter().find(|c| c.id == record.class_id);
            let (present_students, total_students) = derive_presence(class, &absent_students);
            record.absent_students = absent_students;
            record.present_students = present_students;
            record.total_students = total_students;
        }
        if let Some(notes) = update.notes {
            record.notes = Some(notes);
        }
        record.updated_at = chrono::Utc::now();

        Ok(Some(record.clone()))
    }

    /// 硬删除考勤记录
    ///
    /// 与其他实体的软删除约定不同：不留墓碑，统计立即不再计入。
    /// 保留自观察到的原始行为，是否改为软删除属产品决策。
    pub async fn delete_attendance_impl(&self, id: i64) -> Result<bool> {
        let mut inner = self.state();
        let before = inner.attendance.len();
        inner.attendance.retain(|r| r.id != id);
        Ok(inner.attendance.len() < before)
    }
}
