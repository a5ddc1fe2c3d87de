//! 课程表存储操作

use super::{MemoryStorage, next_id};
use crate::errors::Result;
use crate::models::schedules::{
    entities::ScheduleEntry,
    requests::{CreateScheduleRequest, ScheduleListQuery, UpdateScheduleRequest},
};

impl MemoryStorage {
    /// 创建课程表条目
    ///
    /// 外键（教师/班级/科目）不在存储层校验，由调用边界先行确认存在。
    pub async fn create_schedule_impl(&self, req: CreateScheduleRequest) -> Result<ScheduleEntry> {
        let mut inner = self.state();
        let now = chrono::Utc::now();

        let entry = ScheduleEntry {
            id: next_id(&mut inner.next_schedule_id),
            teacher_id: req.teacher_id,
            class_id: req.class_id,
            subject_id: req.subject_id,
            day_of_week: req.day_of_week,
            start_time: req.start_time,
            end_time: req.end_time,
            room: req.room,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        inner.schedules.push(entry.clone());

        Ok(entry)
    }

    /// 通过 ID 获取课程表条目（包含已删除条目）
    pub async fn get_schedule_by_id_impl(&self, schedule_id: i64) -> Result<Option<ScheduleEntry>> {
        let inner = self.state();
        Ok(inner.schedules.iter().find(|s| s.id == schedule_id).cloned())
    }

    /// 列出课程表条目（默认排除已删除条目）
    pub async fn list_schedules_impl(&self, query: ScheduleListQuery) -> Result<Vec<ScheduleEntry>> {
        let inner = self.state();
        Ok(inner
            .schedules
            .iter()
            .filter(|s| query.include_inactive || s.is_active)
            .filter(|s| query.teacher_id.is_none_or(|t| s.teacher_id == t))
            .filter(|s| query.class_id.is_none_or(|c| s.class_id == c))
            .filter(|s| query.subject_id.is_none_or(|sub| s.subject_id == sub))
            .filter(|s| query.day_of_week.is_none_or(|d| s.day_of_week == d))
            .cloned()
            .collect())
    }

    /// 更新课程表条目
    pub async fn update_schedule_impl(
        &self,
        schedule_id: i64,
        update: UpdateScheduleRequest,
    ) -> Result<Option<ScheduleEntry>> {
        let mut inner = self.state();
        let Some(entry) = inner.schedules.iter_mut().find(|s| s.id == schedule_id) else {
            return Ok(None);
        };

        if let Some(teacher_id) = update.teacher_id {
            entry.teacher_id = teacher_id;
        }
        if let Some(class_id) = update.class_id {
            entry.class_id = class_id;
        }
        if let Some(subject_id) = update.subject_id {
            entry.subject_id = subject_id;
        }
        if let Some(day_of_week) = update.day_of_week {
            entry.day_of_week = day_of_week;
        }
        if let Some(start_time) = update.start_time {
            entry.start_time = start_time;
        }
        if let Some(end_time) = update.end_time {
            entry.end_time = end_time;
        }
        if let Some(room) = update.room {
            entry.room = Some(room);
        }
        entry.updated_at = chrono::Utc::now();

        Ok(Some(entry.clone()))
    }

    /// 删除课程表条目（软删除，幂等）
    pub async fn delete_schedule_impl(&self, schedule_id: i64) -> Result<bool> {
        let mut inner = self.state();
        let Some(entry) = inner.schedules.iter_mut().find(|s| s.id == schedule_id) else {
            return Ok(false);
        };
        entry.is_active = false;
        entry.updated_at = chrono::Utc::now();
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::test_storage;
    use crate::models::schedules::entities::DayOfWeek;
    use crate::models::schedules::requests::{
        CreateScheduleRequest, ScheduleListQuery, UpdateScheduleRequest,
    };
    use crate::storage::Storage;

    fn slot(teacher_id: i64, class_id: i64, subject_id: i64, day: DayOfWeek) -> CreateScheduleRequest {
        CreateScheduleRequest {
            teacher_id,
            class_id,
            subject_id,
            day_of_week: day,
            start_time: "08:00".to_string(),
            end_time: "08:45".to_string(),
            room: Some("301".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_and_filter_by_teacher_and_day() {
        let storage = test_storage();
        storage
            .create_schedule(slot(1, 1, 1, DayOfWeek::Monday))
            .await
            .unwrap();
        storage
            .create_schedule(slot(1, 2, 1, DayOfWeek::Tuesday))
            .await
            .unwrap();
        storage
            .create_schedule(slot(2, 1, 2, DayOfWeek::Monday))
            .await
            .unwrap();

        // 调用边界用该过滤判断教师是否有权为班级+科目提交考勤
        let teacher1_monday = storage
            .list_schedules(ScheduleListQuery {
                teacher_id: Some(1),
                day_of_week: Some(DayOfWeek::Monday),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(teacher1_monday.len(), 1);
        assert_eq!(teacher1_monday[0].class_id, 1);

        let class1 = storage
            .list_schedules(ScheduleListQuery {
                class_id: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(class1.len(), 2);
    }

    #[tokio::test]
    async fn test_soft_delete_and_update() {
        let storage = test_storage();
        let entry = storage
            .create_schedule(slot(1, 1, 1, DayOfWeek::Friday))
            .await
            .unwrap();

        let updated = storage
            .update_schedule(
                entry.id,
                UpdateScheduleRequest {
                    room: Some("302".to_string()),
                    start_time: Some("09:00".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.room.as_deref(), Some("302"));
        assert_eq!(updated.start_time, "09:00");
        assert_eq!(updated.end_time, "08:45"); // 未提供的字段不变

        assert!(storage.delete_schedule(entry.id).await.unwrap());
        assert!(storage.delete_schedule(entry.id).await.unwrap()); // 幂等
        assert!(
            storage
                .list_schedules(ScheduleListQuery::default())
                .await
                .unwrap()
                .is_empty()
        );
        assert!(storage.get_schedule_by_id(entry.id).await.unwrap().is_some());
    }
}
