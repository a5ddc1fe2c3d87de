//! 快照导出/导入（备份/恢复边界）

use super::{MemoryStorage, StoreInner};
use crate::errors::{AttendanceError, Result};
use crate::models::{SNAPSHOT_VERSION, StoreSnapshot};
use tracing::info;

/// 集合内现存最大 id + 1
fn next_counter<T>(items: &[T], id_of: impl Fn(&T) -> i64) -> i64 {
    items.iter().map(&id_of).max().unwrap_or(0) + 1
}

impl MemoryStorage {
    /// 导出全量快照
    pub async fn export_snapshot_impl(&self) -> Result<StoreSnapshot> {
        let inner = self.state();
        Ok(StoreSnapshot {
            version: SNAPSHOT_VERSION.to_string(),
            exported_at: chrono::Utc::now(),
            users: inner.users.clone(),
            classes: inner.classes.clone(),
            subjects: inner.subjects.clone(),
            schedules: inner.schedules.clone(),
            attendance: inner.attendance.clone(),
            settings: inner.settings.clone(),
        })
    }

    /// 导入快照
    ///
    /// 单次持锁内整体替换全部集合与设置，对调用方原子；
    /// 各 id 计数器重建为现存最大 id + 1，保证后续 create 不撞 id。
    /// 版本不识别时报错且不改动现有内容。
    pub async fn import_snapshot_impl(&self, snapshot: StoreSnapshot) -> Result<()> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(AttendanceError::snapshot_format(format!(
                "不支持的快照版本: {}（当前支持 {}）",
                snapshot.version, SNAPSHOT_VERSION
            )));
        }

        let mut inner = self.state();

        let next_student_id = snapshot
            .classes
            .iter()
            .flat_map(|c| c.students.iter().map(|s| s.id))
            .max()
            .unwrap_or(0)
            + 1;

        *inner = StoreInner {
            next_user_id: next_counter(&snapshot.users, |u| u.id),
            next_class_id: next_counter(&snapshot.classes, |c| c.id),
            next_student_id,
            next_subject_id: next_counter(&snapshot.subjects, |s| s.id),
            next_schedule_id: next_counter(&snapshot.schedules, |s| s.id),
            next_attendance_id: next_counter(&snapshot.attendance, |r| r.id),
            users: snapshot.users,
            classes: snapshot.classes,
            subjects: snapshot.subjects,
            schedules: snapshot.schedules,
            attendance: snapshot.attendance,
            settings: snapshot.settings,
        };

        info!(
            "快照导入完成: {} 用户, {} 班级, {} 科目, {} 课程表条目, {} 考勤记录",
            inner.users.len(),
            inner.classes.len(),
            inner.subjects.len(),
            inner.schedules.len(),
            inner.attendance.len()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{seed_class, test_storage};
    use crate::models::attendance::requests::{AttendanceQuery, SubmitAttendanceRequest};
    use crate::models::subjects::requests::CreateSubjectRequest;
    use crate::models::users::entities::UserRole;
    use crate::models::users::requests::CreateUserRequest;
    use crate::models::{SNAPSHOT_VERSION, StoreSnapshot};
    use crate::storage::Storage;

    async fn seed_full_store(storage: &crate::storage::memory_storage::MemoryStorage) -> i64 {
        storage
            .create_user(CreateUserRequest {
                username: "wang_wei".to_string(),
                password_hash: "$argon2id$stub".to_string(),
                role: UserRole::Teacher,
                name: "王老师".to_string(),
                email: "wang@school.cn".to_string(),
                phone: None,
                subject_ids: vec![1],
            })
            .await
            .unwrap();
        storage
            .create_subject(CreateSubjectRequest {
                name: "数学".to_string(),
                code: "MATH".to_string(),
                description: None,
            })
            .await
            .unwrap();
        let class = seed_class(storage, 3, 10).await;
        storage
            .submit_attendance(SubmitAttendanceRequest {
                teacher_id: 1,
                class_id: class.id,
                subject_id: 1,
                date: "2026-03-02".parse().unwrap(),
                absent_students: vec![class.students[0].id],
                notes: Some("晨检".to_string()),
            })
            .await
            .unwrap();
        class.id
    }

    #[tokio::test]
    async fn test_export_import_round_trip() {
        let storage = test_storage();
        let class_id = seed_full_store(&storage).await;

        let snapshot = storage.export_snapshot().await.unwrap();
        assert_eq!(snapshot.version, SNAPSHOT_VERSION);

        // JSON 序列化往返后导入一个全新存储
        let json = snapshot.to_json().unwrap();
        let restored_snapshot = StoreSnapshot::from_json(&json).unwrap();

        let fresh = test_storage();
        fresh.reset();
        fresh.import_snapshot(restored_snapshot).await.unwrap();

        let users = fresh.list_users(Default::default()).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "wang_wei");
        assert_eq!(users[0].password_hash, "$argon2id$stub");

        let class = fresh.get_class_by_id(class_id).await.unwrap().unwrap();
        assert_eq!(class.students.len(), 3);

        let records = fresh
            .list_attendance(AttendanceQuery::default())
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].notes.as_deref(), Some("晨检"));

        let settings = fresh.get_settings().await.unwrap();
        assert_eq!(settings.school_name, "Default School");
    }

    #[tokio::test]
    async fn test_import_rebuilds_id_counters() {
        let storage = test_storage();
        seed_full_store(&storage).await;
        let snapshot = storage.export_snapshot().await.unwrap();
        let max_student_id = snapshot
            .classes
            .iter()
            .flat_map(|c| c.students.iter().map(|s| s.id))
            .max()
            .unwrap();

        let fresh = test_storage();
        fresh.import_snapshot(snapshot).await.unwrap();

        // 导入后新建实体不得与现存 id 冲突
        let user = fresh
            .create_user(CreateUserRequest {
                username: "li_lei_01".to_string(),
                password_hash: "hash".to_string(),
                role: UserRole::Principal,
                name: "李校长".to_string(),
                email: "li@school.cn".to_string(),
                phone: None,
                subject_ids: vec![],
            })
            .await
            .unwrap();
        assert_eq!(user.id, 2);

        let class = seed_class(&fresh, 1, 10).await;
        assert_eq!(class.id, 2);
        assert!(class.students[0].id > max_student_id);
    }

    #[tokio::test]
    async fn test_import_unknown_version_rejected_and_store_untouched() {
        let storage = test_storage();
        seed_full_store(&storage).await;

        let mut snapshot = storage.export_snapshot().await.unwrap();
        snapshot.version = "9.9".to_string();
        snapshot.users.clear();

        let err = storage.import_snapshot(snapshot).await.unwrap_err();
        assert_eq!(err.code(), "E005");

        // 原内容未被改动
        let users = storage.list_users(Default::default()).await.unwrap();
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn test_import_replaces_previous_contents() {
        let storage = test_storage();
        seed_full_store(&storage).await;
        let snapshot = storage.export_snapshot().await.unwrap();

        let other = test_storage();
        seed_class(&other, 5, 10).await;
        seed_class(&other, 5, 10).await;

        // 导入是整体替换，不是合并
        other.import_snapshot(snapshot).await.unwrap();
        let classes = other.list_classes(Default::default()).await.unwrap();
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].students.len(), 3);
    }
}
