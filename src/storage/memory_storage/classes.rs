//! 班级存储操作（含内嵌学生花名册）

use super::{MemoryStorage, next_id};
use crate::errors::{AttendanceError, Result};
use crate::models::classes::{
    entities::{Class, Student},
    requests::{
        AddStudentRequest, ClassListQuery, CreateClassRequest, UpdateClassRequest,
        UpdateStudentRequest,
    },
};

impl MemoryStorage {
    /// 创建班级
    pub async fn create_class_impl(&self, req: CreateClassRequest) -> Result<Class> {
        let mut inner = self.state();
        let now = chrono::Utc::now();

        let class = Class {
            id: next_id(&mut inner.next_class_id),
            name: req.name,
            grade: req.grade,
            section: req.section,
            teacher_id: req.teacher_id,
            academic_year: req.academic_year,
            max_students: req.max_students,
            students: Vec::new(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        inner.classes.push(class.clone());

        Ok(class)
    }

    /// 通过 ID 获取班级（包含已删除班级）
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let inner = self.state();
        Ok(inner.classes.iter().find(|c| c.id == class_id).cloned())
    }

    /// 列出班级（默认排除已删除班级）
    pub async fn list_classes_impl(&self, query: ClassListQuery) -> Result<Vec<Class>> {
        let inner = self.state();
        Ok(inner
            .classes
            .iter()
            .filter(|c| query.include_inactive || c.is_active)
            .filter(|c| query.grade.is_none_or(|g| c.grade == g))
            .filter(|c| query.teacher_id.is_none_or(|t| c.teacher_id == Some(t)))
            .filter(|c| {
                query
                    .academic_year
                    .as_ref()
                    .is_none_or(|y| &c.academic_year == y)
            })
            .cloned()
            .collect())
    }

    /// 更新班级信息
    pub async fn update_class_impl(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        let mut inner = self.state();
        let Some(class) = inner.classes.iter_mut().find(|c| c.id == class_id) else {
            return Ok(None);
        };

        if let Some(name) = update.name {
            class.name = name;
        }
        if let Some(grade) = update.grade {
            class.grade = grade;
        }
        if let Some(section) = update.section {
            class.section = section;
        }
        if let Some(teacher_id) = update.teacher_id {
            class.teacher_id = Some(teacher_id);
        }
        if let Some(academic_year) = update.academic_year {
            class.academic_year = academic_year;
        }
        if let Some(max_students) = update.max_students {
            // 允许低于当前在读人数，容量只在 add_student 时检查
            class.max_students = max_students;
        }
        class.updated_at = chrono::Utc::now();

        Ok(Some(class.clone()))
    }

    /// 删除班级（软删除，幂等）
    pub async fn delete_class_impl(&self, class_id: i64) -> Result<bool> {
        let mut inner = self.state();
        let Some(class) = inner.classes.iter_mut().find(|c| c.id == class_id) else {
            return Ok(false);
        };
        class.is_active = false;
        class.updated_at = chrono::Utc::now();
        Ok(true)
    }

    /// 向班级添加学生
    ///
    /// 在读人数达到 max_students 时拒绝；学号与同班在读学生重复时拒绝。
    /// 两种失败都不改动花名册。
    pub async fn add_student_impl(
        &self,
        class_id: i64,
        req: AddStudentRequest,
    ) -> Result<Option<Student>> {
        let mut inner = self.state();
        let now = chrono::Utc::now();

        // 拆分借用：班级列表与学生 id 计数器分属不同字段
        let super::StoreInner {
            classes,
            next_student_id,
            ..
        } = &mut *inner;
        let Some(class) = classes.iter_mut().find(|c| c.id == class_id) else {
            return Ok(None);
        };

        if class.active_student_count() >= class.max_students {
            return Err(AttendanceError::capacity_exceeded(format!(
                "班级 {} 已满员（容量 {}）",
                class.id, class.max_students
            )));
        }
        if class
            .active_students()
            .any(|s| s.student_number == req.student_number)
        {
            return Err(AttendanceError::uniqueness_violation(format!(
                "学号已存在于班级 {}: {}",
                class.id, req.student_number
            )));
        }

        let student = Student {
            id: next_id(next_student_id),
            name: req.name,
            student_number: req.student_number,
            email: req.email,
            phone: req.phone,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        class.students.push(student.clone());
        class.updated_at = now;

        Ok(Some(student))
    }

    /// 更新学生信息
    pub async fn update_student_impl(
        &self,
        class_id: i64,
        student_id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        let mut inner = self.state();
        let Some(class) = inner.classes.iter_mut().find(|c| c.id == class_id) else {
            return Ok(None);
        };

        if let Some(ref number) = update.student_number
            && class
                .active_students()
                .any(|s| s.id != student_id && &s.student_number == number)
        {
            return Err(AttendanceError::uniqueness_violation(format!(
                "学号已存在于班级 {class_id}: {number}"
            )));
        }

        let Some(student) = class.students.iter_mut().find(|s| s.id == student_id) else {
            return Ok(None);
        };

        if let Some(name) = update.name {
            student.name = name;
        }
        if let Some(student_number) = update.student_number {
            student.student_number = student_number;
        }
        if let Some(email) = update.email {
            student.email = Some(email);
        }
        if let Some(phone) = update.phone {
            student.phone = Some(phone);
        }
        let now = chrono::Utc::now();
        student.updated_at = now;
        let student = student.clone();
        class.updated_at = now;

        Ok(Some(student))
    }

    /// 从班级移除学生（软删除，幂等）
    ///
    /// 被移除的学生退出在读花名册，历史考勤记录在下次被改写时
    /// 会按新花名册重算派生字段。
    pub async fn remove_student_impl(&self, class_id: i64, student_id: i64) -> Result<bool> {
        let mut inner = self.state();
        let Some(class) = inner.classes.iter_mut().find(|c| c.id == class_id) else {
            return Ok(false);
        };
        let Some(student) = class.students.iter_mut().find(|s| s.id == student_id) else {
            return Ok(false);
        };
        let now = chrono::Utc::now();
        student.is_active = false;
        student.updated_at = now;
        class.updated_at = now;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{seed_class, test_storage};
    use crate::models::classes::requests::{
        AddStudentRequest, ClassListQuery, UpdateClassRequest, UpdateStudentRequest,
    };
    use crate::storage::Storage;

    fn student(name: &str, number: &str) -> AddStudentRequest {
        AddStudentRequest {
            name: name.to_string(),
            student_number: number.to_string(),
            email: None,
            phone: None,
        }
    }

    #[tokio::test]
    async fn test_capacity_exceeded_leaves_roster_unchanged() {
        let storage = test_storage();
        let class = seed_class(&storage, 3, 3).await;

        let err = storage
            .add_student(class.id, student("多余学生", "S9999"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E001");

        let class = storage.get_class_by_id(class.id).await.unwrap().unwrap();
        assert_eq!(class.active_student_count(), 3);
        assert_eq!(class.students.len(), 3);
    }

    #[tokio::test]
    async fn test_removing_student_frees_capacity() {
        let storage = test_storage();
        let class = seed_class(&storage, 3, 3).await;
        let removed_id = class.students[0].id;

        assert!(storage.remove_student(class.id, removed_id).await.unwrap());
        // 软删除后容量释放，可以再加一人
        let added = storage
            .add_student(class.id, student("插班生", "S9999"))
            .await
            .unwrap()
            .unwrap();
        assert!(added.id > removed_id); // id 不复用

        let class = storage.get_class_by_id(class.id).await.unwrap().unwrap();
        assert_eq!(class.active_student_count(), 3);
        assert_eq!(class.students.len(), 4);
    }

    #[tokio::test]
    async fn test_duplicate_student_number_within_class() {
        let storage = test_storage();
        let class = seed_class(&storage, 2, 10).await;

        let err = storage
            .add_student(class.id, student("重复学号", "S0001"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E002");
    }

    #[tokio::test]
    async fn test_student_number_reusable_after_soft_delete() {
        let storage = test_storage();
        let class = seed_class(&storage, 2, 10).await;
        storage
            .remove_student(class.id, class.students[0].id)
            .await
            .unwrap();

        // 学号唯一性只约束在读学生
        let added = storage
            .add_student(class.id, student("新同学", "S0001"))
            .await
            .unwrap();
        assert!(added.is_some());
    }

    #[tokio::test]
    async fn test_student_number_unique_across_classes_not_required() {
        let storage = test_storage();
        let class_a = seed_class(&storage, 1, 10).await;
        let class_b = storage
            .create_class(crate::models::classes::requests::CreateClassRequest {
                name: "四年一班".to_string(),
                grade: 4,
                section: "1".to_string(),
                teacher_id: None,
                academic_year: "2025-2026".to_string(),
                max_students: 10,
            })
            .await
            .unwrap();

        // 学号唯一性以班级为界，不是全局
        let added = storage
            .add_student(class_b.id, student("同学号", "S0001"))
            .await
            .unwrap();
        assert!(added.is_some());
        assert_ne!(class_a.id, class_b.id);
    }

    #[tokio::test]
    async fn test_add_student_to_missing_class() {
        let storage = test_storage();
        let result = storage.add_student(999, student("无人", "S0001")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_soft_deleted_class_hidden_from_default_list() {
        let storage = test_storage();
        let class = seed_class(&storage, 0, 10).await;

        assert!(storage.delete_class(class.id).await.unwrap());
        assert!(storage.delete_class(class.id).await.unwrap()); // 幂等

        let visible = storage.list_classes(ClassListQuery::default()).await.unwrap();
        assert!(visible.is_empty());

        let all = storage
            .list_classes(ClassListQuery {
                include_inactive: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(all.len(), 1);

        // findById 仍可见
        assert!(storage.get_class_by_id(class.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update_class_and_lower_capacity() {
        let storage = test_storage();
        let class = seed_class(&storage, 3, 10).await;

        let updated = storage
            .update_class(
                class.id,
                UpdateClassRequest {
                    max_students: Some(2),
                    name: Some("三年二班（新）".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        // 允许低于当前在读人数
        assert_eq!(updated.max_students, 2);
        assert_eq!(updated.active_student_count(), 3);

        // 但后续添加会被容量检查拒绝
        let err = storage
            .add_student(class.id, student("想插班", "S9999"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E001");
    }

    #[tokio::test]
    async fn test_update_student_rejects_duplicate_number() {
        let storage = test_storage();
        let class = seed_class(&storage, 2, 10).await;
        let second = class.students[1].id;

        let err = storage
            .update_student(
                class.id,
                second,
                UpdateStudentRequest {
                    student_number: Some("S0001".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E002");
    }

    #[tokio::test]
    async fn test_list_classes_filters() {
        let storage = test_storage();
        seed_class(&storage, 0, 10).await; // grade 3

        let grade3 = storage
            .list_classes(ClassListQuery {
                grade: Some(3),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(grade3.len(), 1);

        let grade4 = storage
            .list_classes(ClassListQuery {
                grade: Some(4),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(grade4.is_empty());
    }
}
