//! 考勤聚合/读侧操作
//!
//! 无持久化聚合状态：每次调用都对过滤后的记录集全量折叠。

use super::MemoryStorage;
use crate::errors::Result;
use crate::models::attendance::{
    entities::AttendanceStatus,
    requests::AttendanceQuery,
    responses::{AttendanceStatistics, GroupStats, StudentHistoryEntry, StudentSearchResult},
};
use std::collections::HashMap;

impl MemoryStorage {
    /// 考勤统计
    ///
    /// 出勤率 = 出勤人次 / 学生名额总数 × 100，保留两位小数；
    /// 名额总数为 0 时为 0.0，避免除零。
    pub async fn get_attendance_statistics_impl(
        &self,
        query: AttendanceQuery,
    ) -> Result<AttendanceStatistics> {
        let inner = self.state();

        let mut total_records = 0i64;
        let mut total_students = 0i64;
        let mut total_present = 0i64;
        let mut total_absent = 0i64;
        let mut by_class: HashMap<i64, GroupStats> = HashMap::new();
        let mut by_subject: HashMap<i64, GroupStats> = HashMap::new();
        let mut by_date: HashMap<chrono::NaiveDate, GroupStats> = HashMap::new();

        for record in inner.attendance.iter().filter(|r| query.matches(r)) {
            let present = record.present_students.len() as i64;
            let absent = record.absent_students.len() as i64;

            total_records += 1;
            total_students += record.total_students;
            total_present += present;
            total_absent += absent;

            for (key, map) in [
                (record.class_id, &mut by_class),
                (record.subject_id, &mut by_subject),
            ] {
                let entry = map.entry(key).or_default();
                entry.records += 1;
                entry.present += present;
                entry.absent += absent;
            }
            let entry = by_date.entry(record.date).or_default();
            entry.records += 1;
            entry.present += present;
            entry.absent += absent;
        }

        let attendance_rate = if total_students > 0 {
            (total_present as f64 / total_students as f64 * 100.0 * 100.0).round() / 100.0
        } else {
            0.0
        };

        Ok(AttendanceStatistics {
            total_records,
            total_students,
            total_present,
            total_absent,
            attendance_rate,
            by_class,
            by_subject,
            by_date,
        })
    }

    /// 学生考勤历史
    ///
    /// 每条命中记录产出一个条目；窗口内未出现（如尚未入学）的学生
    /// 产出空列表，调用方不能假设每天一条。按日期倒序。
    pub async fn get_student_attendance_history_impl(
        &self,
        student_id: i64,
        query: AttendanceQuery,
    ) -> Result<Vec<StudentHistoryEntry>> {
        let inner = self.state();

        let mut entries: Vec<StudentHistoryEntry> = inner
            .attendance
            .iter()
            .filter(|r| query.matches(r))
            .filter_map(|record| {
                let status = if record.present_students.contains(&student_id) {
                    AttendanceStatus::Present
                } else if record.absent_students.contains(&student_id) {
                    AttendanceStatus::Absent
                } else {
                    return None;
                };

                // 展示名称联查，已删除的班级/科目也要能解析（历史仍要可读）
                let class_name = inner
                    .classes
                    .iter()
                    .find(|c| c.id == record.class_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_default();
                let subject_name = inner
                    .subjects
                    .iter()
                    .find(|s| s.id == record.subject_id)
                    .map(|s| s.name.clone())
                    .unwrap_or_default();

                Some(StudentHistoryEntry {
                    record_id: record.id,
                    date: record.date,
                    status,
                    class_id: record.class_id,
                    class_name,
                    subject_id: record.subject_id,
                    subject_name,
                    notes: record.notes.clone(),
                })
            })
            .collect();

        entries.sort_by(|a, b| b.date.cmp(&a.date).then(b.record_id.cmp(&a.record_id)));
        Ok(entries)
    }

    /// 全局学生搜索
    ///
    /// 扫描未删除班级的在读学生，姓名/学号/邮箱大小写不敏感子串匹配；
    /// 结果保持班级-学生插入顺序，不做排名。空关键字返回空结果。
    pub async fn search_students_impl(&self, keyword: &str) -> Result<Vec<StudentSearchResult>> {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return Ok(Vec::new());
        }

        let inner = self.state();
        let mut results = Vec::new();

        for class in inner.classes.iter().filter(|c| c.is_active) {
            for student in class.active_students() {
                let hit = student.name.to_lowercase().contains(&keyword)
                    || student.student_number.to_lowercase().contains(&keyword)
                    || student
                        .email
                        .as_ref()
                        .is_some_and(|e| e.to_lowercase().contains(&keyword));
                if hit {
                    results.push(StudentSearchResult {
                        student: student.clone(),
                        class_id: class.id,
                        class_name: class.name.clone(),
                        grade: class.grade,
                        section: class.section.clone(),
                    });
                }
            }
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{seed_class, test_storage};
    use crate::models::attendance::entities::AttendanceStatus;
    use crate::models::attendance::requests::{AttendanceQuery, SubmitAttendanceRequest};
    use crate::models::classes::requests::AddStudentRequest;
    use crate::storage::Storage;

    fn submit(
        class_id: i64,
        subject_id: i64,
        date: &str,
        absent: Vec<i64>,
    ) -> SubmitAttendanceRequest {
        SubmitAttendanceRequest {
            teacher_id: 1,
            class_id,
            subject_id,
            date: date.parse().unwrap(),
            absent_students: absent,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_statistics_concrete_scenario() {
        // 同班同科两天：一天 20 人缺 5，一天 20 人全勤
        let storage = test_storage();
        let class = seed_class(&storage, 20, 30).await;
        let absent: Vec<i64> = class.students[..5].iter().map(|s| s.id).collect();

        storage
            .submit_attendance(submit(class.id, 1, "2026-03-02", absent))
            .await
            .unwrap();
        storage
            .submit_attendance(submit(class.id, 1, "2026-03-03", vec![]))
            .await
            .unwrap();

        let stats = storage
            .get_attendance_statistics(AttendanceQuery {
                class_id: Some(class.id),
                subject_id: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(stats.total_records, 2);
        assert_eq!(stats.total_students, 40);
        assert_eq!(stats.total_present, 35);
        assert_eq!(stats.total_absent, 5);
        assert_eq!(stats.attendance_rate, 87.50);
    }

    #[tokio::test]
    async fn test_statistics_empty_filter_is_zero_not_nan() {
        let storage = test_storage();
        let stats = storage
            .get_attendance_statistics(AttendanceQuery {
                class_id: Some(999),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(stats.total_records, 0);
        assert_eq!(stats.attendance_rate, 0.0);
        assert!(stats.by_class.is_empty());
    }

    #[tokio::test]
    async fn test_statistics_breakdowns() {
        let storage = test_storage();
        let class = seed_class(&storage, 10, 20).await;
        let one_absent = vec![class.students[0].id];

        storage
            .submit_attendance(submit(class.id, 1, "2026-03-02", one_absent.clone()))
            .await
            .unwrap();
        storage
            .submit_attendance(submit(class.id, 2, "2026-03-02", vec![]))
            .await
            .unwrap();

        let stats = storage
            .get_attendance_statistics(AttendanceQuery::default())
            .await
            .unwrap();

        assert_eq!(stats.by_class.len(), 1);
        assert_eq!(stats.by_subject.len(), 2);
        assert_eq!(stats.by_date.len(), 1);

        let class_stats = &stats.by_class[&class.id];
        assert_eq!(class_stats.records, 2);
        assert_eq!(class_stats.present, 19);
        assert_eq!(class_stats.absent, 1);

        let date: chrono::NaiveDate = "2026-03-02".parse().unwrap();
        let date_stats = stats.by_date.get(&date).unwrap();
        assert_eq!(date_stats.records, 2);
    }

    #[tokio::test]
    async fn test_student_history_newest_first() {
        let storage = test_storage();
        let class = seed_class(&storage, 3, 10).await;
        let student_id = class.students[0].id;

        // 记录 A：出勤；记录 B：缺勤（更晚日期）
        storage
            .submit_attendance(submit(class.id, 1, "2026-03-02", vec![]))
            .await
            .unwrap();
        storage
            .submit_attendance(submit(class.id, 1, "2026-03-04", vec![student_id]))
            .await
            .unwrap();

        let history = storage
            .get_student_attendance_history(student_id, AttendanceQuery::default())
            .await
            .unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].date, "2026-03-04".parse().unwrap());
        assert_eq!(history[0].status, AttendanceStatus::Absent);
        assert_eq!(history[1].date, "2026-03-02".parse().unwrap());
        assert_eq!(history[1].status, AttendanceStatus::Present);
        assert_eq!(history[0].class_name, "三年二班");
    }

    #[tokio::test]
    async fn test_student_history_empty_when_not_involved() {
        let storage = test_storage();
        let class = seed_class(&storage, 2, 10).await;
        storage
            .submit_attendance(submit(class.id, 1, "2026-03-02", vec![]))
            .await
            .unwrap();

        // 插班生在该记录之后入学，不出现在任何名单里
        let late = storage
            .add_student(
                class.id,
                AddStudentRequest {
                    name: "插班生".to_string(),
                    student_number: "S9999".to_string(),
                    email: None,
                    phone: None,
                },
            )
            .await
            .unwrap()
            .unwrap();

        let history = storage
            .get_student_attendance_history(late.id, AttendanceQuery::default())
            .await
            .unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_search_students_case_insensitive() {
        let storage = test_storage();
        let class = seed_class(&storage, 2, 10).await;
        storage
            .add_student(
                class.id,
                AddStudentRequest {
                    name: "Li Ming".to_string(),
                    student_number: "A100".to_string(),
                    email: Some("liming@school.cn".to_string()),
                    phone: None,
                },
            )
            .await
            .unwrap()
            .unwrap();

        // 姓名匹配
        let by_name = storage.search_students("li ming").await.unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].class_id, class.id);
        assert_eq!(by_name[0].grade, 3);

        // 学号匹配
        let by_number = storage.search_students("a10").await.unwrap();
        assert_eq!(by_number.len(), 1);

        // 邮箱匹配
        let by_email = storage.search_students("LIMING@").await.unwrap();
        assert_eq!(by_email.len(), 1);

        // 空关键字
        assert!(storage.search_students("  ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_skips_inactive_students_and_classes() {
        let storage = test_storage();
        let class = seed_class(&storage, 2, 10).await;

        storage
            .remove_student(class.id, class.students[0].id)
            .await
            .unwrap();
        let hits = storage.search_students("学生1").await.unwrap();
        assert!(hits.is_empty());

        storage.delete_class(class.id).await.unwrap();
        let hits = storage.search_students("学生2").await.unwrap();
        assert!(hits.is_empty());
    }
}
