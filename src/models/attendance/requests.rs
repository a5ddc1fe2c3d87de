use super::entities::AttendanceRecord;
use serde::Deserialize;

// 考勤提交请求（upsert 键为 class_id + subject_id + date）
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAttendanceRequest {
    pub teacher_id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub date: chrono::NaiveDate,
    #[serde(default)]
    pub absent_students: Vec<i64>,
    pub notes: Option<String>,
}

// 考勤字段级更新请求
//
// 只能改缺勤名单和备注，不能把记录移动到另一个三元组。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAttendanceRequest {
    pub absent_students: Option<Vec<i64>>,
    pub notes: Option<String>,
}

// 考勤查询参数（用于存储层和聚合）
//
// 所有条件为与关系；date 为精确匹配，start_date/end_date 为闭区间；
// student_id 匹配出勤或缺勤名单任一。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceQuery {
    pub class_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub date: Option<chrono::NaiveDate>,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    pub student_id: Option<i64>,
}

impl AttendanceQuery {
    /// 记录是否满足全部过滤条件
    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        if let Some(class_id) = self.class_id
            && record.class_id != class_id
        {
            return false;
        }
        if let Some(subject_id) = self.subject_id
            && record.subject_id != subject_id
        {
            return false;
        }
        if let Some(teacher_id) = self.teacher_id
            && record.teacher_id != teacher_id
        {
            return false;
        }
        if let Some(date) = self.date
            && record.date != date
        {
            return false;
        }
        if let Some(start) = self.start_date
            && record.date < start
        {
            return false;
        }
        if let Some(end) = self.end_date
            && record.date > end
        {
            return false;
        }
        if let Some(student_id) = self.student_id
            && !record.involves_student(student_id)
        {
            return false;
        }
        true
    }
}
