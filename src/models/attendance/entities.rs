use serde::{Deserialize, Serialize};

// 考勤记录实体
//
// 业务键为 (class_id, subject_id, date) 三元组，同一三元组至多一条记录。
// present_students / total_students 是派生字段：每次写入时根据班级
// *当前* 在读花名册重新计算，从不独立设置。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: i64,
    // 最近一次提交的教师
    pub teacher_id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    // 日历日期，无时间部分
    pub date: chrono::NaiveDate,
    pub absent_students: Vec<i64>,
    // 派生：在读花名册减去缺勤名单
    pub present_students: Vec<i64>,
    // 派生：提交时刻的在读花名册人数
    pub total_students: i64,
    pub notes: Option<String>,
    pub submitted_by: i64,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl AttendanceRecord {
    /// 是否命中 (class_id, subject_id, date) 业务键
    pub fn matches_key(&self, class_id: i64, subject_id: i64, date: chrono::NaiveDate) -> bool {
        self.class_id == class_id && self.subject_id == subject_id && self.date == date
    }

    /// 学生是否出现在本条记录中（出勤或缺勤名单任一）
    pub fn involves_student(&self, student_id: i64) -> bool {
        self.present_students.contains(&student_id) || self.absent_students.contains(&student_id)
    }
}

// 考勤状态（用于学生历史视图）
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present, // 出勤
    Absent,  // 缺勤
}

impl<'de> Deserialize<'de> for AttendanceStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "present" => Ok(AttendanceStatus::Present),
            "absent" => Ok(AttendanceStatus::Absent),
            _ => Err(serde::de::Error::custom(format!(
                "无效的考勤状态: '{s}'. 支持的状态: present, absent"
            ))),
        }
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttendanceStatus::Present => write!(f, "present"),
            AttendanceStatus::Absent => write!(f, "absent"),
        }
    }
}
