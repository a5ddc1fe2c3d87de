use super::entities::AttendanceStatus;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// 单个分组的考勤小计
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GroupStats {
    pub records: i64,
    pub present: i64,
    pub absent: i64,
}

// 考勤统计响应
//
// 每次调用都从过滤后的记录集全量折叠，不持久化任何聚合状态。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceStatistics {
    // 命中过滤条件的记录数
    pub total_records: i64,
    // 学生名额总数（各记录 total_students 之和）
    pub total_students: i64,
    pub total_present: i64,
    pub total_absent: i64,
    // 出勤率百分比，保留两位小数；名额总数为 0 时为 0.0
    pub attendance_rate: f64,
    pub by_class: HashMap<i64, GroupStats>,
    pub by_subject: HashMap<i64, GroupStats>,
    pub by_date: HashMap<chrono::NaiveDate, GroupStats>,
}

// 学生考勤历史条目
//
// 班级/科目名称在读取时联查解析，按日期倒序返回。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentHistoryEntry {
    pub record_id: i64,
    pub date: chrono::NaiveDate,
    pub status: AttendanceStatus,
    pub class_id: i64,
    pub class_name: String,
    pub subject_id: i64,
    pub subject_name: String,
    pub notes: Option<String>,
}

// 学生搜索结果，附带所属班级信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentSearchResult {
    pub student: crate::models::classes::entities::Student,
    pub class_id: i64,
    pub class_name: String,
    pub grade: i32,
    pub section: String,
}
