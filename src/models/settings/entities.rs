use crate::config::SchoolConfig;
use serde::{Deserialize, Serialize};

// 学校设置单例
//
// 整体读取/整体替换语义，无版本管理；替换时由存储层刷新 updated_at。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchoolSettings {
    pub school_name: String,
    pub academic_year: String,
    pub current_semester: String,
    // HH:MM，24 小时制
    pub attendance_deadline: String,
    pub timezone: String,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<&SchoolConfig> for SchoolSettings {
    fn from(config: &SchoolConfig) -> Self {
        Self {
            school_name: config.name.clone(),
            academic_year: config.academic_year.clone(),
            current_semester: config.current_semester.clone(),
            attendance_deadline: config.attendance_deadline.clone(),
            timezone: config.timezone.clone(),
            updated_at: chrono::Utc::now(),
        }
    }
}
