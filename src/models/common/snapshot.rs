use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::models::{
    attendance::entities::AttendanceRecord, classes::entities::Class,
    schedules::entities::ScheduleEntry, settings::entities::SchoolSettings,
    subjects::entities::Subject, users::entities::User,
};

/// 当前快照格式版本
pub const SNAPSHOT_VERSION: &str = "1.0";

// 全量存储快照（备份/恢复边界）
//
// 导入时整体替换存储内容，并按各集合现存最大 id 重建计数器。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub version: String,
    pub exported_at: chrono::DateTime<chrono::Utc>,
    pub users: Vec<User>,
    pub classes: Vec<Class>,
    pub subjects: Vec<Subject>,
    pub schedules: Vec<ScheduleEntry>,
    pub attendance: Vec<AttendanceRecord>,
    pub settings: SchoolSettings,
}

impl StoreSnapshot {
    /// 序列化为 JSON 字符串
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// 从 JSON 字符串反序列化
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
