use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSettings,
    pub school: SchoolConfig,
}

/// 应用设置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub system_name: String,
    pub environment: String,
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            system_name: "AttendanceSystem".to_string(),
            environment: "development".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// 学校配置
///
/// 新建存储实例时作为 settings 单例的初始值。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchoolConfig {
    pub name: String,                // 学校名称
    pub academic_year: String,       // 学年，格式 YYYY-YYYY
    pub current_semester: String,    // 当前学期
    pub attendance_deadline: String, // 考勤提交截止时间，格式 HH:MM
    pub timezone: String,            // 时区
}

impl Default for SchoolConfig {
    fn default() -> Self {
        Self {
            name: "Default School".to_string(),
            academic_year: "2025-2026".to_string(),
            current_semester: "1".to_string(),
            attendance_deadline: "09:30".to_string(),
            timezone: "Asia/Shanghai".to_string(),
        }
    }
}
