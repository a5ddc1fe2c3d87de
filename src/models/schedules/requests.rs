use super::entities::DayOfWeek;
use serde::Deserialize;

// 课程表条目创建请求
//
// start_time/end_time 由调用方用 utils::validate_time_hhmm 校验后传入。
#[derive(Debug, Clone, Deserialize)]
pub struct CreateScheduleRequest {
    pub teacher_id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub day_of_week: DayOfWeek,
    pub start_time: String,
    pub end_time: String,
    pub room: Option<String>,
}

// 课程表条目更新请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateScheduleRequest {
    pub teacher_id: Option<i64>,
    pub class_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub day_of_week: Option<DayOfWeek>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub room: Option<String>,
}

// 课程表列表查询参数（用于存储层）
//
// 默认只返回未删除的条目。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleListQuery {
    pub teacher_id: Option<i64>,
    pub class_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub day_of_week: Option<DayOfWeek>,
    #[serde(default)]
    pub include_inactive: bool,
}
