use std::sync::Arc;

use crate::models::{
    StoreSnapshot,
    attendance::{
        entities::AttendanceRecord,
        requests::{AttendanceQuery, SubmitAttendanceRequest, UpdateAttendanceRequest},
        responses::{AttendanceStatistics, StudentHistoryEntry, StudentSearchResult},
    },
    classes::{
        entities::{Class, Student},
        requests::{
            AddStudentRequest, ClassListQuery, CreateClassRequest, UpdateClassRequest,
            UpdateStudentRequest,
        },
    },
    schedules::{
        entities::ScheduleEntry,
        requests::{CreateScheduleRequest, ScheduleListQuery, UpdateScheduleRequest},
    },
    settings::entities::SchoolSettings,
    subjects::{
        entities::Subject,
        requests::{CreateSubjectRequest, SubjectListQuery, UpdateSubjectRequest},
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
    },
};

use crate::errors::Result;

pub mod memory_storage;

/// 考勤存储契约
///
/// "未找到" 一律表达为 `Ok(None)` / `Ok(false)` / 空聚合，从不作为错误；
/// 错误只用于存储拥有的不变量（容量、唯一性）和快照边界。
/// HTTP 状态码的翻译由调用方负责。
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（用户名/邮箱在全体用户中唯一，含已停用账户）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息（包含已停用账户）
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息（大小写不敏感，用于凭据查找）
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 列出用户（默认包含已停用账户，见 UserListQuery::active_only）
    async fn list_users(&self, query: UserListQuery) -> Result<Vec<User>>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 停用用户（软删除，幂等）
    async fn deactivate_user(&self, id: i64) -> Result<bool>;
    // 更新登录信息：last_login 置为当前时间，login_count 加一
    async fn update_login_info(&self, id: i64) -> Result<bool>;

    /// 班级管理方法
    // 创建班级
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class>;
    // 通过ID获取班级信息（包含已删除班级）
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    // 列出班级（默认排除已删除班级）
    async fn list_classes(&self, query: ClassListQuery) -> Result<Vec<Class>>;
    // 更新班级信息
    async fn update_class(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>>;
    // 删除班级（软删除，幂等）
    async fn delete_class(&self, class_id: i64) -> Result<bool>;

    /// 班级学生管理方法（内嵌花名册）
    // 添加学生；在读人数达到 max_students 时返回 CapacityExceeded，
    // 学号与在读学生重复时返回 UniquenessViolation
    async fn add_student(
        &self,
        class_id: i64,
        student: AddStudentRequest,
    ) -> Result<Option<Student>>;
    // 更新学生信息
    async fn update_student(
        &self,
        class_id: i64,
        student_id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>>;
    // 移除学生（软删除，幂等）
    async fn remove_student(&self, class_id: i64, student_id: i64) -> Result<bool>;

    /// 科目管理方法
    // 创建科目（code 全局唯一）
    async fn create_subject(&self, subject: CreateSubjectRequest) -> Result<Subject>;
    // 通过ID获取科目信息（包含已删除科目）
    async fn get_subject_by_id(&self, subject_id: i64) -> Result<Option<Subject>>;
    // 通过代码获取科目信息
    async fn get_subject_by_code(&self, code: &str) -> Result<Option<Subject>>;
    // 列出科目（默认排除已删除科目）
    async fn list_subjects(&self, query: SubjectListQuery) -> Result<Vec<Subject>>;
    // 更新科目信息
    async fn update_subject(
        &self,
        subject_id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>>;
    // 删除科目（软删除，幂等）；被引用检查由调用边界先行调用 subject_in_use
    async fn delete_subject(&self, subject_id: i64) -> Result<bool>;
    // 科目是否被课程表或考勤记录引用
    async fn subject_in_use(&self, subject_id: i64) -> Result<bool>;

    /// 课程表管理方法
    // 创建课程表条目
    async fn create_schedule(&self, schedule: CreateScheduleRequest) -> Result<ScheduleEntry>;
    // 通过ID获取课程表条目（包含已删除条目）
    async fn get_schedule_by_id(&self, schedule_id: i64) -> Result<Option<ScheduleEntry>>;
    // 列出课程表条目（默认排除已删除条目）
    async fn list_schedules(&self, query: ScheduleListQuery) -> Result<Vec<ScheduleEntry>>;
    // 更新课程表条目
    async fn update_schedule(
        &self,
        schedule_id: i64,
        update: UpdateScheduleRequest,
    ) -> Result<Option<ScheduleEntry>>;
    // 删除课程表条目（软删除，幂等）
    async fn delete_schedule(&self, schedule_id: i64) -> Result<bool>;

    /// 考勤方法
    // 按 (class_id, subject_id, date) 三元组 upsert 一条考勤记录；
    // 已存在时保留 id 和 created_at，重算派生字段并覆盖可变字段
    async fn submit_attendance(&self, request: SubmitAttendanceRequest) -> Result<AttendanceRecord>;
    // 通过ID获取考勤记录
    async fn get_attendance_by_id(&self, id: i64) -> Result<Option<AttendanceRecord>>;
    // 列出考勤记录，按日期倒序
    async fn list_attendance(&self, query: AttendanceQuery) -> Result<Vec<AttendanceRecord>>;
    // 字段级更新（仅缺勤名单与备注），按当前花名册重算派生字段
    async fn update_attendance(
        &self,
        id: i64,
        update: UpdateAttendanceRequest,
    ) -> Result<Option<AttendanceRecord>>;
    // 硬删除考勤记录（与其他实体的软删除约定不同，保留观察到的行为）
    async fn delete_attendance(&self, id: i64) -> Result<bool>;

    /// 聚合/读侧方法
    // 考勤统计：总量、出勤率及按班级/科目/日期的分组小计
    async fn get_attendance_statistics(
        &self,
        query: AttendanceQuery,
    ) -> Result<AttendanceStatistics>;
    // 学生考勤历史，按日期倒序；窗口内未出现的学生返回空列表
    async fn get_student_attendance_history(
        &self,
        student_id: i64,
        query: AttendanceQuery,
    ) -> Result<Vec<StudentHistoryEntry>>;
    // 全局学生搜索：姓名/学号/邮箱子串匹配，大小写不敏感，无排名
    async fn search_students(&self, keyword: &str) -> Result<Vec<StudentSearchResult>>;

    /// 设置方法（单例，整体读取/整体替换）
    async fn get_settings(&self) -> Result<SchoolSettings>;
    async fn replace_settings(&self, settings: SchoolSettings) -> Result<SchoolSettings>;

    /// 快照方法（备份/恢复边界）
    // 导出全量快照
    async fn export_snapshot(&self) -> Result<StoreSnapshot>;
    // 导入快照：整体替换存储内容并重建 id 计数器
    async fn import_snapshot(&self, snapshot: StoreSnapshot) -> Result<()>;
}

pub fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = memory_storage::MemoryStorage::from_config()?;
    Ok(Arc::new(storage))
}
