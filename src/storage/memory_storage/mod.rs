//! 内存存储实现
//!
//! 单进程内存数据存储。所有操作（包括读取）都在同一把互斥锁内完成，
//! 因此按三元组的 check-then-act upsert 是不可分割的单元，
//! 聚合读取也不会观察到撕裂状态。持锁期间没有任何 await 点。

mod attendance;
mod classes;
mod schedules;
mod settings;
mod snapshot;
mod statistics;
mod subjects;
mod users;

use std::sync::{Mutex, MutexGuard};

use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::{
    attendance::entities::AttendanceRecord, classes::entities::Class,
    schedules::entities::ScheduleEntry, settings::entities::SchoolSettings,
    subjects::entities::Subject, users::entities::User,
};
use tracing::info;

/// 内存存储实例
///
/// 显式构造、由组合根持有生命周期，不做模块级单例。
pub struct MemoryStorage {
    // 新建/重置时的初始设置
    initial_settings: SchoolSettings,
    inner: Mutex<StoreInner>,
}

/// 互斥锁保护的全部存储状态
pub(crate) struct StoreInner {
    pub users: Vec<User>,
    pub classes: Vec<Class>,
    pub subjects: Vec<Subject>,
    pub schedules: Vec<ScheduleEntry>,
    pub attendance: Vec<AttendanceRecord>,
    pub settings: SchoolSettings,
    // 每个集合独立的单调递增计数器，软删除不回收 id；
    // 学生使用独立于班级的全店计数器空间
    pub next_user_id: i64,
    pub next_class_id: i64,
    pub next_student_id: i64,
    pub next_subject_id: i64,
    pub next_schedule_id: i64,
    pub next_attendance_id: i64,
}

impl StoreInner {
    fn empty(settings: SchoolSettings) -> Self {
        Self {
            users: Vec::new(),
            classes: Vec::new(),
            subjects: Vec::new(),
            schedules: Vec::new(),
            attendance: Vec::new(),
            settings,
            next_user_id: 1,
            next_class_id: 1,
            next_student_id: 1,
            next_subject_id: 1,
            next_schedule_id: 1,
            next_attendance_id: 1,
        }
    }
}

/// 取下一个 id 并推进计数器
pub(crate) fn next_id(counter: &mut i64) -> i64 {
    let id = *counter;
    *counter += 1;
    id
}

impl MemoryStorage {
    /// 创建新的内存存储实例，settings 单例用给定值初始化
    pub fn new(initial_settings: SchoolSettings) -> Self {
        info!(
            "内存存储初始化完成，学校: {}",
            initial_settings.school_name
        );
        Self {
            inner: Mutex::new(StoreInner::empty(initial_settings.clone())),
            initial_settings,
        }
    }

    /// 从全局配置创建存储实例
    pub fn from_config() -> Result<Self> {
        let config = AppConfig::get();
        let settings = SchoolSettings::from(&config.school);
        crate::utils::validate_time_hhmm(&settings.attendance_deadline)
            .map_err(|e| crate::errors::AttendanceError::validation(e))?;
        crate::utils::validate_academic_year(&settings.academic_year)
            .map_err(|e| crate::errors::AttendanceError::validation(e))?;
        Ok(Self::new(settings))
    }

    /// 重置为空存储（测试夹具和恢复场景使用）
    pub fn reset(&self) {
        let mut inner = self.state();
        *inner = StoreInner::empty(self.initial_settings.clone());
    }

    /// 获取互斥锁
    ///
    /// 锁中毒意味着持锁线程 panic，属于不可恢复的程序错误，直接终止。
    pub(crate) fn state(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().expect("attendance store mutex poisoned")
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new(SchoolSettings::from(&crate::config::SchoolConfig::default()))
    }
}

// Storage trait 实现
use crate::models::{
    StoreSnapshot,
    attendance::{
        requests::{AttendanceQuery, SubmitAttendanceRequest, UpdateAttendanceRequest},
        responses::{AttendanceStatistics, StudentHistoryEntry, StudentSearchResult},
    },
    classes::{
        entities::Student,
        requests::{
            AddStudentRequest, ClassListQuery, CreateClassRequest, UpdateClassRequest,
            UpdateStudentRequest,
        },
    },
    schedules::requests::{CreateScheduleRequest, ScheduleListQuery, UpdateScheduleRequest},
    subjects::requests::{CreateSubjectRequest, SubjectListQuery, UpdateSubjectRequest},
    users::requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for MemoryStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn list_users(&self, query: UserListQuery) -> Result<Vec<User>> {
        self.list_users_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn deactivate_user(&self, id: i64) -> Result<bool> {
        self.deactivate_user_impl(id).await
    }

    async fn update_login_info(&self, id: i64) -> Result<bool> {
        self.update_login_info_impl(id).await
    }

    // 班级模块
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class> {
        self.create_class_impl(class).await
    }

    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    async fn list_classes(&self, query: ClassListQuery) -> Result<Vec<Class>> {
        self.list_classes_impl(query).await
    }

    async fn update_class(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        self.update_class_impl(class_id, update).await
    }

    async fn delete_class(&self, class_id: i64) -> Result<bool> {
        self.delete_class_impl(class_id).await
    }

    // 班级学生模块
    async fn add_student(
        &self,
        class_id: i64,
        student: AddStudentRequest,
    ) -> Result<Option<Student>> {
        self.add_student_impl(class_id, student).await
    }

    async fn update_student(
        &self,
        class_id: i64,
        student_id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        self.update_student_impl(class_id, student_id, update).await
    }

    async fn remove_student(&self, class_id: i64, student_id: i64) -> Result<bool> {
        self.remove_student_impl(class_id, student_id).await
    }

    // 科目模块
    async fn create_subject(&self, subject: CreateSubjectRequest) -> Result<Subject> {
        self.create_subject_impl(subject).await
    }

    async fn get_subject_by_id(&self, subject_id: i64) -> Result<Option<Subject>> {
        self.get_subject_by_id_impl(subject_id).await
    }

    async fn get_subject_by_code(&self, code: &str) -> Result<Option<Subject>> {
        self.get_subject_by_code_impl(code).await
    }

    async fn list_subjects(&self, query: SubjectListQuery) -> Result<Vec<Subject>> {
        self.list_subjects_impl(query).await
    }

    async fn update_subject(
        &self,
        subject_id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        self.update_subject_impl(subject_id, update).await
    }

    async fn delete_subject(&self, subject_id: i64) -> Result<bool> {
        self.delete_subject_impl(subject_id).await
    }

    async fn subject_in_use(&self, subject_id: i64) -> Result<bool> {
        self.subject_in_use_impl(subject_id).await
    }

    // 课程表模块
    async fn create_schedule(&self, schedule: CreateScheduleRequest) -> Result<ScheduleEntry> {
        self.create_schedule_impl(schedule).await
    }

    async fn get_schedule_by_id(&self, schedule_id: i64) -> Result<Option<ScheduleEntry>> {
        self.get_schedule_by_id_impl(schedule_id).await
    }

    async fn list_schedules(&self, query: ScheduleListQuery) -> Result<Vec<ScheduleEntry>> {
        self.list_schedules_impl(query).await
    }

    async fn update_schedule(
        &self,
        schedule_id: i64,
        update: UpdateScheduleRequest,
    ) -> Result<Option<ScheduleEntry>> {
        self.update_schedule_impl(schedule_id, update).await
    }

    async fn delete_schedule(&self, schedule_id: i64) -> Result<bool> {
        self.delete_schedule_impl(schedule_id).await
    }

    // 考勤模块
    async fn submit_attendance(
        &self,
        request: SubmitAttendanceRequest,
    ) -> Result<AttendanceRecord> {
        self.submit_attendance_impl(request).await
    }

    async fn get_attendance_by_id(&self, id: i64) -> Result<Option<AttendanceRecord>> {
        self.get_attendance_by_id_impl(id).await
    }

    async fn list_attendance(&self, query: AttendanceQuery) -> Result<Vec<AttendanceRecord>> {
        self.list_attendance_impl(query).await
    }

    async fn update_attendance(
        &self,
        id: i64,
        update: UpdateAttendanceRequest,
    ) -> Result<Option<AttendanceRecord>> {
        self.update_attendance_impl(id, update).await
    }

    async fn delete_attendance(&self, id: i64) -> Result<bool> {
        self.delete_attendance_impl(id).await
    }

    // 聚合模块
    async fn get_attendance_statistics(
        &self,
        query: AttendanceQuery,
    ) -> Result<AttendanceStatistics> {
        self.get_attendance_statistics_impl(query).await
    }

    async fn get_student_attendance_history(
        &self,
        student_id: i64,
        query: AttendanceQuery,
    ) -> Result<Vec<StudentHistoryEntry>> {
        self.get_student_attendance_history_impl(student_id, query)
            .await
    }

    async fn search_students(&self, keyword: &str) -> Result<Vec<StudentSearchResult>> {
        self.search_students_impl(keyword).await
    }

    // 设置模块
    async fn get_settings(&self) -> Result<SchoolSettings> {
        self.get_settings_impl().await
    }

    async fn replace_settings(&self, settings: SchoolSettings) -> Result<SchoolSettings> {
        self.replace_settings_impl(settings).await
    }

    // 快照模块
    async fn export_snapshot(&self) -> Result<StoreSnapshot> {
        self.export_snapshot_impl().await
    }

    async fn import_snapshot(&self, snapshot: StoreSnapshot) -> Result<()> {
        self.import_snapshot_impl(snapshot).await
    }
}
