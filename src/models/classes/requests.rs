use serde::Deserialize;

// 班级创建请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClassRequest {
    pub name: String,
    pub grade: i32,
    pub section: String,
    pub teacher_id: Option<i64>,
    pub academic_year: String,
    pub max_students: i64,
}

// 班级更新请求
//
// 允许把 max_students 调低到当前在读人数以下；
// 容量只在 add_student 时检查。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateClassRequest {
    pub name: Option<String>,
    pub grade: Option<i32>,
    pub section: Option<String>,
    pub teacher_id: Option<i64>,
    pub academic_year: Option<String>,
    pub max_students: Option<i64>,
}

// 班级列表查询参数（用于存储层）
//
// 默认只返回未删除的班级。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassListQuery {
    pub grade: Option<i32>,
    pub teacher_id: Option<i64>,
    pub academic_year: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

// 学生添加请求
#[derive(Debug, Clone, Deserialize)]
pub struct AddStudentRequest {
    pub name: String,
    pub student_number: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

// 学生更新请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStudentRequest {
    pub name: Option<String>,
    pub student_number: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}
