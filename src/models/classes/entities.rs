use serde::{Deserialize, Serialize};

// 班级内嵌学生实体
//
// 学生由班级独占持有（组合而非外键关联），id 使用独立于班级的计数器空间。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
    // 外部学号，同一班级的在读学生内唯一
    pub student_number: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 班级实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Class {
    pub id: i64,
    pub name: String,
    // 年级 1-12
    pub grade: i32,
    pub section: String,
    // 班主任（可选）
    pub teacher_id: Option<i64>,
    pub academic_year: String,
    pub max_students: i64,
    // 花名册：谁可以被记缺勤，以此为唯一事实来源
    #[serde(default)]
    pub students: Vec<Student>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Class {
    /// 在读学生迭代器（未被软删除的内嵌学生）
    pub fn active_students(&self) -> impl Iterator<Item = &Student> {
        self.students.iter().filter(|s| s.is_active)
    }

    /// 在读学生数
    pub fn active_student_count(&self) -> i64 {
        self.active_students().count() as i64
    }

    /// 在读学生 id 列表，保持花名册顺序
    pub fn active_roster_ids(&self) -> Vec<i64> {
        self.active_students().map(|s| s.id).collect()
    }
}
