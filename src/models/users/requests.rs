use super::entities::UserRole;
use serde::Deserialize;

// 用户创建请求
//
// 调用方负责先行归一化（用户名去空白、密码已哈希等），
// 存储层只负责用户名/邮箱唯一性。
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password_hash: String,
    pub role: UserRole,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub subject_ids: Vec<i64>,
}

// 用户更新请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<UserRole>,
    pub subject_ids: Option<Vec<i64>>,
}

// 用户列表查询参数（用于存储层）
//
// 用户列表默认包含已停用账户；`active_only` 置为 true 时只返回在用账户。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListQuery {
    pub role: Option<UserRole>,
    pub subject_id: Option<i64>,
    #[serde(default)]
    pub active_only: bool,
}
