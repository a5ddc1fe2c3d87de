//! 用户存储操作

use super::{MemoryStorage, next_id};
use crate::errors::{AttendanceError, Result};
use crate::models::users::{
    entities::User,
    requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
};

impl MemoryStorage {
    /// 创建用户
    ///
    /// 用户名（大小写不敏感）和邮箱在全体用户中唯一，包括已停用账户，
    /// 停用账户的用户名不可复用。
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let mut inner = self.state();
        let now = chrono::Utc::now();

        if inner
            .users
            .iter()
            .any(|u| u.username.eq_ignore_ascii_case(&req.username))
        {
            return Err(AttendanceError::uniqueness_violation(format!(
                "用户名已存在: {}",
                req.username
            )));
        }
        if inner.users.iter().any(|u| u.email == req.email) {
            return Err(AttendanceError::uniqueness_violation(format!(
                "邮箱已存在: {}",
                req.email
            )));
        }

        let user = User {
            id: next_id(&mut inner.next_user_id),
            username: req.username,
            password_hash: req.password_hash,
            role: req.role,
            name: req.name,
            email: req.email,
            phone: req.phone,
            subject_ids: req.subject_ids,
            is_active: true,
            last_login: None,
            login_count: 0,
            created_at: now,
            updated_at: now,
        };
        inner.users.push(user.clone());

        Ok(user)
    }

    /// 通过 ID 获取用户（线性扫描，包含已停用账户）
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let inner = self.state();
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    /// 通过用户名获取用户（大小写不敏感）
    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        let inner = self.state();
        Ok(inner
            .users
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let inner = self.state();
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    /// 列出用户
    ///
    /// 与班级/科目不同：默认包含已停用账户，调用方用 active_only 收窄。
    pub async fn list_users_impl(&self, query: UserListQuery) -> Result<Vec<User>> {
        let inner = self.state();
        Ok(inner
            .users
            .iter()
            .filter(|u| !query.active_only || u.is_active)
            .filter(|u| query.role.is_none_or(|role| u.role == role))
            .filter(|u| {
                query
                    .subject_id
                    .is_none_or(|sid| u.subject_ids.contains(&sid))
            })
            .cloned()
            .collect())
    }

    /// 更新用户信息（浅合并，字段级 last-write-wins）
    ///
    /// 邮箱唯一性与创建路径一致：改到他人邮箱（含停用账户）报 E002。
    pub async fn update_user_impl(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        let mut inner = self.state();
        if !inner.users.iter().any(|u| u.id == id) {
            return Ok(None);
        }
        if let Some(email) = &update.email
            && inner.users.iter().any(|u| u.id != id && u.email == *email)
        {
            return Err(AttendanceError::uniqueness_violation(format!(
                "邮箱已存在: {email}"
            )));
        }
        let Some(user) = inner.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };

        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(phone) = update.phone {
            user.phone = Some(phone);
        }
        if let Some(password_hash) = update.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(role) = update.role {
            user.role = role;
        }
        if let Some(subject_ids) = update.subject_ids {
            user.subject_ids = subject_ids;
        }
        user.updated_at = chrono::Utc::now();

        Ok(Some(user.clone()))
    }

    /// 停用用户（软删除，幂等）
    pub async fn deactivate_user_impl(&self, id: i64) -> Result<bool> {
        let mut inner = self.state();
        let Some(user) = inner.users.iter_mut().find(|u| u.id == id) else {
            return Ok(false);
        };
        user.is_active = false;
        user.updated_at = chrono::Utc::now();
        Ok(true)
    }

    /// 更新登录信息
    ///
    /// 与通用更新路径分离，避免安全相关字段被整体覆盖误伤。
    pub async fn update_login_info_impl(&self, id: i64) -> Result<bool> {
        let mut inner = self.state();
        let Some(user) = inner.users.iter_mut().find(|u| u.id == id) else {
            return Ok(false);
        };
        let now = chrono::Utc::now();
        user.last_login = Some(now);
        user.login_count += 1;
        user.updated_at = now;
        Ok(true)
    }
}
