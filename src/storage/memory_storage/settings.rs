//! 学校设置存储操作（单例，整体读取/整体替换）

use super::MemoryStorage;
use crate::errors::Result;
use crate::models::settings::entities::SchoolSettings;

impl MemoryStorage {
    /// 读取设置单例
    pub async fn get_settings_impl(&self) -> Result<SchoolSettings> {
        let inner = self.state();
        Ok(inner.settings.clone())
    }

    /// 整体替换设置单例，updated_at 由存储层刷新
    pub async fn replace_settings_impl(&self, mut settings: SchoolSettings) -> Result<SchoolSettings> {
        let mut inner = self.state();
        settings.updated_at = chrono::Utc::now();
        inner.settings = settings.clone();
        Ok(settings)
    }
}
