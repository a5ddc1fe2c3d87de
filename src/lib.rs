//! AttendanceSystem - 学校考勤系统核心库
//!
//! 进程内单写者考勤数据存储及其查询/聚合层。
//! HTTP 路由、认证、报表渲染和实时推送由外部调用方负责，
//! 本库只提供稳定的存储契约（`storage::Storage`）。
//!
//! # 架构
//! - `config`: 配置管理
//! - `errors`: 统一错误处理
//! - `models`: 数据模型定义
//! - `storage`: 数据存储层（内存实现）
//! - `utils`: 工具函数

pub mod config;
pub mod errors;
pub mod models;
pub mod storage;
pub mod utils;
