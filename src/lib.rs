//! Academy Workflow - 学院表单与分阶段报告流转服务
//!
//! 基于 Actix Web 构建，多群组隔离。
//!
//! # 架构
//! - `cache`: 成员缓存（Moka）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: JWT 认证中间件
//! - `models`: 数据模型定义
//! - `permissions`: 角色与操作的权限判定
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM / 内存）
//! - `utils`: 工具函数
//! - `workflow`: 表单与报告的状态机及校验

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod permissions;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
pub mod workflow;
