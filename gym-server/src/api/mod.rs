//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 认证相关接口
//! - [`members`] - 会员管理接口
//! - [`attendance`] - 到场签到/签退接口
//! - [`payments`] - 续费收款接口
//! - [`statistics`] - 前台仪表盘统计
//! - [`settings`] - 会员价格配置

pub mod attendance;
pub mod auth;
pub mod health;
pub mod members;
pub mod payments;
pub mod settings;
pub mod statistics;
