//! 工具函数

pub mod html;
pub mod ip;
