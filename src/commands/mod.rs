//! Command implementations for somnio

pub mod add;
pub mod delete;
pub mod dispatch;
pub mod explain;
pub mod format;
pub mod init;
pub mod link;
pub mod list;
pub mod network;
pub mod recalculate;
pub mod show;
pub mod similar;
pub mod update;
