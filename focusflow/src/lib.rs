//! Focus Flow: terminal task and project tracker library.

pub mod app;
pub mod config;
pub mod dispatch;
pub mod forms;
pub mod notify;
pub mod reconcile;
pub mod service;
pub mod ui;
