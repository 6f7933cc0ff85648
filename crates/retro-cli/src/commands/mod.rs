pub mod check;
pub mod dashboard;
pub mod dir;
pub mod dispatch;
pub mod init;
pub mod list;
pub mod navigate;
pub mod submit;
