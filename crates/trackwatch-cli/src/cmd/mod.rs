pub mod check;
pub mod init;
pub mod item;
pub mod tick;
