pub mod init;
pub mod patch;
