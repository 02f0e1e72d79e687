pub mod compute;
pub mod init;
pub mod validate;
