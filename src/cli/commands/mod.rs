pub mod config;
pub mod dates;
pub mod del;
pub mod init;
pub mod list;
pub mod run;
