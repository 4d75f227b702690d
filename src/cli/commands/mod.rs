mod command_result;
pub mod init;
pub mod minify;
pub mod sync;
pub mod translate;

pub use command_result::*;
