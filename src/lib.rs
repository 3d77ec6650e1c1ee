pub mod config;
pub mod error;
pub mod lua_check;
pub mod stager;
