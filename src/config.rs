use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::{Result, StageError};

/// Environment variable the host build tool uses to hand over the project root.
pub const PROJECT_DIR_VAR: &str = "PROJECT_DIR";
/// Set to `0`, `false`, `no` or `off` to skip compiling the staged asset.
pub const VERIFY_LUA_VAR: &str = "STAGE_VERIFY_LUA";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub project_dir: PathBuf,
    pub verify_lua: bool,
}

impl Config {
    /// Reads the process arguments and environment. Call `dotenv()` first if a
    /// `.env` file should be honoured.
    pub fn from_env() -> Result<Self> {
        Self::resolve(env::args_os().nth(1), |key| env::var_os(key))
    }

    /// The positional argument wins over `PROJECT_DIR`. Empty values count as unset.
    /// Paths are taken as OS strings and need not be UTF-8.
    pub fn resolve<F>(arg: Option<OsString>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let project_dir = arg
            .filter(|value| !value.is_empty())
            .or_else(|| lookup(PROJECT_DIR_VAR).filter(|value| !value.is_empty()))
            .map(PathBuf::from)
            .ok_or(StageError::MissingProjectDir)?;

        let verify_lua = lookup(VERIFY_LUA_VAR)
            .map(|value| !is_disabled(&value.to_string_lossy()))
            .unwrap_or(true);

        Ok(Self {
            project_dir,
            verify_lua,
        })
    }
}

fn is_disabled(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
