//! Stages `lua/sys.lua` into `data/` so it is packed into the device filesystem image.

use std::fs::{self, File, FileTimes, Permissions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, StageError};
use crate::lua_check;

pub const DATA_DIR: &str = "data";
pub const LUA_DIR: &str = "lua";
pub const ASSET_NAME: &str = "sys.lua";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Copied { bytes: u64 },
    /// `lua/sys.lua` does not exist; the destination was left alone.
    SourceMissing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageReport {
    pub created_data_dir: bool,
    pub outcome: StageOutcome,
}

#[derive(Debug, Clone)]
pub struct Stager {
    data_dir: PathBuf,
    source: PathBuf,
    destination: PathBuf,
    verify_lua: bool,
}

impl Stager {
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        let project_root = project_root.as_ref();
        let data_dir = project_root.join(DATA_DIR);
        let lua_dir = project_root.join(LUA_DIR);
        Self {
            source: lua_dir.join(ASSET_NAME),
            destination: data_dir.join(ASSET_NAME),
            data_dir,
            verify_lua: true,
        }
    }

    /// Compile the staged asset after copying and warn if it is not valid Lua.
    pub fn verify_lua(mut self, enabled: bool) -> Self {
        self.verify_lua = enabled;
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn run<W: Write>(&self, out: &mut W) -> Result<StageReport> {
        log::debug!(
            "Staging {} -> {}",
            self.source.display(),
            self.destination.display()
        );

        let created_data_dir = self.ensure_data_dir()?;
        if created_data_dir {
            writeln!(out, "Created data directory: {}", self.data_dir.display())?;
        }

        let outcome = if self.source.exists() {
            let bytes = copy_with_metadata(&self.source, &self.destination)?;
            log::info!("Copied {} bytes to {}", bytes, self.destination.display());
            writeln!(out, "Copied {} to data folder", ASSET_NAME)?;
            if self.verify_lua {
                self.verify_staged(out)?;
            }
            StageOutcome::Copied { bytes }
        } else {
            log::warn!("{} not found at {}", ASSET_NAME, self.source.display());
            writeln!(
                out,
                "WARNING: {} not found at {}",
                ASSET_NAME,
                self.source.display()
            )?;
            StageOutcome::SourceMissing
        };

        writeln!(out, "Pre-build script completed")?;
        Ok(StageReport {
            created_data_dir,
            outcome,
        })
    }

    fn ensure_data_dir(&self) -> Result<bool> {
        if self.data_dir.exists() {
            return Ok(false);
        }
        fs::create_dir_all(&self.data_dir).map_err(|source| StageError::CreateDir {
            path: self.data_dir.clone(),
            source,
        })?;
        log::info!("Created {}", self.data_dir.display());
        Ok(true)
    }

    fn verify_staged<W: Write>(&self, out: &mut W) -> Result<()> {
        let script = fs::read(&self.destination).map_err(|source| StageError::ReadAsset {
            path: self.destination.clone(),
            source,
        })?;
        if let Err(e) = lua_check::check_syntax(&script) {
            log::warn!("{} does not compile: {}", self.destination.display(), e);
            writeln!(out, "WARNING: {} failed to compile: {}", ASSET_NAME, e)?;
        }
        Ok(())
    }
}

/// Runs the stager for `project_root` with the syntax check enabled.
pub fn stage<W: Write>(project_root: impl AsRef<Path>, out: &mut W) -> Result<StageReport> {
    Stager::new(project_root).run(out)
}

/// Copies contents, permission bits, and modification/access times from `src` to `dst`.
pub fn copy_with_metadata(src: &Path, dst: &Path) -> Result<u64> {
    let metadata = fs::metadata(src).map_err(meta_err(src))?;

    // A read-only copy from an earlier run cannot be truncated.
    if let Ok(existing) = fs::metadata(dst) {
        if existing.permissions().readonly() {
            fs::set_permissions(dst, owner_writable(&existing.permissions()))
                .map_err(meta_err(dst))?;
        }
    }

    let bytes = fs::copy(src, dst).map_err(|source| StageError::Copy {
        from: src.to_path_buf(),
        to: dst.to_path_buf(),
        source,
    })?;

    let mut times = FileTimes::new().set_modified(metadata.modified().map_err(meta_err(src))?);
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }

    fs::set_permissions(dst, owner_writable(&metadata.permissions())).map_err(meta_err(dst))?;
    let file = File::options()
        .write(true)
        .open(dst)
        .map_err(meta_err(dst))?;
    file.set_times(times).map_err(meta_err(dst))?;
    drop(file);
    fs::set_permissions(dst, metadata.permissions()).map_err(meta_err(dst))?;

    Ok(bytes)
}

fn meta_err(path: &Path) -> impl FnOnce(io::Error) -> StageError {
    let path = path.to_path_buf();
    move |source| StageError::Metadata { path, source }
}

#[cfg(unix)]
fn owner_writable(perms: &Permissions) -> Permissions {
    use std::os::unix::fs::PermissionsExt;
    Permissions::from_mode(perms.mode() | 0o200)
}

#[cfg(not(unix))]
fn owner_writable(perms: &Permissions) -> Permissions {
    let mut perms = perms.clone();
    #[allow(clippy::permissions_set_readonly_false)]
    perms.set_readonly(false);
    perms
}
