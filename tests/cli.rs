use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

fn stage_cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_lua-stage"));
    cmd.env_remove("PROJECT_DIR")
        .env_remove("STAGE_VERIFY_LUA")
        .env_remove("RUST_LOG");
    cmd
}

fn run_with_arg(root: &Path) -> Output {
    stage_cmd().arg(root).output().unwrap()
}

#[test]
fn scenario_a_empty_project() {
    let dir = tempdir().unwrap();
    let output = run_with_arg(dir.path());

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            format!("Created data directory: {}", dir.path().join("data").display()),
            format!(
                "WARNING: sys.lua not found at {}",
                dir.path().join("lua").join("sys.lua").display()
            ),
            "Pre-build script completed".to_string(),
        ]
    );
    assert!(dir.path().join("data").is_dir());
    assert!(!dir.path().join("data/sys.lua").exists());
}

#[test]
fn scenario_b_copies_asset() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("lua")).unwrap();
    fs::write(dir.path().join("lua/sys.lua"), "return {}").unwrap();

    let output = stage_cmd()
        .env("PROJECT_DIR", dir.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        fs::read_to_string(dir.path().join("data/sys.lua")).unwrap(),
        "return {}"
    );
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.ends_with("Copied sys.lua to data folder\nPre-build script completed\n"));
}

#[test]
fn scenario_c_overwrites_existing_copy() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("lua")).unwrap();
    fs::create_dir_all(dir.path().join("data")).unwrap();
    fs::write(dir.path().join("lua/sys.lua"), "new").unwrap();
    fs::write(dir.path().join("data/sys.lua"), "old").unwrap();

    let output = stage_cmd()
        .arg(dir.path())
        .env("STAGE_VERIFY_LUA", "off")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        fs::read_to_string(dir.path().join("data/sys.lua")).unwrap(),
        "new"
    );
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        stdout,
        "Copied sys.lua to data folder\nPre-build script completed\n"
    );
}

#[test]
fn missing_project_dir_fails() {
    let dir = tempdir().unwrap();
    let output = stage_cmd().current_dir(dir.path()).output().unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("PROJECT_DIR"));
}

#[cfg(unix)]
#[test]
fn non_utf8_project_dir_is_accepted() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempdir().unwrap();
    let root = dir.path().join(OsStr::from_bytes(b"proj\xff"));
    fs::create_dir_all(root.join("lua")).unwrap();
    fs::write(root.join("lua/sys.lua"), "return {}").unwrap();

    let by_arg = stage_cmd().arg(&root).output().unwrap();
    assert!(by_arg.status.success(), "{:?}", by_arg);
    let stdout = String::from_utf8_lossy(&by_arg.stdout);
    assert!(stdout.ends_with("Copied sys.lua to data folder\nPre-build script completed\n"));
    assert_eq!(
        fs::read_to_string(root.join("data/sys.lua")).unwrap(),
        "return {}"
    );

    fs::remove_dir_all(root.join("data")).unwrap();

    let by_env = stage_cmd().env("PROJECT_DIR", &root).output().unwrap();
    assert!(by_env.status.success(), "{:?}", by_env);
    assert_eq!(
        fs::read_to_string(root.join("data/sys.lua")).unwrap(),
        "return {}"
    );
}
