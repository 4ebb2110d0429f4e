use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;
use std::time::Duration;
use std::time::Instant;

use tempfile::TempDir;

pub const SPACE_DEFINITION: &str =
    "space wtf key path attributes string blockmap, int directory, int mode, string owner, string group";

pub const WAIT_FOR_FILE_IN_SEC: u64 = 20;

/// Temp directory with stand-in `hyperdex`/`wtf` programs and a workspace
/// path the runner is pointed at.
pub struct Sandbox {
    _dir: TempDir,
    pub root: PathBuf,
    pub bin: PathBuf,
    pub workspace: PathBuf,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        let bin = root.join("bin");
        fs::create_dir_all(&bin).unwrap();
        write_fake_cluster_program(&bin, "hyperdex");
        write_fake_cluster_program(&bin, "wtf");

        Self {
            workspace: root.join("ws"),
            _dir: dir,
            root,
            bin,
        }
    }

    /// Runner invocation with the stand-ins first on `PATH`, short settle
    /// points and the sandbox workspace.
    pub fn runner(
        &self,
        args: &[&str],
    ) -> Command {
        let path = format!(
            "{}:{}",
            self.bin.display(),
            std::env::var("PATH").unwrap_or_default()
        );
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_wtf-test-runner"));
        cmd.args(args)
            .env("PATH", path)
            .env("RUST_LOG", "debug")
            .env("WTF_TEST__SETTLE__DELAY_MS", "10")
            .env("WTF_TEST__WORKSPACE__ROOT", &self.workspace)
            .env_remove("CONFIG_PATH")
            .env_remove("WTF_BUILDDIR");
        cmd
    }

    pub fn run(
        &self,
        args: &[&str],
    ) -> Output {
        let output = self.runner(args).output().unwrap();
        println!("stdout:\n{}", String::from_utf8_lossy(&output.stdout));
        println!("stderr:\n{}", String::from_utf8_lossy(&output.stderr));
        output
    }

    pub fn instance_dir(
        &self,
        name: &str,
    ) -> PathBuf {
        self.workspace.join(name)
    }

    /// What the stand-in `add-space` received on stdin.
    pub fn registered_space(&self) -> Option<String> {
        fs::read_to_string(self.bin.join("hyperdex-space.txt")).ok()
    }

    pub fn write_script(
        &self,
        name: &str,
        body: &str,
    ) -> PathBuf {
        write_script(&self.root, name, body)
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn write_script(
    dir: &Path,
    name: &str,
    body: &str,
) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

/// `coordinator`/`daemon` record their arguments and pid, then block;
/// `add-space` captures its stdin next to the script.
pub fn write_fake_cluster_program(
    dir: &Path,
    name: &str,
) -> PathBuf {
    let capture = dir.join(format!("{name}-space.txt"));
    let body = format!(
        r#"case "$1" in
  add-space)
    cat > "{capture}"
    exit 0
    ;;
  coordinator|daemon)
    echo "$@" > args
    echo $$ > pid
    echo "{name} $1 started"
    exec sleep 600
    ;;
  *)
    echo "unknown subcommand $1" >&2
    exit 2
    ;;
esac"#,
        capture = capture.display(),
    );
    write_script(dir, name, &body)
}

/// Shell snippet blocking until `path` exists and is non-empty.
pub fn wait_for_file_snippet(path: &Path) -> String {
    format!("while [ ! -s {} ]; do sleep 0.02; done", path.display())
}

pub fn wait_for_path(path: &Path) {
    let deadline = Instant::now() + Duration::from_secs(WAIT_FOR_FILE_IN_SEC);
    while !path.exists() {
        assert!(Instant::now() < deadline, "{} never appeared", path.display());
        std::thread::sleep(Duration::from_millis(20));
    }
}

pub fn pid_is_alive(pid: u32) -> bool {
    Path::new(&format!("/proc/{pid}")).exists()
}
