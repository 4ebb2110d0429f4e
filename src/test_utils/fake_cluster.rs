use std::path::Path;
use std::path::PathBuf;

use super::write_script;

/// Stand-in for a cluster program: `coordinator`/`daemon` record their
/// arguments and pid in the working directory then block; `add-space`
/// copies its stdin next to the script.
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

/// Bin directory holding `hyperdex` and `wtf` stand-ins.
pub fn fake_cluster_bin(dir: &Path) -> PathBuf {
    let bin = dir.join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    write_fake_cluster_program(&bin, "hyperdex");
    write_fake_cluster_program(&bin, "wtf");
    bin
}
