//! Shared test helpers: a scripted stub engine speaking the wire protocol.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use events::EventBus;
use jobs::{JobContext, ManagementConfig};

/// Write a minimal GTP engine to `dir` that answers every generate-move
/// request with `genmove_reply` and logs each received command line to
/// `commands.log` next to itself.
pub fn stub_engine(dir: &Path, genmove_reply: &str) -> PathBuf {
    let path = dir.join("engine.sh");
    let script = format!(
        r#"#!/bin/sh
dir=$(dirname "$0")
log="$dir/commands.log"
while IFS= read -r line; do
    [ -z "$line" ] && continue
    echo "$line" >> "$log"
    set -- $line
    case "$1" in
        version)
            printf '= 0.17.2\n\n'
            ;;
        genmove)
            printf '= {reply}\n\n'
            ;;
        final_score)
            printf '= B+6.5\n\n'
            ;;
        printsgf)
            printf '(;FF[4]GM[1]PB[TestNet 0.17 aaaabbbb]PW[Human]RE[B+6.5];B[dd];W[tt])' > "$2"
            printf '=\n\n'
            ;;
        save_training|dump_debug)
            : > "$2"
            printf '=\n\n'
            ;;
        dump_training|dump_supervised)
            : > "$3"
            printf '=\n\n'
            ;;
        quit)
            printf '=\n\n'
            exit 0
            ;;
        *)
            printf '=\n\n'
            ;;
    esac
done
"#,
        reply = genmove_reply
    );
    fs::write(&path, script).unwrap();

    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

pub fn test_config(dir: &Path, engine: &Path) -> ManagementConfig {
    ManagementConfig {
        networks_dir: dir.to_path_buf(),
        work_dir: dir.to_path_buf(),
        engine_binary: Some(engine.to_path_buf()),
        ..ManagementConfig::default()
    }
}

pub fn test_context(dir: &Path, engine: &Path) -> JobContext {
    JobContext::new("", Arc::new(test_config(dir, engine)), None)
}

#[allow(dead_code)]
pub fn test_context_with_bus(dir: &Path, engine: &Path, bus: EventBus) -> JobContext {
    JobContext::new("", Arc::new(test_config(dir, engine)), Some(bus))
}

#[allow(dead_code)]
pub fn read_log(dir: &Path) -> String {
    fs::read_to_string(dir.join("commands.log")).unwrap_or_default()
}
