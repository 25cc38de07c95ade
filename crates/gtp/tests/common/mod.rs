//! A scripted stub engine for driver tests.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Write a minimal GTP engine to `dir`. It reports version 0.17.2
/// (preceded by a comment banner when requested), rejects the literal
/// command `reject`, and answers every generate-move request with
/// `genmove_reply`.
pub fn stub_engine(dir: &Path, banner: bool, genmove_reply: &str) -> PathBuf {
    let path = dir.join("engine.sh");
    let banner_line = if banner {
        "printf '# tuning in progress\\n'\n            "
    } else {
        ""
    };
    let script = format!(
        r#"#!/bin/sh
while IFS= read -r line; do
    [ -z "$line" ] && continue
    set -- $line
    case "$1" in
        version)
            {banner}printf '= 0.17.2\n\n'
            ;;
        reject)
            printf '? unknown command\n\n'
            ;;
        genmove)
            printf '= {reply}\n\n'
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
        banner = banner_line,
        reply = genmove_reply
    );
    fs::write(&path, script).unwrap();

    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}
