//! Targeted rewrites of engine-produced SGF records.
//!
//! Not an SGF parser: only the fields the pipeline cares about are
//! rewritten, in place, on the text the engine emitted.

use autoplay_core::Engine;
use regex::{NoExpand, Regex};

/// Player-name field the engine leaves for the side it believes is human.
const PLAYER_PLACEHOLDER: &str = "PW[Human]";

/// Identifier prefix length taken from the opponent network id.
const NETWORK_ID_LEN: usize = 8;

/// Rewrite one record: player name, reproduction command lines, and (after
/// a resignation) result normalization plus trailing-pass cleanup.
pub(crate) fn rewrite(
    data: &str,
    own: &Engine,
    opponent: &Engine,
    resigned: bool,
    self_play: bool,
) -> String {
    let mut data = rewrite_player_name(data, opponent);
    data = rewrite_annotation(&data, own, opponent, self_play);
    if resigned {
        data = normalize_resignation(&data);
    }
    data
}

/// Replace the placeholder player name with the opponent's network id,
/// preserving the engine's self-identifying prefix from the other player
/// field when one is present.
fn rewrite_player_name(data: &str, opponent: &Engine) -> String {
    if !data.contains(PLAYER_PLACEHOLDER) {
        return data.to_string();
    }

    let prefix = Regex::new(r"PB\[([^\]]*\s)\S+\]")
        .ok()
        .and_then(|re| re.captures(data).map(|c| c[1].to_string()))
        .unwrap_or_default();
    let net: String = opponent
        .network_id()
        .chars()
        .take(NETWORK_ID_LEN)
        .collect();

    data.replace(PLAYER_PLACEHOLDER, &format!("PW[{prefix}{net}]"))
}

/// Rewrite the root comment to carry the command line(s) needed to
/// reproduce the game.
fn rewrite_annotation(data: &str, own: &Engine, opponent: &Engine, self_play: bool) -> String {
    let text = if self_play {
        format!("Command line: {}", own.command_line())
    } else {
        format!(
            "Players: {} vs {}",
            own.command_line(),
            opponent.command_line()
        )
    };
    let property = format!("C[{text}]");

    if let Ok(re) = Regex::new(r"C\[[^\]]*\]") {
        if re.is_match(data) {
            return re.replace(data, NoExpand(&property)).to_string();
        }
    }

    // No comment yet: attach one after the result property when present,
    // else directly on the root node.
    if let Ok(re) = Regex::new(r"RE\[[^\]]*\]") {
        if let Some(m) = re.find(data) {
            let mut out = String::with_capacity(data.len() + property.len());
            out.push_str(&data[..m.end()]);
            out.push_str(&property);
            out.push_str(&data[m.end()..]);
            return out;
        }
    }
    match data.find("(;") {
        Some(idx) => {
            let mut out = String::with_capacity(data.len() + property.len());
            out.push_str(&data[..idx + 2]);
            out.push_str(&property);
            out.push_str(&data[idx + 2..]);
            out
        }
        None => data.to_string(),
    }
}

/// Keep the declared winner but normalize the score to the canonical
/// resign token, and drop the null pass move engines append after a
/// resignation.
fn normalize_resignation(data: &str) -> String {
    let mut out = data.to_string();

    for (pattern, replacement) in [
        (r"RE\[B\+[^\]]*\]", "RE[B+Resign]"),
        (r"RE\[W\+[^\]]*\]", "RE[W+Resign]"),
    ] {
        if let Ok(re) = Regex::new(pattern) {
            if re.is_match(&out) {
                out = re.replace(&out, NoExpand(replacement)).to_string();
                break;
            }
        }
    }

    if let Ok(re) = Regex::new(r";[BW]\[(?:tt)?\]\s*\)\s*$") {
        out = re.replace(&out, NoExpand(")")).to_string();
    }

    out
}
