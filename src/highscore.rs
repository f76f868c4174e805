/// High-score persistence: one integer in a plain-text file.

use std::path::Path;

use anyhow::Context;

pub const HIGH_SCORE_FILE: &str = "highscore.txt";

/// Stored high score, or 0 when the file is missing or unreadable.
pub fn load(path: &Path) -> u32 {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(_) => {
            log::info!("no high score file at {}, starting fresh", path.display());
            return 0;
        }
    };
    match text.trim().parse() {
        Ok(score) => {
            log::info!("loaded high score {score}");
            score
        }
        Err(e) => {
            log::warn!("unreadable high score in {}: {e}", path.display());
            0
        }
    }
}

pub fn save(path: &Path, score: u32) -> anyhow::Result<()> {
    std::fs::write(path, score.to_string())
        .with_context(|| format!("writing high score to {}", path.display()))
}

/// Write `score` only if it beats what is on disk.  Returns the value the
/// file holds afterwards, `max(stored, score)`.
pub fn save_if_higher(path: &Path, score: u32) -> anyhow::Result<u32> {
    let stored = load(path);
    if score <= stored {
        return Ok(stored);
    }
    save(path, score)?;
    log::info!("new high score saved: {score}");
    Ok(score)
}
