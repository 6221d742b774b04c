//! Local leaderboard, stored as a small JSON file.

use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};

/// How many entries the board keeps.
pub const MAX_ENTRIES: usize = 5;

/// One finished round on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
    pub date: String,
}

/// Handle to the scores file. Reads are forgiving: a missing, unreadable or
/// malformed file comes back as an empty board. Write failures are latched
/// rather than printed, because saves happen while the terminal is in the
/// alternate screen; the driver drains the latch after restoring it.
#[derive(Debug, Clone)]
pub struct ScoreBoard {
    path: PathBuf,
    save_error: RefCell<Option<String>>,
}

impl ScoreBoard {
    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os("FLAPJACK_SCORES_PATH") {
            return Self::at(PathBuf::from(explicit));
        }

        let base = std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|home| {
                    let mut p = PathBuf::from(home);
                    p.push(".local");
                    p.push("share");
                    p
                })
            })
            .unwrap_or_else(|| PathBuf::from("."));

        let mut path = base;
        path.push("flapjack");
        path.push("scores.json");
        Self::at(path)
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            save_error: RefCell::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Vec<ScoreEntry> {
        let Ok(bytes) = fs::read(&self.path) else {
            return Vec::new();
        };
        serde_json::from_slice::<Vec<ScoreEntry>>(&bytes)
            .map(sanitized)
            .unwrap_or_default()
    }

    /// Records a finished round and returns the updated board, sorted by
    /// score and capped at [`MAX_ENTRIES`]. Only the empty name becomes
    /// "Anonymous"; anything else is stored as typed. A failed write latches
    /// the error and comes back as an empty board, the same face a broken
    /// store shows on load.
    pub fn save(&self, name: &str, score: u32) -> Vec<ScoreEntry> {
        let name = if name.is_empty() { "Anonymous" } else { name };
        let mut entries = self.load();
        entries.push(ScoreEntry {
            name: name.to_string(),
            score,
            date: Local::now().format("%Y-%m-%d").to_string(),
        });
        let entries = sanitized(entries);
        if let Err(e) = self.persist(&entries) {
            *self.save_error.borrow_mut() =
                Some(format!("could not save scores to {:?}: {e}", self.path));
            return Vec::new();
        }
        entries
    }

    /// Takes the most recent save failure, if any, clearing the latch.
    pub fn take_save_error(&self) -> Option<String> {
        self.save_error.borrow_mut().take()
    }

    fn persist(&self, entries: &[ScoreEntry]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(entries)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, text)
    }
}

/// Highest score first; ties keep their relative order. Anything past the
/// cap is dropped.
fn sanitized(mut entries: Vec<ScoreEntry>) -> Vec<ScoreEntry> {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(MAX_ENTRIES);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_scores_path(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        std::env::temp_dir().join(format!("flapjack-{tag}-{nanos}.json"))
    }

    #[test]
    fn missing_file_loads_as_empty_board() {
        let board = ScoreBoard::at(unique_scores_path("missing"));
        assert!(board.load().is_empty());
    }

    #[test]
    fn corrupt_file_loads_as_empty_board() {
        let path = unique_scores_path("corrupt");
        fs::write(&path, b"{not json").expect("test file should be writable");
        let board = ScoreBoard::at(&path);
        assert!(board.load().is_empty());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn save_then_load_round_trips() {
        let path = unique_scores_path("roundtrip");
        let board = ScoreBoard::at(&path);

        let saved = board.save("Joy", 7);
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].name, "Joy");
        assert_eq!(saved[0].score, 7);
        assert!(board.take_save_error().is_none());

        let loaded = board.load();
        assert_eq!(loaded, saved);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn empty_name_becomes_anonymous() {
        let path = unique_scores_path("anonymous");
        let board = ScoreBoard::at(&path);
        let saved = board.save("", 3);
        assert_eq!(saved[0].name, "Anonymous");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn board_is_sorted_and_capped() {
        let path = unique_scores_path("capped");
        let board = ScoreBoard::at(&path);
        for (name, score) in [("a", 2), ("b", 9), ("c", 4), ("d", 1), ("e", 6), ("f", 5)] {
            board.save(name, score);
        }
        let entries = board.load();
        assert_eq!(entries.len(), MAX_ENTRIES);
        let scores: Vec<u32> = entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![9, 6, 5, 4, 2]);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn load_sanitizes_stored_data() {
        let path = unique_scores_path("sanitize");
        let stored = r#"[
            {"name":"low","score":1,"date":"2026-01-01"},
            {"name":"high","score":10,"date":"2026-01-01"},
            {"name":"mid","score":5,"date":"2026-01-01"},
            {"name":"d","score":4,"date":"2026-01-01"},
            {"name":"e","score":3,"date":"2026-01-01"},
            {"name":"f","score":2,"date":"2026-01-01"}
        ]"#;
        fs::write(&path, stored).expect("test file should be writable");
        let entries = ScoreBoard::at(&path).load();
        assert_eq!(entries.len(), MAX_ENTRIES);
        assert_eq!(entries[0].name, "high");
        assert_eq!(entries[4].name, "f");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let path = unique_scores_path("ties");
        let board = ScoreBoard::at(&path);
        board.save("first", 5);
        board.save("second", 5);
        let entries = board.load();
        assert_eq!(entries[0].name, "first");
        assert_eq!(entries[1].name, "second");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn failed_write_reports_an_empty_board() {
        // Parent "directory" is a plain file, so persisting must fail.
        let blocker = unique_scores_path("blocker");
        fs::write(&blocker, b"x").expect("test file should be writable");
        let board = ScoreBoard::at(blocker.join("scores.json"));
        assert!(board.save("Joy", 2).is_empty());
        assert!(board.load().is_empty());
        let _ = fs::remove_file(&blocker);
    }

    #[test]
    fn failed_write_latches_one_error() {
        let blocker = unique_scores_path("latch");
        fs::write(&blocker, b"x").expect("test file should be writable");
        let board = ScoreBoard::at(blocker.join("scores.json"));
        board.save("Joy", 2);
        assert!(board.take_save_error().is_some());
        assert!(board.take_save_error().is_none());
        let _ = fs::remove_file(&blocker);
    }

    #[test]
    fn spacing_in_names_is_preserved() {
        let path = unique_scores_path("spacing");
        let board = ScoreBoard::at(&path);
        let saved = board.save(" Joy B ", 4);
        assert_eq!(saved[0].name, " Joy B ");
        // Whitespace-only is still a name; only "" falls back.
        let saved = board.save("   ", 2);
        assert_eq!(saved[1].name, "   ");
        let _ = fs::remove_file(&path);
    }
}
