//! Path utilities for DeckBot
//!
//! Handles tilde expansion and resolution against the app root.

use std::path::{Path, PathBuf};

/// Expands a leading tilde (~) to the user's home directory.
/// "~/decks" -> "/home/bot/decks"
/// "/tmp/foo" -> "/tmp/foo" (no change)
pub fn expand_tilde(path: &str) -> String {
    shellexpand::tilde(path).into_owned()
}

/// Helper to convert a potentially tilde-containing string into a PathBuf.
pub fn get_path(path: &str) -> PathBuf {
    PathBuf::from(expand_tilde(path))
}

/// Resolves the DeckBot app root from DECKBOT_ROOT, falling back to the working directory.
pub fn get_app_root() -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    match std::env::var("DECKBOT_ROOT") {
        Ok(root) if !root.trim().is_empty() => resolve_under(&cwd, &root),
        _ => cwd,
    }
}

/// Resolves `path` (tilde expanded) against `root` unless it is already absolute.
pub fn resolve_under(root: &Path, path: &str) -> PathBuf {
    let p = get_path(path);
    if p.is_absolute() {
        p
    } else {
        root.join(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilde_expands_only_at_start() {
        assert_eq!(expand_tilde("/tmp/~x"), "/tmp/~x");
        assert_eq!(expand_tilde("downloads"), "downloads");

        if let Some(home) = std::env::var_os("HOME").filter(|h| !h.is_empty()) {
            let home = Path::new(&home);
            assert_eq!(get_path("~/decks"), home.join("decks"));
            assert_eq!(get_path("~"), home);
        }
    }

    #[test]
    fn relative_paths_join_the_root() {
        let root = Path::new("/srv/app");
        assert_eq!(resolve_under(root, "downloads"), PathBuf::from("/srv/app/downloads"));
        assert_eq!(resolve_under(root, "/data/decks"), PathBuf::from("/data/decks"));
    }
}
