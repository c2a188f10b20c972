//! Optional text-art decorations (background, ship sprite).
//!
//! Loading never fails: a missing, unreadable or empty file simply leaves the
//! slot empty and the renderer falls back to a solid fill.

use std::fs;
use std::path::Path;

use log::{info, warn};

/// A block of text art, one `String` per row.
#[derive(Clone, Debug, PartialEq)]
pub struct Art {
    pub lines: Vec<String>,
}

impl Art {
    pub fn from_text(text: &str) -> Option<Art> {
        let lines: Vec<String> = text.lines().map(|l| l.trim_end().to_string()).collect();
        if lines.iter().all(|l| l.is_empty()) {
            return None;
        }
        Some(Art { lines })
    }

    pub fn width(&self) -> usize {
        self.lines.iter().map(|l| l.chars().count()).max().unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.lines.len()
    }
}

#[derive(Clone, Debug, Default)]
pub struct Assets {
    pub background: Option<Art>,
    pub ship: Option<Art>,
}

impl Assets {
    pub fn load(background: Option<&Path>, ship: Option<&Path>) -> Assets {
        Assets {
            background: background.and_then(|p| load_art("background", p)),
            ship: ship.and_then(|p| load_art("ship sprite", p)),
        }
    }
}

fn load_art(label: &str, path: &Path) -> Option<Art> {
    match fs::read_to_string(path) {
        Ok(text) => {
            let art = Art::from_text(&text);
            match &art {
                Some(a) => info!("loaded {label} from {} ({}x{})", path.display(), a.width(), a.height()),
                None => warn!("{label} at {} is empty, using solid fill", path.display()),
            }
            art
        }
        Err(e) => {
            warn!("could not read {label} at {}: {e}; using solid fill", path.display());
            None
        }
    }
}
