//! Share link shown on the end-of-session screen.

pub const GAME_URL: &str = "https://your-game-link.vercel.app";

/// Pre-filled tweet announcing `score`.  Only the score and game URL vary,
/// so the message text is stored already percent-encoded.
pub fn share_url(score: u32, game_url: &str) -> String {
    format!(
        "https://twitter.com/intent/tweet?text=I%20scored%20{score}%20in%20Shooting%20Meteors!%20Play%20here:%20{game_url}"
    )
}
