const VISIBLE: usize = 4;

/// Masks a secret so that it can be shown to a user or written to logs.
///
/// Only the first and last few characters survive, and short secrets are
/// masked entirely.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= VISIBLE * 3 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..VISIBLE].iter().collect();
    let tail: String = chars[chars.len() - VISIBLE..].iter().collect();
    let hidden = "*".repeat(chars.len() - VISIBLE * 2);
    format!("{head}{hidden}{tail}")
}
