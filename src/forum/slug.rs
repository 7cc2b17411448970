//! Forum name to URL slug conversion.
//!
//! Slugs are the addressing scheme for forum routes
//! (`/coboard/{board}/{slug}`), so the transformation must stay stable
//! byte-for-byte: changing it would break every existing forum URL. The exact
//! step order below is therefore frozen, including the final trim happening
//! after hyphen collapsing. That ordering leaves leading/trailing hyphens in
//! place: by then no whitespace remains for the trim to remove.

/// Convert a forum display name into its URL slug.
///
/// Steps, applied in order: lowercase; whitespace runs to `-`; `[`, `]`, `=`,
/// `;` each to `-`; strip everything outside `[a-z0-9-]`; collapse `-` runs;
/// trim whitespace.
pub fn slugify(name: &str) -> String {
    let mut replaced = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for ch in name.to_lowercase().chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                replaced.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        match ch {
            '[' | ']' | '=' | ';' => replaced.push('-'),
            c if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' => replaced.push(c),
            _ => {}
        }
    }

    let mut slug = String::with_capacity(replaced.len());
    let mut in_dash_run = false;
    for ch in replaced.chars() {
        if ch == '-' {
            if !in_dash_run {
                slug.push('-');
            }
            in_dash_run = true;
        } else {
            in_dash_run = false;
            slug.push(ch);
        }
    }

    slug.trim().to_string()
}

/// Route path for a forum page, addressed by board name and forum slug.
pub fn forum_route(board: &str, forum_name: &str) -> String {
    format!("/coboard/{}/{}", board, slugify(forum_name))
}
