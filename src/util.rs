use chrono::{DateTime, Local, Utc};

/// Characters of a copied prompt shown in the "Copied" toast.
pub const COPY_PREVIEW_CHARS: usize = 40;

/// Toast previews longer than this are cut and suffixed with "...".
pub const TOAST_PREVIEW_CHARS: usize = 50;

/// UTF-8 safe string truncation by character count.
/// If the string exceeds `max_chars`, truncates and appends "...".
/// When `max_chars` is 3 or less, returns exactly `max_chars` characters
/// without ellipsis.
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_chars {
        s.to_string()
    } else if max_chars <= 3 {
        s.chars().take(max_chars).collect()
    } else {
        let end = s
            .char_indices()
            .nth(max_chars.saturating_sub(3))
            .map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}

/// First `n` characters, no ellipsis.
pub fn head_chars(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

/// Preview line for a toast: the first 50 characters, then "..." if cut.
pub fn toast_preview(s: &str) -> String {
    if s.chars().count() > TOAST_PREVIEW_CHARS {
        format!("{}...", head_chars(s, TOAST_PREVIEW_CHARS))
    } else {
        s.to_string()
    }
}

/// Footer label for the unfiltered prompt count.
pub fn count_label(count: u64) -> String {
    format!("{count} prompt{} saved", if count == 1 { "" } else { "s" })
}

/// Human relative age of an RFC 3339 timestamp.
///
/// `just now` under a minute, then minutes, hours and days up to a week;
/// older entries show the local calendar date. Unparseable input is
/// returned as-is.
pub fn relative_age(timestamp: &str, now: DateTime<Utc>) -> String {
    let Ok(then) = DateTime::parse_from_rfc3339(timestamp) else {
        return timestamp.to_string();
    };
    let then = then.with_timezone(&Utc);
    let diff = now.signed_duration_since(then);

    let mins = diff.num_minutes();
    let hours = diff.num_hours();
    let days = diff.num_days();

    if mins < 1 {
        "just now".to_string()
    } else if mins < 60 {
        format!("{mins}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if days < 7 {
        format!("{days}d ago")
    } else {
        then.with_timezone(&Local).format("%Y-%m-%d").to_string()
    }
}

/// Make untrusted prompt text safe to draw.
///
/// Strips ANSI escape sequences and bidi override characters, expands tabs
/// and drops every other control character except newlines.
pub fn sanitize_display(s: &str) -> String {
    let stripped = strip_ansi(s);
    let mut out = String::with_capacity(stripped.len());
    for c in stripped.chars() {
        match c {
            '\n' => out.push('\n'),
            '\t' => out.push_str("    "),
            '\r' => {}
            '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}' => {}
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

/// Remove ANSI CSI (`ESC [ ... final`) and OSC (`ESC ] ... BEL|ST`) sequences.
pub fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\u{1b}' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('[') => {
                chars.next();
                // Parameters and intermediates, then one final byte in @..~
                for c in chars.by_ref() {
                    if ('@'..='~').contains(&c) {
                        break;
                    }
                }
            }
            Some(']') => {
                chars.next();
                while let Some(c) = chars.next() {
                    if c == '\u{07}' {
                        break;
                    }
                    if c == '\u{1b}' && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => {}
        }
    }
    out
}
