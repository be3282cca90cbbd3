// MOTD text normalization - escapes, formatting codes and mis-encoded bytes

/// Upper bound on repeated normalization passes.
pub const MAX_NORMALIZE_PASSES: usize = 10;

/// Past this many characters normalization stops after the current pass.
pub const MAX_MOTD_CHARS: usize = 1000;

/// Minecraft legacy formatting prefix (colors, bold, reset, ...).
const SECTION_SIGN: char = '§';

/// Latin-1 renderings of common two-byte UTF-8 sequences. Seeing one of these
/// means the server's UTF-8 bytes were most likely decoded as Latin-1 upstream.
/// A lead byte on its own (`Ã` in "SÃO") is valid Latin text and not a marker.
const MOJIBAKE_MARKERS: &[&str] = &[
    "Ã©", "Ã¨", "Ã¡", "Ã³", "Ãº", "Ã\u{ad}", "Ã¤", "Ã¶", "Ã¼", "Ã±", "Ã§", "Ã\u{a0}",
    "Â§", "Â°", "Â\u{a0}", "ä¸", "ä½", "å¥", "æ\u{9c}", "ç\u{9a}", "ã\u{81}", "ã\u{82}", "ï¼",
];

/// Replace every literal `\uXXXX` escape with the code point it names.
///
/// Surrogate pairs written as two consecutive escapes are combined. Anything
/// that is not a well-formed escape is copied through verbatim.
pub fn decode_unicode_escapes(text: &str) -> String {
    if !text.contains("\\u") {
        return text.to_string();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if let Some(unit) = escape_at(&chars, i) {
            if (0xD800..0xDC00).contains(&unit) {
                // High surrogate: only decodable together with a following low surrogate
                if let Some(low) = escape_at(&chars, i + 6) {
                    if (0xDC00..0xE000).contains(&low) {
                        let code = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                        if let Some(c) = char::from_u32(code) {
                            out.push(c);
                            i += 12;
                            continue;
                        }
                    }
                }
            } else if let Some(c) = char::from_u32(unit) {
                out.push(c);
                i += 6;
                continue;
            }
        }

        out.push(chars[i]);
        i += 1;
    }

    out
}

fn escape_at(chars: &[char], i: usize) -> Option<u32> {
    if chars.get(i) != Some(&'\\') || chars.get(i + 1) != Some(&'u') {
        return None;
    }

    let digits = chars.get(i + 2..i + 6)?;
    digits
        .iter()
        .try_fold(0u32, |acc, d| d.to_digit(16).map(|v| acc * 16 + v))
}

/// Drop every `§` together with the character that follows it.
///
/// A trailing `§` with nothing after it is kept.
pub fn strip_formatting_codes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == SECTION_SIGN && chars.peek().is_some() {
            chars.next();
            continue;
        }
        out.push(c);
    }

    out
}

/// Undo UTF-8 text that was decoded as Latin-1.
///
/// Only applied when a known garbled sequence is present and every character
/// fits in a single Latin-1 byte; invalid UTF-8 becomes U+FFFD.
pub fn repair_misencoded_bytes(text: &str) -> String {
    if !MOJIBAKE_MARKERS.iter().any(|marker| text.contains(marker)) {
        return text.to_string();
    }

    let mut bytes = Vec::with_capacity(text.len());
    for c in text.chars() {
        let code = c as u32;
        if code > 0xFF {
            return text.to_string();
        }
        bytes.push(code as u8);
    }

    String::from_utf8_lossy(&bytes).into_owned()
}

fn normalize_once(text: &str) -> String {
    let decoded = decode_unicode_escapes(text);
    let stripped = strip_formatting_codes(&decoded);
    repair_misencoded_bytes(&stripped)
}

/// Run decode, strip and repair until the text stops changing.
///
/// Gives up with the best-effort text after `MAX_NORMALIZE_PASSES`, or after
/// any pass that leaves more than `MAX_MOTD_CHARS` characters. Nothing is cut.
pub fn deep_normalize(text: &str) -> String {
    let mut current = text.to_string();

    for pass in 0..MAX_NORMALIZE_PASSES {
        let next = normalize_once(&current);
        if next == current {
            return current;
        }
        tracing::trace!("MOTD normalization pass {} changed text", pass + 1);
        current = next;

        if current.chars().count() > MAX_MOTD_CHARS {
            tracing::debug!("MOTD longer than {} chars, stopping normalization", MAX_MOTD_CHARS);
            break;
        }
    }

    current
}
