//! # Identity Normalizer
//!
//! Derives directory-safe usernames from display names and generates
//! temporary passwords for newly created accounts.
//!
//! ## Usernames
//!
//! [`slugify`] joins first and last name with a dot, lowercases, transliterates
//! diacritics to ASCII, maps everything outside `[a-z0-9]` to `_`, collapses
//! and trims underscores, pads short results with random characters and caps
//! the length at [`USERNAME_MAX_LEN`]. It is total: every input, the empty
//! string included, yields a username matching `[a-z0-9_]{3,22}`.
//!
//! Transliteration is table-driven ([`transliterate_char`]) for Vietnamese
//! vowels and Central/Eastern European letters, including letters with no
//! Unicode decomposition (`đ`, `ł`, `ø`, `ß`). Anything the table misses is
//! decomposed (NFD) and stripped of combining marks.
//!
//! ## Randomness
//!
//! Every call seeds its own generator from the operating system, so output is
//! never predictable from call order.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Minimum username length.
pub const USERNAME_MIN_LEN: usize = 3;

/// Maximum username length accepted by the chat platform.
pub const USERNAME_MAX_LEN: usize = 22;

/// Shortest password [`generate_password`] will produce.
pub const PASSWORD_MIN_LEN: usize = 8;

const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()-_=+[]{}|;:,.<>?";
const TOKEN_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// ASCII replacement for a lowercase accented letter, if the table knows it.
pub fn transliterate_char(c: char) -> Option<&'static str> {
    let ascii = match c {
        // Vietnamese vowels
        'à' | 'á' | 'ạ' | 'ả' | 'ã' | 'â' | 'ầ' | 'ấ' | 'ậ' | 'ẩ' | 'ẫ' | 'ă' | 'ằ' | 'ắ' | 'ặ'
        | 'ẳ' | 'ẵ' => "a",
        'è' | 'é' | 'ẹ' | 'ẻ' | 'ẽ' | 'ê' | 'ề' | 'ế' | 'ệ' | 'ể' | 'ễ' => "e",
        'ì' | 'í' | 'ị' | 'ỉ' | 'ĩ' => "i",
        'ò' | 'ó' | 'ọ' | 'ỏ' | 'õ' | 'ô' | 'ồ' | 'ố' | 'ộ' | 'ổ' | 'ỗ' | 'ơ' | 'ờ' | 'ớ' | 'ợ'
        | 'ở' | 'ỡ' => "o",
        'ù' | 'ú' | 'ụ' | 'ủ' | 'ũ' | 'ư' | 'ừ' | 'ứ' | 'ự' | 'ử' | 'ữ' => "u",
        'ỳ' | 'ý' | 'ỵ' | 'ỷ' | 'ỹ' => "y",
        'đ' => "d",

        // Western European
        'ç' => "c",
        'ñ' => "n",
        'ü' | 'û' => "u",
        'ö' => "o",
        'ä' | 'å' => "a",
        'ë' | 'ï' => "e",
        'ÿ' => "y",
        'ß' => "ss",
        'ø' => "o",
        'æ' => "ae",
        'œ' => "oe",

        // Turkish, Romanian
        'ğ' => "g",
        'ş' | 'ș' => "s",
        'ı' => "i",
        'ţ' | 'ț' => "t",

        // Czech, Slovak, Polish, Hungarian, Slovene, Croatian
        'ř' => "r",
        'č' | 'ć' => "c",
        'ě' | 'ę' => "e",
        'š' | 'ś' => "s",
        'ň' | 'ń' => "n",
        'ď' => "d",
        'ť' => "t",
        'ĺ' | 'ľ' | 'ł' => "l",
        'ź' | 'ż' | 'ž' => "z",
        'ą' => "a",
        'ő' => "o",
        'ű' | 'ů' => "u",

        // Baltic
        'ā' => "a",
        'ē' => "e",
        'ī' => "i",
        'ū' => "u",
        'ģ' => "g",
        'ķ' => "k",
        'ļ' => "l",
        'ņ' => "n",
        'ŗ' => "r",
        _ => return None,
    };
    Some(ascii)
}

/// Map a lowercase string to ASCII letters where possible.
///
/// Input is composed (NFC) first so decomposed input hits the table. Leftover
/// non-ASCII characters are decomposed and their combining marks dropped;
/// characters that still are not ASCII pass through unchanged for the caller
/// to replace.
pub fn remove_accents(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.nfc() {
        if c.is_ascii() {
            out.push(c);
        } else if let Some(ascii) = transliterate_char(c) {
            out.push_str(ascii);
        } else {
            out.extend(c.to_string().nfd().filter(|m| !is_combining_mark(*m)));
        }
    }
    out
}

/// Derive a username from a person's names. Pure apart from random padding
/// and total over all inputs.
pub fn slugify(first: &str, last: &str) -> String {
    let mut full = first.trim().to_string();
    if !last.trim().is_empty() {
        full.push('.');
        full.push_str(last.trim());
    }

    let lowered = full.to_lowercase();
    let ascii = remove_accents(&lowered);
    let mut username = collapse_underscores(&ascii);

    if username.is_empty() {
        username = format!("user_{}", random_token(6));
    }

    truncate_username(&mut username, USERNAME_MAX_LEN);

    while username.len() < USERNAME_MIN_LEN {
        username.push('_');
        username.push_str(&random_token(3));
    }

    username
}

/// Append `_suffix` to `base`, shortening `base` so the result still fits the
/// username length limit.
pub fn username_with_suffix(base: &str, suffix: &str) -> String {
    let suffix = collapse_underscores(&suffix.to_ascii_lowercase());
    if suffix.is_empty() {
        return base.to_string();
    }
    let room = USERNAME_MAX_LEN.saturating_sub(suffix.len() + 1);
    let mut head = base.to_string();
    truncate_username(&mut head, room);
    if head.is_empty() {
        let mut joined = suffix;
        truncate_username(&mut joined, USERNAME_MAX_LEN);
        return joined;
    }
    format!("{head}_{suffix}")
}

/// A random lowercase alphanumeric token of `len` characters.
pub fn random_token(len: usize) -> String {
    let mut rng = StdRng::from_entropy();
    (0..len)
        .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}

/// Generate a temporary password.
///
/// Lengths below [`PASSWORD_MIN_LEN`] are raised to it. The result holds at
/// least one lowercase letter, uppercase letter, digit and symbol; remaining
/// positions draw uniformly from the union of the four classes, and the whole
/// is shuffled.
pub fn generate_password(length: usize) -> String {
    let length = length.max(PASSWORD_MIN_LEN);
    let mut rng = StdRng::from_entropy();

    let mut chars: Vec<u8> = [LOWER, UPPER, DIGITS, SYMBOLS]
        .iter()
        .map(|class| class[rng.gen_range(0..class.len())])
        .collect();

    let union: Vec<u8> = [LOWER, UPPER, DIGITS, SYMBOLS].concat();
    while chars.len() < length {
        chars.push(union[rng.gen_range(0..union.len())]);
    }

    chars.shuffle(&mut rng);
    chars.into_iter().map(char::from).collect()
}

fn collapse_underscores(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_was_sep = true;
    for c in s.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
            last_was_sep = false;
        } else if !last_was_sep {
            out.push('_');
            last_was_sep = true;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

fn truncate_username(s: &mut String, max: usize) {
    // Usernames are ASCII by this point, so byte truncation is char-safe.
    if s.len() > max {
        s.truncate(max);
    }
    while s.ends_with('_') {
        s.pop();
    }
}
