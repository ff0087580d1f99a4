//! The normalization boundary.
//!
//! Canonicalizes raw strings into a form safe for pattern matching, so that
//! encoding and Unicode obfuscation cannot bypass the guards. The pipeline is
//! total (malformed input degrades to best-effort, never fails) and
//! idempotent for the intended attack classes.
//!
//! Stage order is strict - each stage assumes earlier ones already removed
//! adversarial cover:
//!
//! 1. Recursive decode (percent, `\xHH`, `\uHHHH`, null bytes) to a bounded
//!    fixed point
//! 2. Invisible-character stripping (zero-width, bidi controls, variation
//!    selectors, Unicode tag block)
//! 3. NFKC compatibility folding plus an explicit homoglyph table
//! 4. Whitespace canonicalization
//! 5. Obfuscation-quote stripping (`r'm'` → `rm`)
//! 6. Path-aware backslash handling (decided from the *pre-decode* shape)
//! 7. Noise-symbol stripping (emoji, dingbats)

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Decode-iteration cap. Bounds nested encodings so a decode loop cannot
/// become a denial-of-service vector.
pub const DEFAULT_DECODE_ROUNDS: usize = 5;

static HEX_ESCAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\x([0-9a-fA-F]{2})").expect("hex escape pattern"));

static UNICODE_ESCAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\u([0-9a-fA-F]{4})").expect("unicode escape pattern"));

static WINDOWS_DRIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]:\\").expect("windows drive pattern"));

static UNC_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\\\\[^\\]").expect("UNC path pattern"));

static BACKSLASH_TRAVERSAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.\.\\").expect("backslash traversal pattern"));

/// Normalize a raw string with the default decode bound.
pub fn normalize(raw: &str) -> String {
    normalize_bounded(raw, DEFAULT_DECODE_ROUNDS)
}

/// Normalize a raw string, decoding nested encodings at most
/// `max_decode_rounds` times.
pub fn normalize_bounded(raw: &str, max_decode_rounds: usize) -> String {
    // Path shape must be decided before decoding strips the evidence.
    // Backslash traversal counts as a path shape so `..\` keeps its
    // separator semantics instead of collapsing to `..`.
    let path_shape = WINDOWS_DRIVE.is_match(raw)
        || UNC_PATH.is_match(raw)
        || BACKSLASH_TRAVERSAL.is_match(raw);

    let mut out = recursive_decode(raw, max_decode_rounds);
    out = strip_invisible(&out);
    out = fold_unicode(&out);
    out = canonicalize_whitespace(&out);
    out = strip_obfuscating_quotes(&out);
    out = handle_backslashes(&out, path_shape);
    strip_noise_symbols(&out)
}

/// Repeatedly apply percent, hex-escape, and unicode-escape decoding plus
/// null-byte stripping until a fixed point or the iteration cap.
fn recursive_decode(raw: &str, max_rounds: usize) -> String {
    let mut current = raw.to_string();

    for _ in 0..max_rounds {
        let mut decoded = match urlencoding::decode(&current) {
            Ok(cow) => cow.into_owned(),
            // Invalid UTF-8 after percent-decoding: retain the undecoded form.
            Err(_) => current.clone(),
        };

        decoded = HEX_ESCAPE
            .replace_all(&decoded, |caps: &regex::Captures<'_>| {
                match u32::from_str_radix(&caps[1], 16).ok().and_then(char::from_u32) {
                    Some(c) => c.to_string(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned();

        decoded = UNICODE_ESCAPE
            .replace_all(&decoded, |caps: &regex::Captures<'_>| {
                match u32::from_str_radix(&caps[1], 16).ok().and_then(char::from_u32) {
                    Some(c) => c.to_string(),
                    // Lone surrogates have no char form; keep the escape text.
                    None => caps[0].to_string(),
                }
            })
            .into_owned();

        decoded.retain(|c| c != '\0');

        if decoded == current {
            break;
        }
        current = decoded;
    }

    current
}

/// Formatting characters that can visually hide or split a token without
/// appearing in a naive string search.
fn is_invisible(c: char) -> bool {
    matches!(
        c,
        '\u{00AD}'                  // soft hyphen
        | '\u{034F}'                // combining grapheme joiner
        | '\u{061C}'                // Arabic letter mark
        | '\u{115F}' | '\u{1160}'   // Hangul fillers
        | '\u{17B4}' | '\u{17B5}'   // Khmer inherent vowels
        | '\u{180B}'..='\u{180F}'   // Mongolian selectors + vowel separator
        | '\u{200B}'..='\u{200F}'   // zero-width spaces, joiners, marks
        | '\u{202A}'..='\u{202E}'   // bidi embedding controls
        | '\u{2060}'..='\u{206F}'   // word joiner, invisible operators
        | '\u{3164}' | '\u{FFA0}'   // Hangul filler forms
        | '\u{FE00}'..='\u{FE0F}'   // variation selectors
        | '\u{FEFF}'                // zero-width no-break space
        | '\u{FFF0}'..='\u{FFF8}'   // specials
        | '\u{E0000}'..='\u{E007F}' // tag characters (covert channels)
    )
}

fn strip_invisible(s: &str) -> String {
    s.chars().filter(|&c| !is_invisible(c)).collect()
}

/// Look-alikes that NFKC does not fold to ASCII.
fn fold_homoglyph(c: char) -> char {
    match c {
        // Cyrillic
        'а' => 'a',
        'е' => 'e',
        'о' => 'o',
        'р' => 'p',
        'с' => 'c',
        'х' => 'x',
        'у' => 'y',
        'г' => 'r',
        'м' => 'm',
        'А' => 'A',
        'В' => 'B',
        'Е' => 'E',
        'К' => 'K',
        'М' => 'M',
        'Н' => 'H',
        'О' => 'O',
        'Р' => 'P',
        'С' => 'C',
        'Т' => 'T',
        'Х' => 'X',
        // Greek
        'α' => 'a',
        'ο' => 'o',
        'ρ' => 'p',
        'Α' => 'A',
        'Β' => 'B',
        'Ε' => 'E',
        'Η' => 'H',
        'Ι' => 'I',
        'Κ' => 'K',
        'Μ' => 'M',
        'Ν' => 'N',
        'Ο' => 'O',
        'Ρ' => 'P',
        'Τ' => 'T',
        'Υ' => 'Y',
        'Χ' => 'X',
        other => other,
    }
}

/// NFKC compatibility folding (collapses fullwidth and compatibility
/// variants to ASCII), then the explicit homoglyph table.
fn fold_unicode(s: &str) -> String {
    s.nfkc().map(fold_homoglyph).collect()
}

fn canonicalize_whitespace(s: &str) -> String {
    s.chars()
        .filter(|&c| c != '\r')
        .map(|c| match c {
            '\t' | '\n' | '\u{0B}' | '\u{0C}' => ' ',
            other => other,
        })
        .collect()
}

/// Remove quote characters used to split a dangerous token across
/// literal-concatenation boundaries.
fn strip_obfuscating_quotes(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            !matches!(
                c,
                '\'' | '"' | '\u{2018}' | '\u{2019}' | '\u{201C}' | '\u{201D}'
            )
        })
        .collect()
}

/// Windows/UNC path shapes keep their separator semantics (backslash →
/// forward slash); anything else treats backslashes as escape noise.
fn handle_backslashes(s: &str, path_shape: bool) -> String {
    if path_shape {
        s.replace('\\', "/")
    } else {
        s.chars().filter(|&c| c != '\\').collect()
    }
}

/// Emoji and pictographic ranges can act as covert token separators;
/// replace them with plain spaces.
fn strip_noise_symbols(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{1F300}'..='\u{1FAFF}' | '\u{2600}'..='\u{26FF}' | '\u{2700}'..='\u{27BF}' => ' ',
            other => other,
        })
        .collect()
}
