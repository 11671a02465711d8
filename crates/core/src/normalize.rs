//! Case/diacritic-insensitive key normalization and the currency parser.
//!
//! Everything here degrades to a safe default on dirty input — empty string
//! or `0.0` — and never panics. Real-world exports mix casings, accents,
//! thousands separators, currency symbols, and stray whitespace freely.

/// Lowercase, fold diacritics, trim. Two identity values denote the same
/// entity iff their normalized forms are equal.
pub fn normalize_key(text: &str) -> String {
    text.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(fold_diacritic)
        .collect()
}

/// Header form: [`normalize_key`] with every non-alphanumeric dropped, so
/// "FECHA EXPEDICIÓN", "Fecha_Expedicion" and "fecha expedicion" all
/// collapse to "fechaexpedicion".
pub fn normalize_header(text: &str) -> String {
    normalize_key(text)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Natural key for matching imported rows to stored records:
/// normalized insurer + policy number joined with `_`, separator runs
/// collapsed. Empty when either identity field is missing.
pub fn natural_key(insurer: &str, policy: &str) -> String {
    let a = key_part(insurer);
    let p = key_part(policy);
    if a.is_empty() || p.is_empty() {
        return String::new();
    }
    format!("{a}_{p}")
}

fn key_part(text: &str) -> String {
    let mut out = String::new();
    let mut pending_sep = false;
    for c in normalize_key(text).chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(c);
        } else {
            pending_sep = true;
        }
    }
    out
}

fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        _ => c,
    }
}

/// Parse heterogeneous currency text into a signed number.
///
/// Handles `$ 1.234.567`, `1,234,567`, `1.234,56`, `(1.234)`, Unicode minus
/// variants, and non-breaking spaces. Separator disambiguation:
/// - both `.` and `,` present: `.` is thousands, `,` is decimal;
/// - one separator, multiple occurrences: all thousands;
/// - one separator, single occurrence: decimal point, unless followed by
///   exactly three digits (a lone thousands group, the common case in
///   COP amounts).
///
/// Returns `0.0` for anything unparseable.
pub fn parse_money(value: &str) -> f64 {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let paren_negative = trimmed.starts_with('(') && trimmed.ends_with(')');

    // Fold dash variants, drop NBSP, then keep only digits, separators and
    // the sign. Currency symbols and letters fall away here.
    let mut s = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        match c {
            '\u{2010}'..='\u{2015}' | '\u{2212}' => s.push('-'),
            '\u{00A0}' | '\u{202F}' => {}
            c if c.is_ascii_digit() || c == '.' || c == ',' || c == '-' => s.push(c),
            _ => {}
        }
    }

    let had_minus = s.contains('-');
    s.retain(|c| c != '-');

    let digits = resolve_separators(&s);
    let magnitude = digits.parse::<f64>().unwrap_or(0.0).abs();

    if had_minus || paren_negative {
        -magnitude
    } else {
        magnitude
    }
}

fn resolve_separators(s: &str) -> String {
    let dots = s.matches('.').count();
    let commas = s.matches(',').count();

    if dots > 0 && commas > 0 {
        // European layout: 1.234.567,89
        return s.chars().filter(|&c| c != '.').map(decimal_comma).collect();
    }

    let (sep, count) = if commas > 0 { (',', commas) } else { ('.', dots) };
    if count == 0 {
        return s.to_string();
    }
    if count > 1 {
        // A number has at most one decimal point; repeats are grouping.
        return s.chars().filter(|&c| c != sep).collect();
    }

    // Single occurrence: a three-digit tail reads as a thousands group.
    let pos = s.find(sep).unwrap_or(0);
    let tail = &s[pos + 1..];
    if tail.len() == 3 && tail.chars().all(|c| c.is_ascii_digit()) {
        s.chars().filter(|&c| c != sep).collect()
    } else {
        s.chars().map(decimal_comma).collect()
    }
}

fn decimal_comma(c: char) -> char {
    if c == ',' {
        '.'
    } else {
        c
    }
}
