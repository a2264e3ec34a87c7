//! String normalisation utilities.

/// Converts an empty or whitespace-only string to `None`, otherwise returns
/// the trimmed value.
///
/// Sheet records frequently store "no choice" as an empty string.
///
/// # Examples
///
/// ```
/// use sheetwright_domain::common::none_if_blank;
///
/// assert_eq!(none_if_blank(" Voie du Berserker "), Some("Voie du Berserker"));
/// assert_eq!(none_if_blank(""), None);
/// assert_eq!(none_if_blank("   "), None);
/// ```
pub fn none_if_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Folds a lookup key: trims, lowercases and strips the French diacritics
/// that appear in class and ability names.
///
/// # Examples
///
/// ```
/// use sheetwright_domain::common::fold_key;
///
/// assert_eq!(fold_key(" Rôdeur "), "rodeur");
/// assert_eq!(fold_key("DEXTÉRITÉ"), "dexterite");
/// ```
pub fn fold_key(value: &str) -> String {
    value
        .trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'à' | 'â' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'î' | 'ï' => 'i',
            'ô' | 'ö' => 'o',
            'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

/// Parses an integer out of a loosely formatted string such as `"+3"`,
/// `" -1 "` or `"3 (mod)"`, keeping only ASCII digits and a leading sign.
///
/// Returns `None` when no digit is present.
pub fn parse_lenient_int(value: &str) -> Option<i32> {
    let trimmed = value.trim();
    let negative = trimmed.starts_with('-');
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    let magnitude: i32 = digits.parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_key_strips_accents_and_case() {
        assert_eq!(fold_key("Rôdeur"), "rodeur");
        assert_eq!(fold_key("Ensorceleur"), "ensorceleur");
        assert_eq!(fold_key("  Charisme "), "charisme");
    }

    #[test]
    fn lenient_int_handles_signs_and_noise() {
        assert_eq!(parse_lenient_int("+3"), Some(3));
        assert_eq!(parse_lenient_int("-2"), Some(-2));
        assert_eq!(parse_lenient_int(" 4 (bonus)"), Some(4));
        assert_eq!(parse_lenient_int("n/a"), None);
        assert_eq!(parse_lenient_int(""), None);
    }

    #[test]
    fn blank_strings_become_none() {
        assert_eq!(none_if_blank("\t"), None);
        assert_eq!(none_if_blank("Domaine de la Vie"), Some("Domaine de la Vie"));
    }
}
