use crate::enhance::EnhancedRow;
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }
}

/// Stable sort by the extracted text of `spec.column`.
///
/// Numeric-looking columns compare as text, so `"100"` sorts before `"95"`.
pub fn sort_rows(rows: &mut Vec<EnhancedRow<'_>>, spec: &SortSpec) {
    let mut keyed: Vec<(String, EnhancedRow<'_>)> = rows
        .drain(..)
        .map(|row| (row.text(&spec.column), row))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| {
        if a == b {
            return Ordering::Equal;
        }
        let ord = locale_compare(a, b);
        match spec.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
    rows.extend(keyed.into_iter().map(|(_, row)| row));
}

/// Locale-style string ordering.
///
/// Approximates root collation: whitespace, then punctuation, then symbols, then digits, then
/// letters; letters compare case-insensitively first with lowercase winning ties, and raw code
/// points break any remaining tie. Common Latin diacritics fold to their base letter for the
/// first pass, so `é` sorts between `e` and `f`. Other scripts compare by code point.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let primary = a
        .chars()
        .map(primary_key)
        .cmp(b.chars().map(primary_key));
    if primary != Ordering::Equal {
        return primary;
    }
    let tertiary = a.chars().map(case_rank).cmp(b.chars().map(case_rank));
    if tertiary != Ordering::Equal {
        return tertiary;
    }
    a.cmp(b)
}

fn primary_key(ch: char) -> (u8, char) {
    let class = if ch.is_whitespace() {
        0
    } else if is_punctuation(ch) {
        1
    } else if ch.is_numeric() {
        3
    } else if ch.is_alphabetic() {
        4
    } else if ch.is_control() {
        5
    } else {
        2
    };
    (class, fold_diacritic(ch.to_lowercase().next().unwrap_or(ch)))
}

fn fold_diacritic(ch: char) -> char {
    match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' => 'i',
        'ł' | 'ĺ' | 'ļ' | 'ľ' => 'l',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => 'o',
        'ŕ' | 'ŗ' | 'ř' => 'r',
        'ś' | 'ŝ' | 'ş' | 'š' => 's',
        'ţ' | 'ť' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}

fn is_punctuation(ch: char) -> bool {
    matches!(
        ch,
        '_' | '-' | ',' | ';' | ':' | '!' | '?' | '.' | '\'' | '"' | '(' | ')' | '[' | ']' | '{'
            | '}' | '@' | '*' | '/' | '\\' | '&' | '#' | '%'
    )
}

fn case_rank(ch: char) -> u8 {
    if ch.is_uppercase() { 1 } else { 0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enhance::EnhanceFlags;
    use crate::enhance::enhance;
    use crate::row::Headers;
    use crate::row::Row;

    #[test]
    fn compares_case_insensitively_first() {
        assert_eq!(locale_compare("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_compare("a", "A"), Ordering::Less);
        assert_eq!(locale_compare("B", "a"), Ordering::Greater);
    }

    #[test]
    fn accented_letters_sort_beside_their_base() {
        assert_eq!(locale_compare("é", "f"), Ordering::Less);
        assert_eq!(locale_compare("e", "é"), Ordering::Less);
        assert_eq!(locale_compare("Zoë", "zoe"), Ordering::Greater);
        assert_eq!(locale_compare("ñandu", "nz"), Ordering::Less);
    }

    #[test]
    fn punctuation_sorts_before_digits_and_letters() {
        assert_eq!(locale_compare("stu_1", "stu1"), Ordering::Less);
        assert_eq!(locale_compare("9", "a"), Ordering::Less);
        assert_eq!(locale_compare("", "a"), Ordering::Less);
    }

    #[test]
    fn numbers_sort_as_text() {
        assert_eq!(locale_compare("100", "95"), Ordering::Less);
    }

    #[test]
    fn sort_is_stable_in_both_directions() {
        let rows = vec![
            Row::new().cell("k", "b").cell("n", "1"),
            Row::new().cell("k", "a").cell("n", "2"),
            Row::new().cell("k", "b").cell("n", "3"),
            Row::new().cell("k", "a").cell("n", "4"),
        ];
        let enhanced = enhance(&rows, &Headers::new(), EnhanceFlags::default(), None);

        let mut asc = enhanced.rows.clone();
        sort_rows(&mut asc, &SortSpec::new("k", SortDirection::Ascending));
        let order: Vec<String> = asc.iter().map(|r| r.text("n")).collect();
        assert_eq!(order, vec!["2", "4", "1", "3"]);

        let mut desc = enhanced.rows.clone();
        sort_rows(&mut desc, &SortSpec::new("k", SortDirection::Descending));
        let order: Vec<String> = desc.iter().map(|r| r.text("n")).collect();
        assert_eq!(order, vec!["1", "3", "2", "4"]);
    }
}
