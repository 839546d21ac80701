//! Text similarity capabilities consumed by the comparator.
//!
//! The comparator decides *when* two titles are close enough; these traits
//! decide *how close* two strings are and whether two author lists name
//! the same people. Any algorithm can be plugged in.

use strsim::{jaro_winkler, levenshtein};

/// Scores how close two strings are
pub trait StringDistance: Send + Sync + std::fmt::Debug {
    /// Similarity in `[0, 1]`, higher is closer
    fn similarity(&self, a: &str, b: &str) -> f64;

    /// Number of single-character edits between the strings
    fn distance(&self, a: &str, b: &str) -> usize;
}

/// Decides whether two author lists describe the same authors
pub trait AuthorSimilarity: Send + Sync + std::fmt::Debug {
    fn authors_match(&self, a: &[String], b: &[String]) -> bool;
}

/// Jaro-Winkler similarity and Levenshtein distance from `strsim`
#[derive(Debug, Clone, Copy, Default)]
pub struct StrsimDistance;

impl StringDistance for StrsimDistance {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        jaro_winkler(a, b)
    }

    fn distance(&self, a: &str, b: &str) -> usize {
        levenshtein(a, b)
    }
}

/// Author list comparison on surname and first initial
///
/// Lists match when at least one author is shared. An empty list shares
/// nobody, so it never matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameListSimilarity;

impl AuthorSimilarity for NameListSimilarity {
    fn authors_match(&self, a: &[String], b: &[String]) -> bool {
        let names_a: Vec<NameKey> = a.iter().filter_map(|n| NameKey::parse(n)).collect();
        let names_b: Vec<NameKey> = b.iter().filter_map(|n| NameKey::parse(n)).collect();

        names_a
            .iter()
            .any(|x| names_b.iter().any(|y| x.loosely_matches(y)))
    }
}

/// Normalised author name: lower-case surname plus first initial
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct NameKey {
    surname: String,
    initial: Option<char>,
}

impl NameKey {
    /// Accepts "Smith, John", "Smith J", "J. Smith" and "John Smith"
    fn parse(raw: &str) -> Option<Self> {
        let cleaned: String = raw
            .chars()
            .map(|c| if c == '.' { ' ' } else { c })
            .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == ',' || *c == '-')
            .collect::<String>()
            .to_lowercase();

        if let Some((surname, given)) = cleaned.split_once(',') {
            let surname = surname.trim();
            if surname.is_empty() {
                return None;
            }
            return Some(Self {
                surname: surname.to_string(),
                initial: given.trim().chars().next(),
            });
        }

        let tokens: Vec<&str> = cleaned.split_whitespace().collect();
        match tokens.as_slice() {
            [] => None,
            [only] => Some(Self {
                surname: only.to_string(),
                initial: None,
            }),
            [first, rest @ ..] if rest.iter().all(|t| t.chars().count() <= 2) => Some(Self {
                surname: first.to_string(),
                initial: rest[0].chars().next(),
            }),
            [first, .., last] => Some(Self {
                surname: last.to_string(),
                initial: first.chars().next(),
            }),
        }
    }

    /// Same surname, and initials agree wherever both are known
    fn loosely_matches(&self, other: &NameKey) -> bool {
        self.surname == other.surname
            && match (self.initial, other.initial) {
                (Some(a), Some(b)) => a == b,
                _ => true,
            }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_strsim_distance() {
        let d = StrsimDistance;
        assert_eq!(d.distance("kitten", "sitting"), 3);
        assert!((d.similarity("same", "same") - 1.0).abs() < f64::EPSILON);
        assert!(d.similarity("machine learning basics", "machine learning basic") > 0.95);
    }

    #[test]
    fn test_name_key_forms() {
        let expected = NameKey {
            surname: "smith".to_string(),
            initial: Some('j'),
        };
        assert_eq!(NameKey::parse("Smith, John"), Some(expected.clone()));
        assert_eq!(NameKey::parse("Smith J"), Some(expected.clone()));
        assert_eq!(NameKey::parse("Smith JA"), Some(expected.clone()));
        assert_eq!(NameKey::parse("J. Smith"), Some(expected.clone()));
        assert_eq!(NameKey::parse("John Smith"), Some(expected));
        assert_eq!(NameKey::parse("  "), None);
    }

    #[test]
    fn test_authors_match_shared_author() {
        let sim = NameListSimilarity;
        assert!(sim.authors_match(
            &names(&["Smith J", "Doe A"]),
            &names(&["John Smith"])
        ));
    }

    #[test]
    fn test_authors_match_surname_only() {
        let sim = NameListSimilarity;
        assert!(sim.authors_match(&names(&["Smith"]), &names(&["Smith J"])));
        assert!(!sim.authors_match(&names(&["Smith K"]), &names(&["Smith J"])));
    }

    #[test]
    fn test_authors_no_overlap() {
        let sim = NameListSimilarity;
        assert!(!sim.authors_match(&names(&["Smith J"]), &names(&["Doe A"])));
    }

    #[test]
    fn test_authors_empty_lists_never_match() {
        let sim = NameListSimilarity;
        assert!(!sim.authors_match(&[], &[]));
        assert!(!sim.authors_match(&names(&["Smith J"]), &[]));
        assert!(!sim.authors_match(&[], &names(&["Smith J"])));
        assert!(!sim.authors_match(&names(&["..."]), &names(&["Smith J"])));
    }
}
