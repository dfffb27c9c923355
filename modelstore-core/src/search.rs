//! Naive substring search index.
//!
//! [`searchify`] expands a model's search terms into every lower-cased
//! substring worth matching, so that a plain equality or `array-contains`
//! predicate against the stored index behaves like an infix search. A term of
//! `n` characters yields O(n²) entries; keep search terms short (names, tags,
//! codes), never free text.

/// Expands `terms` into a lower-cased substring index.
///
/// For every non-empty term the whole lower-cased term is emitted first,
/// followed by all contiguous substrings of at least two characters and
/// shorter than the term, grouped by length. Characters are Unicode scalar
/// values, not bytes. Duplicates are kept.
///
/// # Example
///
/// ```
/// use modelstore_core::search::searchify;
///
/// assert_eq!(searchify(&["Ab"]), vec!["ab"]);
/// assert_eq!(searchify(&["Abcd"]), vec!["abcd", "ab", "bc", "cd", "abc", "bcd"]);
/// ```
pub fn searchify<S: AsRef<str>>(terms: &[S]) -> Vec<String> {
    let mut index = Vec::new();

    for term in terms {
        let term = term.as_ref();
        if term.is_empty() {
            continue;
        }

        let lowered = term.to_lowercase();
        let chars = lowered.chars().collect::<Vec<_>>();
        index.push(lowered);

        for length in 2..chars.len() {
            for start in 0..=(chars.len() - length) {
                index.push(chars[start..start + length].iter().collect());
            }
        }
    }

    index
}

/// Field types that can contribute to a model's search terms.
///
/// Used by `#[derive(Model)]` for fields marked `#[model(search)]`.
pub trait SearchTerms {
    /// Appends this value's terms to `terms`.
    fn push_terms(&self, terms: &mut Vec<String>);
}

impl SearchTerms for String {
    fn push_terms(&self, terms: &mut Vec<String>) {
        terms.push(self.clone());
    }
}

impl SearchTerms for &str {
    fn push_terms(&self, terms: &mut Vec<String>) {
        terms.push(self.to_string());
    }
}

impl<T: SearchTerms> SearchTerms for Option<T> {
    fn push_terms(&self, terms: &mut Vec<String>) {
        if let Some(value) = self {
            value.push_terms(terms);
        }
    }
}

impl<T: SearchTerms> SearchTerms for Vec<T> {
    fn push_terms(&self, terms: &mut Vec<String>) {
        for value in self {
            value.push_terms(terms);
        }
    }
}
