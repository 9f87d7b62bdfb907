//! Typeahead suggestions for single text inputs
//!
//! Matching is a case-insensitive *literal* substring search. User text is
//! never compiled into a pattern, so `C++` or `a+b` match themselves.

use std::ops::Range;

use crate::markup::escape_html;

/// Byte range of the first case-insensitive occurrence of `needle` in `haystack`.
///
/// Returns `None` for an empty needle.
pub fn find_case_insensitive(haystack: &str, needle: &str) -> Option<Range<usize>> {
    let needle: Vec<char> = needle.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return None;
    }

    for (start, _) in haystack.char_indices() {
        let mut matched = 0;
        'scan: for (offset, c) in haystack[start..].char_indices() {
            for lower in c.to_lowercase() {
                if matched == needle.len() {
                    break;
                }
                if lower != needle[matched] {
                    break 'scan;
                }
                matched += 1;
            }
            if matched == needle.len() {
                return Some(start..start + offset + c.len_utf8());
            }
        }
    }

    None
}

/// A candidate that survived filtering, with the highlighted span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub text: String,
    pub matched: Range<usize>,
}

impl Suggestion {
    pub fn before(&self) -> &str {
        &self.text[..self.matched.start]
    }

    pub fn highlighted(&self) -> &str {
        &self.text[self.matched.clone()]
    }

    pub fn after(&self) -> &str {
        &self.text[self.matched.end..]
    }

    /// Entry markup, the first match wrapped in `<strong>`
    pub fn to_markup(&self) -> String {
        format!(
            "<div class=\"suggestion\">{}<strong>{}</strong>{}</div>",
            escape_html(self.before()),
            escape_html(self.highlighted()),
            escape_html(self.after())
        )
    }
}

/// Candidates containing `query`, in candidate order. A blank query matches nothing.
pub fn filter_candidates(candidates: &[String], query: &str) -> Vec<Suggestion> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    candidates
        .iter()
        .filter_map(|candidate| {
            find_case_insensitive(candidate, query).map(|matched| Suggestion {
                text: candidate.clone(),
                matched,
            })
        })
        .collect()
}

/// Where a click inside the suggestion container landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// A rendered entry, by position in the current list
    Entry(usize),
    /// The container itself
    Background,
}

/// Something a committed suggestion can be written into
pub trait BoundInput {
    fn set_value(&mut self, value: &str);
}

impl BoundInput for String {
    fn set_value(&mut self, value: &str) {
        self.clear();
        self.push_str(value);
    }
}

/// Suggestion dropdown bound to one input
#[derive(Debug, Clone)]
pub struct TypeaheadSuggester {
    candidates: Vec<String>,
    entries: Vec<Suggestion>,
}

impl TypeaheadSuggester {
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
            entries: Vec::new(),
        }
    }

    /// Recompute the list from the current input text, replacing prior content
    pub fn on_input(&mut self, text: &str) {
        self.entries = filter_candidates(&self.candidates, text);
    }

    /// Commit the clicked entry into `input` and clear the list.
    ///
    /// Clicks on the background or a stale index are ignored. Returns whether
    /// a commit happened.
    pub fn on_suggestion_click(&mut self, target: ClickTarget, input: &mut impl BoundInput) -> bool {
        let ClickTarget::Entry(index) = target else {
            return false;
        };
        let Some(entry) = self.entries.get(index) else {
            return false;
        };

        input.set_value(&entry.text);
        self.clear();
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[Suggestion] {
        &self.entries
    }

    /// Rendered container content, one `suggestion` div per entry
    pub fn markup(&self) -> String {
        self.entries.iter().map(Suggestion::to_markup).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn degrees() -> TypeaheadSuggester {
        TypeaheadSuggester::new(["Bachelor of Science", "Master of Arts"])
    }

    #[test]
    fn test_find_case_insensitive() {
        assert_eq!(find_case_insensitive("Bachelor of Science", "sci"), Some(12..15));
        assert_eq!(find_case_insensitive("Science", "SCIENCE"), Some(0..7));
        assert_eq!(find_case_insensitive("Arts", "x"), None);
        assert_eq!(find_case_insensitive("Arts", ""), None);
        assert_eq!(find_case_insensitive("Ärzte Übersicht", "über"), Some(7..12));
    }

    #[test]
    fn test_filter_preserves_order() {
        let candidates: Vec<String> = ["Web Developer", "Data Analyst", "Project Manager", "UI/UX Designer"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let texts: Vec<_> = filter_candidates(&candidates, "e")
            .into_iter()
            .map(|s| s.text)
            .collect();
        assert_eq!(texts, vec!["Web Developer", "Project Manager", "UI/UX Designer"]);
    }

    #[test]
    fn test_sci_matches_science_only() {
        let mut suggester = degrees();
        suggester.on_input("sci");
        assert_eq!(suggester.entries().len(), 1);
        assert_eq!(suggester.entries()[0].text, "Bachelor of Science");
        assert_eq!(suggester.entries()[0].highlighted(), "Sci");
        assert_eq!(
            suggester.markup(),
            "<div class=\"suggestion\">Bachelor of <strong>Sci</strong>ence</div>"
        );
    }

    #[test]
    fn test_empty_input_clears() {
        let mut suggester = degrees();
        suggester.on_input("of");
        assert_eq!(suggester.entries().len(), 2);
        suggester.on_input("   ");
        assert!(suggester.is_empty());
        assert_eq!(suggester.markup(), "");
    }

    #[test]
    fn test_no_match_renders_empty_list() {
        let mut suggester = degrees();
        suggester.on_input("zzz");
        assert!(suggester.is_empty());
        assert_eq!(suggester.markup(), "");
    }

    #[test]
    fn test_on_input_is_idempotent() {
        let mut suggester = degrees();
        suggester.on_input("a");
        let first = suggester.markup();
        suggester.on_input("a");
        assert_eq!(suggester.markup(), first);
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let mut suggester = TypeaheadSuggester::new(["C++", "C#", "a+b", "aab", "(x)"]);
        suggester.on_input("a+b");
        let texts: Vec<_> = suggester.entries().iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["a+b"]);

        suggester.on_input("c+");
        let texts: Vec<_> = suggester.entries().iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["C++"]);

        suggester.on_input("(");
        assert_eq!(suggester.entries()[0].text, "(x)");
    }

    #[test]
    fn test_highlight_escapes_markup() {
        let mut suggester = TypeaheadSuggester::new(["R&D <Lab>"]);
        suggester.on_input("d <");
        assert_eq!(
            suggester.markup(),
            "<div class=\"suggestion\">R&amp;<strong>D &lt;</strong>Lab&gt;</div>"
        );
    }

    #[test]
    fn test_click_commits_and_clears() {
        let mut suggester = TypeaheadSuggester::new(["Harvard University", "Stanford University"]);
        let mut input = String::from("harv");
        suggester.on_input(&input);

        assert!(suggester.on_suggestion_click(ClickTarget::Entry(0), &mut input));
        assert_eq!(input, "Harvard University");
        assert!(suggester.is_empty());
        assert_eq!(suggester.markup(), "");
    }

    #[test]
    fn test_background_click_is_ignored() {
        let mut suggester = degrees();
        let mut input = String::from("arts");
        suggester.on_input(&input);

        assert!(!suggester.on_suggestion_click(ClickTarget::Background, &mut input));
        assert!(!suggester.on_suggestion_click(ClickTarget::Entry(5), &mut input));
        assert_eq!(input, "arts");
        assert_eq!(suggester.entries().len(), 1);
    }
}
