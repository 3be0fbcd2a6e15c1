use std::collections::HashSet;

use super::{EntityLabel, TextSpan};

/// Labels offered as statement subjects when the caller does not choose.
pub const SUBJECT_LABELS: [EntityLabel; 2] = [EntityLabel::Org, EntityLabel::Person];

/// Distinct surface texts of the spans whose label is in `allowed`.
///
/// Texts are compared exactly; `Unknown` spans are never selected.
pub fn select_candidates<'a, I>(spans: I, allowed: &HashSet<EntityLabel>) -> HashSet<String>
where
    I: IntoIterator<Item = &'a TextSpan>,
{
    spans
        .into_iter()
        .filter(|span| span.label.is_known() && allowed.contains(&span.label))
        .map(|span| span.text.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(label: EntityLabel, text: &str) -> TextSpan {
        TextSpan {
            label,
            text: text.to_string(),
            start: 0,
            end: text.chars().count(),
        }
    }

    fn subjects() -> HashSet<EntityLabel> {
        SUBJECT_LABELS.into_iter().collect()
    }

    #[test]
    fn test_duplicates_collapse() {
        let spans = vec![
            span(EntityLabel::Org, "Acme Corp"),
            span(EntityLabel::Gpe, "Austin"),
            span(EntityLabel::Org, "Acme Corp"),
        ];
        let selected = select_candidates(&spans, &subjects());
        assert_eq!(selected, HashSet::from(["Acme Corp".to_string()]));
    }

    #[test]
    fn test_nothing_allowed() {
        let spans = vec![span(EntityLabel::Org, "Acme Corp")];
        assert!(select_candidates(&spans, &HashSet::new()).is_empty());
        assert!(select_candidates(&Vec::<TextSpan>::new(), &subjects()).is_empty());
    }

    #[test]
    fn test_unknown_never_selected() {
        let spans = vec![span(EntityLabel::Unknown, "Thing")];
        let allowed = HashSet::from([EntityLabel::Unknown]);
        assert!(select_candidates(&spans, &allowed).is_empty());
    }

    #[test]
    fn test_case_sensitive_and_idempotent() {
        let spans = vec![
            span(EntityLabel::Person, "Jane Doe"),
            span(EntityLabel::Person, "jane doe"),
        ];
        let once = select_candidates(&spans, &subjects());
        assert_eq!(once.len(), 2);

        let again: Vec<TextSpan> = once
            .iter()
            .map(|text| span(EntityLabel::Person, text))
            .collect();
        assert_eq!(select_candidates(&again, &subjects()), once);
    }
}
