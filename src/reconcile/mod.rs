use crate::models::Candidate;

/// What the pipeline should do with one field's candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciled {
    /// No candidate at all.
    Empty,
    /// Exactly one distinct value: use it without asking.
    Single(Candidate),
    /// Several distinct values: the user has to pick. The first entry is
    /// the default selection.
    Choose(Vec<Candidate>),
}

/// Drop repeated values (keeping the first occurrence and its label) and
/// decide whether disambiguation is needed.
///
/// Candidates must already be normalized or composed; equality here is
/// plain string equality.
pub fn reconcile(candidates: Vec<Candidate>) -> Reconciled {
    let mut unique: Vec<Candidate> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !unique.iter().any(|seen| seen.value == candidate.value) {
            unique.push(candidate);
        }
    }

    match unique.len() {
        0 => Reconciled::Empty,
        1 => Reconciled::Single(unique.remove(0)),
        _ => Reconciled::Choose(unique),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_empty() {
        assert_eq!(reconcile(vec![]), Reconciled::Empty);
    }

    #[test]
    fn duplicates_collapse_to_single() {
        let result = reconcile(vec![
            Candidate::new("https://a.com/p", "current URL"),
            Candidate::new("https://a.com/p", "canonical link"),
            Candidate::new("https://a.com/p", "og:url"),
        ]);
        assert_eq!(
            result,
            Reconciled::Single(Candidate::new("https://a.com/p", "current URL"))
        );
    }

    #[test]
    fn distinct_values_keep_first_seen_order() {
        let result = reconcile(vec![
            Candidate::new("A", "document title"),
            Candidate::new("B", "og:title"),
            Candidate::new("A", "other"),
        ]);
        assert_eq!(
            result,
            Reconciled::Choose(vec![
                Candidate::new("A", "document title"),
                Candidate::new("B", "og:title"),
            ])
        );
    }
}
