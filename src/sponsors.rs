use crate::types::{Sponsor, SponsorSequence};

/// Sponsor names reduced from a matter's raw sponsor list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SponsorNames {
    /// Empty when no entry qualifies as primary
    pub primary: String,
    pub secondary: Vec<String>,
}

/// Resolve the primary sponsor and the secondary sponsors.
///
/// An explicit `MatterSponsorPrimary: true` anywhere in the list takes
/// precedence over sequence number 1; only when no entry is flagged does a
/// sequence-1 entry become primary. Sequence-1 entries that lose to a flagged
/// entry are neither primary nor secondary. Entries with a sequence above 1
/// and no flag are secondary. When several entries qualify as primary the
/// last one wins. Entries without a name are ignored.
pub fn extract_sponsors(sponsors: &[Sponsor]) -> SponsorNames {
    let named: Vec<(&str, &Sponsor)> = sponsors
        .iter()
        .filter_map(|s| {
            s.name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(|name| (name, s))
        })
        .collect();

    let any_flagged = named.iter().any(|(_, s)| s.primary);
    let mut names = SponsorNames::default();

    for (name, sponsor) in named {
        let sequence = sponsor.sequence.as_ref().and_then(SponsorSequence::as_number);

        let is_primary = if any_flagged {
            sponsor.primary
        } else {
            sequence == Some(1)
        };

        if is_primary {
            names.primary = name.to_string();
        } else if !sponsor.primary && sequence.is_some_and(|n| n > 1) {
            names.secondary.push(name.to_string());
        }
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sponsor(name: &str, seq: Option<i64>, primary: bool) -> Sponsor {
        Sponsor {
            name: Some(name.to_string()),
            sequence: seq.map(SponsorSequence::Number),
            primary,
        }
    }

    #[test]
    fn explicit_flag_overrides_sequence_one() {
        let sponsors = vec![
            sponsor("A", Some(1), false),
            sponsor("B", Some(2), false),
            sponsor("C", Some(3), true),
        ];
        let names = extract_sponsors(&sponsors);
        assert_eq!(names.primary, "C");
        assert_eq!(names.secondary, vec!["B".to_string()]);
    }

    #[test]
    fn explicit_flag_wins_regardless_of_order() {
        let sponsors = vec![
            sponsor("C", Some(3), true),
            sponsor("A", Some(1), false),
            sponsor("B", Some(2), false),
        ];
        let names = extract_sponsors(&sponsors);
        assert_eq!(names.primary, "C");
        assert_eq!(names.secondary, vec!["B".to_string()]);
    }

    #[test]
    fn sequence_one_is_primary_without_flags() {
        let sponsors = vec![
            sponsor("B", Some(2), false),
            sponsor("A", Some(1), false),
            sponsor("D", Some(4), false),
        ];
        let names = extract_sponsors(&sponsors);
        assert_eq!(names.primary, "A");
        assert_eq!(names.secondary, vec!["B".to_string(), "D".to_string()]);
    }

    #[test]
    fn last_flagged_primary_wins() {
        let sponsors = vec![sponsor("A", None, true), sponsor("B", None, true)];
        assert_eq!(extract_sponsors(&sponsors).primary, "B");
    }

    #[test]
    fn string_sequences_are_honoured() {
        let sponsors = vec![
            Sponsor {
                name: Some("A".into()),
                sequence: Some(SponsorSequence::Text("1".into())),
                primary: false,
            },
            Sponsor {
                name: Some("B".into()),
                sequence: Some(SponsorSequence::Text("2".into())),
                primary: false,
            },
        ];
        let names = extract_sponsors(&sponsors);
        assert_eq!(names.primary, "A");
        assert_eq!(names.secondary, vec!["B".to_string()]);
    }

    #[test]
    fn nameless_and_unsequenced_entries_are_ignored() {
        let sponsors = vec![
            Sponsor {
                name: None,
                sequence: Some(SponsorSequence::Number(1)),
                primary: true,
            },
            sponsor("  ", Some(1), false),
            sponsor("E", None, false),
            sponsor("F", Some(0), false),
        ];
        assert_eq!(extract_sponsors(&sponsors), SponsorNames::default());
    }
}
