//! Deterministic slugification.
//!
//! Turning a card name into a slug base is pure; resolving uniqueness
//! against existing records happens in the submission workflow, which
//! treats the persistence layer's uniqueness constraint as the authority
//! of record.

/// Derive the slug base from a card name.
///
/// Lower-cases the name, strips every character that is not a lowercase
/// letter, digit, space, or hyphen, collapses whitespace runs to single
/// hyphens, collapses hyphen runs, and trims edge hyphens. Names composed
/// entirely of stripped characters yield an empty base, which the caller
/// must reject.
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch.is_whitespace() || *ch == '-')
        .collect();

    let mut slug = String::with_capacity(kept.len());
    let mut pending_hyphen = false;
    for ch in kept.chars() {
        if ch.is_whitespace() || ch == '-' {
            pending_hyphen = !slug.is_empty();
        } else {
            if pending_hyphen {
                slug.push('-');
                pending_hyphen = false;
            }
            slug.push(ch);
        }
    }
    slug
}

/// Append the collision counter to a slug base.
pub fn numbered_candidate(base: &str, counter: u32) -> String {
    format!("{base}-{counter}")
}

#[cfg(test)]
mod tests {
    //! Coverage for the slugification rules.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Chase Sapphire Preferred", "chase-sapphire-preferred")]
    #[case("HDFC Regalia Gold!", "hdfc-regalia-gold")]
    #[case("  Amex   Platinum  ", "amex-platinum")]
    #[case("Visa--Infinite", "visa-infinite")]
    #[case("Déjà Vu Card", "dj-vu-card")]
    #[case("100% Cashback", "100-cashback")]
    #[case("---", "")]
    #[case("!!!", "")]
    fn slugify_matches_expected(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(slugify(name), expected);
    }

    #[test]
    fn numbered_candidates_append_counter() {
        assert_eq!(numbered_candidate("chase-sapphire-preferred", 2), "chase-sapphire-preferred-2");
        assert_eq!(numbered_candidate("x", 10), "x-10");
    }
}
