//! Numerus (plural) form selection for `numerus="yes"` messages.
//!
//! Linguist stores one `<numerusform>` per form of the target language's rule,
//! in the order the rule defines. This is a curated subset of the rules Qt
//! ships, keyed by base language subtag.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NumerusRule {
    /// One form for every count.
    Single,
    /// `n == 1`, other.
    OneOther,
    /// `n <= 1`, other.
    FrenchLike,
    /// Russian group: `..1` (not `..11`), `..2-4` (not `..12-14`), other.
    Slavic,
    /// `n == 1`, `..2-4` (not `..12-14`), other.
    Polish,
    /// `n == 1`, `2-4`, other.
    Czech,
    /// `..01`, `..02`, `..03-04`, other.
    Slovenian,
    /// `..1` (not `..11`), `..2-9` (not `..12-19`), other.
    Lithuanian,
    /// `..1` (not `..11`), `n != 0`, zero.
    Latvian,
    /// `n == 1`, `0` or `..01-19`, other.
    Romanian,
    /// `1`, `2`, other.
    Irish,
    /// `0`, `1`, `2`, `..03-10`, `..11-99`, other.
    Arabic,
}

lazy_static! {
    static ref RULE_TABLE: BTreeMap<&'static str, NumerusRule> = {
        use NumerusRule::*;
        let mut m = BTreeMap::new();

        for code in [
            "ja", "zh", "ko", "th", "vi", "km", "lo", "my", "yue", "id", "ms", "tr", "fa",
        ] {
            m.insert(code, Single);
        }

        for code in [
            "en", "de", "nl", "sv", "da", "nb", "nn", "no", "is", "fi", "et", "hi", "bn", "it",
            "es", "pt", "el", "eu", "gl", "af", "sw", "ur", "he", "hu", "bg", "ca", "eo",
        ] {
            m.insert(code, OneOther);
        }

        m.insert("fr", FrenchLike);
        for code in ["ru", "uk", "be", "sr", "hr", "bs", "sh"] {
            m.insert(code, Slavic);
        }
        m.insert("pl", Polish);
        for code in ["cs", "sk"] {
            m.insert(code, Czech);
        }
        m.insert("sl", Slovenian);
        m.insert("lt", Lithuanian);
        m.insert("lv", Latvian);
        m.insert("ro", Romanian);
        m.insert("ga", Irish);
        m.insert("ar", Arabic);

        m
    };
}

/// Rule for a language code such as `ja_JP`, `pt-BR` or `ru`.
///
/// Unknown languages get [`NumerusRule::OneOther`].
pub fn rule_for_language(lang: &str) -> NumerusRule {
    let normalized = lang.trim().replace('_', "-").to_ascii_lowercase();
    if normalized == "pt-br" {
        return NumerusRule::FrenchLike;
    }
    let base = normalized.split('-').next().unwrap_or_default();
    RULE_TABLE
        .get(base)
        .copied()
        .unwrap_or(NumerusRule::OneOther)
}

impl NumerusRule {
    /// Number of `<numerusform>` entries a complete translation carries.
    pub fn form_count(&self) -> usize {
        match self {
            NumerusRule::Single => 1,
            NumerusRule::OneOther | NumerusRule::FrenchLike => 2,
            NumerusRule::Slavic
            | NumerusRule::Polish
            | NumerusRule::Czech
            | NumerusRule::Lithuanian
            | NumerusRule::Latvian
            | NumerusRule::Romanian
            | NumerusRule::Irish => 3,
            NumerusRule::Slovenian => 4,
            NumerusRule::Arabic => 6,
        }
    }

    /// Index of the form to use for count `n`.
    pub fn form_index(&self, n: i64) -> usize {
        let n = n.unsigned_abs();
        let n10 = n % 10;
        let n100 = n % 100;
        match self {
            NumerusRule::Single => 0,
            NumerusRule::OneOther => usize::from(n != 1),
            NumerusRule::FrenchLike => usize::from(n > 1),
            NumerusRule::Slavic => {
                if n10 == 1 && n100 != 11 {
                    0
                } else if (2..=4).contains(&n10) && !(12..=14).contains(&n100) {
                    1
                } else {
                    2
                }
            }
            NumerusRule::Polish => {
                if n == 1 {
                    0
                } else if (2..=4).contains(&n10) && !(12..=14).contains(&n100) {
                    1
                } else {
                    2
                }
            }
            NumerusRule::Czech => match n {
                1 => 0,
                2..=4 => 1,
                _ => 2,
            },
            NumerusRule::Slovenian => match n100 {
                1 => 0,
                2 => 1,
                3 | 4 => 2,
                _ => 3,
            },
            NumerusRule::Lithuanian => {
                if n10 == 1 && n100 != 11 {
                    0
                } else if n10 >= 2 && !(12..=19).contains(&n100) {
                    1
                } else {
                    2
                }
            }
            NumerusRule::Latvian => {
                if n10 == 1 && n100 != 11 {
                    0
                } else if n != 0 {
                    1
                } else {
                    2
                }
            }
            NumerusRule::Romanian => {
                if n == 1 {
                    0
                } else if n == 0 || (1..=19).contains(&n100) {
                    1
                } else {
                    2
                }
            }
            NumerusRule::Irish => match n {
                1 => 0,
                2 => 1,
                _ => 2,
            },
            NumerusRule::Arabic => match n {
                0 => 0,
                1 => 1,
                2 => 2,
                _ if (3..=10).contains(&n100) => 3,
                _ if (11..=99).contains(&n100) => 4,
                _ => 5,
            },
        }
    }
}
