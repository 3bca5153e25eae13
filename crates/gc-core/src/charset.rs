use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Premier caractère ASCII imprimable (espace).
pub const PRINTABLE_FIRST: char = ' ';

/// Dernier caractère ASCII imprimable (`~`).
pub const PRINTABLE_LAST: char = '~';

/// Jeu par défaut d'une session : les chiffres.
pub const CHARSET_DIGITS: &str = "0123456789";

/// A set of characters named by one textual argument.
///
/// Accepted forms: a single character (`x`), `space`, `all` (printable ASCII
/// 32–126), or a range `a-z` (endpoints in either order).
///
/// # Example
/// ```
/// use gc_core::charset::CharSelection;
/// let sel: CharSelection = "z-a".parse().unwrap();
/// assert_eq!(sel.chars().count(), 26);
/// assert_eq!("space".parse::<CharSelection>().unwrap(), CharSelection::Single(' '));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CharSelection {
    /// Un seul caractère.
    Single(char),
    /// Plage inclusive de code points, `first <= last`.
    Range {
        /// Borne basse.
        first: char,
        /// Borne haute.
        last: char,
    },
    /// Tout l'ASCII imprimable.
    AllPrintable,
}

impl CharSelection {
    /// Plage inclusive, bornes réordonnées si besoin.
    #[must_use]
    pub fn range(a: char, b: char) -> Self {
        Self::Range {
            first: a.min(b),
            last: a.max(b),
        }
    }

    /// Characters covered by the selection, in code point order.
    pub fn chars(&self) -> impl Iterator<Item = char> + use<> {
        let (first, last) = match *self {
            Self::Single(c) => (c, c),
            Self::Range { first, last } => (first, last),
            Self::AllPrintable => (PRINTABLE_FIRST, PRINTABLE_LAST),
        };
        first..=last
    }
}

impl FromStr for CharSelection {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().collect();
        match chars.as_slice() {
            [c] => Ok(Self::Single(*c)),
            _ if s == "all" => Ok(Self::AllPrintable),
            _ if s == "space" => Ok(Self::Single(' ')),
            [a, '-', b] => Ok(Self::range(*a, *b)),
            _ => Err(CoreError::InvalidCharSelection(s.to_string())),
        }
    }
}

/// Ensemble des caractères éligibles en sortie, ordonné par code point.
///
/// # Example
/// ```
/// use gc_core::charset::{ActiveCharset, CharSelection};
/// let mut set = ActiveCharset::digits();
/// set.remove(&CharSelection::range('5', '9'));
/// set.add(&CharSelection::Single('@'));
/// assert_eq!(set.to_string(), "0 1 2 3 4 @");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActiveCharset {
    chars: BTreeSet<char>,
}

impl ActiveCharset {
    /// Jeu vide.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Jeu par défaut `0-9`.
    #[must_use]
    pub fn digits() -> Self {
        CHARSET_DIGITS.chars().collect()
    }

    /// Tous les ASCII imprimables (espace à `~`).
    #[must_use]
    pub fn all_printable() -> Self {
        CharSelection::AllPrintable.chars().collect()
    }

    /// Ajoute la sélection. Retourne le nombre de caractères réellement ajoutés.
    pub fn add(&mut self, selection: &CharSelection) -> usize {
        selection.chars().filter(|&c| self.chars.insert(c)).count()
    }

    /// Retire la sélection. Retourne le nombre de caractères réellement retirés.
    pub fn remove(&mut self, selection: &CharSelection) -> usize {
        selection.chars().filter(|c| self.chars.remove(c)).count()
    }

    /// `true` if `ch` is active.
    #[must_use]
    pub fn contains(&self, ch: char) -> bool {
        self.chars.contains(&ch)
    }

    /// Number of active characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// `true` if no character is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Active characters in code point order.
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().copied()
    }
}

impl FromIterator<char> for ActiveCharset {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Self {
            chars: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for ActiveCharset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, ch) in self.chars.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{ch}")?;
        }
        Ok(())
    }
}
