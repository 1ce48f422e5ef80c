//! # Compact Numeric List Notation
//!
//! Transport-code decks write long numeric sequences tersely:
//!
//! | Token      | Meaning                                                    |
//! |------------|------------------------------------------------------------|
//! | `4`, `2.5` | A literal value                                            |
//! | `J`, `3J`  | Jump: leave the consuming field at its default (N times)   |
//! | `3R`       | Repeat the previous value 3 more times (`R` = `1R`)        |
//! | `2I`       | 2 linearly spaced values between the neighbouring literals |
//! | `2LOG`     | As `I`, spaced logarithmically (`ILOG` is accepted too)    |
//! | `M`        | Single-letter modifier attached to the previous item       |
//! | `( … )`    | Nested list, counted as one item                           |
//!
//! So `"0 2I 9"` expands to `[0, 3, 6, 9]` and `"4 3R"` to `[4, 4, 4, 4]`.
//!
//! Neighbour requirements and the [`MAX_EXPANDED_LEN`] bound are checked when
//! parsing, so expansion of a parsed list never fails.

use std::fmt;
use std::str::FromStr;

use crate::error::{IndexError, ParseError};

/// Most entries a parsed list may expand to, jumps included.
pub const MAX_EXPANDED_LEN: usize = 1 << 20;

/// One top-level item of a [`CompactList`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Item {
    Integer(i64),
    Real(f64),
    Jump,
    /// Emit the previous value this many more times.
    Repeat(u32),
    /// Insert this many linear interpolants between the neighbours.
    Interval(u32),
    /// Insert this many log-spaced interpolants between the neighbours.
    LogInterval(u32),
    /// Tag attached to the nearest preceding non-modifier item.
    Modifier(char),
    Group(CompactList),
}

impl Item {
    /// Value of a numeric literal.
    #[must_use]
    pub fn numeric(&self) -> Option<f64> {
        match *self {
            #[expect(clippy::cast_precision_loss)]
            Self::Integer(v) => Some(v as f64),
            Self::Real(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_modifier(&self) -> bool {
        matches!(self, Self::Modifier(_))
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            // Debug keeps a decimal point or exponent so reals stay reals
            Self::Real(v) => write!(f, "{v:?}"),
            Self::Jump => f.write_str("J"),
            Self::Repeat(n) => write!(f, "{n}R"),
            Self::Interval(n) => write!(f, "{n}I"),
            Self::LogInterval(n) => write!(f, "{n}LOG"),
            Self::Modifier(tag) => write!(f, "{tag}"),
            Self::Group(list) => write!(f, "({list})"),
        }
    }
}

/// One slot of the expanded sequence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Entry {
    Value(f64),
    /// Left for the consuming field to fill with its own default.
    Jump,
}

/// A parsed compact list.
///
/// # Examples
///
/// ```rust
/// use region_algebra::CompactList;
///
/// let list: CompactList = "1 (2 2R) 3 3I 7 M".parse().unwrap();
/// assert_eq!(list.count(), 5);
/// assert_eq!(list.actual_values(), vec![1.0, 2.0, 2.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompactList {
    items: Vec<Item>,
}

impl CompactList {
    /// Parse the textual notation.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let tokens = tokenize(text);
        log::trace!("compact list tokens: {tokens:?}");
        let mut pos = 0;
        Self::parse_group(&tokens, &mut pos, None)
    }

    /// Build a list from items, applying the same checks as [`parse`](Self::parse).
    pub fn from_items(items: Vec<Item>) -> Result<Self, ParseError> {
        let list = Self { items };
        list.validate()?;
        Ok(list)
    }

    fn parse_group(
        tokens: &[&str],
        pos: &mut usize,
        opened_at: Option<usize>,
    ) -> Result<Self, ParseError> {
        let mut items = Vec::new();
        while let Some(&token) = tokens.get(*pos) {
            let here = *pos;
            *pos += 1;
            match token {
                "(" => items.push(Item::Group(Self::parse_group(tokens, pos, Some(here))?)),
                ")" => {
                    if opened_at.is_none() {
                        return Err(ParseError::UnexpectedClose { position: here });
                    }
                    return Self::from_items(items);
                }
                _ => classify(token, here, &mut items)?,
            }
        }
        match opened_at {
            Some(position) => Err(ParseError::UnclosedGroup { position }),
            None => Self::from_items(items),
        }
    }

    /// Check neighbour requirements at this level. Nested groups were already
    /// checked when they were built.
    fn validate(&self) -> Result<(), ParseError> {
        let items = &self.items;
        for (i, item) in items.iter().enumerate() {
            let prev = i.checked_sub(1).and_then(|p| items.get(p));
            let next = items.get(i + 1);
            let missing = |side| ParseError::MissingNeighbour {
                token: item.to_string(),
                index: i,
                side,
            };
            match item {
                Item::Repeat(_) => {
                    if !prev.is_some_and(|p| p.numeric().is_some() || matches!(p, Item::Repeat(_)))
                    {
                        return Err(missing("before"));
                    }
                }
                Item::Interval(_) | Item::LogInterval(_) => {
                    let from = prev.and_then(Item::numeric).ok_or_else(|| missing("before"))?;
                    let to = next.and_then(Item::numeric).ok_or_else(|| missing("after"))?;
                    if matches!(item, Item::LogInterval(_))
                        && (from == 0.0 || to == 0.0 || from.signum() != to.signum())
                    {
                        return Err(ParseError::LogDomain {
                            from: prev.map(ToString::to_string).unwrap_or_default(),
                            to: next.map(ToString::to_string).unwrap_or_default(),
                        });
                    }
                }
                Item::Modifier(tag) => {
                    if items[..i].iter().all(Item::is_modifier) {
                        return Err(ParseError::DanglingModifier { tag: *tag, index: i });
                    }
                }
                Item::Integer(_) | Item::Real(_) | Item::Jump | Item::Group(_) => {}
            }
        }
        let len = self.expanded_len();
        if len > MAX_EXPANDED_LEN as u64 {
            return Err(ParseError::TooLong {
                len,
                limit: MAX_EXPANDED_LEN,
            });
        }
        Ok(())
    }

    /// Number of entries [`expand`](Self::expand) produces.
    #[must_use]
    pub fn expanded_len(&self) -> u64 {
        self.items
            .iter()
            .map(|item| match item {
                Item::Integer(_) | Item::Real(_) | Item::Jump => 1,
                Item::Repeat(n) | Item::Interval(n) | Item::LogInterval(n) => u64::from(*n),
                Item::Modifier(_) => 0,
                Item::Group(list) => list.expanded_len(),
            })
            .fold(0, u64::saturating_add)
    }

    /// Number of top-level groups. A nested list counts once; modifiers
    /// belong to the item before them and are not counted.
    #[must_use]
    pub fn count(&self) -> usize {
        self.items.iter().filter(|item| !item.is_modifier()).count()
    }

    /// Number of stored items, modifiers included.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn get(&self, index: usize) -> Result<&Item, IndexError> {
        self.items.get(index).ok_or(IndexError {
            index,
            len: self.items.len(),
        })
    }

    /// The first modifier attached to the item at `index`.
    pub fn modifier(&self, index: usize) -> Result<Option<char>, IndexError> {
        self.get(index)?;
        Ok(self.items[index + 1..]
            .iter()
            .map_while(|item| match item {
                Item::Modifier(tag) => Some(*tag),
                _ => None,
            })
            .next())
    }

    /// Expand into values, keeping jumps as explicit slots.
    #[must_use]
    pub fn expand(&self) -> Vec<Entry> {
        let mut out = Vec::with_capacity(self.items.len());
        self.expand_into(&mut out);
        out
    }

    /// Expand into the numeric values only; jumps and modifiers emit nothing.
    #[must_use]
    pub fn actual_values(&self) -> Vec<f64> {
        self.expand()
            .into_iter()
            .filter_map(|entry| match entry {
                Entry::Value(v) => Some(v),
                Entry::Jump => None,
            })
            .collect()
    }

    fn expand_into(&self, out: &mut Vec<Entry>) {
        let mut last = None;
        for (i, item) in self.items.iter().enumerate() {
            match item {
                Item::Integer(_) | Item::Real(_) => {
                    last = item.numeric();
                    out.extend(last.map(Entry::Value));
                }
                Item::Jump => out.push(Entry::Jump),
                Item::Repeat(n) => {
                    if let Some(v) = last {
                        out.extend((0..*n).map(|_| Entry::Value(v)));
                    }
                }
                Item::Interval(n) | Item::LogInterval(n) => {
                    let from = i.checked_sub(1).and_then(|p| self.items[p].numeric());
                    let to = self.items.get(i + 1).and_then(Item::numeric);
                    if let (Some(from), Some(to)) = (from, to) {
                        let log = matches!(item, Item::LogInterval(_));
                        out.extend(interpolate(from, to, *n, log).map(Entry::Value));
                    }
                }
                Item::Modifier(_) => {}
                Item::Group(list) => {
                    list.expand_into(out);
                    last = None;
                }
            }
        }
    }

    /// Back to the compact textual form.
    #[must_use]
    pub fn serialize(&self) -> String {
        self.to_string()
    }
}

/// `n` values strictly between `from` and `to`.
fn interpolate(from: f64, to: f64, n: u32, log: bool) -> impl Iterator<Item = f64> {
    let steps = f64::from(n) + 1.0;
    let sign = from.signum();
    let (a, b) = if log {
        (from.abs().ln(), to.abs().ln())
    } else {
        (from, to)
    };
    (1..=n).map(move |k| {
        let v = a + (b - a) * f64::from(k) / steps;
        if log { sign * v.exp() } else { v }
    })
}

/// Split on whitespace, with parentheses as tokens of their own.
fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = None;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() || c == '(' || c == ')' {
            if let Some(s) = start.take() {
                tokens.push(&text[s..i]);
            }
            if c != '(' && c != ')' {
                continue;
            }
            tokens.push(&text[i..i + 1]);
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        tokens.push(&text[s..]);
    }
    tokens
}

/// Classify one non-bracket token and push the item(s) it stands for.
fn classify(token: &str, position: usize, items: &mut Vec<Item>) -> Result<(), ParseError> {
    let invalid = || ParseError::InvalidToken {
        token: token.to_string(),
        position,
    };

    if let Ok(v) = token.parse::<i64>() {
        items.push(Item::Integer(v));
        return Ok(());
    }
    if token.bytes().any(|b| b.is_ascii_digit())
        && let Ok(v) = token.parse::<f64>()
    {
        if !v.is_finite() {
            return Err(invalid());
        }
        items.push(Item::Real(v));
        return Ok(());
    }

    let split = token
        .find(|c: char| c.is_ascii_alphabetic())
        .ok_or_else(invalid)?;
    let (prefix, keyword) = token.split_at(split);
    let keyword = keyword.to_ascii_uppercase();

    let count = if prefix.is_empty() {
        1
    } else {
        let n: i64 = prefix.parse().map_err(|_| invalid())?;
        if n < 0 {
            return Err(ParseError::NegativeCount {
                token: token.to_string(),
            });
        }
        u32::try_from(n).map_err(|_| invalid())?
    };

    match keyword.as_str() {
        "R" => items.push(Item::Repeat(count)),
        "I" => items.push(Item::Interval(count)),
        "LOG" | "ILOG" => items.push(Item::LogInterval(count)),
        "J" => {
            if count as usize > MAX_EXPANDED_LEN {
                return Err(ParseError::TooLong {
                    len: u64::from(count),
                    limit: MAX_EXPANDED_LEN,
                });
            }
            items.extend((0..count).map(|_| Item::Jump));
        }
        _ if prefix.is_empty() && token.len() == 1 => {
            let tag = token.chars().next().ok_or_else(invalid)?;
            items.push(Item::Modifier(tag));
        }
        _ => return Err(invalid()),
    }
    Ok(())
}

impl fmt::Display for CompactList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

impl FromStr for CompactList {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
