//! Recursive-descent parser for region-expression text.
//!
//! ```text
//! expr   := term (':' term)*
//! term   := factor*
//! factor := LEAF | '(' expr ')' | '#' '(' expr ')'
//! ```
//!
//! An empty group `()` is the unconstrained region. Error positions are token
//! indices.

use crate::error::ParseError;
use crate::region::{RegionRule, SurfaceId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Token<'a> {
    Open,
    Close,
    Union,
    Complement,
    Leaf(&'a str),
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = None;
    for (i, c) in text.char_indices() {
        let punct = match c {
            '(' => Some(Token::Open),
            ')' => Some(Token::Close),
            ':' => Some(Token::Union),
            '#' => Some(Token::Complement),
            _ => None,
        };
        if c.is_whitespace() || punct.is_some() {
            if let Some(s) = start.take() {
                tokens.push(Token::Leaf(&text[s..i]));
            }
            tokens.extend(punct);
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        tokens.push(Token::Leaf(&text[s..]));
    }
    tokens
}

struct Parser<'t, 'a, F> {
    tokens: &'t [Token<'a>],
    pos: usize,
    resolve: F,
}

impl<'a, F> Parser<'_, 'a, F>
where
    F: FnMut(&str) -> Option<SurfaceId>,
{
    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn expr(&mut self) -> Result<RegionRule, ParseError> {
        let mut result = self.term()?;
        while self.peek() == Some(Token::Union) {
            let at = self.pos;
            self.pos += 1;
            let rhs = self.term()?;
            match (result, rhs) {
                (Some(lhs), Some(rhs)) => result = Some(lhs.union_with(rhs)),
                _ => return Err(ParseError::EmptyOperand { position: at }),
            }
        }
        Ok(result.unwrap_or(RegionRule::ALWAYS))
    }

    /// Intersection of consecutive factors; `None` if there are none.
    fn term(&mut self) -> Result<Option<RegionRule>, ParseError> {
        let mut result: Option<RegionRule> = None;
        while let Some(token) = self.peek() {
            if matches!(token, Token::Close | Token::Union) {
                break;
            }
            let factor = self.factor()?;
            result = Some(match result {
                Some(lhs) => lhs.intersect(factor),
                None => factor,
            });
        }
        Ok(result)
    }

    fn factor(&mut self) -> Result<RegionRule, ParseError> {
        let at = self.pos;
        match self.peek() {
            Some(Token::Leaf(text)) => {
                self.pos += 1;
                self.leaf(text, at)
            }
            Some(Token::Open) => self.group(),
            Some(Token::Complement) => {
                self.pos += 1;
                if self.peek() != Some(Token::Open) {
                    return Err(ParseError::BareComplement { position: at });
                }
                Ok(self.group()?.complement())
            }
            // term() stops before these
            Some(Token::Close | Token::Union) | None => {
                Err(ParseError::UnexpectedClose { position: at })
            }
        }
    }

    fn group(&mut self) -> Result<RegionRule, ParseError> {
        let open = self.pos;
        self.pos += 1;
        let inner = self.expr()?;
        if self.peek() != Some(Token::Close) {
            return Err(ParseError::UnclosedGroup { position: open });
        }
        self.pos += 1;
        Ok(inner)
    }

    fn leaf(&mut self, text: &str, position: usize) -> Result<RegionRule, ParseError> {
        if let Some(id) = (self.resolve)(text) {
            return Ok(RegionRule::leaf(id));
        }
        if text.parse::<i64>() == Ok(0) {
            Err(ParseError::ZeroSurface)
        } else {
            Err(ParseError::UnresolvedLeaf {
                token: text.to_string(),
                position,
            })
        }
    }
}

impl RegionRule {
    /// Parse region text, mapping each leaf token through `resolve`.
    ///
    /// `resolve` turns a token such as `"-12"` or `"-front"` into a signed
    /// identifier; returning `None` fails the parse.
    pub fn parse<F>(text: &str, resolve: F) -> Result<Self, ParseError>
    where
        F: FnMut(&str) -> Option<SurfaceId>,
    {
        let tokens = tokenize(text);
        log::trace!("region tokens: {tokens:?}");
        let mut parser = Parser {
            tokens: &tokens,
            pos: 0,
            resolve,
        };
        let rule = parser.expr()?;
        if parser.pos < tokens.len() {
            return Err(ParseError::UnexpectedClose {
                position: parser.pos,
            });
        }
        Ok(rule)
    }

    /// Parse with plain signed integers as leaves.
    pub fn parse_numeric(text: &str) -> Result<Self, ParseError> {
        Self::parse(text, |token| token.parse().ok().and_then(SurfaceId::new))
    }
}

#[cfg(test)]
mod tests {
    use rustc_hash::FxHashMap;

    use super::*;
    use crate::region::RuleKind;

    fn rule(text: &str) -> RegionRule {
        RegionRule::parse_numeric(text).unwrap()
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("1 -2:#(3)"),
            vec![
                Token::Leaf("1"),
                Token::Leaf("-2"),
                Token::Union,
                Token::Complement,
                Token::Open,
                Token::Leaf("3"),
                Token::Close,
            ]
        );
    }

    #[test]
    fn test_precedence() {
        // intersection binds tighter than union
        let r = rule("1 2 : 3");
        assert_eq!(r.kind(), RuleKind::Or);
        assert_eq!(r.serialize(), "(1 2) : 3");

        let g = rule("1 (2 : 3)");
        assert_eq!(g.kind(), RuleKind::And);
        assert_eq!(g.serialize(), "1 (2 : 3)");
    }

    #[test]
    fn test_redundant_groups_flatten() {
        assert_eq!(rule("((1)) (2 3)").serialize(), "1 2 3");
        assert_eq!(rule("(1 : 2) : 3").serialize(), "1 : 2 : 3");
    }

    #[test]
    fn test_complement_group() {
        assert_eq!(rule("#(1 -2)").serialize(), "-1 : 2");
        assert_eq!(rule("4 #(1 : (2 3))").serialize(), "4 -1 (-2 : -3)");
        assert_eq!(rule("#(#(5))"), rule("5"));
    }

    #[test]
    fn test_empty_forms() {
        assert!(rule("").is_empty());
        assert!(rule(" ( ) ").is_empty());
        assert!(rule("#()").is_never());
        assert_eq!(rule("1 ()"), rule("1"));
        assert_eq!(rule("1 : #()"), rule("1"));
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            RegionRule::parse_numeric("1 (2 3"),
            Err(ParseError::UnclosedGroup { position: 1 })
        );
        assert_eq!(
            RegionRule::parse_numeric("1 2)"),
            Err(ParseError::UnexpectedClose { position: 2 })
        );
        assert_eq!(
            RegionRule::parse_numeric("1 0 2"),
            Err(ParseError::ZeroSurface)
        );
        assert_eq!(
            RegionRule::parse_numeric("1 x"),
            Err(ParseError::UnresolvedLeaf {
                token: "x".into(),
                position: 1
            })
        );
        assert_eq!(
            RegionRule::parse_numeric("#3"),
            Err(ParseError::BareComplement { position: 0 })
        );
        assert_eq!(
            RegionRule::parse_numeric("1 : : 2"),
            Err(ParseError::EmptyOperand { position: 1 })
        );
        assert_eq!(
            RegionRule::parse_numeric(": 2"),
            Err(ParseError::EmptyOperand { position: 0 })
        );
    }

    #[test]
    fn test_named_resolver() {
        let names: FxHashMap<&str, i32> = [("front", 11), ("back", 12)].into_iter().collect();
        let resolve = |token: &str| {
            let (sign, name) = match token.strip_prefix('-') {
                Some(rest) => (-1, rest),
                None => (1, token),
            };
            names.get(name).and_then(|&n| SurfaceId::new(sign * n))
        };

        let r = RegionRule::parse("front -back", resolve).unwrap();
        assert_eq!(r.serialize(), "11 -12");
        assert!(matches!(
            RegionRule::parse("front side", resolve),
            Err(ParseError::UnresolvedLeaf { .. })
        ));
    }
}
