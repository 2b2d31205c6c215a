//! The owned working copy of a code sequence.
//!
//! A [`CodeSeq`] is handed to the generator by value, so the only way a code
//! leaves the sequence is through [`CodeSeq::next_code`].

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::error::{BranchError, Result};
use crate::types::Code;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeSeq {
    codes: VecDeque<Code>,
}

impl CodeSeq {
    pub fn new(codes: impl IntoIterator<Item = Code>) -> Self {
        Self {
            codes: codes.into_iter().collect(),
        }
    }

    /// Parses codes from panel text.
    ///
    /// Tokens may be separated by whitespace (including newlines), commas
    /// or semicolons. Blank input yields an empty sequence.
    ///
    /// ### Errors
    /// [`BranchError::InvalidCode`] for the first token that is not a
    /// non-negative integer fitting in a [`Code`]. `position` is the
    /// 0-based index of the token.
    pub fn parse(text: &str) -> Result<Self> {
        text.split(|c: char| c.is_whitespace() || c == ',' || c == ';')
            .filter(|t| !t.is_empty())
            .enumerate()
            .map(|(position, token)| {
                token.parse::<Code>().map_err(|_| BranchError::InvalidCode {
                    token: token.to_string(),
                    position,
                })
            })
            .collect::<Result<VecDeque<_>>>()
            .map(|codes| Self { codes })
    }

    /// A sequence of `len` codes drawn uniformly from `0..=max_code`.
    pub fn random(len: usize, max_code: Code, rng: &mut impl Rng) -> Self {
        let codes = (0..len).map(|_| rng.random_range(0..=max_code)).collect();
        Self { codes }
    }

    /// Removes and returns the front code, or `None` once exhausted.
    #[inline]
    pub fn next_code(&mut self) -> Option<Code> {
        self.codes.pop_front()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Iterates over the codes not yet consumed, front first.
    pub fn iter(&self) -> impl Iterator<Item = Code> + '_ {
        self.codes.iter().copied()
    }
}

impl FromIterator<Code> for CodeSeq {
    fn from_iter<I: IntoIterator<Item = Code>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl From<Vec<Code>> for CodeSeq {
    fn from(codes: Vec<Code>) -> Self {
        Self {
            codes: codes.into(),
        }
    }
}

impl FromStr for CodeSeq {
    type Err = BranchError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for CodeSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, code) in self.codes.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{code}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::rstest;

    #[test]
    fn next_code_consumes_from_the_front() {
        let mut seq = CodeSeq::new([1, 2, 0]);

        assert_eq!(seq.next_code(), Some(1));
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.next_code(), Some(2));
        assert_eq!(seq.next_code(), Some(0));
        assert_eq!(seq.next_code(), None);
        assert!(seq.is_empty());
    }

    #[rstest]
    #[case("", vec![])]
    #[case("   \n\t", vec![])]
    #[case("1", vec![1])]
    #[case("1, 2, 0", vec![1, 2, 0])]
    #[case("1\n2\n0\n", vec![1, 2, 0])]
    #[case("2;1 ,,3", vec![2, 1, 3])]
    fn parse_accepts_panel_text(#[case] text: &str, #[case] expected: Vec<Code>) {
        let seq = CodeSeq::parse(text).unwrap();
        assert_eq!(seq.iter().collect::<Vec<_>>(), expected);
    }

    #[rstest]
    #[case("1, x, 2", "x", 1)]
    #[case("-1", "-1", 0)]
    #[case("1 2 1.5", "1.5", 2)]
    #[case("99999999999", "99999999999", 0)]
    fn parse_rejects_bad_tokens(#[case] text: &str, #[case] bad: &str, #[case] at: usize) {
        match CodeSeq::parse(text) {
            Err(BranchError::InvalidCode { token, position }) => {
                assert_eq!(token, bad);
                assert_eq!(position, at);
            }
            other => panic!("expected InvalidCode, got {other:?}"),
        }
    }

    #[test]
    fn from_str_matches_parse() {
        let seq: CodeSeq = "1,2".parse().unwrap();
        assert_eq!(seq, CodeSeq::new([1, 2]));
    }

    #[test]
    fn display_joins_with_commas() {
        assert_eq!(CodeSeq::new([1, 2, 0]).to_string(), "1, 2, 0");
        assert_eq!(CodeSeq::default().to_string(), "");
    }

    #[test]
    fn random_stays_within_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let seq = CodeSeq::random(200, 2, &mut rng);

        assert_eq!(seq.len(), 200);
        assert!(seq.iter().all(|c| c <= 2));
    }
}
