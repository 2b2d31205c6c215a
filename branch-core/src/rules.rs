//! Branching rules: what each code does to the position it is applied to.
//!
//! A [`RuleTable`] maps codes to [`BranchRule`]s. Codes without an entry,
//! and code `0` always, produce no children.

use std::collections::BTreeMap;

use glam::Vec3;
use serde::Deserialize;

use crate::error::{BranchError, Result};
use crate::types::{Code, TERMINAL};

/// Child offsets created by one code, in creation order.
///
/// Each offset is scaled by the generator's step length and added to the
/// parent position. An empty rule terminates like an unknown code.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BranchRule {
    offsets: Vec<Vec3>,
}

impl BranchRule {
    pub fn new(offsets: Vec<Vec3>) -> Self {
        Self { offsets }
    }

    pub fn offsets(&self) -> &[Vec3] {
        &self.offsets
    }

    /// Number of children this rule creates.
    pub fn fanout(&self) -> usize {
        self.offsets.len()
    }
}

/// One `[[rules]]` entry as written in a config file.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RuleEntry {
    pub code: Code,
    #[serde(default)]
    pub offsets: Vec<Vec3>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RuleTable {
    rules: BTreeMap<Code, BranchRule>,
}

impl Default for RuleTable {
    /// Code `1` grows straight up the z axis; code `2` forks into the
    /// `+y` and `-y` diagonals of the y/z plane, in that order.
    fn default() -> Self {
        let mut rules = BTreeMap::new();
        rules.insert(1, BranchRule::new(vec![Vec3::Z]));
        rules.insert(
            2,
            BranchRule::new(vec![Vec3::new(0.0, 1.0, 1.0), Vec3::new(0.0, -1.0, 1.0)]),
        );
        Self { rules }
    }
}

impl RuleTable {
    /// A table in which every code terminates.
    pub fn empty() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn get(&self, code: Code) -> Option<&BranchRule> {
        self.rules.get(&code)
    }

    /// Installs `rule` for `code`, returning the rule it replaced.
    ///
    /// ### Errors
    /// - [`BranchError::ReservedTerminal`] if `code` is `0`.
    /// - [`BranchError::NonFiniteOffset`] if any offset has a NaN or
    ///   infinite component.
    pub fn insert(&mut self, code: Code, rule: BranchRule) -> Result<Option<BranchRule>> {
        check_rule(code, &rule)?;
        Ok(self.rules.insert(code, rule))
    }

    /// Re-checks every rule with the same conditions as [`RuleTable::insert`].
    pub fn validate(&self) -> Result<()> {
        self.iter().try_for_each(|(code, rule)| check_rule(code, rule))
    }

    #[cfg(test)]
    pub(crate) fn insert_unchecked(&mut self, code: Code, rule: BranchRule) {
        self.rules.insert(code, rule);
    }

    pub fn remove(&mut self, code: Code) -> Option<BranchRule> {
        self.rules.remove(&code)
    }

    /// Applies config entries on top of this table. Later entries win.
    pub fn merge(&mut self, entries: impl IntoIterator<Item = RuleEntry>) -> Result<()> {
        for entry in entries {
            self.insert(entry.code, BranchRule::new(entry.offsets))?;
        }
        Ok(())
    }

    pub fn codes(&self) -> impl Iterator<Item = Code> + '_ {
        self.rules.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Code, &BranchRule)> {
        self.rules.iter().map(|(&c, r)| (c, r))
    }

    /// Highest code with a rule, or `0` for an empty table.
    pub fn max_code(&self) -> Code {
        self.rules.keys().next_back().copied().unwrap_or(TERMINAL)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn check_rule(code: Code, rule: &BranchRule) -> Result<()> {
    if code == TERMINAL {
        return Err(BranchError::ReservedTerminal);
    }
    if let Some(&offset) = rule.offsets.iter().find(|o| !o.is_finite()) {
        return Err(BranchError::NonFiniteOffset { code, offset });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_has_straight_and_fork_rules() {
        let table = RuleTable::default();

        assert_eq!(table.codes().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(table.get(1).unwrap().offsets(), &[Vec3::new(0.0, 0.0, 1.0)]);
        assert_eq!(
            table.get(2).unwrap().offsets(),
            &[Vec3::new(0.0, 1.0, 1.0), Vec3::new(0.0, -1.0, 1.0)]
        );
        assert!(table.get(0).is_none());
        assert!(table.get(3).is_none());
        assert_eq!(table.max_code(), 2);
    }

    #[test]
    fn insert_rejects_terminal_code() {
        let mut table = RuleTable::default();
        let err = table.insert(0, BranchRule::new(vec![Vec3::Z])).unwrap_err();
        assert!(matches!(err, BranchError::ReservedTerminal));
        assert!(table.get(0).is_none());
    }

    #[test]
    fn insert_rejects_non_finite_offsets() {
        let mut table = RuleTable::empty();
        let err = table
            .insert(3, BranchRule::new(vec![Vec3::X, Vec3::new(f32::NAN, 0.0, 0.0)]))
            .unwrap_err();
        assert!(matches!(err, BranchError::NonFiniteOffset { code: 3, .. }));
        assert!(table.is_empty());
    }

    #[test]
    fn insert_returns_replaced_rule() {
        let mut table = RuleTable::default();
        let old = table.insert(1, BranchRule::new(vec![Vec3::X])).unwrap();

        assert_eq!(old, Some(BranchRule::new(vec![Vec3::Z])));
        assert_eq!(table.get(1).unwrap().offsets(), &[Vec3::X]);
    }

    #[test]
    fn merge_extends_and_overrides() {
        let mut table = RuleTable::default();
        table
            .merge(vec![
                RuleEntry {
                    code: 3,
                    offsets: vec![Vec3::X, Vec3::NEG_X, Vec3::Z],
                },
                RuleEntry {
                    code: 1,
                    offsets: vec![],
                },
            ])
            .unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.get(3).unwrap().fanout(), 3);
        assert_eq!(table.get(1).unwrap().fanout(), 0);
        assert_eq!(table.max_code(), 3);
    }

    #[test]
    fn merge_stops_at_first_invalid_entry() {
        let mut table = RuleTable::empty();
        let result = table.merge(vec![
            RuleEntry {
                code: 4,
                offsets: vec![Vec3::Y],
            },
            RuleEntry {
                code: 0,
                offsets: vec![Vec3::Y],
            },
        ]);

        assert!(matches!(result, Err(BranchError::ReservedTerminal)));
        assert_eq!(table.codes().collect::<Vec<_>>(), vec![4]);
    }

    #[test]
    fn validate_walks_every_rule() {
        let mut table = RuleTable::default();
        assert!(table.validate().is_ok());

        table.insert_unchecked(
            5,
            BranchRule::new(vec![Vec3::Z, Vec3::new(0.0, f32::INFINITY, 0.0)]),
        );
        assert!(matches!(
            table.validate(),
            Err(BranchError::NonFiniteOffset { code: 5, .. })
        ));
    }

    #[test]
    fn empty_table_max_code_is_terminal() {
        assert_eq!(RuleTable::empty().max_code(), 0);
    }
}
