//! # Constraint Validator
//!
//! Checks each token against the tokens accepted before it, then runs the
//! order-independent passes over the whole chord.
//!
//! ## Incremental Checks (per token, in order)
//! 1. **Quality class** - quality and suspension share one slot.
//!    `Cmajm`, `Csus4sus2`, `Cmsus4` → `ConflictingQuality`.
//! 2. **Exclusions** - a declared `excludes` category present on either side
//!    → `ExcludedCombination`.
//!
//! ## Final Passes
//! 1. **Role edits** - replayed in application order (stable by priority,
//!    the same order the transducer folds in), so `C7b5m` and `Cm7b5` are
//!    judged alike. A role may be replaced or modified by one modifier. An
//!    alteration may post-adjust a role that an extension, an addition or a
//!    quality's implied `add` populated (`C9#9`, `Cm7b5`), but two modifiers
//!    populating the same role (`C7maj7`) or a second alteration of the same
//!    role (`C7#9#9`) → `ConflictingRole`.
//! 2. **Prerequisites** - every `requires` entry must be satisfied by another
//!    accepted modifier, matched by category, by symbol, or by both for
//!    qualified references such as `extension.7`.

use std::collections::HashMap;

use tracing::debug;

use crate::error::ChordError;
use crate::rules::{Category, ModifierRule, OpKind, Role, RuleTable};
use crate::tokenizer::Token;

/// Last edit recorded against a role.
#[derive(Debug, Clone)]
struct RoleEdit {
    kind: OpKind,
    category: Category,
    alias: String,
}

impl RoleEdit {
    /// Whether an operation of `kind` from a rule of `category` may follow this edit.
    fn admits(&self, category: Category, kind: OpKind) -> bool {
        if category != Category::Alteration {
            return false;
        }
        match self.kind {
            OpKind::Replace | OpKind::Modify => {
                matches!(self.category, Category::Extension | Category::Addition)
            }
            OpKind::Add => kind != OpKind::Add,
            OpKind::Remove => false,
        }
    }
}

/// Accumulates accepted tokens for one parse.
#[derive(Debug)]
pub struct Validator<'t> {
    table: &'t RuleTable,
    accepted: Vec<Token>,
}

impl<'t> Validator<'t> {
    pub fn new(table: &'t RuleTable) -> Self {
        Validator {
            table,
            accepted: Vec::new(),
        }
    }

    fn rule(&self, token: &Token) -> Result<&'t ModifierRule, ChordError> {
        self.table.get(token.rule).ok_or_else(|| ChordError::RuleTable {
            rule: token.alias.clone(),
            message: format!("token refers to missing rule #{}", token.rule),
        })
    }

    /// Validate `token` against everything accepted so far and accept it.
    pub fn accept(&mut self, token: Token) -> Result<(), ChordError> {
        let rule = self.rule(&token)?;

        self.check_quality(rule, &token)?;
        self.check_exclusions(rule, &token)?;

        debug!(alias = %token.alias, category = %rule.category, "accepted modifier");
        self.accepted.push(token);
        Ok(())
    }

    fn check_quality(&self, rule: &ModifierRule, token: &Token) -> Result<(), ChordError> {
        if !rule.category.is_quality_class() {
            return Ok(());
        }
        for prior in &self.accepted {
            if self.rule(prior)?.category.is_quality_class() {
                return Err(ChordError::ConflictingQuality {
                    symbol: token.alias.clone(),
                    existing: prior.alias.clone(),
                });
            }
        }
        Ok(())
    }

    fn check_exclusions(&self, rule: &ModifierRule, token: &Token) -> Result<(), ChordError> {
        for prior in &self.accepted {
            let prior_rule = self.rule(prior)?;
            if rule.excludes.contains(&prior_rule.category) {
                return Err(ChordError::ExcludedCombination {
                    symbol: token.alias.clone(),
                    category: prior_rule.category,
                });
            }
            if prior_rule.excludes.contains(&rule.category) {
                return Err(ChordError::ExcludedCombination {
                    symbol: prior.alias.clone(),
                    category: rule.category,
                });
            }
        }
        Ok(())
    }

    /// Replay role edits in application order.
    fn check_roles(&self) -> Result<(), ChordError> {
        let mut ordered = Vec::with_capacity(self.accepted.len());
        for token in &self.accepted {
            ordered.push((token, self.rule(token)?));
        }
        // Stable: equal priorities keep input order, as in the transducer.
        ordered.sort_by_key(|(_, rule)| rule.priority);

        let mut edits: HashMap<Role, RoleEdit> = HashMap::new();
        for (token, rule) in ordered {
            for op in &rule.operations {
                let role = op.role();
                if let Some(prior) = edits.get(&role) {
                    if !prior.admits(rule.category, op.kind()) {
                        return Err(ChordError::ConflictingRole {
                            role,
                            symbol: token.alias.clone(),
                            existing: prior.alias.clone(),
                        });
                    }
                }
            }
            for op in &rule.operations {
                edits.insert(
                    op.role(),
                    RoleEdit {
                        kind: op.kind(),
                        category: rule.category,
                        alias: token.alias.clone(),
                    },
                );
            }
        }
        Ok(())
    }

    /// Run the final passes and hand back the accepted tokens in input order.
    pub fn finish(self) -> Result<Vec<Token>, ChordError> {
        self.check_roles()?;

        for (index, token) in self.accepted.iter().enumerate() {
            let rule = self.rule(token)?;
            for requirement in &rule.requires {
                let satisfied = self
                    .accepted
                    .iter()
                    .enumerate()
                    .filter(|(other, _)| *other != index)
                    .any(|(_, other)| {
                        self.rule(other)
                            .map(|other_rule| requirement.is_met_by(other_rule, &other.alias))
                            .unwrap_or(false)
                    });
                if !satisfied {
                    return Err(ChordError::MissingRequirement {
                        symbol: token.alias.clone(),
                        requirement: requirement.clone(),
                    });
                }
            }
        }
        Ok(self.accepted)
    }
}

/// Validate a whole token list in one call.
pub fn validate(table: &RuleTable, tokens: Vec<Token>) -> Result<Vec<Token>, ChordError> {
    let mut validator = Validator::new(table);
    for token in tokens {
        validator.accept(token)?;
    }
    validator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Requirement;
    use crate::tokenizer::Tokenizer;

    fn check(suffix: &str) -> Result<Vec<String>, ChordError> {
        let table = RuleTable::standard();
        let tokens = Tokenizer::new(&table).tokenize(suffix)?;
        let accepted = validate(&table, tokens)?;
        Ok(accepted.into_iter().map(|t| t.alias).collect())
    }

    #[test]
    fn test_valid_combinations() {
        for suffix in [
            "", "m7b5", "sus4add9", "7sus4", "maj9#11", "13#11", "7#9b13", "mM7", "7b9#11",
            "m7omit5", "9#9", "13#13", "M7add13", "madd9",
        ] {
            assert!(check(suffix).is_ok(), "expected {:?} to validate: {:?}", suffix, check(suffix));
        }
    }

    #[test]
    fn test_conflicting_quality() {
        assert!(matches!(check("majm"), Err(ChordError::ConflictingQuality { .. })));
        assert!(matches!(check("sus4sus2"), Err(ChordError::ConflictingQuality { .. })));
        assert!(matches!(check("dimmaj"), Err(ChordError::ConflictingQuality { .. })));
        assert!(matches!(check("msus4"), Err(ChordError::ConflictingQuality { .. })));
    }

    #[test]
    fn test_conflicting_quality_names_both_symbols() {
        assert_eq!(
            check("majm"),
            Err(ChordError::ConflictingQuality {
                symbol: "m".to_string(),
                existing: "maj".to_string(),
            })
        );
    }

    #[test]
    fn test_duplicate_alteration_conflicts() {
        assert_eq!(
            check("7b5#5"),
            Err(ChordError::ConflictingRole {
                role: Role::Fifth,
                symbol: "#5".to_string(),
                existing: "b5".to_string(),
            })
        );
        assert!(matches!(
            check("7#9#9"),
            Err(ChordError::ConflictingRole { role: Role::Ninth, .. })
        ));
    }

    #[test]
    fn test_competing_sevenths_conflict() {
        assert!(matches!(
            check("7maj7"),
            Err(ChordError::ConflictingRole { role: Role::Seventh, .. })
        ));
        assert!(matches!(
            check("m7maj7"),
            Err(ChordError::ConflictingRole { role: Role::Seventh, .. })
        ));
        assert!(matches!(
            check("9add9"),
            Err(ChordError::ConflictingRole { role: Role::Ninth, .. })
        ));
    }

    #[test]
    fn test_alteration_cannot_adjust_quality_replacement() {
        assert!(matches!(
            check("dimb5"),
            Err(ChordError::ConflictingRole { role: Role::Fifth, .. })
        ));
        assert!(matches!(
            check("aug#5"),
            Err(ChordError::ConflictingRole { role: Role::Fifth, .. })
        ));
    }

    #[test]
    fn test_excluded_combination_both_directions() {
        assert_eq!(
            check("75"),
            Err(ChordError::ExcludedCombination {
                symbol: "5".to_string(),
                category: Category::Extension,
            })
        );
        assert_eq!(
            check("57"),
            Err(ChordError::ExcludedCombination {
                symbol: "5".to_string(),
                category: Category::Extension,
            })
        );
    }

    #[test]
    fn test_missing_requirement() {
        for suffix in ["mb9", "sus4b9", "add9b9", "#11"] {
            assert!(
                matches!(check(suffix), Err(ChordError::MissingRequirement { .. })),
                "expected MissingRequirement for {:?}",
                suffix
            );
        }
        assert_eq!(
            check("mb9"),
            Err(ChordError::MissingRequirement {
                symbol: "b9".to_string(),
                requirement: Requirement::Category(Category::Extension),
            })
        );
    }

    #[test]
    fn test_requirement_is_order_independent() {
        let table = RuleTable::from_yaml(
            r#"
rules:
  - symbols: ["7"]
    category: extension
    operation: { type: add, role: seventh, value: 10 }
  - symbols: ["alt"]
    category: alteration
    requires: ["7"]
    operation: { type: modify, role: fifth, value: 1 }
"#,
        )
        .unwrap();
        let tokenizer = Tokenizer::new(&table);
        assert!(validate(&table, tokenizer.tokenize("7alt").unwrap()).is_ok());
        assert!(validate(&table, tokenizer.tokenize("alt7").unwrap()).is_ok());
        assert!(matches!(
            validate(&table, tokenizer.tokenize("alt").unwrap()),
            Err(ChordError::MissingRequirement { .. })
        ));
    }

    #[test]
    fn test_role_edits_ignore_written_order() {
        for (written, canonical) in [("7b5m", "m7b5"), ("7b5sus4", "7sus4b5"), ("#5aug7", "aug7#5")] {
            assert_eq!(
                check(written).is_ok(),
                check(canonical).is_ok(),
                "{:?} and {:?} should validate alike",
                written,
                canonical
            );
        }
        assert!(check("7b5m").is_ok());
        assert!(check("7b5sus4").is_ok());
        assert!(matches!(
            check("b5dim"),
            Err(ChordError::ConflictingRole { role: Role::Fifth, .. })
        ));
    }

    #[test]
    fn test_qualified_requirement() {
        let table = RuleTable::from_yaml(
            r#"
rules:
  - symbols: ["7"]
    category: extension
    operation: { type: add, role: seventh, value: 10 }
  - symbols: ["add9"]
    category: addition
    operation: { type: add, role: ninth, value: 14 }
  - symbols: ["b9"]
    category: alteration
    requires: ["extension.7"]
    operation: { type: modify, role: ninth, value: -1 }
"#,
        )
        .unwrap();
        let tokenizer = Tokenizer::new(&table);
        assert!(validate(&table, tokenizer.tokenize("7b9").unwrap()).is_ok());
        assert!(validate(&table, tokenizer.tokenize("b97").unwrap()).is_ok());
        assert_eq!(
            validate(&table, tokenizer.tokenize("add9b9").unwrap()),
            Err(ChordError::MissingRequirement {
                symbol: "b9".to_string(),
                requirement: Requirement::Qualified {
                    category: Category::Extension,
                    symbol: "7".to_string(),
                },
            })
        );
    }

    #[test]
    fn test_finish_preserves_input_order() {
        assert_eq!(check("7sus4").unwrap(), vec!["7", "sus4"]);
    }
}
