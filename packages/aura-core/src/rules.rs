//! # Modifier Rule Table
//!
//! Declarative data describing every modifier the engine recognizes.
//!
//! ## Purpose
//! A chord symbol suffix such as `m7b5` is a sequence of modifiers. Each
//! modifier is described by one [`ModifierRule`]: its aliases, its category,
//! the primitive [`Operation`]s it performs on the role map, its priority and
//! its optional prerequisites and exclusions. The table carries no behavior;
//! the tokenizer, validator and transducer all read it.
//!
//! ## Categories and Priorities
//! | Category     | Priority | Example aliases          |
//! |--------------|----------|--------------------------|
//! | `quality`    | 1        | `maj`, `m`, `dim`, `aug` |
//! | `suspension` | 1        | `sus4`, `sus2`           |
//! | `extension`  | 2        | `7`, `maj7`, `9`, `13`   |
//! | `addition`   | 3        | `add9`, `add13`          |
//! | `alteration` | 4        | `b5`, `#9`, `omit3`      |
//!
//! Lower priorities are applied first, so alterations always see the roles
//! that extensions and additions populated.
//!
//! ## Loading Custom Tables
//! [`RuleTable::from_yaml`] reads a YAML document. A rule may give either a
//! single `operation:` or a list of `operations:`; both are normalized into
//! one operation list.
//!
//! ```rust
//! use aura_core::{RuleTable, Role};
//!
//! let table = RuleTable::from_yaml(r#"
//! rules:
//!   - symbols: ["m", "min"]
//!     category: quality
//!     case-sensitive: true
//!     operation: { type: replace, role: third, value: 3 }
//! "#).unwrap();
//!
//! assert_eq!(table.len(), 1);
//! assert_eq!(table.rules()[0].operations[0].role(), Role::Third);
//! ```
//!
//! ## Related Modules
//! - `tokenizer` - builds its prefix patterns from the aliases
//! - `validator` - reads categories, `requires` and `excludes`
//! - `transducer` - folds the operations over the role map

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ChordError;

/// A harmonic function slot, in canonical root-to-highest order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Root,
    Third,
    Fifth,
    Seventh,
    Ninth,
    Eleventh,
    Thirteenth,
}

impl Role {
    /// All roles in canonical order.
    pub const ALL: [Role; 7] = [
        Role::Root,
        Role::Third,
        Role::Fifth,
        Role::Seventh,
        Role::Ninth,
        Role::Eleventh,
        Role::Thirteenth,
    ];

    /// Major-scale value used when a role has to be seeded or backfilled.
    pub fn default_semitones(self) -> i32 {
        match self {
            Role::Root => 0,
            Role::Third => 4,
            Role::Fifth => 7,
            Role::Seventh => 11,
            Role::Ninth => 14,
            Role::Eleventh => 17,
            Role::Thirteenth => 21,
        }
    }

    /// Roles that precede this one in canonical order.
    pub fn predecessors(self) -> impl Iterator<Item = Role> {
        Role::ALL.into_iter().take_while(move |r| *r < self)
    }

    pub fn name(self) -> &'static str {
        match self {
            Role::Root => "root",
            Role::Third => "third",
            Role::Fifth => "fifth",
            Role::Seventh => "seventh",
            Role::Ninth => "ninth",
            Role::Eleventh => "eleventh",
            Role::Thirteenth => "thirteenth",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Modifier category. Quality and suspension share one exclusion class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Quality,
    Suspension,
    Extension,
    Addition,
    Alteration,
}

impl Category {
    pub fn default_priority(self) -> u8 {
        match self {
            Category::Quality | Category::Suspension => 1,
            Category::Extension => 2,
            Category::Addition => 3,
            Category::Alteration => 4,
        }
    }

    /// True for the categories that establish the chord's basic character.
    pub fn is_quality_class(self) -> bool {
        matches!(self, Category::Quality | Category::Suspension)
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::Quality => "quality",
            Category::Suspension => "suspension",
            Category::Extension => "extension",
            Category::Addition => "addition",
            Category::Alteration => "alteration",
        }
    }

    pub fn from_name(name: &str) -> Option<Category> {
        match name {
            "quality" => Some(Category::Quality),
            "suspension" => Some(Category::Suspension),
            "extension" => Some(Category::Extension),
            "addition" => Some(Category::Addition),
            "alteration" => Some(Category::Alteration),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Primitive edit applied to the role map.
///
/// `value` is absolute for `Replace`/`Add` and a delta for `Modify`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Operation {
    Replace { role: Role, value: i32 },
    Modify { role: Role, value: i32 },
    Add { role: Role, value: i32 },
    Remove { role: Role },
}

/// The operation's kind without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Replace,
    Modify,
    Add,
    Remove,
}

impl Operation {
    pub fn role(&self) -> Role {
        match *self {
            Operation::Replace { role, .. }
            | Operation::Modify { role, .. }
            | Operation::Add { role, .. }
            | Operation::Remove { role } => role,
        }
    }

    pub fn kind(&self) -> OpKind {
        match self {
            Operation::Replace { .. } => OpKind::Replace,
            Operation::Modify { .. } => OpKind::Modify,
            Operation::Add { .. } => OpKind::Add,
            Operation::Remove { .. } => OpKind::Remove,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Replace { role, value } => write!(f, "replace {} = {}", role, value),
            Operation::Modify { role, value } => write!(f, "modify {} {:+}", role, value),
            Operation::Add { role, value } => write!(f, "add {} = {}", role, value),
            Operation::Remove { role } => write!(f, "remove {}", role),
        }
    }
}

/// Prerequisite reference.
///
/// Written as a category (`extension`), a modifier symbol (`maj7`) or a
/// category-qualified symbol (`extension.7`, `quality.major`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Requirement {
    Category(Category),
    Symbol(String),
    Qualified { category: Category, symbol: String },
}

impl Requirement {
    /// Whether a modifier of `category`, matched as `alias`, fulfils this requirement.
    pub fn is_met_by(&self, rule: &ModifierRule, alias: &str) -> bool {
        match self {
            Requirement::Category(category) => rule.category == *category,
            Requirement::Symbol(symbol) => rule.has_symbol(symbol) || alias == symbol,
            Requirement::Qualified { category, symbol } => {
                rule.category == *category && (rule.has_symbol(symbol) || alias == symbol)
            }
        }
    }
}

impl From<String> for Requirement {
    fn from(value: String) -> Self {
        if let Some(category) = Category::from_name(&value) {
            return Requirement::Category(category);
        }
        match value.split_once('.') {
            Some((prefix, symbol)) if !symbol.is_empty() => match Category::from_name(prefix) {
                Some(category) => Requirement::Qualified {
                    category,
                    symbol: symbol.to_string(),
                },
                None => Requirement::Symbol(value),
            },
            _ => Requirement::Symbol(value),
        }
    }
}

impl From<Requirement> for String {
    fn from(value: Requirement) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Category(category) => f.write_str(category.name()),
            Requirement::Symbol(symbol) => f.write_str(symbol),
            Requirement::Qualified { category, symbol } => write!(f, "{}.{}", category, symbol),
        }
    }
}

/// One recognized modifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ModifierRule {
    /// Aliases; the first is canonical.
    pub symbols: Vec<String>,
    pub category: Category,
    pub operations: Vec<Operation>,
    pub priority: u8,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<Requirement>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excludes: Vec<Category>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_default: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub case_sensitive: bool,
}

impl ModifierRule {
    fn new(category: Category, symbols: &[&str], operations: Vec<Operation>) -> Self {
        ModifierRule {
            symbols: symbols.iter().map(|s| s.to_string()).collect(),
            category,
            operations,
            priority: category.default_priority(),
            requires: Vec::new(),
            excludes: Vec::new(),
            is_default: false,
            case_sensitive: false,
        }
    }

    fn requires(mut self, requirement: Requirement) -> Self {
        self.requires.push(requirement);
        self
    }

    fn excludes(mut self, category: Category) -> Self {
        self.excludes.push(category);
        self
    }

    fn default_quality(mut self) -> Self {
        self.is_default = true;
        self
    }

    fn case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }

    /// Canonical symbol (first alias).
    pub fn symbol(&self) -> &str {
        self.symbols.first().map(String::as_str).unwrap_or_default()
    }

    pub fn has_symbol(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }
}

fn replace(role: Role, value: i32) -> Operation {
    Operation::Replace { role, value }
}

fn modify(role: Role, value: i32) -> Operation {
    Operation::Modify { role, value }
}

fn add(role: Role, value: i32) -> Operation {
    Operation::Add { role, value }
}

fn remove(role: Role) -> Operation {
    Operation::Remove { role }
}

/// Immutable, validated collection of modifier rules.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleTable {
    rules: Vec<ModifierRule>,
}

impl Default for RuleTable {
    fn default() -> Self {
        RuleTable::standard()
    }
}

impl RuleTable {
    /// The built-in lexicon.
    pub fn standard() -> Self {
        use Category::*;
        use Role::*;

        let after_seventh = || Requirement::Category(Extension);

        let rules = vec![
            // Qualities. The fifth is implied with `add` so alterations may still adjust it.
            ModifierRule::new(Quality, &["maj", "M", "major"], vec![replace(Third, 4), add(Fifth, 7)])
                .default_quality()
                .case_sensitive(),
            ModifierRule::new(Quality, &["m", "min", "minor", "-"], vec![replace(Third, 3), add(Fifth, 7)])
                .case_sensitive(),
            ModifierRule::new(Quality, &["dim", "°", "o"], vec![replace(Third, 3), replace(Fifth, 6)]),
            ModifierRule::new(
                Quality,
                &["dim7", "°7", "o7"],
                vec![replace(Third, 3), replace(Fifth, 6), add(Seventh, 9)],
            ),
            ModifierRule::new(Quality, &["aug", "+"], vec![add(Third, 4), replace(Fifth, 8)]),
            ModifierRule::new(
                Quality,
                &["ø", "ø7"],
                vec![replace(Third, 3), replace(Fifth, 6), add(Seventh, 10)],
            ),
            ModifierRule::new(Quality, &["5"], vec![add(Fifth, 7)]).excludes(Extension),
            // Suspensions
            ModifierRule::new(Suspension, &["sus4", "sus"], vec![replace(Third, 5), add(Fifth, 7)]),
            ModifierRule::new(Suspension, &["sus2"], vec![replace(Third, 2), add(Fifth, 7)]),
            // Extensions
            ModifierRule::new(Extension, &["7"], vec![add(Seventh, 10)]),
            ModifierRule::new(Extension, &["maj7", "M7", "Δ", "Δ7"], vec![add(Seventh, 11)])
                .case_sensitive(),
            ModifierRule::new(Extension, &["9"], vec![add(Seventh, 10), add(Ninth, 14)]),
            ModifierRule::new(
                Extension,
                &["11"],
                vec![add(Seventh, 10), add(Ninth, 14), add(Eleventh, 17)],
            ),
            ModifierRule::new(
                Extension,
                &["13"],
                vec![add(Seventh, 10), add(Ninth, 14), add(Thirteenth, 21)],
            ),
            ModifierRule::new(Extension, &["maj9", "M9", "Δ9"], vec![add(Seventh, 11), add(Ninth, 14)])
                .case_sensitive(),
            ModifierRule::new(
                Extension,
                &["maj11", "M11"],
                vec![add(Seventh, 11), add(Ninth, 14), add(Eleventh, 17)],
            )
            .case_sensitive(),
            ModifierRule::new(
                Extension,
                &["maj13", "M13"],
                vec![add(Seventh, 11), add(Ninth, 14), add(Thirteenth, 21)],
            )
            .case_sensitive(),
            // Additions
            ModifierRule::new(Addition, &["add9", "add2"], vec![add(Ninth, 14)]),
            ModifierRule::new(Addition, &["add11", "add4"], vec![add(Eleventh, 17)]),
            ModifierRule::new(Addition, &["add13", "add6", "6"], vec![add(Thirteenth, 21)]),
            // Alterations
            ModifierRule::new(Alteration, &["b5", "♭5", "-5"], vec![modify(Fifth, -1)]),
            ModifierRule::new(Alteration, &["#5", "♯5", "+5"], vec![modify(Fifth, 1)]),
            ModifierRule::new(Alteration, &["b9", "♭9", "-9"], vec![modify(Ninth, -1)])
                .requires(after_seventh()),
            ModifierRule::new(Alteration, &["#9", "♯9", "+9"], vec![modify(Ninth, 1)])
                .requires(after_seventh()),
            ModifierRule::new(Alteration, &["#11", "♯11", "+11"], vec![modify(Eleventh, 1)])
                .requires(after_seventh()),
            ModifierRule::new(Alteration, &["b13", "♭13", "-13"], vec![modify(Thirteenth, -1)])
                .requires(after_seventh()),
            ModifierRule::new(Alteration, &["#13", "♯13"], vec![modify(Thirteenth, 1)])
                .requires(after_seventh()),
            ModifierRule::new(Alteration, &["no3", "omit3"], vec![remove(Third)]),
            ModifierRule::new(Alteration, &["no5", "omit5"], vec![remove(Fifth)]),
        ];

        RuleTable { rules }
    }

    /// Build a table from explicit rules, rejecting authoring defects.
    pub fn from_rules(rules: Vec<ModifierRule>) -> Result<Self, ChordError> {
        let mut seen: HashMap<String, Vec<(String, String, bool)>> = HashMap::new();
        let mut default_rule: Option<String> = None;

        for rule in &rules {
            let name = rule.symbol().to_string();
            if rule.symbols.is_empty() {
                return Err(table_error("<unnamed>", "rule has no symbols"));
            }
            if rule.operations.is_empty() {
                return Err(table_error(&name, "rule has no operations"));
            }
            if rule.is_default {
                if let Some(existing) = &default_rule {
                    return Err(table_error(
                        &name,
                        &format!("'{}' is already the default quality", existing),
                    ));
                }
                if rule.category != Category::Quality {
                    return Err(table_error(&name, "only a quality rule can be the default"));
                }
                default_rule = Some(name.clone());
            }

            for symbol in &rule.symbols {
                if symbol.is_empty() {
                    return Err(table_error(&name, "empty alias"));
                }
                // Case-insensitive aliases collide with any spelling of the same text.
                let entries = seen.entry(symbol.to_lowercase()).or_default();
                let clash = entries.iter().find(|(existing, _, existing_cs)| {
                    existing == symbol || !rule.case_sensitive || !existing_cs
                });
                if let Some((_, owner, _)) = clash {
                    return Err(table_error(
                        &name,
                        &format!("alias '{}' is already used by '{}'", symbol, owner),
                    ));
                }
                entries.push((symbol.clone(), name.clone(), rule.case_sensitive));
            }
        }

        for rule in &rules {
            for requirement in &rule.requires {
                check_requirement(rule, requirement, &rules)?;
            }
        }

        Ok(RuleTable { rules })
    }

    /// Parse a YAML rule document (see module docs for the shape).
    pub fn from_yaml(source: &str) -> Result<Self, ChordError> {
        let raw: RawRuleTable = serde_yaml::from_str(source)
            .map_err(|e| table_error("<document>", &e.to_string()))?;

        let rules = raw
            .rules
            .into_iter()
            .map(RawRule::into_rule)
            .collect::<Result<Vec<_>, _>>()?;

        RuleTable::from_rules(rules)
    }

    pub fn rules(&self) -> &[ModifierRule] {
        &self.rules
    }

    pub fn get(&self, index: usize) -> Option<&ModifierRule> {
        self.rules.get(index)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule with the given canonical or alias symbol (exact match).
    pub fn find(&self, symbol: &str) -> Option<&ModifierRule> {
        self.rules.iter().find(|r| r.has_symbol(symbol))
    }

    /// The implicit quality assumed when none is written.
    pub fn default_rule(&self) -> Option<&ModifierRule> {
        self.rules.iter().find(|r| r.is_default)
    }
}

/// A requirement must name a known category and be satisfiable by some
/// other rule in the same table.
fn check_requirement(
    owner: &ModifierRule,
    requirement: &Requirement,
    rules: &[ModifierRule],
) -> Result<(), ChordError> {
    if let Requirement::Symbol(symbol) = requirement {
        if let Some((prefix, _)) = symbol.split_once('.') {
            return Err(table_error(
                owner.symbol(),
                &format!("unknown category '{}' in requirement '{}'", prefix, symbol),
            ));
        }
    }

    let satisfiable = rules
        .iter()
        .filter(|rule| !std::ptr::eq(*rule, owner))
        .any(|rule| {
            rule.symbols
                .iter()
                .any(|alias| requirement.is_met_by(rule, alias))
        });
    if satisfiable {
        Ok(())
    } else {
        Err(table_error(
            owner.symbol(),
            &format!("requirement '{}' matches no other rule", requirement),
        ))
    }
}

fn table_error(rule: &str, message: &str) -> ChordError {
    ChordError::RuleTable {
        rule: rule.to_string(),
        message: message.to_string(),
    }
}

/// Raw rule table for YAML deserialization
#[derive(Deserialize, Debug, Default)]
struct RawRuleTable {
    #[serde(default)]
    rules: Vec<RawRule>,
}

/// Raw rule: accepts both the `operation` and `operations` shapes.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "kebab-case")]
struct RawRule {
    symbols: Vec<String>,
    category: Category,
    operation: Option<Operation>,
    #[serde(default)]
    operations: Vec<Operation>,
    priority: Option<u8>,
    #[serde(default)]
    requires: Vec<Requirement>,
    #[serde(default)]
    excludes: Vec<Category>,
    #[serde(default)]
    is_default: bool,
    #[serde(default)]
    case_sensitive: bool,
}

impl RawRule {
    fn into_rule(self) -> Result<ModifierRule, ChordError> {
        let name = self.symbols.first().cloned().unwrap_or_else(|| "<unnamed>".to_string());
        if self.operation.is_some() && !self.operations.is_empty() {
            return Err(table_error(&name, "give either 'operation' or 'operations', not both"));
        }

        let operations = match self.operation {
            Some(op) => vec![op],
            None => self.operations,
        };

        Ok(ModifierRule {
            symbols: self.symbols,
            category: self.category,
            operations,
            priority: self.priority.unwrap_or_else(|| self.category.default_priority()),
            requires: self.requires,
            excludes: self.excludes,
            is_default: self.is_default,
            case_sensitive: self.case_sensitive,
        })
    }
}
