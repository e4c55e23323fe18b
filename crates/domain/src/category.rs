use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Identifies an independent leaderboard: `(game_type, sub_type)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CategoryKey {
    pub game_type: i32,
    pub sub_type: i32,
}

impl CategoryKey {
    pub const fn new(game_type: i32, sub_type: i32) -> Self {
        Self {
            game_type,
            sub_type,
        }
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.game_type, self.sub_type)
    }
}

/// Which way a ranked list is ordered.
///
/// `Ascending` is used by time-attack categories where a lower value wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankDirection {
    Ascending,
    #[default]
    Descending,
}

impl RankDirection {
    /// Orders two values so that `Ordering::Less` means `a` ranks ahead of `b`.
    #[inline]
    pub fn compare(self, a: f64, b: f64) -> Ordering {
        match self {
            RankDirection::Ascending => a.total_cmp(&b),
            RankDirection::Descending => b.total_cmp(&a),
        }
    }

    #[inline]
    pub fn is_strictly_better(self, candidate: f64, incumbent: f64) -> bool {
        self.compare(candidate, incumbent) == Ordering::Less
    }

    pub fn best_of(self, a: f64, b: f64) -> f64 {
        if self.is_strictly_better(b, a) {
            b
        } else {
            a
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RankDirection::Ascending => "ascending",
            RankDirection::Descending => "descending",
        }
    }
}

/// The record field a ranked list orders by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankField {
    #[default]
    Score,
    PlayTime,
}

impl RankField {
    pub fn as_str(self) -> &'static str {
        match self {
            RankField::Score => "score",
            RankField::PlayTime => "play_time",
        }
    }
}

/// Key of one bounded ranked view: a category plus the field it ranks by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RankKey {
    pub category: CategoryKey,
    pub field: RankField,
}

impl RankKey {
    pub const fn new(category: CategoryKey, field: RankField) -> Self {
        Self { category, field }
    }

    pub const fn primary(category: CategoryKey) -> Self {
        Self {
            category,
            field: RankField::Score,
        }
    }
}

impl fmt::Display for RankKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.category, self.field.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryRank {
    pub field: RankField,
    #[serde(default)]
    pub direction: RankDirection,
}

/// Ranking semantics for one game type, optionally narrowed to a sub type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub game_type: i32,

    #[serde(default)]
    pub sub_type: Option<i32>,

    #[serde(default)]
    pub direction: RankDirection,

    #[serde(default)]
    pub secondary: Option<SecondaryRank>,
}

impl CategoryRule {
    pub fn matches(&self, key: CategoryKey) -> bool {
        self.game_type == key.game_type && self.sub_type.is_none_or(|s| s == key.sub_type)
    }
}

/// Resolves the ordering of every ranked view from the configured rules.
///
/// Rules naming a sub type win over rules that cover the whole game type.
/// Categories without a rule rank by score, higher first.
#[derive(Debug, Clone, Default)]
pub struct CategoryRules {
    rules: Vec<CategoryRule>,
}

impl CategoryRules {
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        Self { rules }
    }

    fn rule_for(&self, key: CategoryKey) -> Option<&CategoryRule> {
        self.rules
            .iter()
            .find(|r| r.sub_type.is_some() && r.matches(key))
            .or_else(|| self.rules.iter().find(|r| r.matches(key)))
    }

    pub fn direction(&self, key: RankKey) -> RankDirection {
        let rule = self.rule_for(key.category);
        match key.field {
            RankField::Score => rule.map(|r| r.direction).unwrap_or_default(),
            field => rule
                .and_then(|r| r.secondary)
                .filter(|s| s.field == field)
                .map(|s| s.direction)
                .unwrap_or_default(),
        }
    }

    /// Every ranked view maintained for a category: the score list first,
    /// then the secondary list when one is declared.
    pub fn views(&self, category: CategoryKey) -> Vec<(RankKey, RankDirection)> {
        let rule = self.rule_for(category);
        let mut views = vec![(
            RankKey::primary(category),
            rule.map(|r| r.direction).unwrap_or_default(),
        )];
        if let Some(secondary) = rule.and_then(|r| r.secondary) {
            views.push((RankKey::new(category, secondary.field), secondary.direction));
        }
        views
    }

    pub fn has_view(&self, key: RankKey) -> bool {
        match key.field {
            RankField::Score => true,
            field => self
                .rule_for(key.category)
                .and_then(|r| r.secondary)
                .is_some_and(|s| s.field == field),
        }
    }
}
