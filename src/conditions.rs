//! Search predicate composition for the card results page.
//!
//! A [`FilterRequest`] becomes one [`SearchConditions`]: a run of ` AND ...`
//! clauses to append after `WHERE 1=1`, plus the bind values for its `$n`
//! placeholders in the order they were emitted. The count query and the row
//! query are both built from the same value, so they always agree on which
//! cards match.

use std::collections::HashSet;

use crate::models::{FilterRequest, IntRange, PreferredFoot, TeamColorFilter};

const SPID_TEXT: &str = "player_cards.spid::text";
const PREFERRED_POSITIONS: &str =
    "player_cards.full_data->'stats_info'->'main_overall'->'preferred_positions'";
const SALARY: &str = "CAST(player_cards.full_data->'game_info'->>'salary' AS INTEGER)";
const PREFERRED_FOOT: &str = "player_cards.full_data->'game_info'->>'preferred_foot'";
const WEAK_FOOT: &str = "player_cards.full_data->'game_info'->>'weak_foot'";
const TRAITS: &str = "player_cards.full_data->'game_info'->'traits'";
const HEIGHT: &str = "player_cards.full_data->'basic_info'->>'height'";
const WEIGHT: &str = "player_cards.full_data->'basic_info'->>'weight'";
const BODY_TYPE: &str = "player_cards.full_data->'basic_info'->>'body_type'";
const NATION: &str = "player_cards.full_data->'basic_info'->>'nation'";
const CLUB_HISTORY: &str = "player_cards.full_data->'basic_info'->'club_history'";

/// A positional bind value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    Int(i32),
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        SqlParam::Text(value)
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_string())
    }
}

impl From<i32> for SqlParam {
    fn from(value: i32) -> Self {
        SqlParam::Int(value)
    }
}

/// Skip the season filter once a request selects nearly every known season.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonDiscount {
    pub ratio: f64,
    pub total_seasons: usize,
}

impl SeasonDiscount {
    fn covers(&self, selected: usize) -> bool {
        self.total_seasons > 0 && selected as f64 >= self.ratio * self.total_seasons as f64
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConditionOptions {
    pub season_discount: Option<SeasonDiscount>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchConditions {
    sql: String,
    params: Vec<SqlParam>,
}

impl SearchConditions {
    pub fn build(filters: &FilterRequest, options: &ConditionOptions) -> Self {
        let mut conditions = Self::default();

        conditions.add_name_conditions(&filters.player_names);
        conditions.add_season_conditions(&filters.seasons, options.season_discount);
        conditions.add_position_conditions(&filters.positions);
        conditions.add_range_conditions("player_cards.overall", filters.overall);
        conditions.add_range_conditions(SALARY, filters.salary);
        conditions.add_foot_condition(filters.preferred_foot);
        if let Some(min) = filters.weak_foot_min {
            conditions.push_comparison(&digits_only(WEAK_FOOT), ">=", min);
        }
        conditions.add_range_conditions(&digits_only(HEIGHT), filters.height);
        conditions.add_range_conditions(&digits_only(WEIGHT), filters.weight);
        conditions.add_body_type_conditions(&filters.body_types);
        conditions.add_trait_conditions(&filters.traits);
        conditions.add_team_color_conditions(&filters.team_colors);

        conditions
    }

    /// Clauses to append after `WHERE 1=1`; empty when nothing is filtered.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// Index of the first placeholder a caller may append after these clauses.
    pub fn next_placeholder(&self) -> usize {
        self.params.len() + 1
    }

    fn bind(&mut self, value: impl Into<SqlParam>) -> String {
        self.params.push(value.into());
        format!("${}", self.params.len())
    }

    fn push_clause(&mut self, clause: &str) {
        self.sql.push_str(" AND ");
        self.sql.push_str(clause);
    }

    /// One parenthesized OR group with a clause per value.
    fn push_any_of<T>(&mut self, values: &[T], mut clause: impl FnMut(&mut Self, &T) -> String) {
        if values.is_empty() {
            return;
        }
        let clauses: Vec<String> = values.iter().map(|value| clause(self, value)).collect();
        self.push_clause(&format!("({})", clauses.join(" OR ")));
    }

    fn push_comparison(&mut self, expr: &str, op: &str, value: i32) {
        let placeholder = self.bind(value);
        self.push_clause(&format!("{expr} {op} {placeholder}"));
    }

    fn add_name_conditions(&mut self, names: &[String]) {
        self.push_any_of(names, |c, name| {
            format!("player_cards.player_name ILIKE {}", c.bind(format!("%{name}%")))
        });
    }

    // The first three digits of a card id are its season id.
    fn add_season_conditions(&mut self, seasons: &[i32], discount: Option<SeasonDiscount>) {
        if let Some(discount) = discount {
            let selected = seasons.iter().collect::<HashSet<_>>().len();
            if discount.covers(selected) {
                tracing::debug!(
                    "Season filter skipped: {} of {} seasons selected",
                    selected,
                    discount.total_seasons
                );
                return;
            }
        }

        self.push_any_of(seasons, |c, season_id| {
            format!("LEFT({SPID_TEXT}, 3) = {}", c.bind(season_id.to_string()))
        });
    }

    fn add_position_conditions(&mut self, positions: &[String]) {
        self.push_any_of(positions, |c, position| {
            format!(
                "EXISTS (SELECT 1 FROM jsonb_array_elements({PREFERRED_POSITIONS}) AS pp WHERE pp->>'position' = {})",
                c.bind(position.as_str())
            )
        });
    }

    fn add_range_conditions(&mut self, expr: &str, range: IntRange) {
        if let Some(min) = range.min {
            self.push_comparison(expr, ">=", min);
        }
        if let Some(max) = range.max {
            self.push_comparison(expr, "<=", max);
        }
    }

    fn add_foot_condition(&mut self, foot: Option<PreferredFoot>) {
        if let Some(foot) = foot {
            let placeholder = self.bind(foot.pattern());
            self.push_clause(&format!("{PREFERRED_FOOT} ILIKE {placeholder}"));
        }
    }

    fn add_body_type_conditions(&mut self, body_types: &[String]) {
        self.push_any_of(body_types, |c, body_type| {
            format!("{BODY_TYPE} = {}", c.bind(body_type.as_str()))
        });
    }

    // Every selected trait must be present, so each gets its own AND'ed clause.
    fn add_trait_conditions(&mut self, traits: &[String]) {
        for card_trait in traits {
            let placeholder = self.bind(card_trait.as_str());
            self.push_clause(&format!(
                "EXISTS (SELECT 1 FROM jsonb_array_elements_text({TRAITS}) AS card_trait WHERE card_trait = {placeholder})"
            ));
        }
    }

    fn add_team_color_conditions(&mut self, team_colors: &TeamColorFilter) {
        if let Some(nation) = &team_colors.nation {
            let placeholder = self.bind(format!("%{nation}%"));
            self.push_clause(&format!("{NATION} LIKE {placeholder}"));
        }

        // Two independent existence checks: a card must have played for both clubs.
        for club in [&team_colors.club_1, &team_colors.club_2].into_iter().flatten() {
            let placeholder = self.bind(club.as_str());
            self.push_clause(&format!(
                "EXISTS (SELECT 1 FROM jsonb_array_elements({CLUB_HISTORY}) AS club_hist WHERE club_hist->>'club' = {placeholder})"
            ));
        }

        // Unknown names resolve to an empty id set and match nothing.
        if let Some(special) = &team_colors.special {
            let placeholder = self.bind(special.as_str());
            self.push_clause(&format!(
                "RIGHT({SPID_TEXT}, 6) IN (SELECT player_id FROM special_teamcolor_players WHERE teamcolor_id IN (SELECT id FROM special_teamcolors WHERE name = {placeholder}))"
            ));
        }
    }
}

/// Integer cast of a free-text field after stripping everything but digits.
/// A field without digits becomes NULL and drops out of the comparison.
fn digits_only(field: &str) -> String {
    format!("CAST(NULLIF(regexp_replace({field}, '[^0-9]', '', 'g'), '') AS INTEGER)")
}
