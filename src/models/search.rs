use serde::{Deserialize, Serialize};
use validator::Validate;

use super::common::{dedup_preserving_order, QueryParams};

#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("Invalid number for {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Invalid preferred_foot: {0:?} (expected \"left\" or \"right\")")]
    InvalidFoot(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntRange {
    pub min: Option<i32>,
    pub max: Option<i32>,
}

impl IntRange {
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferredFoot {
    Left,
    Right,
}

impl PreferredFoot {
    /// Pattern matched against the card's foot code ("L5 R3" style text).
    pub fn pattern(self) -> &'static str {
        match self {
            PreferredFoot::Left => "%L%",
            PreferredFoot::Right => "%R%",
        }
    }
}

impl std::str::FromStr for PreferredFoot {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("left") {
            Ok(PreferredFoot::Left)
        } else if s.eq_ignore_ascii_case("right") {
            Ok(PreferredFoot::Right)
        } else {
            Err(FilterError::InvalidFoot(s.to_string()))
        }
    }
}

/// Team-color filters. The two club slots are independent requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamColorFilter {
    pub nation: Option<String>,
    pub club_1: Option<String>,
    pub club_2: Option<String>,
    pub special: Option<String>,
}

impl TeamColorFilter {
    pub fn populated(&self) -> usize {
        [&self.nation, &self.club_1, &self.club_2, &self.special]
            .iter()
            .filter(|slot| slot.is_some())
            .count()
    }
}

/// Card search filters for one request. Every dimension is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct FilterRequest {
    pub player_names: Vec<String>,
    pub seasons: Vec<i32>,
    pub positions: Vec<String>,
    pub overall: IntRange,
    pub salary: IntRange,
    pub preferred_foot: Option<PreferredFoot>,
    #[validate(range(min = 1, max = 5))]
    pub weak_foot_min: Option<i32>,
    pub height: IntRange,
    pub weight: IntRange,
    pub body_types: Vec<String>,
    // new_trait plus normal_trait_1..3
    #[validate(length(max = 4))]
    pub traits: Vec<String>,
    pub team_colors: TeamColorFilter,
}

const TRAIT_SLOTS: [&str; 4] = ["new_trait", "normal_trait_1", "normal_trait_2", "normal_trait_3"];

impl FilterRequest {
    pub fn from_query(query: &str) -> Result<Self, FilterError> {
        let params = QueryParams::parse(query);

        let player_names = params
            .get_string("player_name")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let preferred_foot = params
            .get_string("preferred_foot")
            .map(|raw| raw.parse::<PreferredFoot>())
            .transpose()?;

        let traits = TRAIT_SLOTS
            .iter()
            .filter_map(|slot| params.get_string(slot))
            .collect();

        let request = FilterRequest {
            player_names,
            seasons: dedup_preserving_order(params.get_numbers("seasons")?),
            positions: dedup_preserving_order(params.get_vec("positions")),
            overall: IntRange {
                min: params.get_number("min_ovr")?,
                max: params.get_number("max_ovr")?,
            },
            salary: IntRange {
                min: params.get_number("min_salary")?,
                max: params.get_number("max_salary")?,
            },
            preferred_foot,
            weak_foot_min: params.get_number("weak_foot_min")?,
            height: IntRange {
                min: params.get_number("min_height")?,
                max: params.get_number("max_height")?,
            },
            weight: IntRange {
                min: params.get_number("min_weight")?,
                max: params.get_number("max_weight")?,
            },
            body_types: dedup_preserving_order(params.get_vec("body_types")),
            traits: dedup_preserving_order(traits),
            team_colors: TeamColorFilter {
                nation: params.get_string("nation_team_color"),
                club_1: params.get_string("club_team_color_1"),
                club_2: params.get_string("club_team_color_2"),
                special: params.get_string("trait_team_color"),
            },
        };

        request.validate()?;
        Ok(request)
    }

    /// Number of filter dimensions that will contribute a condition.
    pub fn populated_dimensions(&self) -> usize {
        let lists = [
            self.player_names.is_empty(),
            self.seasons.is_empty(),
            self.positions.is_empty(),
            self.body_types.is_empty(),
            self.traits.is_empty(),
        ];
        let ranges = [self.overall, self.salary, self.height, self.weight];

        lists.iter().filter(|empty| !**empty).count()
            + ranges.iter().filter(|range| !range.is_empty()).count()
            + usize::from(self.preferred_foot.is_some())
            + usize::from(self.weak_foot_min.is_some())
            + self.team_colors.populated()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse<T> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub page_size: i64,
    pub is_limited: bool,
}

impl<T> SearchResponse<T> {
    pub fn new(items: Vec<T>, total_count: i64, page_size: i64) -> Self {
        Self {
            items,
            total_count,
            page_size,
            is_limited: total_count > page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_is_an_empty_request() {
        let request = FilterRequest::from_query("").unwrap();
        assert_eq!(request, FilterRequest::default());
        assert_eq!(request.populated_dimensions(), 0);
    }

    #[test]
    fn empty_numeric_fields_are_absent_not_zero() {
        let request =
            FilterRequest::from_query("min_ovr=&max_ovr=&min_height=&weak_foot_min=").unwrap();
        assert!(request.overall.is_empty());
        assert!(request.height.is_empty());
        assert_eq!(request.weak_foot_min, None);
    }

    #[test]
    fn non_numeric_bound_is_rejected() {
        let err = FilterRequest::from_query("max_weight=80kg").unwrap_err();
        assert!(matches!(err, FilterError::InvalidNumber { field: "max_weight", .. }));
    }

    #[test]
    fn non_numeric_season_is_rejected() {
        let err = FilterRequest::from_query("seasons=101&seasons=ICON").unwrap_err();
        assert!(matches!(err, FilterError::InvalidNumber { field: "seasons", .. }));
    }

    #[test]
    fn names_split_on_commas() {
        let request = FilterRequest::from_query("player_name=Son%2C%20Kane%2C%2C").unwrap();
        assert_eq!(request.player_names, vec!["Son", "Kane"]);
    }

    #[test]
    fn trait_slots_merge_in_slot_order() {
        let request = FilterRequest::from_query(
            "normal_trait_2=Finesse+Shot&new_trait=Power+Header&normal_trait_1=&normal_trait_3=Flair",
        )
        .unwrap();
        assert_eq!(request.traits, vec!["Power Header", "Finesse Shot", "Flair"]);
    }

    #[test]
    fn foot_is_parsed_case_insensitively() {
        let request = FilterRequest::from_query("preferred_foot=LEFT").unwrap();
        assert_eq!(request.preferred_foot, Some(PreferredFoot::Left));

        let err = FilterRequest::from_query("preferred_foot=both").unwrap_err();
        assert!(matches!(err, FilterError::InvalidFoot(_)));
    }

    #[test]
    fn weak_foot_out_of_range_fails_validation() {
        let err = FilterRequest::from_query("weak_foot_min=7").unwrap_err();
        assert!(matches!(err, FilterError::Validation(_)));
    }

    #[test]
    fn seasons_are_deduplicated() {
        let request = FilterRequest::from_query("seasons=101&seasons=270&seasons=101").unwrap();
        assert_eq!(request.seasons, vec![101, 270]);
    }

    #[test]
    fn team_color_slots_are_independent() {
        let request = FilterRequest::from_query(
            "club_team_color_1=Real+Madrid&club_team_color_2=Barcelona&trait_team_color=Icons",
        )
        .unwrap();
        assert_eq!(request.team_colors.club_1.as_deref(), Some("Real Madrid"));
        assert_eq!(request.team_colors.club_2.as_deref(), Some("Barcelona"));
        assert_eq!(request.team_colors.special.as_deref(), Some("Icons"));
        assert_eq!(request.team_colors.nation, None);
        assert_eq!(request.populated_dimensions(), 3);
    }

    #[test]
    fn truncation_flag_follows_page_size() {
        let limited = SearchResponse::new(vec![(); 100], 150, 100);
        assert!(limited.is_limited);
        assert_eq!(limited.items.len(), 100);

        let complete = SearchResponse::new(vec![(); 50], 50, 100);
        assert!(!complete.is_limited);

        let exact = SearchResponse::new(vec![(); 100], 100, 100);
        assert!(!exact.is_limited);
    }
}
