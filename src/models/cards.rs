use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::reference::StatDisplayOrder;

/// One row of the search results page.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CardSummary {
    pub spid: i64,
    pub player_name: String,
    pub season_name: Option<String>,
    pub overall: i32,
    pub position: Option<String>,
    pub image: Option<String>,
    pub season_img: Option<String>,
    pub nation_img: Option<String>,
    pub salary: Option<String>,
    pub nation: Option<String>,
    pub preferred_positions: Option<serde_json::Value>,
    pub preferred_foot: Option<String>,
    pub weak_foot: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub body_type: Option<String>,
    pub skill_moves: Option<String>,
    pub traits: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CardDetailRow {
    pub spid: i64,
    pub player_name: String,
    pub season_name: Option<String>,
    pub overall: i32,
    pub position: Option<String>,
    pub basic_info: Option<serde_json::Value>,
    pub game_info: Option<serde_json::Value>,
    pub stats_info: Option<serde_json::Value>,
    pub image_info: Option<serde_json::Value>,
    // bp1..bp13, absent when the card has no price row
    pub prices: Option<Vec<Option<i64>>>,
}

impl CardDetailRow {
    pub fn card_position(&self) -> Option<&str> {
        self.stats_info
            .as_ref()
            .and_then(|stats| stats.pointer("/main_overall/card_position"))
            .and_then(serde_json::Value::as_str)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CardDetail {
    #[serde(flatten)]
    pub card: CardDetailRow,
    pub display_order: StatDisplayOrder,
}

impl From<CardDetailRow> for CardDetail {
    fn from(card: CardDetailRow) -> Self {
        let display_order = StatDisplayOrder::for_card_position(card.card_position());
        Self {
            card,
            display_order,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CardComparison {
    pub first: CardDetail,
    pub second: CardDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SeasonOption {
    pub season_id: i32,
    pub season_name: String,
    pub season_img_url: Option<String>,
}

/// Everything the search form needs to render its selectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterOptions {
    pub seasons: Vec<SeasonOption>,
    pub positions: Vec<String>,
    pub nation_teamcolors: Vec<String>,
    pub club_teamcolors: Vec<String>,
    pub special_teamcolors: Vec<String>,
    pub new_traits: Vec<String>,
    pub normal_traits: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn detail_row(stats_info: serde_json::Value) -> CardDetailRow {
        CardDetailRow {
            spid: 101001234,
            player_name: "Test Keeper".to_string(),
            season_name: Some("ICON".to_string()),
            overall: 90,
            position: Some("GK".to_string()),
            basic_info: None,
            game_info: None,
            stats_info: Some(stats_info),
            image_info: None,
            prices: None,
        }
    }

    #[test]
    fn keepers_get_goalkeeper_stat_order() {
        let detail = CardDetail::from(detail_row(json!({
            "main_overall": { "card_position": "GK" }
        })));
        assert_eq!(detail.display_order.summary[0], "다이빙");
    }

    #[test]
    fn missing_card_position_falls_back_to_outfield_order() {
        let detail = CardDetail::from(detail_row(json!({})));
        assert_eq!(detail.display_order.summary[0], "스피드");
    }
}
