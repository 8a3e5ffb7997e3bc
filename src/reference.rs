//! Static display-order tables.
//!
//! These follow the official site's ordering and never change at runtime, so
//! they live as `const` data rather than anything loaded or shared mutably.

use serde::Serialize;

/// Season ids in display order. Seasons missing from this table are not offered.
pub const SEASON_ORDER: &[i32] = &[
    100, 110, 101, 113, 114, 111, 851, 848, 850, 846, 845, 849, 840,
    839, 836, 829, 828, 827, 826, 825, 821, 815, 818,
    814, 813, 802, 801, 290, 291, 289, 283, 284, 272,
    273, 274, 270, 268, 265, 264, 835, 811, 281, 261,
    256, 252, 251, 253, 249, 246, 237, 231, 233, 254,
    236, 804, 276, 262, 238, 219, 218, 217, 216, 214,
    213, 210, 207, 206, 202, 201, 831, 832, 807, 808,
    278, 279, 258, 259, 240, 241, 220, 222, 211, 212,
    844, 820, 287, 267, 250, 230, 215, 834, 810, 280,
    260, 242, 221, 234, 225, 806, 293, 294, 295, 298,
    297, 247, 516, 514, 512, 510, 507, 504, 830, 805,
    277, 257, 239, 517, 515, 513, 511, 508, 506, 503, 502,
    501, 500, 300, 324, 323, 322, 321, 320, 319, 318, 317,
    812,
];

pub const POSITION_ORDER: &[&str] = &[
    "ST", "W", "CF", "CAM", "M", "CM", "CDM", "WB", "B", "CB", "SW", "GK",
];

const GK_SUMMARY_ORDER: &[&str] = &["다이빙", "핸들링", "킥", "반응속도", "스피드", "위치선정"];

const FIELD_SUMMARY_ORDER: &[&str] = &["스피드", "슛", "패스", "드리블", "수비", "피지컬"];

const GK_STATS: &[&str] = &[
    "GK 다이빙",
    "GK 핸들링",
    "GK 킥",
    "GK 반응속도",
    "GK 위치 선정",
];

const FIELD_STATS: &[&str] = &[
    "속력",
    "가속력",
    "골 결정력",
    "슛 파워",
    "중거리 슛",
    "위치 선정",
    "발리슛",
    "페널티 킥",
    "짧은 패스",
    "시야",
    "크로스",
    "긴 패스",
    "프리킥",
    "커브",
    "드리블",
    "볼 컨트롤",
    "민첩성",
    "밸런스",
    "반응 속도",
    "대인 수비",
    "태클",
    "가로채기",
    "헤더",
    "슬라이딩 태클",
    "몸싸움",
    "스태미너",
    "적극성",
    "점프",
    "침착성",
];

/// Order in which a card's stats are laid out on the detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatDisplayOrder {
    pub positions: &'static [&'static str],
    pub summary: &'static [&'static str],
    pub detailed: Vec<&'static str>,
}

impl StatDisplayOrder {
    /// Keepers list their GK stats first; everyone else lists them last.
    pub fn for_card_position(card_position: Option<&str>) -> Self {
        let is_keeper = card_position == Some("GK");
        let (summary, first, second) = if is_keeper {
            (GK_SUMMARY_ORDER, GK_STATS, FIELD_STATS)
        } else {
            (FIELD_SUMMARY_ORDER, FIELD_STATS, GK_STATS)
        };

        Self {
            positions: POSITION_ORDER,
            summary,
            detailed: first.iter().chain(second).copied().collect(),
        }
    }
}

/// Reorders `items` by [`SEASON_ORDER`], dropping seasons the table does not list.
pub fn order_by_season<T>(items: Vec<T>, season_id: impl Fn(&T) -> i32) -> Vec<T> {
    let mut ranked: Vec<(usize, T)> = items
        .into_iter()
        .filter_map(|item| {
            let id = season_id(&item);
            SEASON_ORDER
                .iter()
                .position(|&known| known == id)
                .map(|rank| (rank, item))
        })
        .collect();
    ranked.sort_by_key(|(rank, _)| *rank);
    ranked.into_iter().map(|(_, item)| item).collect()
}
