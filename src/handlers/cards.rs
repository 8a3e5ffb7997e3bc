use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use sqlx::PgExecutor;

use crate::{
    errors::{AppError, Result},
    models::{CardComparison, CardDetail, CardDetailRow},
    AppState,
};

const CARD_DETAIL_QUERY: &str = r#"
    SELECT pc.spid, pc.player_name, pc.season_name, pc.overall, pc.position,
           pc.full_data->'basic_info' AS basic_info,
           pc.full_data->'game_info' AS game_info,
           pc.full_data->'stats_info' AS stats_info,
           pc.full_data->'image_info' AS image_info,
           CASE WHEN cp.spid IS NULL THEN NULL
                ELSE ARRAY[cp.bp1, cp.bp2, cp.bp3, cp.bp4, cp.bp5, cp.bp6, cp.bp7,
                           cp.bp8, cp.bp9, cp.bp10, cp.bp11, cp.bp12, cp.bp13]
           END AS prices
    FROM player_cards pc
    LEFT JOIN card_prices cp ON pc.spid = cp.spid
    WHERE pc.spid = $1"#;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:spid", get(get_card))
        .route("/compare/:spid1/:spid2", get(compare_cards))
}

async fn fetch_card<'e, E>(executor: E, spid: i64) -> Result<Option<CardDetailRow>>
where
    E: PgExecutor<'e>,
{
    let card = sqlx::query_as::<_, CardDetailRow>(CARD_DETAIL_QUERY)
        .bind(spid)
        .fetch_optional(executor)
        .await?;
    Ok(card)
}

/// GET /api/cards/:spid - full card document, prices and stat layout
pub async fn get_card(
    State(state): State<AppState>,
    Path(spid): Path<i64>,
) -> Result<Json<CardDetail>> {
    let card = fetch_card(&state.db, spid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Card {} not found", spid)))?;

    Ok(Json(CardDetail::from(card)))
}

/// GET /api/cards/compare/:spid1/:spid2
///
/// Both cards must exist; they are returned in the order given.
pub async fn compare_cards(
    State(state): State<AppState>,
    Path((spid1, spid2)): Path<(i64, i64)>,
) -> Result<Json<CardComparison>> {
    let (first, second) = tokio::try_join!(
        fetch_card(&state.db, spid1),
        fetch_card(&state.db, spid2)
    )?;

    match (first, second) {
        (Some(first), Some(second)) => Ok(Json(CardComparison {
            first: first.into(),
            second: second.into(),
        })),
        _ => Err(AppError::NotFound(format!(
            "Cards {} and {} could not both be found",
            spid1, spid2
        ))),
    }
}
