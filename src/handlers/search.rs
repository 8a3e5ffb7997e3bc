use axum::{
    extract::{Request, State},
    response::Json,
    routing::get,
    Router,
};
use sqlx::PgPool;

use crate::{
    errors::Result,
    models::{CardSummary, FilterOptions, FilterRequest, SearchResponse, SeasonOption},
    reference::order_by_season,
    repository, AppState,
};

const FILTER_OPTIONS_KEY: &str = "filter_options";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search", get(search_cards))
        .route("/filters", get(filter_options))
}

/// GET /api/cards/search
///
/// Every filter is optional; see `FilterRequest::from_query` for the accepted
/// parameters. Returns the first page ordered by overall, then name.
pub async fn search_cards(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<SearchResponse<CardSummary>>> {
    let query_string = request.uri().query().unwrap_or("");
    let filters = FilterRequest::from_query(query_string)?;

    tracing::info!(
        "🔍 SEARCH REQUEST: {} filter dimensions, page_size={}",
        filters.populated_dimensions(),
        state.config.page_size
    );

    let mut conn = state.db.acquire().await?;
    let response = repository::search_cards(
        &mut conn,
        &filters,
        &state.config.condition_options(),
        state.config.page_size,
    )
    .await?;

    if response.is_limited {
        tracing::info!(
            "📄 Result truncated: showing {} of {} cards",
            response.items.len(),
            response.total_count
        );
    }

    Ok(Json(response))
}

/// GET /api/cards/filters - selector values for the search form
pub async fn filter_options(State(state): State<AppState>) -> Result<Json<FilterOptions>> {
    if let Some(cached) = state.cache.get::<FilterOptions>(FILTER_OPTIONS_KEY) {
        return Ok(Json(cached));
    }

    let options = load_filter_options(&state.db).await?;

    if let Err(e) = state
        .cache
        .set(FILTER_OPTIONS_KEY, &options, state.config.filter_options_ttl)
    {
        tracing::warn!("Failed to cache filter options: {}", e);
    }

    Ok(Json(options))
}

async fn load_filter_options(db: &PgPool) -> Result<FilterOptions> {
    let seasons: Vec<SeasonOption> =
        sqlx::query_as("SELECT season_id, season_name, season_img_url FROM seasons")
            .fetch_all(db)
            .await?;

    let positions = names(db, "SELECT position FROM positions ORDER BY position").await?;
    let nation_teamcolors =
        names(db, "SELECT nation_name FROM nation_teamcolors ORDER BY nation_name").await?;
    let club_teamcolors =
        names(db, "SELECT club_name FROM club_teamcolors ORDER BY club_name").await?;
    // Same table the special team color filter matches against
    let special_teamcolors = names(db, "SELECT name FROM special_teamcolors ORDER BY name").await?;
    let new_traits = names(
        db,
        "SELECT trait_name FROM player_traits WHERE trait_type = 'new' ORDER BY trait_name",
    )
    .await?;
    let normal_traits = names(
        db,
        "SELECT trait_name FROM player_traits WHERE trait_type = 'normal' ORDER BY trait_name",
    )
    .await?;

    Ok(FilterOptions {
        seasons: order_by_season(seasons, |season| season.season_id),
        positions,
        nation_teamcolors,
        club_teamcolors,
        special_teamcolors,
        new_traits,
        normal_traits,
    })
}

async fn names(db: &PgPool, sql: &'static str) -> Result<Vec<String>> {
    Ok(sqlx::query_scalar::<_, String>(sql).fetch_all(db).await?)
}
