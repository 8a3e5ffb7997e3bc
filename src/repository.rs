use sqlx::{
    postgres::{PgArguments, PgRow},
    query::Query,
    FromRow, PgConnection, PgExecutor, Postgres, Row,
};

use crate::{
    conditions::{ConditionOptions, SearchConditions, SqlParam},
    errors::Result,
    models::{CardSummary, FilterRequest, SearchResponse},
};

const CARD_PROJECTION: &str = r#"
    SELECT spid, player_name, season_name, overall, position,
           full_data->'image_info'->>'mini_faceon' AS image,
           full_data->'image_info'->>'season_img' AS season_img,
           full_data->'image_info'->>'nation_img' AS nation_img,
           full_data->'game_info'->>'salary' AS salary,
           full_data->'basic_info'->>'nation' AS nation,
           full_data->'stats_info'->'main_overall'->'preferred_positions' AS preferred_positions,
           full_data->'game_info'->>'preferred_foot' AS preferred_foot,
           full_data->'game_info'->>'weak_foot' AS weak_foot,
           full_data->'basic_info'->>'height' AS height,
           full_data->'basic_info'->>'weight' AS weight,
           full_data->'basic_info'->>'body_type' AS body_type,
           full_data->'game_info'->>'skill_moves' AS skill_moves,
           full_data->'game_info'->'traits' AS traits
    FROM player_cards
    WHERE 1=1"#;

pub fn count_statement(conditions: &SearchConditions) -> String {
    format!("SELECT COUNT(*) FROM player_cards WHERE 1=1{}", conditions.sql())
}

/// Row query; `LIMIT`/`OFFSET` take the two placeholders after the conditions.
pub fn rows_statement(conditions: &SearchConditions) -> String {
    let limit = conditions.next_placeholder();
    format!(
        "{CARD_PROJECTION}{} ORDER BY overall DESC, player_name LIMIT ${} OFFSET ${}",
        conditions.sql(),
        limit,
        limit + 1
    )
}

fn bind_conditions<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    conditions: &'q SearchConditions,
) -> Query<'q, Postgres, PgArguments> {
    for param in conditions.params() {
        query = match param {
            SqlParam::Text(value) => query.bind(value.as_str()),
            SqlParam::Int(value) => query.bind(*value),
        };
    }
    query
}

pub async fn count_cards<'e, E>(executor: E, conditions: &SearchConditions) -> Result<i64>
where
    E: PgExecutor<'e>,
{
    let sql = count_statement(conditions);
    let row = bind_conditions(sqlx::query(&sql), conditions)
        .fetch_one(executor)
        .await?;
    Ok(row.get::<i64, _>(0))
}

pub async fn fetch_cards<'e, E>(
    executor: E,
    conditions: &SearchConditions,
    limit: i64,
    offset: i64,
) -> Result<Vec<CardSummary>>
where
    E: PgExecutor<'e>,
{
    let sql = rows_statement(conditions);
    let rows: Vec<PgRow> = bind_conditions(sqlx::query(&sql), conditions)
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await?;

    let cards = rows
        .iter()
        .map(CardSummary::from_row)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(cards)
}

/// Counts and fetches one page of cards. The conditions are built once and
/// shared by both statements.
pub async fn search_cards(
    conn: &mut PgConnection,
    filters: &FilterRequest,
    options: &ConditionOptions,
    page_size: i64,
) -> Result<SearchResponse<CardSummary>> {
    let conditions = SearchConditions::build(filters, options);

    let query_start = std::time::Instant::now();
    let total_count = count_cards(&mut *conn, &conditions).await?;
    tracing::info!(
        "⏱️  COUNT QUERY: {}ms (result={})",
        query_start.elapsed().as_millis(),
        total_count
    );

    let search_start = std::time::Instant::now();
    let items = fetch_cards(&mut *conn, &conditions, page_size, 0).await?;
    tracing::info!(
        "⏱️  SEARCH QUERY: {}ms (returned {} cards)",
        search_start.elapsed().as_millis(),
        items.len()
    );

    Ok(SearchResponse::new(items, total_count, page_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IntRange, TeamColorFilter};

    fn sample_conditions() -> SearchConditions {
        let request = FilterRequest {
            player_names: vec!["Son".to_string()],
            overall: IntRange { min: Some(90), max: None },
            team_colors: TeamColorFilter {
                club_1: Some("Tottenham".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        SearchConditions::build(&request, &ConditionOptions::default())
    }

    #[test]
    fn count_and_rows_share_the_same_conditions() {
        let conditions = sample_conditions();
        let count = count_statement(&conditions);
        let rows = rows_statement(&conditions);

        assert!(count.ends_with(conditions.sql()));
        let after_where = rows.split("WHERE 1=1").nth(1).unwrap();
        assert!(after_where.starts_with(conditions.sql()));
    }

    #[test]
    fn pagination_placeholders_follow_the_conditions() {
        let conditions = sample_conditions();
        assert_eq!(conditions.params().len(), 3);
        assert!(rows_statement(&conditions).ends_with("LIMIT $4 OFFSET $5"));
    }

    #[test]
    fn unfiltered_statements_have_no_extra_clauses() {
        let conditions = SearchConditions::default();
        assert_eq!(count_statement(&conditions), "SELECT COUNT(*) FROM player_cards WHERE 1=1");
        assert!(rows_statement(&conditions)
            .ends_with("WHERE 1=1 ORDER BY overall DESC, player_name LIMIT $1 OFFSET $2"));
    }
}
