use sqlx::{postgres::PgPoolOptions, FromRow};
use std::env;

use anyhow::Context;

#[derive(FromRow)]
struct SampleCard {
    spid: i64,
    player_name: String,
    season_name: Option<String>,
    overall: i32,
    position: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await?;

    let total_cards: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM player_cards")
        .fetch_one(&pool)
        .await?;
    println!("player_cards: {} rows", total_cards);

    let total_seasons: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM seasons")
        .fetch_one(&pool)
        .await?;
    println!("seasons: {} rows", total_seasons);

    let samples: Vec<SampleCard> = sqlx::query_as(
        "SELECT spid, player_name, season_name, overall, position FROM player_cards LIMIT 5",
    )
    .fetch_all(&pool)
    .await?;

    println!("\nSample cards:");
    for card in &samples {
        println!(
            "  {} {} [{}] ovr {} {}",
            card.spid,
            card.player_name,
            card.season_name.as_deref().unwrap_or("-"),
            card.overall,
            card.position.as_deref().unwrap_or("-")
        );
    }

    let columns: Vec<String> = sqlx::query_scalar(
        "SELECT column_name::text FROM information_schema.columns WHERE table_name = 'player_cards' ORDER BY ordinal_position",
    )
    .fetch_all(&pool)
    .await?;
    println!("\nplayer_cards columns: {}", columns.join(", "));

    Ok(())
}
