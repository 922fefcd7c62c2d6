/// Database Handle Tests
///
/// select_single_row / select_multiple_rows against the step 07 working
/// copy: result shapes, row order, cardinality and engine errors.

mod common;

use anyhow::Result;
use common::{as_json, setup_suite, teardown_suite};
use serde_json::json;
use sql_movies::{Error, ErrorKind};

#[tokio::test]
async fn test_count_movies() -> Result<()> {
    let suite = setup_suite("06", "07").await?;

    let result = suite
        .db
        .select_single_row("SELECT COUNT(*) AS count FROM movies;")
        .await;

    teardown_suite(suite).await?;
    assert_eq!(serde_json::Value::Object(result?), json!({ "count": 9 }));
    Ok(())
}

#[tokio::test]
async fn test_rows_keep_engine_order() -> Result<()> {
    let suite = setup_suite("06", "07").await?;

    let descending = suite
        .db
        .select_multiple_rows("SELECT id FROM movies ORDER BY id DESC")
        .await;
    let ascending = suite
        .db
        .select_multiple_rows("SELECT id FROM movies ORDER BY id ASC")
        .await;

    teardown_suite(suite).await?;

    let ids = |rows: Vec<sql_movies::Row>| -> Vec<i64> {
        rows.iter().map(|row| row["id"].as_i64().unwrap()).collect()
    };
    assert_eq!(ids(descending?), vec![9, 8, 7, 6, 5, 4, 3, 2, 1]);
    assert_eq!(ids(ascending?), vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
    Ok(())
}

#[tokio::test]
async fn test_column_names_follow_aliases() -> Result<()> {
    let suite = setup_suite("06", "07").await?;

    let result = suite
        .db
        .select_single_row(
            "SELECT original_title AS 'title', runtime AS minutes, release_date \
             FROM movies WHERE id = 3",
        )
        .await;

    teardown_suite(suite).await?;
    assert_eq!(
        serde_json::Value::Object(result?),
        json!({ "title": "The Martian", "minutes": 144, "release_date": "2015-09-30" })
    );
    Ok(())
}

#[tokio::test]
async fn test_single_row_rejects_zero_rows() -> Result<()> {
    let suite = setup_suite("06", "07").await?;

    let result = suite
        .db
        .select_single_row("SELECT * FROM movies WHERE id = 404")
        .await;

    teardown_suite(suite).await?;
    assert!(matches!(result, Err(Error::Cardinality { actual: 0 })));
    Ok(())
}

#[tokio::test]
async fn test_single_row_rejects_many_rows() -> Result<()> {
    let suite = setup_suite("06", "07").await?;

    let result = suite
        .db
        .select_single_row("SELECT id FROM movies WHERE original_title = 'Life'")
        .await;

    teardown_suite(suite).await?;
    assert!(matches!(result, Err(Error::Cardinality { actual: 2 })));
    Ok(())
}

#[tokio::test]
async fn test_multiple_rows_may_be_empty() -> Result<()> {
    let suite = setup_suite("06", "07").await?;

    let result = suite
        .db
        .select_multiple_rows("SELECT * FROM keywords WHERE keyword = 'western'")
        .await;

    teardown_suite(suite).await?;
    assert_eq!(as_json(result?), json!([]));
    Ok(())
}

#[tokio::test]
async fn test_malformed_query_reports_engine_message() -> Result<()> {
    let suite = setup_suite("06", "07").await?;

    let syntax = suite.db.select_multiple_rows("SELEC * FROM movies").await;
    let unknown_table = suite.db.select_single_row("SELECT COUNT(*) FROM films").await;

    // The handle stays usable after a failed query
    let still_works = suite
        .db
        .select_single_row("SELECT COUNT(*) AS count FROM genres")
        .await;

    teardown_suite(suite).await?;

    match syntax {
        Err(Error::QuerySyntax { message, query }) => {
            assert!(message.contains("syntax error"), "got: {message}");
            assert_eq!(query, "SELEC * FROM movies");
        }
        other => panic!("expected QuerySyntax, got {other:?}"),
    }

    let err = unknown_table.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::QuerySyntax);
    assert!(err.to_string().contains("no such table: films"), "got: {err}");

    assert_eq!(still_works?["count"], json!(7));
    Ok(())
}

#[tokio::test]
async fn test_scalar_types() -> Result<()> {
    let suite = setup_suite("06", "07").await?;

    let result = suite
        .db
        .select_single_row(
            "SELECT budget_adjusted, runtime, original_title, NULL AS missing \
             FROM movies WHERE id = 1",
        )
        .await;

    teardown_suite(suite).await?;
    assert_eq!(
        serde_json::Value::Object(result?),
        json!({
            "budget_adjusted": 42000000.25,
            "runtime": 117,
            "original_title": "Alien",
            "missing": null
        })
    );
    Ok(())
}
