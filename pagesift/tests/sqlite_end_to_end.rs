//! End-to-end tests against in-memory SQLite
//!
//! Exercises the full pipeline (parse, filter, sort, paginate, respond)
//! through the sqlx executor, including the forced windowed-count path.

#![cfg(feature = "sqlite")]

use pagesift::{
    Error, Filter, FilterOperator, OrFilterGroup, PageParams, PagerConfig, PageUrl, Pager,
    PaginationQuery, ScalarType, SelectQuery, SortingOrder, SortingQuery, SqlValue,
};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

async fn seeded_pool() -> SqlitePool {
    // A single connection keeps every query on the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("open sqlite");
    sqlx::query(
        "CREATE TABLE heroes (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            city TEXT,
            age INTEGER NOT NULL,
            active BOOLEAN NOT NULL
        )",
    )
    .execute(&pool)
    .await
    .expect("create table");

    let rows: &[(i64, &str, Option<&str>, i64, bool)] = &[
        (1, "Ada", Some("London"), 36, true),
        (2, "Grace", Some("New York"), 45, true),
        (3, "Joy", Some("Lagos"), 17, true),
        (4, "Alan", Some("London"), 41, false),
        (5, "Edsger", Some("Austin"), 72, false),
        (6, "Barbara", Some("Boston"), 68, true),
        (7, "Donald", Some("Stanford"), 86, true),
        (8, "Leslie", Some("Mountain View"), 83, true),
        (9, "Tony", Some("London"), 58, false),
        (10, "Margaret", Some("Boston"), 88, true),
        (11, "Tim", Some("London"), 69, true),
        (12, "Vint", None, 81, true),
        (13, "Radia", Some("Boston"), 73, false),
        (14, "Frances", Some("Philadelphia"), 98, true),
        (15, "Katherine", Some("Hampton"), 101, true),
    ];
    for &(id, name, city, age, active) in rows {
        sqlx::query("INSERT INTO heroes (id, name, city, age, active) VALUES (?, ?, ?, ?, ?)")
            .bind(id)
            .bind(name)
            .bind(city)
            .bind(age)
            .bind(active)
            .execute(&pool)
            .await
            .expect("insert row");
    }
    pool
}

fn heroes_query() -> SelectQuery {
    SelectQuery::from_table("heroes")
        .column("id", ScalarType::Int)
        .column("name", ScalarType::Text)
        .column("city", ScalarType::Text)
        .column("age", ScalarType::Int)
        .column("active", ScalarType::Bool)
        .computed("name_length", "LENGTH(name)", ScalarType::Int)
}

fn params(pairs: &[(&str, &str)]) -> PageParams {
    let pairs: Vec<(String, String)> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    PageParams::from_pairs(PageUrl::parse("/heroes"), &pairs, &PagerConfig::default())
        .expect("parse params")
}

fn page_ids(response: &pagesift::PaginatedResponse<pagesift::SqlRow>) -> Vec<i64> {
    response
        .data
        .iter()
        .map(|row| row.get("id").and_then(SqlValue::as_i64).expect("id"))
        .collect()
}

#[tokio::test]
async fn pages_are_disjoint_and_cover_everything() {
    let pool = seeded_pool().await;
    let mut all_ids = Vec::new();
    for page in 1..=3 {
        let page_param = page.to_string();
        let mut pager = Pager::new(params(&[
            ("sort_by", "id"),
            ("page", &page_param),
            ("per_page", "5"),
        ]));
        let response = pager
            .generate_response_async(heroes_query(), &pool)
            .await
            .expect("paginate");
        assert_eq!(response.data.len(), 5, "page {} should be full", page);
        assert_eq!(response.meta.pagination.total_items, 15);
        assert_eq!(response.meta.pagination.total_pages, 3);
        all_ids.extend(page_ids(&response));
    }
    all_ids.sort_unstable();
    assert_eq!(all_ids, (1..=15).collect::<Vec<i64>>());
}

#[tokio::test]
async fn and_filters_match_manual_conjunction() {
    let pool = seeded_pool().await;
    let mut pager = Pager::new(params(&[("per_page", "100")]));
    pager.filters = Some(vec![
        Filter::new("age", FilterOperator::Gte, "18"),
        Filter::new("active", FilterOperator::Eq, "true"),
    ]);
    let response = pager
        .generate_response_async(heroes_query(), &pool)
        .await
        .expect("paginate");

    let expected: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM heroes WHERE age >= 18 AND active = 1")
            .fetch_one(&pool)
            .await
            .expect("manual count");
    assert_eq!(response.meta.pagination.total_items, expected as u64);
    assert_eq!(response.data.len(), expected as usize);
}

#[tokio::test]
async fn or_group_matches_either_field_without_duplicates() {
    let pool = seeded_pool().await;
    let mut pager = Pager::new(params(&[("per_page", "100")]));
    // "lon" appears in city London; "don" in name Donald and city London.
    pager.or_filters = Some(vec![OrFilterGroup::new(vec![
        Filter::new("name", FilterOperator::Contains, "don"),
        Filter::new("city", FilterOperator::Contains, "don"),
    ])]);
    let response = pager
        .generate_response_async(heroes_query(), &pool)
        .await
        .expect("paginate");

    let mut ids = page_ids(&response);
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), response.data.len(), "no row may appear twice");
    // London heroes: 1, 4, 9, 11; plus Donald (7).
    assert_eq!(ids, vec![1, 4, 7, 9, 11]);
}

#[tokio::test]
async fn search_params_drive_or_group() {
    let pool = seeded_pool().await;
    let mut pager = Pager::new(params(&[
        ("search", "bos"),
        ("search_fields", "name,city"),
        ("per_page", "100"),
    ]));
    let response = pager
        .generate_response_async(heroes_query(), &pool)
        .await
        .expect("paginate");
    let ids = page_ids(&response);
    assert_eq!(ids, vec![6, 10, 13]);
}

#[tokio::test]
async fn lenient_mode_drops_unknown_field_and_returns_everything() {
    let pool = seeded_pool().await;
    let mut pager = Pager::new(params(&[("per_page", "100")]));
    pager.filters = Some(vec![Filter::new("power", FilterOperator::Eq, "fly")]);
    let response = pager
        .generate_response_async(heroes_query(), &pool)
        .await
        .expect("paginate");
    assert_eq!(response.meta.pagination.total_items, 15);
}

#[tokio::test]
async fn strict_mode_rejects_unknown_field() {
    let pool = seeded_pool().await;
    let mut pager = Pager::new(params(&[("per_page", "100")])).strict_mode(true);
    pager.filters = Some(vec![Filter::new("power", FilterOperator::Eq, "fly")]);
    let err = pager
        .generate_response_async(heroes_query(), &pool)
        .await
        .expect_err("strict mode should fail");
    assert!(matches!(err, Error::UnknownField { .. }));
    assert!(err.is_client_error());
    assert!(err.to_string().contains("power"));
}

#[tokio::test]
async fn between_with_single_value_is_dropped_not_an_error() {
    let pool = seeded_pool().await;
    let mut pager = Pager::new(params(&[("per_page", "100")])).strict_mode(true);
    pager.filters = Some(vec![Filter::new("age", FilterOperator::Between, "20")]);
    let response = pager
        .generate_response_async(heroes_query(), &pool)
        .await
        .expect("dropped filter is not an error");
    assert_eq!(response.meta.pagination.total_items, 15);
}

#[tokio::test]
async fn between_with_two_values_is_inclusive() {
    let pool = seeded_pool().await;
    let mut pager = Pager::new(params(&[("sort_by", "age"), ("per_page", "100")]));
    pager.filters = Some(vec![Filter::new("age", FilterOperator::Between, "36,45")]);
    let response = pager
        .generate_response_async(heroes_query(), &pool)
        .await
        .expect("paginate");
    let ids = page_ids(&response);
    assert_eq!(ids, vec![1, 4, 2]);
}

#[tokio::test]
async fn computed_field_filters_and_sorts() {
    let pool = seeded_pool().await;
    let mut pager = Pager::new(params(&[
        ("sort_by", "name_length"),
        ("order", "desc"),
        ("per_page", "100"),
    ]));
    pager.filters = Some(vec![Filter::new("name_length", FilterOperator::Gte, "8")]);
    let response = pager
        .generate_response_async(heroes_query(), &pool)
        .await
        .expect("paginate");
    let names: Vec<String> = response
        .data
        .iter()
        .map(|row| row.get("name").and_then(SqlValue::as_str).unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Katherine", "Margaret"]);
}

#[tokio::test]
async fn windowed_and_fallback_paths_agree() {
    let pool = seeded_pool().await;
    let base_params = || {
        let mut p = params(&[("sort_by", "id"), ("page", "2"), ("per_page", "4")]);
        p.filters = Some(vec![Filter::new("active", FilterOperator::Eq, "true")]);
        p
    };

    let mut fallback = Pager::new(base_params()).use_window_count(Some(false));
    let fallback_response = fallback
        .generate_response_async(heroes_query(), &pool)
        .await
        .expect("fallback path");

    let mut windowed = Pager::new(base_params()).use_window_count(Some(true));
    let windowed_response = windowed
        .generate_response_async(heroes_query(), &pool)
        .await
        .expect("windowed path");

    assert_eq!(
        fallback_response.meta.pagination.total_items,
        windowed_response.meta.pagination.total_items
    );
    assert_eq!(page_ids(&fallback_response), page_ids(&windowed_response));
    assert_eq!(
        fallback_response.data[0].names(),
        windowed_response.data[0].names(),
        "windowed rows must not leak the synthetic count column"
    );
}

#[tokio::test]
async fn empty_result_has_one_page_and_no_neighbors() {
    let pool = seeded_pool().await;
    let mut pager = Pager::new(params(&[]));
    pager.filters = Some(vec![Filter::new("age", FilterOperator::Gt, "1000")]);
    let response = pager
        .generate_response_async(heroes_query(), &pool)
        .await
        .expect("paginate");
    assert!(response.data.is_empty());
    assert_eq!(response.meta.pagination.total_items, 0);
    assert_eq!(response.meta.pagination.total_pages, 1);
    assert!(response.links.next.is_none());
    assert!(response.links.prev.is_none());
}

#[tokio::test]
async fn out_of_range_page_is_empty_with_correct_totals() {
    let pool = seeded_pool().await;
    let mut pager = Pager::new(params(&[("page", "9"), ("per_page", "5")]));
    let response = pager
        .generate_response_async(heroes_query(), &pool)
        .await
        .expect("paginate");
    assert!(response.data.is_empty());
    assert_eq!(response.meta.pagination.current_page, 9);
    assert_eq!(response.meta.pagination.total_pages, 3);
}

#[tokio::test]
async fn in_and_not_in_partition_the_dataset() {
    let pool = seeded_pool().await;

    let mut in_pager = Pager::new(params(&[("per_page", "100")]));
    in_pager.filters = Some(vec![Filter::new("city", FilterOperator::In, "London, Boston")]);
    let in_response = in_pager
        .generate_response_async(heroes_query(), &pool)
        .await
        .expect("in");

    let mut out_pager = Pager::new(params(&[("per_page", "100")]));
    out_pager.filters = Some(vec![Filter::new(
        "city",
        FilterOperator::NotIn,
        "London, Boston",
    )]);
    let out_response = out_pager
        .generate_response_async(heroes_query(), &pool)
        .await
        .expect("not in");

    assert_eq!(in_response.meta.pagination.total_items, 7);
    // NOT IN excludes the NULL city row as SQL three-valued logic dictates.
    assert_eq!(out_response.meta.pagination.total_items, 7);
}

#[tokio::test]
async fn is_null_and_is_not_null() {
    let pool = seeded_pool().await;
    let mut pager = Pager::new(params(&[("per_page", "100")]));
    pager.filters = Some(vec![Filter::new("city", FilterOperator::IsNull, "")]);
    let response = pager
        .generate_response_async(heroes_query(), &pool)
        .await
        .expect("paginate");
    assert_eq!(page_ids(&response), vec![12]);

    let mut pager = Pager::new(params(&[("per_page", "100")]));
    pager.filters = Some(vec![Filter::new("city", FilterOperator::IsNotNull, "ignored")]);
    let response = pager
        .generate_response_async(heroes_query(), &pool)
        .await
        .expect("paginate");
    assert_eq!(response.meta.pagination.total_items, 14);
}

#[tokio::test]
async fn case_insensitive_contains_on_integer_column_casts() {
    let pool = seeded_pool().await;
    let mut pager = Pager::new(params(&[("per_page", "100")]));
    pager.filters = Some(vec![Filter::new("age", FilterOperator::Contains, "8")]);
    let response = pager
        .generate_response_async(heroes_query(), &pool)
        .await
        .expect("paginate");
    // Ages containing the digit 8: 68, 86, 83, 58, 88, 81, 98.
    assert_eq!(response.meta.pagination.total_items, 7);
}

#[tokio::test]
async fn sorting_query_round_trips_into_meta() {
    let pool = seeded_pool().await;
    let mut pager = Pager::new(params(&[("sort_by", "age"), ("order", "desc")]));
    let response = pager
        .generate_response_async(heroes_query(), &pool)
        .await
        .expect("paginate");
    assert_eq!(
        response.meta.sort,
        Some(SortingQuery::new("age", SortingOrder::Desc))
    );
    let first_age = response.data[0].get("age").and_then(SqlValue::as_i64);
    assert_eq!(first_age, Some(101));
}

#[tokio::test]
async fn default_pagination_comes_from_config() {
    let pool = seeded_pool().await;
    let mut pager = Pager::new(params(&[]));
    let response = pager
        .generate_response_async(heroes_query(), &pool)
        .await
        .expect("paginate");
    assert_eq!(response.meta.pagination.current_page, 1);
    assert_eq!(response.meta.pagination.per_page, 10);
    assert_eq!(response.data.len(), 10);
    assert_eq!(
        response.links.next.as_deref(),
        Some("/heroes?page=2&per_page=10")
    );
}

#[tokio::test]
async fn stage_composition_equals_full_pipeline() {
    let pool = seeded_pool().await;

    // Hand-composed pipeline out of the individual engines.
    let mut filter_engine = pagesift::FilterEngine::new(false);
    let sort_engine = pagesift::SortEngine::new(false);
    let pagination_engine = pagesift::PaginationEngine::new(
        PaginationQuery::new(1, 100),
        PageUrl::parse("/heroes"),
    );

    let filters = vec![Filter::new("active", FilterOperator::Eq, "true")];
    let sorting = SortingQuery::new("age", SortingOrder::Asc);
    let query = filter_engine
        .apply_filters(heroes_query(), Some(&filters))
        .expect("filters");
    let query = sort_engine
        .apply_sort(query, Some(&sorting))
        .expect("sort");
    let (rows, total) = pagination_engine
        .paginate_with_count_async(&query, &pool)
        .await
        .expect("paginate");

    let mut pager = Pager::new(params(&[
        ("sort_by", "age"),
        ("order", "asc"),
        ("per_page", "100"),
    ]));
    pager.filters = Some(filters);
    let response = pager
        .generate_response_async(heroes_query(), &pool)
        .await
        .expect("full pipeline");

    assert_eq!(total, response.meta.pagination.total_items);
    assert_eq!(rows, response.data);
}
