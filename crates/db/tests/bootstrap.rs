use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "./migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    folio_db::health_check(&pool).await.unwrap();

    let tables = [
        "users",
        "sessions",
        "roles",
        "media",
        "posts",
        "pages",
        "categories",
        "post_categories",
        "settings",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// Every table with an `updated_at` column must carry the `set_updated_at` trigger.
#[sqlx::test(migrations = "./migrations")]
async fn test_updated_at_triggers_present(pool: PgPool) {
    let tables: Vec<(String,)> = sqlx::query_as(
        "SELECT table_name
         FROM information_schema.columns
         WHERE table_schema = 'public'
           AND column_name = 'updated_at'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    assert!(!tables.is_empty());

    for (table,) in &tables {
        let trigger: Option<(String,)> = sqlx::query_as(
            "SELECT trigger_name
             FROM information_schema.triggers
             WHERE event_object_table = $1
               AND trigger_name = 'set_updated_at'
             LIMIT 1",
        )
        .bind(table)
        .fetch_optional(&pool)
        .await
        .unwrap();
        assert!(trigger.is_some(), "Table {table} is missing the set_updated_at trigger");
    }
}

/// Slug columns are guarded by the named constraints the slug writer retries on.
#[sqlx::test(migrations = "./migrations")]
async fn test_slug_constraints_named(pool: PgPool) {
    for constraint in ["uq_posts_slug", "uq_pages_slug", "uq_categories_slug"] {
        let found: Option<(String,)> = sqlx::query_as(
            "SELECT constraint_name
             FROM information_schema.table_constraints
             WHERE constraint_type = 'UNIQUE' AND constraint_name = $1",
        )
        .bind(constraint)
        .fetch_optional(&pool)
        .await
        .unwrap();
        assert!(found.is_some(), "missing unique constraint {constraint}");
    }
}
