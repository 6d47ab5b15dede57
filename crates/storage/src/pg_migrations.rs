//! PostgreSQL schema migrations for onyx-ext storage.
//!
//! Every statement is idempotent; the whole set runs at startup and from
//! `onyx-ext migrate`.

use anyhow::Result;
use onyx_ext_core::parse_completion_minutes;
use sqlx::{PgPool, Row};

/// Tables carrying `completion_time` / `"order"` columns that older
/// deployments stored as TEXT.
const INTEGER_COLUMN_TABLES: [&str; 2] = ["projects", "trashed_projects"];

/// Run all PostgreSQL migrations.
pub async fn run_pg_migrations(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS project_folders (
            id BIGSERIAL PRIMARY KEY,
            onyx_user_id TEXT NOT NULL,
            name TEXT NOT NULL,
            parent_id BIGINT REFERENCES project_folders(id) ON DELETE SET NULL,
            quality_tier TEXT,
            "order" INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_folders_user ON project_folders (onyx_user_id)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS projects (
            id BIGSERIAL PRIMARY KEY,
            onyx_user_id TEXT NOT NULL,
            project_name TEXT NOT NULL,
            product_type TEXT NOT NULL DEFAULT 'lesson_plan',
            microproduct_name TEXT,
            microproduct_content JSONB NOT NULL DEFAULT '{}',
            quality_tier TEXT,
            folder_id BIGINT REFERENCES project_folders(id) ON DELETE SET NULL,
            completion_time INTEGER,
            "order" INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    add_missing_columns(pool, "projects", &[
        ("quality_tier", "TEXT"),
        ("folder_id", "BIGINT REFERENCES project_folders(id) ON DELETE SET NULL"),
        ("completion_time", "INTEGER"),
        ("\"order\"", "INTEGER NOT NULL DEFAULT 0"),
    ])
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_projects_user ON projects (onyx_user_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_projects_folder ON projects (folder_id)")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS trashed_projects (
            id BIGINT PRIMARY KEY,
            onyx_user_id TEXT NOT NULL,
            project_name TEXT NOT NULL,
            product_type TEXT NOT NULL DEFAULT 'lesson_plan',
            microproduct_name TEXT,
            microproduct_content JSONB NOT NULL DEFAULT '{}',
            quality_tier TEXT,
            folder_id BIGINT,
            completion_time INTEGER,
            "order" INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            trashed_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    add_missing_columns(pool, "trashed_projects", &[
        ("quality_tier", "TEXT"),
        ("folder_id", "BIGINT"),
        ("completion_time", "INTEGER"),
        ("\"order\"", "INTEGER NOT NULL DEFAULT 0"),
        ("trashed_at", "TIMESTAMPTZ NOT NULL DEFAULT NOW()"),
    ])
    .await?;

    for table in INTEGER_COLUMN_TABLES {
        coerce_integer_column(pool, table, "completion_time", None).await?;
        coerce_integer_column(pool, table, "order", Some(0)).await?;
    }

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS workspaces (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            created_by TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS workspace_roles (
            id BIGSERIAL PRIMARY KEY,
            workspace_id BIGINT NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            permissions JSONB NOT NULL DEFAULT '[]',
            UNIQUE (workspace_id, name)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS workspace_members (
            id BIGSERIAL PRIMARY KEY,
            workspace_id BIGINT NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
            user_id TEXT NOT NULL,
            role_id BIGINT NOT NULL REFERENCES workspace_roles(id),
            status TEXT NOT NULL DEFAULT 'active',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            UNIQUE (workspace_id, user_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_members_user ON workspace_members (user_id)")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS product_access (
            id BIGSERIAL PRIMARY KEY,
            product_id BIGINT NOT NULL,
            workspace_id BIGINT NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
            access_type TEXT NOT NULL,
            target_id TEXT,
            granted_by TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Grants outlive a trip through the trash; purge removes them.
    sqlx::query("ALTER TABLE product_access DROP CONSTRAINT IF EXISTS product_access_product_id_fkey")
        .execute(pool)
        .await?;

    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_access_unique
         ON product_access (product_id, workspace_id, access_type, COALESCE(target_id, ''))",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_feature_flags (
            user_id TEXT NOT NULL,
            feature_name TEXT NOT NULL,
            is_enabled BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            PRIMARY KEY (user_id, feature_name)
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("PostgreSQL migrations complete");
    Ok(())
}

/// Columns added after the first deployments.
async fn add_missing_columns(pool: &PgPool, table: &str, columns: &[(&str, &str)]) -> Result<()> {
    for (column, ddl) in columns {
        sqlx::query(&format!("ALTER TABLE {table} ADD COLUMN IF NOT EXISTS {column} {ddl}"))
            .execute(pool)
            .await?;
    }
    Ok(())
}

/// Convert a legacy TEXT column to INTEGER in place. `completion_time` text
/// such as `"30m"` is parsed into minutes first; anything else non-numeric
/// becomes 0. NULL stays NULL unless `default` is set.
async fn coerce_integer_column(
    pool: &PgPool,
    table: &str,
    column: &str,
    default: Option<i32>,
) -> Result<()> {
    let is_text: bool = sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT 1 FROM information_schema.columns
            WHERE table_schema = current_schema() AND table_name = $1 AND column_name = $2
              AND data_type IN ('text', 'character varying')
        )",
    )
    .bind(table)
    .bind(column)
    .fetch_one(pool)
    .await?;

    if !is_text {
        return Ok(());
    }

    tracing::warn!(table, column, "legacy TEXT column found, converting to INTEGER");
    let null_value = default.map_or_else(|| "NULL".to_owned(), |d| d.to_string());
    let mut tx = pool.begin().await?;
    if column == "completion_time" {
        let rows = sqlx::query(&format!(
            "SELECT id, \"{column}\" AS raw FROM {table}
             WHERE \"{column}\" IS NOT NULL AND TRIM(\"{column}\") !~ '^[0-9]+$'"
        ))
        .fetch_all(&mut *tx)
        .await?;
        for row in rows {
            let id: i64 = row.try_get("id")?;
            let raw: String = row.try_get("raw")?;
            let Ok(minutes) = parse_completion_minutes(&raw) else {
                tracing::warn!(table, id, raw = %raw, "unreadable completion time, storing 0");
                continue;
            };
            sqlx::query(&format!("UPDATE {table} SET \"{column}\" = $1 WHERE id = $2"))
                .bind(minutes.to_string())
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
    }
    sqlx::query(&format!("ALTER TABLE {table} ALTER COLUMN \"{column}\" DROP DEFAULT"))
        .execute(&mut *tx)
        .await?;
    sqlx::query(&format!(
        "ALTER TABLE {table} ALTER COLUMN \"{column}\" TYPE INTEGER USING
            CASE
                WHEN \"{column}\" IS NULL THEN {null_value}
                WHEN TRIM(\"{column}\") !~ '^[0-9]+$' THEN 0
                ELSE CAST(TRIM(\"{column}\") AS INTEGER)
            END"
    ))
    .execute(&mut *tx)
    .await?;
    if let Some(d) = default {
        sqlx::query(&format!("UPDATE {table} SET \"{column}\" = {d} WHERE \"{column}\" IS NULL"))
            .execute(&mut *tx)
            .await?;
        sqlx::query(&format!("ALTER TABLE {table} ALTER COLUMN \"{column}\" SET DEFAULT {d}"))
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(())
}
