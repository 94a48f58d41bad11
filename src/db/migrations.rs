use crate::db::Database;
use crate::error::Result;

const MIGRATIONS: &[&str] = &[
    // Migration 1: Initial schema
    r#"
    CREATE TABLE IF NOT EXISTS land_plots (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        latitude REAL NOT NULL,
        longitude REAL NOT NULL,
        area_hectares REAL,
        notes TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS land_analytics (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        plot_id INTEGER NOT NULL REFERENCES land_plots(id) ON DELETE CASCADE,
        ndvi REAL NOT NULL,
        evi REAL NOT NULL,
        soil_quality REAL NOT NULL,
        water_stress REAL NOT NULL,
        degradation_risk TEXT NOT NULL,
        method TEXT NOT NULL,
        analyzed_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS recommendations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        plot_id INTEGER NOT NULL REFERENCES land_plots(id) ON DELETE CASCADE,
        analysis_id INTEGER NOT NULL REFERENCES land_analytics(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        kind TEXT NOT NULL,
        reason TEXT NOT NULL,
        confidence REAL NOT NULL,
        priority TEXT NOT NULL,
        ndvi_increase REAL NOT NULL,
        soil_improvement REAL NOT NULL,
        timeframe TEXT NOT NULL,
        implementation_notes TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS impact_logs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        plot_id INTEGER NOT NULL REFERENCES land_plots(id) ON DELETE CASCADE,
        baseline_analysis_id INTEGER REFERENCES land_analytics(id),
        latest_analysis_id INTEGER REFERENCES land_analytics(id),
        period_days INTEGER NOT NULL,
        ndvi_delta REAL NOT NULL,
        evi_delta REAL NOT NULL,
        soil_quality_delta REAL NOT NULL,
        improvement_pct REAL NOT NULL,
        trend TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS schema_migrations (
        version INTEGER PRIMARY KEY,
        applied_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    // Migration 2: Add indexes
    r#"
    CREATE INDEX IF NOT EXISTS idx_land_analytics_plot_id
        ON land_analytics(plot_id);
    CREATE INDEX IF NOT EXISTS idx_land_analytics_analyzed_at
        ON land_analytics(analyzed_at);
    CREATE INDEX IF NOT EXISTS idx_recommendations_analysis_id
        ON recommendations(analysis_id);
    CREATE INDEX IF NOT EXISTS idx_impact_logs_plot_id
        ON impact_logs(plot_id);
    "#,
];

pub fn run(db: &Database) -> Result<()> {
    db.with_conn_mut(|conn| {
        // Ensure schema_migrations table exists
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;

        // Get current version
        let current_version: i32 = conn
            .query_row(
                "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
                [],
                |row| row.get(0),
            )
            .unwrap_or(0);

        // Apply pending migrations
        for (i, migration) in MIGRATIONS.iter().enumerate() {
            let version = (i + 1) as i32;
            if version > current_version {
                tracing::info!("Applying migration {}", version);
                conn.execute_batch(migration)?;
                conn.execute(
                    "INSERT INTO schema_migrations (version) VALUES (?1)",
                    [version],
                )?;
            }
        }

        Ok(())
    })
}
