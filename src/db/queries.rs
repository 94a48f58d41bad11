use crate::db::Database;
use crate::error::{Result, TerraMindError};
use crate::models::{
    AnalysisMethod, AnalysisSnapshot, CandidateKind, ExpectedImpact, ImpactLog, LandPlot,
    Priority, RecommendationResult, RiskLevel, Trend,
};
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use tracing::warn;

// Plot Queries

impl Database {
    pub fn create_plot(&self, plot: &LandPlot) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO land_plots
                    (name, latitude, longitude, area_hectares, notes, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    plot.name,
                    plot.latitude,
                    plot.longitude,
                    plot.area_hectares,
                    plot.notes,
                    plot.created_at.to_rfc3339(),
                    plot.updated_at.to_rfc3339(),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_plot(&self, id: i64) -> Result<Option<LandPlot>> {
        self.with_conn(|conn| {
            conn.query_row("SELECT * FROM land_plots WHERE id = ?1", [id], row_to_plot)
                .optional()
                .map_err(Into::into)
        })
    }

    pub fn list_plots(&self) -> Result<Vec<LandPlot>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM land_plots ORDER BY id")?;
            let plots = stmt
                .query_map([], row_to_plot)?
                .filter_map(|r| r.ok())
                .collect();
            Ok(plots)
        })
    }

    pub fn delete_plot(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM land_plots WHERE id = ?1", [id])?;
            if deleted == 0 {
                return Err(TerraMindError::NotFound(format!("plot {}", id)));
            }
            Ok(())
        })
    }
}

fn row_to_plot(row: &Row) -> rusqlite::Result<LandPlot> {
    let created_at_str: String = row.get("created_at")?;
    let updated_at_str: String = row.get("updated_at")?;

    Ok(LandPlot {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
        area_hectares: row.get("area_hectares")?,
        notes: row.get("notes")?,
        created_at: parse_timestamp(&created_at_str),
        updated_at: parse_timestamp(&updated_at_str),
    })
}

// Analysis Queries

impl Database {
    pub fn insert_snapshot(&self, snapshot: &AnalysisSnapshot) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO land_analytics
                    (plot_id, ndvi, evi, soil_quality, water_stress,
                     degradation_risk, method, analyzed_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    snapshot.plot_id,
                    snapshot.ndvi,
                    snapshot.evi,
                    snapshot.soil_quality,
                    snapshot.water_stress,
                    snapshot.degradation_risk.as_str(),
                    snapshot.method.as_str(),
                    snapshot.analyzed_at.to_rfc3339(),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// All snapshots for a plot, oldest first. This ordering is what the
    /// progress tracker expects.
    pub fn snapshots_for_plot(&self, plot_id: i64) -> Result<Vec<AnalysisSnapshot>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM land_analytics WHERE plot_id = ?1 ORDER BY analyzed_at ASC",
            )?;
            let snapshots = stmt
                .query_map([plot_id], row_to_snapshot)?
                .filter_map(|r| r.ok())
                .collect();
            Ok(snapshots)
        })
    }

    pub fn latest_snapshot(&self, plot_id: i64) -> Result<Option<AnalysisSnapshot>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT * FROM land_analytics WHERE plot_id = ?1 \
                 ORDER BY analyzed_at DESC LIMIT 1",
                [plot_id],
                row_to_snapshot,
            )
            .optional()
            .map_err(Into::into)
        })
    }

    pub fn get_snapshot(&self, id: i64) -> Result<Option<AnalysisSnapshot>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT * FROM land_analytics WHERE id = ?1",
                [id],
                row_to_snapshot,
            )
            .optional()
            .map_err(Into::into)
        })
    }
}

fn row_to_snapshot(row: &Row) -> rusqlite::Result<AnalysisSnapshot> {
    let risk_str: String = row.get("degradation_risk")?;
    let method_str: String = row.get("method")?;
    let analyzed_at_str: String = row.get("analyzed_at")?;

    let degradation_risk = RiskLevel::from_str(&risk_str).unwrap_or_else(|| {
        warn!(
            degradation_risk = %risk_str,
            "Unknown degradation_risk in database, defaulting to high"
        );
        RiskLevel::High
    });
    let method = AnalysisMethod::from_str(&method_str).unwrap_or_else(|| {
        warn!(method = %method_str, "Unknown analysis method in database, defaulting to coordinates");
        AnalysisMethod::Coordinates
    });

    Ok(AnalysisSnapshot {
        id: Some(row.get("id")?),
        plot_id: row.get("plot_id")?,
        ndvi: row.get("ndvi")?,
        evi: row.get("evi")?,
        soil_quality: row.get("soil_quality")?,
        water_stress: row.get("water_stress")?,
        degradation_risk,
        method,
        analyzed_at: parse_timestamp(&analyzed_at_str),
    })
}

// Recommendation Queries

impl Database {
    /// Store one scoring run. The whole batch commits in a single
    /// transaction; a failed insert leaves nothing behind.
    pub fn insert_recommendations(
        &self,
        plot_id: i64,
        analysis_id: i64,
        recommendations: &[RecommendationResult],
    ) -> Result<Vec<i64>> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let mut ids = Vec::with_capacity(recommendations.len());
            for rec in recommendations {
                tx.execute(
                    r#"
                    INSERT INTO recommendations
                        (plot_id, analysis_id, name, kind, reason, confidence, priority,
                         ndvi_increase, soil_improvement, timeframe, implementation_notes,
                         created_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                    "#,
                    params![
                        plot_id,
                        analysis_id,
                        rec.name,
                        rec.kind.as_str(),
                        rec.reason,
                        rec.confidence,
                        rec.priority.as_str(),
                        rec.expected_impact.ndvi_increase,
                        rec.expected_impact.soil_improvement,
                        rec.expected_impact.timeframe,
                        rec.implementation_notes,
                        Utc::now().to_rfc3339(),
                    ],
                )?;
                ids.push(tx.last_insert_rowid());
            }
            tx.commit()?;
            Ok(ids)
        })
    }

    pub fn recommendations_for_analysis(
        &self,
        analysis_id: i64,
    ) -> Result<Vec<RecommendationResult>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM recommendations WHERE analysis_id = ?1 \
                 ORDER BY confidence DESC, id ASC",
            )?;
            let recs = stmt
                .query_map([analysis_id], row_to_recommendation)?
                .filter_map(|r| r.ok())
                .collect();
            Ok(recs)
        })
    }
}

fn row_to_recommendation(row: &Row) -> rusqlite::Result<RecommendationResult> {
    let kind_str: String = row.get("kind")?;
    let priority_str: String = row.get("priority")?;

    let kind = CandidateKind::from_str(&kind_str).unwrap_or_else(|| {
        warn!(kind = %kind_str, "Unknown recommendation kind in database, defaulting to practice");
        CandidateKind::Practice
    });
    let priority = Priority::from_str(&priority_str).unwrap_or_else(|| {
        warn!(priority = %priority_str, "Unknown priority in database, defaulting to medium");
        Priority::Medium
    });

    Ok(RecommendationResult {
        id: Some(row.get("id")?),
        analysis_id: Some(row.get("analysis_id")?),
        name: row.get("name")?,
        kind,
        reason: row.get("reason")?,
        confidence: row.get("confidence")?,
        priority,
        expected_impact: ExpectedImpact {
            ndvi_increase: row.get("ndvi_increase")?,
            soil_improvement: row.get("soil_improvement")?,
            timeframe: row.get("timeframe")?,
        },
        implementation_notes: row.get("implementation_notes")?,
    })
}

// Impact Log Queries

impl Database {
    pub fn insert_impact_log(&self, log: &ImpactLog) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO impact_logs
                    (plot_id, baseline_analysis_id, latest_analysis_id, period_days,
                     ndvi_delta, evi_delta, soil_quality_delta, improvement_pct,
                     trend, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
                params![
                    log.plot_id,
                    log.baseline_analysis_id,
                    log.latest_analysis_id,
                    log.period_days,
                    log.ndvi_delta,
                    log.evi_delta,
                    log.soil_quality_delta,
                    log.improvement_pct,
                    log.trend.as_str(),
                    log.created_at.to_rfc3339(),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn impact_logs_for_plot(&self, plot_id: i64) -> Result<Vec<ImpactLog>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT * FROM impact_logs WHERE plot_id = ?1 ORDER BY created_at ASC")?;
            let logs = stmt
                .query_map([plot_id], row_to_impact_log)?
                .filter_map(|r| r.ok())
                .collect();
            Ok(logs)
        })
    }
}

fn row_to_impact_log(row: &Row) -> rusqlite::Result<ImpactLog> {
    let trend_str: String = row.get("trend")?;
    let created_at_str: String = row.get("created_at")?;

    let trend = Trend::from_str(&trend_str).unwrap_or_else(|| {
        warn!(trend = %trend_str, "Unknown trend in database, defaulting to stable");
        Trend::Stable
    });

    Ok(ImpactLog {
        id: Some(row.get("id")?),
        plot_id: row.get("plot_id")?,
        baseline_analysis_id: row.get("baseline_analysis_id")?,
        latest_analysis_id: row.get("latest_analysis_id")?,
        period_days: row.get("period_days")?,
        ndvi_delta: row.get("ndvi_delta")?,
        evi_delta: row.get("evi_delta")?,
        soil_quality_delta: row.get("soil_quality_delta")?,
        improvement_pct: row.get("improvement_pct")?,
        trend,
        created_at: parse_timestamp(&created_at_str),
    })
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

trait OptionalExt<T> {
    fn optional(self) -> rusqlite::Result<Option<T>>;
}

impl<T> OptionalExt<T> for rusqlite::Result<T> {
    fn optional(self) -> rusqlite::Result<Option<T>> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{recommend, risk};
    use crate::models::IndexReadings;
    use chrono::Duration;

    fn test_db_with_plot() -> (Database, i64) {
        let db = Database::open_in_memory().unwrap();
        let plot = LandPlot::new("Test Field", -1.29, 36.82).unwrap().with_area(3.0);
        let id = db.create_plot(&plot).unwrap();
        (db, id)
    }

    fn snapshot(plot_id: i64, ndvi: f64, soil: f64) -> AnalysisSnapshot {
        let readings = IndexReadings {
            ndvi,
            evi: ndvi * 0.8,
            soil_quality: soil,
            water_stress: 40.0,
        };
        AnalysisSnapshot::new(
            plot_id,
            readings,
            risk::classify(ndvi, soil),
            AnalysisMethod::Coordinates,
        )
    }

    #[test]
    fn plot_round_trip() {
        let (db, id) = test_db_with_plot();
        let plot = db.get_plot(id).unwrap().unwrap();
        assert_eq!(plot.name, "Test Field");
        assert_eq!(plot.area_hectares, Some(3.0));
        assert!((plot.latitude - (-1.29)).abs() < 1e-12);

        assert!(db.get_plot(999).unwrap().is_none());
    }

    #[test]
    fn delete_missing_plot_is_not_found() {
        let (db, _) = test_db_with_plot();
        assert!(matches!(
            db.delete_plot(999),
            Err(TerraMindError::NotFound(_))
        ));
    }

    #[test]
    fn snapshots_come_back_oldest_first() {
        let (db, plot_id) = test_db_with_plot();

        let mut older = snapshot(plot_id, 0.4, 50.0);
        older.analyzed_at = Utc::now() - Duration::days(30);
        let mut newer = snapshot(plot_id, 0.6, 65.0);
        newer.analyzed_at = Utc::now();

        // Insert newest first to prove ordering comes from the query
        db.insert_snapshot(&newer).unwrap();
        db.insert_snapshot(&older).unwrap();

        let history = db.snapshots_for_plot(plot_id).unwrap();
        assert_eq!(history.len(), 2);
        assert!(history[0].analyzed_at < history[1].analyzed_at);
        assert!((history[0].ndvi - 0.4).abs() < 1e-12);

        let latest = db.latest_snapshot(plot_id).unwrap().unwrap();
        assert!((latest.ndvi - 0.6).abs() < 1e-12);
    }

    #[test]
    fn snapshot_enum_fields_round_trip() {
        let (db, plot_id) = test_db_with_plot();
        let snap = snapshot(plot_id, 0.1, 20.0);
        let id = db.insert_snapshot(&snap).unwrap();
        let loaded = db.get_snapshot(id).unwrap().unwrap();
        assert_eq!(loaded.degradation_risk, RiskLevel::Critical);
        assert_eq!(loaded.method, AnalysisMethod::Coordinates);
    }

    #[test]
    fn recommendation_batch_round_trip() {
        let (db, plot_id) = test_db_with_plot();
        let mut snap = snapshot(plot_id, 0.35, 45.0);
        let analysis_id = db.insert_snapshot(&snap).unwrap();
        snap.id = Some(analysis_id);

        let recs = recommend::score(&snap, recommend::REGISTRY);
        assert!(!recs.is_empty());
        let ids = db
            .insert_recommendations(plot_id, analysis_id, &recs)
            .unwrap();
        assert_eq!(ids.len(), recs.len());

        let loaded = db.recommendations_for_analysis(analysis_id).unwrap();
        assert_eq!(loaded.len(), recs.len());
        // Ranked order survives storage
        for (stored, scored) in loaded.iter().zip(recs.iter()) {
            assert_eq!(stored.name, scored.name);
            assert_eq!(stored.priority, scored.priority);
            assert!((stored.confidence - scored.confidence).abs() < 1e-12);
            assert_eq!(
                stored.expected_impact.timeframe,
                scored.expected_impact.timeframe
            );
        }
    }

    #[test]
    fn impact_log_round_trip() {
        let (db, plot_id) = test_db_with_plot();
        let log = ImpactLog {
            id: None,
            plot_id,
            baseline_analysis_id: None,
            latest_analysis_id: None,
            period_days: 42,
            ndvi_delta: 0.12,
            evi_delta: 0.09,
            soil_quality_delta: 8.5,
            improvement_pct: 17.33,
            trend: Trend::Improving,
            created_at: Utc::now(),
        };
        let id = db.insert_impact_log(&log).unwrap();
        assert!(id > 0);

        let logs = db.impact_logs_for_plot(plot_id).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].period_days, 42);
        assert_eq!(logs[0].trend, Trend::Improving);
    }
}
