use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// A polled status payload.
pub trait Snapshot {
    /// Whether polling should stop after this snapshot.
    fn is_terminal(&self) -> bool {
        false
    }
}

impl Snapshot for serde_json::Value {}

/// State of a server-side import job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Pendiente,
    Procesando,
    Completada,
    Fallida,
    Cancelada,
    #[serde(other)]
    Unknown,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Completada | JobState::Fallida | JobState::Cancelada
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Pendiente => "pendiente",
            JobState::Procesando => "procesando",
            JobState::Completada => "completada",
            JobState::Fallida => "fallida",
            JobState::Cancelada => "cancelada",
            JobState::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress of an import job as reported by its status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobProgress {
    #[serde(rename = "estado")]
    pub state: JobState,
    #[serde(rename = "porcentaje_avance", default, deserialize_with = "lenient_percent")]
    pub percent: f64,
    #[serde(rename = "registros_procesados", default)]
    pub processed: Option<u64>,
    #[serde(rename = "registros_exitosos", default)]
    pub succeeded: Option<u64>,
    #[serde(rename = "registros_fallidos", default)]
    pub failed: Option<u64>,
    #[serde(rename = "total_registros", default)]
    pub total: Option<u64>,
    #[serde(rename = "mensaje", default)]
    pub message: Option<String>,
}

impl JobProgress {
    /// One-line human summary, e.g. `procesando 42.5% (120/300)`.
    pub fn summary(&self) -> String {
        let mut line = format!("{} {:.1}%", self.state, self.percent);
        if let (Some(processed), Some(total)) = (self.processed, self.total) {
            line.push_str(&format!(" ({}/{})", processed, total));
        }
        if let Some(failed) = self.failed.filter(|n| *n > 0) {
            line.push_str(&format!(", {} failed", failed));
        }
        line
    }
}

impl Snapshot for JobProgress {
    fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

/// Some backends send the percentage as a string ("42.50").
fn lenient_percent<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    let value = match Option::<Raw>::deserialize(deserializer)? {
        None => 0.0,
        Some(Raw::Number(n)) => n,
        Some(Raw::Text(s)) => s.trim().parse::<f64>().map_err(D::Error::custom)?,
    };
    Ok(value.clamp(0.0, 100.0))
}

/// Dashboard snapshot. The sections are displayed, never interpreted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SystemSnapshot {
    #[serde(default)]
    pub system_status: serde_json::Value,
    #[serde(default)]
    pub cache_stats: serde_json::Value,
    #[serde(default)]
    pub health_status: serde_json::Value,
}

impl Snapshot for SystemSnapshot {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_progress_from_wire() {
        let progress: JobProgress = serde_json::from_value(json!({
            "estado": "procesando",
            "porcentaje_avance": 42.5,
            "registros_procesados": 120,
            "total_registros": 300
        }))
        .unwrap();
        assert_eq!(progress.state, JobState::Procesando);
        assert_eq!(progress.percent, 42.5);
        assert!(!progress.is_terminal());
        assert_eq!(progress.summary(), "procesando 42.5% (120/300)");
    }

    #[test]
    fn test_percent_as_string_or_null() {
        let progress: JobProgress =
            serde_json::from_value(json!({"estado": "pendiente", "porcentaje_avance": "12.50"}))
                .unwrap();
        assert_eq!(progress.percent, 12.5);

        let progress: JobProgress =
            serde_json::from_value(json!({"estado": "pendiente", "porcentaje_avance": null}))
                .unwrap();
        assert_eq!(progress.percent, 0.0);
    }

    #[test]
    fn test_terminal_states() {
        for (state, terminal) in [
            ("pendiente", false),
            ("procesando", false),
            ("completada", true),
            ("fallida", true),
            ("cancelada", true),
            ("pausada", false),
        ] {
            let progress: JobProgress =
                serde_json::from_value(json!({"estado": state})).unwrap();
            assert_eq!(progress.is_terminal(), terminal, "state {}", state);
        }
    }

    #[test]
    fn test_system_snapshot_never_terminal() {
        let snapshot: SystemSnapshot =
            serde_json::from_value(json!({"cache_stats": {"hits": 10}})).unwrap();
        assert!(!snapshot.is_terminal());
        assert_eq!(snapshot.cache_stats["hits"], 10);
        assert!(snapshot.health_status.is_null());
    }
}
