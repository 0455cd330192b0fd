use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
use ordered_float::OrderedFloat;
use serde::Serialize;

pub fn init_logging(max_level: &str) {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or(max_level));
}

const PERCENTILES: &[(f64, &str)] = &[
    (50.0, "p50"),
    (90.0, "p90"),
    (99.0, "p99"),
    (99.9, "p999"),
];

#[derive(Serialize, Debug, PartialEq)]
pub struct HistogramStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub percentiles: BTreeMap<String, f64>,
}

impl HistogramStats {
    pub fn compute(samples: &[OrderedFloat<f64>]) -> Self {
        let mut values = samples.to_vec();
        values.sort_unstable();
        let len = values.len();
        if len == 0 {
            return Self {
                count: 0,
                min: 0.0,
                max: 0.0,
                mean: 0.0,
                percentiles: BTreeMap::new(),
            };
        }
        let mean = values.iter().map(|v| v.into_inner()).sum::<f64>() / len as f64;
        let percentiles = PERCENTILES
            .iter()
            .map(|(pct, label)| {
                let idx = ((pct / 100.0) * (len as f64 - 1.0)).round() as usize;
                ((*label).to_owned(), values[idx].into_inner())
            })
            .collect();
        Self {
            count: len,
            min: values[0].into_inner(),
            max: values[len - 1].into_inner(),
            mean,
            percentiles,
        }
    }
}

#[derive(Serialize)]
pub struct MetricDump {
    pub name: String,
    pub unit: Option<String>,
    /// Counter or gauge value; `None` for histograms.
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub histogram: Option<HistogramStats>,
}

/// Process-wide metrics recorder whose contents end up in the run's JSON
/// report.
pub struct MetricsRecorder {
    snapshotter: Snapshotter,
}

impl MetricsRecorder {
    pub fn install() -> anyhow::Result<Self> {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();
        recorder
            .install()
            .map_err(|e| anyhow::anyhow!("metrics recorder: {}", e))?;
        Ok(Self { snapshotter })
    }

    pub fn snapshot_metrics(&self) -> HashMap<String, MetricDump> {
        self.snapshotter
            .snapshot()
            .into_vec()
            .into_iter()
            .map(|(ckey, unit, _description, value)| {
                let name = ckey.key().name().to_owned();
                let (value, histogram) = match value {
                    DebugValue::Counter(v) => (Some(v.to_string()), None),
                    DebugValue::Gauge(v) => (Some(v.into_inner().to_string()), None),
                    DebugValue::Histogram(samples) => {
                        (None, Some(HistogramStats::compute(&samples)))
                    }
                };
                let dump = MetricDump {
                    name: name.clone(),
                    unit: unit.map(|u| u.as_str().to_owned()),
                    value,
                    histogram,
                };
                (name, dump)
            })
            .collect()
    }
}

pub fn write_json(filename: &str, value: &serde_json::Value) -> anyhow::Result<()> {
    let path = Path::new(filename);
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_stats() {
        let samples: Vec<_> = (1..=100).rev().map(|v| OrderedFloat(v as f64)).collect();
        let stats = HistogramStats::compute(&samples);
        assert_eq!(stats.count, 100);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 100.0);
        assert_eq!(stats.mean, 50.5);
        assert_eq!(stats.percentiles["p50"], 51.0);
        assert_eq!(stats.percentiles["p99"], 99.0);

        let empty = HistogramStats::compute(&[]);
        assert_eq!(empty.count, 0);
        assert!(empty.percentiles.is_empty());
    }

    #[test]
    fn test_write_json_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("metrics/run.json");
        write_json(file.to_str().unwrap(), &serde_json::json!({"ok": true})).unwrap();
        let text = fs::read_to_string(&file).unwrap();
        assert!(text.contains("\"ok\": true"));
    }
}
