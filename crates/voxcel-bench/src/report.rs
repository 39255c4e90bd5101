use std::path::Path;

use crate::runner::BenchmarkResult;

/// A complete baseline containing results from all scenes.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Baseline {
    pub label: String,
    pub results: Vec<BenchmarkResult>,
}

/// Load a baseline from a JSON file. Returns None if the file doesn't exist
/// or does not parse.
pub fn load_baseline(path: &Path) -> Option<Baseline> {
    let contents = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&contents).ok()
}

pub fn save_baseline(path: &Path, baseline: &Baseline) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(baseline).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}

/// A timing that got slower than the threshold allows.
#[derive(Debug, Clone, PartialEq)]
pub struct Regression {
    pub scene: String,
    pub metric: &'static str,
    pub pct_change: f64,
}

fn pct_change(current: f64, base: f64) -> f64 {
    if base <= 0.0 {
        return 0.0;
    }
    (current - base) / base * 100.0
}

/// Compare mean rebuild and pick times against a baseline.
pub fn compare(
    current: &[BenchmarkResult],
    baseline: &Baseline,
    threshold_pct: f64,
) -> Vec<Regression> {
    let mut regressions = Vec::new();

    for result in current {
        let Some(base) = baseline
            .results
            .iter()
            .find(|b| b.scene_name == result.scene_name)
        else {
            continue;
        };
        let metrics = [
            ("rebuild", result.rebuild.mean_ms, base.rebuild.mean_ms),
            ("pick", result.pick.mean_ms, base.pick.mean_ms),
        ];
        for (metric, now, then) in metrics {
            let pct = pct_change(now, then);
            if pct > threshold_pct {
                regressions.push(Regression {
                    scene: result.scene_name.clone(),
                    metric,
                    pct_change: pct,
                });
            }
        }
    }

    regressions
}

/// Format results as a markdown summary table.
pub fn format_markdown(results: &[BenchmarkResult]) -> String {
    let mut out = String::new();
    out.push_str("| Scene | Cells | Chunks | Rebuild mean (ms) | Rebuild p95 (ms) | Pick mean (ms) | Pick p95 (ms) | Resolved |\n");
    out.push_str("|-------|-------|--------|-------------------|------------------|----------------|---------------|----------|\n");

    for r in results {
        out.push_str(&format!(
            "| {} | {} | {} | {:.2} | {:.2} | {:.2} | {:.2} | {} |\n",
            r.scene_name,
            r.cells,
            r.chunk_count,
            r.rebuild.mean_ms,
            r.rebuild.p95_ms,
            r.pick.mean_ms,
            r.pick.p95_ms,
            r.picks_resolved,
        ));
    }

    out
}

pub fn format_comparison(regressions: &[Regression], threshold_pct: f64) -> String {
    if regressions.is_empty() {
        return format!(
            "All scenes within {:.0}% threshold. No regressions detected.\n",
            threshold_pct
        );
    }

    let mut out = String::new();
    out.push_str(&format!(
        "REGRESSIONS DETECTED (>{:.0}% threshold):\n",
        threshold_pct
    ));
    for r in regressions {
        out.push_str(&format!("  - {} {}: +{:.1}%\n", r.scene, r.metric, r.pct_change));
    }
    out
}
