use std::fmt::{self, Display, Formatter};

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::*;

use crate::resample::BootstrapEstimate;
use crate::selection::ModelRanking;

fn title(text: &str) -> Table {
    let mut title_table = Table::new();
    title_table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .add_row(vec![Cell::new(text).set_alignment(CellAlignment::Center)]);
    title_table
}

fn body(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.iter().map(|h| Cell::new(h).set_alignment(CellAlignment::Center)));
    table
}

/// Kass & Raftery scale for a BIC difference to the best model.
fn evidence(delta_bic: f64) -> &'static str {
    if delta_bic < 2.0 {
        "🟢 Competitive"
    } else if delta_bic < 6.0 {
        "🟡 Positive evidence against"
    } else if delta_bic < 10.0 {
        "🟠 Strong evidence against"
    } else {
        "🔴 Very strong evidence against"
    }
}

impl ModelRanking {
    /// Ranking as a boxed table.
    pub fn display(&self) -> String {
        let min_bic = self.iter().map(|e| e.result.bic).fold(f64::INFINITY, f64::min);

        let mut table = body(&["#", "Model", "logL", "AIC", "BIC", "Weight", "ΔBIC"]);
        for (rank, entry) in self.iter().enumerate() {
            let r = &entry.result;
            table.add_row(vec![
                Cell::new(rank + 1).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.4}", r.model)).set_alignment(CellAlignment::Left),
                Cell::new(format!("{:.2}", r.log_likelihood)).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.2}", r.aic)).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.2}", r.bic)).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.4}", entry.weight)).set_alignment(CellAlignment::Right),
                Cell::new(evidence(r.bic - min_bic)).set_alignment(CellAlignment::Left),
            ]);
        }

        let mut out = format!(
            "{}\n{}",
            title(&format!("Model ranking by {} (n = {})", self.criterion(), self.sample_size())),
            table
        );
        for failure in self.failures() {
            out.push_str(&format!("\n⚪ excluded: {failure}"));
        }
        out
    }
}

impl Display for ModelRanking {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl BootstrapEstimate {
    /// Summary as a boxed table.
    pub fn display(&self) -> String {
        let confidence = self.interval.confidence.unwrap_or(f64::NAN);

        let mut table = body(&["Metric", "Value"]);
        let mut row = |name: &str, value: String| {
            table.add_row(vec![
                Cell::new(name).set_alignment(CellAlignment::Left),
                Cell::new(value).set_alignment(CellAlignment::Right),
            ]);
        };
        row("Point estimate", format!("{:.4}", self.point()));
        row(&format!("{:.1}% lower", 100.0 * confidence), format!("{:.4}", self.interval.lower));
        row(&format!("{:.1}% upper", 100.0 * confidence), format!("{:.4}", self.interval.upper));
        row("Resamples", self.resamples.to_string());
        row("Excluded", self.excluded.to_string());

        format!("{}\n{}", title("Bootstrap percentile interval"), table)
    }
}

impl Display for BootstrapEstimate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use crate::distribution::Family;
    use crate::sample::Sample;
    use crate::selection::ModelSelector;

    #[test]
    fn ranking_table_lists_models_and_exclusions() {
        let sample = Sample::new(vec![-3.0, 1.0, 2.0, 4.0, 7.0]);
        let ranking = ModelSelector::new([Family::Gaussian, Family::Gamma]).expect("valid").rank(&sample).expect("ranks");
        let text = ranking.to_string();
        assert!(text.contains("Model ranking by BIC (n = 5)"), "{text}");
        assert!(text.contains("Gaussian(mean="), "{text}");
        assert!(text.contains("excluded: Gamma"), "{text}");
    }
}
