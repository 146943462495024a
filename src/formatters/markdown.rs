use crate::advisor::Recommendation;
use crate::profitability::ProfitabilityStatus;

/// Markdown formatter for recommendations
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    /// Format a recommendation as a markdown report
    pub fn format(recommendation: &Recommendation) -> String {
        let mut md = String::with_capacity(1024);

        md.push_str(&format!(
            "## Top {} Recommended Crops\n\n",
            recommendation.ranking.requested
        ));
        for (rank, entry) in recommendation.ranking.entries.iter().enumerate() {
            md.push_str(&format!(
                "{}. **{}** (Confidence: {})\n",
                rank + 1,
                entry.crop,
                entry.confidence_display()
            ));
        }
        if recommendation.ranking.is_short() {
            md.push_str(&format!(
                "\n*Only {} crop(s) available from the model.*\n",
                recommendation.ranking.len()
            ));
        }
        md.push('\n');

        md.push_str("## Fertilizer Advice\n\n");
        for advice in &recommendation.advisories {
            md.push_str(&format!(
                "{} **{}:** {}\n\n",
                advice.severity.icon(),
                advice.title,
                advice.text
            ));
        }

        md.push_str("## Profitability Analysis (Estimates per Hectare)\n\n");
        match &recommendation.profitability_status {
            ProfitabilityStatus::Available => Self::format_profitability_table(&mut md, recommendation),
            ProfitabilityStatus::NoMatchingCrops => {
                md.push_str("ℹ️ Profitability data not available for the recommended crops.\n");
            }
            ProfitabilityStatus::Unavailable { reason } => {
                md.push_str(&format!(
                    "🚨 Cannot perform profitability analysis: {}\n",
                    reason
                ));
            }
        }

        md
    }

    fn format_profitability_table(md: &mut String, recommendation: &Recommendation) {
        md.push_str("| Crop | Estimated Revenue (INR) | Estimated Cost (INR) | Estimated Profit (INR) |\n");
        md.push_str("|------|------------------------:|---------------------:|-----------------------:|\n");
        for row in recommendation.formatted_profitability() {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                row.crop, row.revenue, row.cost, row.profit
            ));
        }
    }
}
