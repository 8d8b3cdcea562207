//! Plain-text summary of the heaviest functions.

use crate::aggregator::FunctionCost;
use crate::parser::MetricKey;

const NAME_WIDTH: usize = 48;

/// Render a fixed-width table of top functions
///
/// Long names keep their tail, which is where the method name lives.
pub fn generate_text_summary(top: &[FunctionCost], metric: MetricKey, total_functions: usize) -> String {
    let mut lines = Vec::new();

    lines.push(format!("  TOP FUNCTIONS BY {}", metric.description().to_uppercase()));
    lines.push(format!("  {}", "-".repeat(NAME_WIDTH + 40)));
    lines.push(format!(
        "  {:<width$} {:>14} {:>10} {:>8}",
        "Function",
        metric.as_str(),
        "calls",
        "%",
        width = NAME_WIDTH
    ));
    lines.push(format!("  {}", "-".repeat(NAME_WIDTH + 40)));

    for cost in top {
        lines.push(format!(
            "  {:<width$} {:>14.0} {:>10.0} {:>7.1}%",
            truncate_name(&cost.name),
            cost.value,
            cost.call_count,
            cost.percentage,
            width = NAME_WIDTH
        ));
    }

    lines.push(format!("  {}", "-".repeat(NAME_WIDTH + 40)));

    if total_functions > top.len() {
        lines.push(format!(
            "   (Showing top {} of {} functions)",
            top.len(),
            total_functions
        ));
    }

    lines.join("\n")
}

fn truncate_name(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= NAME_WIDTH {
        return name.to_string();
    }
    let tail: String = chars[chars.len() - (NAME_WIDTH - 3)..].iter().collect();
    format!("...{}", tail)
}
