//! Output formatting for CLI

use crate::pipeline::ExperimentSummary;

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Print the end-of-run summary block
pub fn print_summary(summary: &ExperimentSummary) {
    print_section("EXPERIMENT SUMMARY");
    print_kv("Total Episodes", &format_number(summary.total_episodes));
    print_kv("Average Reward", &format!("{:.2}", summary.mean_reward));
    print_kv("Average Steps", &format!("{:.1}", summary.mean_steps));
    print_kv(
        "Termination Rate",
        &format!("{:.1}%", summary.termination_rate * 100.0),
    );
    print_kv("Reward Std Dev", &format!("{:.2}", summary.reward_std_dev));
    print_kv(
        "Reward Range",
        &format!("{:.2} .. {:.2}", summary.min_reward, summary.max_reward),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_separators() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_000), "1,000");
        assert_eq!(format_number(1_234_567), "1,234,567");
    }
}
