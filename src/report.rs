use crate::model::LanguageStats;
use crate::util::group_thousands;

pub const DEFAULT_TOP_N: usize = 5;
pub const BAR_WIDTH: u64 = 20;

const HEADING: &str = "### 📊 Top Languages (by lines of code)";
const FILLED: char = '█';
const EMPTY: char = '░';

/// One rendered row: a language, its share of all lines, and its bar.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageBar {
    pub language: String,
    pub lines: u64,
    pub percent: f64,
    pub filled: u64,
}

impl LanguageBar {
    pub fn bar(&self) -> String {
        let filled = self.filled.min(BAR_WIDTH) as usize;
        let mut bar = String::new();
        bar.extend(std::iter::repeat(FILLED).take(filled));
        bar.extend(std::iter::repeat(EMPTY).take(BAR_WIDTH as usize - filled));
        bar
    }
}

/// Share of the grand total for every language, largest first. Empty when
/// there are no lines at all.
pub fn percentages(stats: &LanguageStats) -> Vec<(String, f64)> {
    let total = stats.total();
    if total == 0 {
        return Vec::new();
    }
    stats
        .sorted()
        .into_iter()
        .map(|(language, lines)| (language.to_string(), lines as f64 / total as f64 * 100.0))
        .collect()
}

/// The `n` largest languages. Percentages are against the total over all
/// languages, not just the ones shown.
pub fn top_languages(stats: &LanguageStats, n: usize) -> Vec<LanguageBar> {
    let total = stats.total();
    if total == 0 {
        return Vec::new();
    }
    stats
        .sorted()
        .into_iter()
        .take(n)
        .map(|(language, lines)| LanguageBar {
            language: language.to_string(),
            lines,
            percent: lines as f64 / total as f64 * 100.0,
            filled: (u128::from(lines) * u128::from(BAR_WIDTH) / u128::from(total)) as u64,
        })
        .collect()
}

/// Markdown block for the README, or `None` when there is nothing to show.
pub fn render_block(stats: &LanguageStats, n: usize) -> Option<String> {
    let total = stats.total();
    if total == 0 {
        return None;
    }

    let mut lines = vec![HEADING.to_string(), String::new()];
    for entry in top_languages(stats, n) {
        lines.push(format!("**{}** - {:.1}%", entry.language, entry.percent));
        lines.push(format!("```{}```", entry.bar()));
        lines.push(String::new());
    }
    lines.push(format!(
        "*Based on {} lines of code added across all commits*",
        group_thousands(total)
    ));
    lines.push(String::new());

    Some(lines.join("\n"))
}
