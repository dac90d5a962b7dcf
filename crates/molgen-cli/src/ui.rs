use molgen::core::models::result::GenerationResult;
use molgen::core::models::unit::Unit;

const RANK_HEADER: &str = "#";
const COMPOSITION_HEADER: &str = "Composition";
const DEVIATION_HEADER: &str = "Deviation";
const MASS_HEADER: &str = "Mass";

fn composition_cell(result: &GenerationResult) -> String {
    result
        .composite()
        .named_quantities()
        .map(|(name, quantity)| format!("{name}: {quantity}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders the first `limit` ranked results as an aligned text table.
///
/// Mass and deviation are shown with two decimals; a trailing line notes how
/// many rows were left out.
pub fn render_results(results: &[GenerationResult], limit: usize) -> String {
    let shown = &results[..results.len().min(limit)];

    let rows: Vec<[String; 4]> = shown
        .iter()
        .enumerate()
        .map(|(index, result)| {
            [
                (index + 1).to_string(),
                composition_cell(result),
                format!("{:+.2}", result.deviation()),
                format!("{:.2}", result.mass()),
            ]
        })
        .collect();

    let headers = [RANK_HEADER, COMPOSITION_HEADER, DEVIATION_HEADER, MASS_HEADER];
    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let format_row = |cells: [&str; 4]| {
        format!(
            "{:>w0$}  {:<w1$}  {:>w2$}  {:>w3$}\n",
            cells[0],
            cells[1],
            cells[2],
            cells[3],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
            w3 = widths[3],
        )
    };

    let mut out = format_row(headers);
    let total_width = widths.iter().sum::<usize>() + 6;
    out.push_str(&"-".repeat(total_width));
    out.push('\n');
    for [rank, composition, deviation, mass] in &rows {
        out.push_str(&format_row([
            rank.as_str(),
            composition.as_str(),
            deviation.as_str(),
            mass.as_str(),
        ]));
    }
    if results.len() > shown.len() {
        out.push_str(&format!(
            "... {} more result(s) not shown (use --limit or --output).\n",
            results.len() - shown.len()
        ));
    }
    out
}

/// Renders the catalog as `name  weight  id` lines in catalog order.
pub fn render_catalog(units: &[Unit]) -> String {
    let name_width = units
        .iter()
        .map(|u| u.name().chars().count())
        .max()
        .unwrap_or(0)
        .max("Name".len());

    let mut out = format!("{:<name_width$}  {:>12}  Id\n", "Name", "Weight");
    for unit in units {
        out.push_str(&format!(
            "{:<name_width$}  {:>12.4}  {}\n",
            unit.name(),
            unit.weight(),
            unit.id()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use molgen::core::models::unit::QuantityMap;
    use molgen::engine::budget::SearchBudget;
    use molgen::engine::ranking::rank;
    use molgen::engine::search::generate;

    fn ranked_results() -> Vec<GenerationResult> {
        let units = vec![
            Unit::new("c", "C", 12.0).unwrap(),
            Unit::new("h", "H", 1.0).unwrap(),
        ];
        let max = QuantityMap::from([("c".into(), 2), ("h".into(), 6)]);
        let raw = generate(
            &units,
            &QuantityMap::new(),
            &max,
            30.0,
            1.0,
            &SearchBudget::unlimited(),
        )
        .unwrap();
        rank(&raw)
    }

    #[test]
    fn results_table_lists_pairs_with_two_decimals() {
        let table = render_results(&ranked_results(), 10);
        let lines: Vec<_> = table.lines().collect();
        assert!(lines[0].contains("Composition"));
        assert!(lines[2].contains("C: 2, H: 6"));
        assert!(lines[2].contains("+0.00"));
        assert!(lines[2].contains("30.00"));
        assert!(table.contains("-1.00"));
        assert!(!table.contains("more result(s)"));
    }

    #[test]
    fn results_table_respects_limit() {
        let results = ranked_results();
        assert_eq!(results.len(), 2);
        let table = render_results(&results, 1);
        assert_eq!(table.lines().count(), 4);
        assert!(table.contains("1 more result(s) not shown"));
    }

    #[test]
    fn empty_results_render_header_only() {
        let table = render_results(&[], 5);
        assert_eq!(table.lines().count(), 2);
    }

    #[test]
    fn catalog_table_shows_every_unit() {
        let units = vec![
            Unit::new("c", "Carbon", 12.011).unwrap(),
            Unit::new("h", "H", 1.008).unwrap(),
        ];
        let table = render_catalog(&units);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("Carbon"));
        assert!(lines[1].contains("12.0110"));
        assert!(lines[2].ends_with("h"));
    }

    #[test]
    fn catalog_table_lines_are_aligned_exactly() {
        let units = vec![Unit::new("h", "H", 1.008).unwrap()];
        assert_eq!(
            render_catalog(&units),
            "Name        Weight  Id\nH           1.0080  h\n"
        );
    }
}
