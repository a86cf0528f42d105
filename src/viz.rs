//! Grid rendering using Plotters and console summaries

use crate::grid::Grid;
use crate::model::{MAX_SCORE, MIN_SCORE};
use crate::session::Session;
use plotters::prelude::*;
use std::collections::BTreeSet;

/// Colour of an empty cell
const EMPTY_COLOR: RGBColor = RGBColor(245, 247, 250);
/// Colour of the fullest cell
const FULL_COLOR: RGBColor = RGBColor(31, 78, 161);

/// Blend between the empty and full colours by `count / max`
fn cell_color(count: usize, max: usize) -> RGBColor {
    if max == 0 {
        return EMPTY_COLOR;
    }
    let t = count as f64 / max as f64;
    let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
    RGBColor(
        mix(EMPTY_COLOR.0, FULL_COLOR.0),
        mix(EMPTY_COLOR.1, FULL_COLOR.1),
        mix(EMPTY_COLOR.2, FULL_COLOR.2),
    )
}

/// Create a 5x5 heatmap of cell counts
///
/// # Arguments
/// * `grid` - Bucketed customers to draw
/// * `selected` - Ids whose cells get an outline
/// * `output_path` - Path to save the PNG plot
/// * `plot_title` - Title for the plot
pub fn create_grid_heatmap(
    grid: &Grid,
    selected: &BTreeSet<String>,
    output_path: &str,
    plot_title: Option<&str>,
) -> crate::Result<()> {
    let title = plot_title.unwrap_or("RFM Grid: Frequency vs Monetary");
    let max = grid.max_count();
    let lo = f64::from(MIN_SCORE) - 0.5;
    let hi = f64::from(MAX_SCORE) + 0.5;

    let root = BitMapBackend::new(output_path, (720, 640)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 26))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(lo..hi, lo..hi)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(5)
        .y_labels(5)
        .x_label_formatter(&|v| format!("{v:.0}"))
        .y_label_formatter(&|v| format!("{v:.0}"))
        .x_desc("Frequency score")
        .y_desc("Monetary score")
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    let mut positions = Vec::with_capacity(25);
    for x in MIN_SCORE..=MAX_SCORE {
        for y in MIN_SCORE..=MAX_SCORE {
            if let Some(cell) = grid.cell(x, y) {
                positions.push((f64::from(x), f64::from(y), cell));
            }
        }
    }

    chart.draw_series(positions.iter().map(|&(x, y, cell)| {
        Rectangle::new(
            [(x - 0.48, y - 0.48), (x + 0.48, y + 0.48)],
            cell_color(cell.count, max).filled(),
        )
    }))?;

    // Outline cells holding at least one selected customer
    chart.draw_series(
        positions
            .iter()
            .filter(|(_, _, cell)| cell.items.iter().any(|c| selected.contains(&c.id)))
            .map(|&(x, y, _)| {
                Rectangle::new(
                    [(x - 0.48, y - 0.48), (x + 0.48, y + 0.48)],
                    BLACK.stroke_width(3),
                )
            }),
    )?;

    chart.draw_series(positions.iter().map(|&(x, y, cell)| {
        let color = if cell.count * 2 > max { &WHITE } else { &BLACK };
        Text::new(
            cell.count.to_string(),
            (x - 0.08, y + 0.06),
            ("sans-serif", 18).into_font().color(color),
        )
    }))?;

    for (label, count) in [("Empty", 0), ("Half of max", max / 2), ("Max", max)] {
        let color = cell_color(count, max);
        chart
            .draw_series(std::iter::empty::<Rectangle<(f64, f64)>>())?
            .label(format!("{label} ({count})"))
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    println!("Grid heatmap saved to: {}", output_path);

    Ok(())
}

/// Print the grid as a table, highest monetary score on top
pub fn print_grid_statistics(grid: &Grid) {
    println!("\n=== RFM Grid (rows: monetary, columns: frequency) ===");
    print!("  M\\F |");
    for x in MIN_SCORE..=MAX_SCORE {
        print!(" {x:5}");
    }
    println!();
    println!("  ----+{}", "-".repeat(6 * usize::from(MAX_SCORE)));
    for y in (MIN_SCORE..=MAX_SCORE).rev() {
        print!("  {y:3} |");
        for x in MIN_SCORE..=MAX_SCORE {
            print!(" {:5}", grid.cell(x, y).map_or(0, |c| c.count));
        }
        println!();
    }
    println!("Customers in grid: {}", grid.total());

    let mut busiest: Vec<_> = grid.summary().into_iter().filter(|s| s.count > 0).collect();
    busiest.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    if !busiest.is_empty() {
        println!("\nBusiest cells:");
        for s in busiest.iter().take(5) {
            println!(
                "  {}: {} customers ({:.1}%), mean recency score {:.2}",
                s.key,
                s.count,
                s.share * 100.0,
                s.mean_recency_score
            );
        }
    }
}

/// Render the filtered view of a session and print its statistics
pub fn generate_visualization_report(session: &Session, output_path: &str) -> crate::Result<()> {
    let grid = session.filtered_grid();
    let selected: BTreeSet<String> = session.selected_ids().into_iter().collect();
    create_grid_heatmap(&grid, &selected, output_path, None)?;
    print_grid_statistics(&grid);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample_dataset;
    use std::path::Path;
    use tempfile::tempdir;

    fn rgb(c: RGBColor) -> (u8, u8, u8) {
        (c.0, c.1, c.2)
    }

    #[test]
    fn test_cell_color_endpoints() {
        assert_eq!(rgb(cell_color(0, 0)), rgb(EMPTY_COLOR));
        assert_eq!(rgb(cell_color(0, 10)), rgb(EMPTY_COLOR));
        assert_eq!(rgb(cell_color(10, 10)), rgb(FULL_COLOR));
    }

    #[test]
    fn test_create_grid_heatmap() {
        let session = Session::load(sample_dataset()).unwrap();
        let temp_dir = tempdir().unwrap();
        let output_path = temp_dir.path().join("grid.png");
        let output_str = output_path.to_str().unwrap();

        let result = create_grid_heatmap(session.grid(), &BTreeSet::new(), output_str, None);
        assert!(result.is_ok());
        assert!(Path::new(output_str).exists());
    }

    #[test]
    fn test_generate_visualization_report_with_selection() {
        let mut session = Session::load(sample_dataset()).unwrap();
        session.toggle("CUST_001").unwrap();
        let temp_dir = tempdir().unwrap();
        let output_path = temp_dir.path().join("report.png");
        let output_str = output_path.to_str().unwrap();

        let result = generate_visualization_report(&session, output_str);
        assert!(result.is_ok());
        assert!(Path::new(output_str).exists());
    }
}
