//! Command-line interface definitions and argument parsing

use crate::grid::parse_cell_key;
use crate::model::FilterCriteria;
use clap::Parser;

/// Generate synthetic customers and segment them on a 5x5 RFM grid
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Number of customers to generate
    #[arg(short = 'n', long, default_value = "100")]
    pub count: usize,

    /// Seed for reproducible generation
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Use the fixed 20-customer sample instead of generating
    #[arg(long)]
    pub sample: bool,

    /// Minimum recency score (1-5)
    #[arg(long, default_value = "1")]
    pub min_recency: u8,

    /// Minimum frequency score (1-5)
    #[arg(long, default_value = "1")]
    pub min_frequency: u8,

    /// Minimum monetary score (1-5)
    #[arg(long, default_value = "1")]
    pub min_monetary: u8,

    /// Customers to select, as comma-separated ids
    /// Example: --select "CUST_001,CUST_017"
    #[arg(long)]
    pub select: Option<String>,

    /// Select every filtered customer in a grid cell, as "x-y"
    #[arg(long)]
    pub select_cell: Option<String>,

    /// Submit the selection to the echo backend
    #[arg(long)]
    pub submit: bool,

    /// Output path for the grid heatmap
    #[arg(short, long, default_value = "rfm_grid.png")]
    pub output: String,

    /// Write a JSON report of the filtered view to this path
    #[arg(long)]
    pub json: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new(self.min_recency, self.min_frequency, self.min_monetary)
    }

    /// Parse the ids given to `--select`
    pub fn parse_selected_ids(&self) -> crate::Result<Vec<String>> {
        let Some(ref raw) = self.select else {
            return Ok(Vec::new());
        };

        let ids: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if let Some(bad) = ids.iter().find(|id| !is_customer_id(id)) {
            anyhow::bail!("Invalid customer id: {} (expected CUST_NNN)", bad);
        }
        Ok(ids)
    }

    /// Parse the cell given to `--select-cell`
    pub fn parse_select_cell(&self) -> crate::Result<Option<(u8, u8)>> {
        match self.select_cell {
            Some(ref key) => Ok(Some(parse_cell_key(key)?)),
            None => Ok(None),
        }
    }
}

fn is_customer_id(id: &str) -> bool {
    id.strip_prefix("CUST_")
        .is_some_and(|n| n.len() >= 3 && n.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> Args {
        Args::parse_from(["rfmgrid"])
    }

    #[test]
    fn test_defaults() {
        let args = args();
        assert_eq!(args.count, 100);
        assert_eq!(args.seed, None);
        assert_eq!(args.criteria(), FilterCriteria::default());
        assert_eq!(args.output, "rfm_grid.png");
    }

    #[test]
    fn test_criteria_flags() {
        let args = Args::parse_from([
            "rfmgrid",
            "--min-recency",
            "4",
            "--min-frequency",
            "2",
            "--min-monetary",
            "5",
        ]);
        assert_eq!(args.criteria(), FilterCriteria::new(4, 2, 5));
    }

    #[test]
    fn test_parse_selected_ids() {
        let mut args = args();
        args.select = Some("CUST_001, CUST_017,".to_string());
        assert_eq!(
            args.parse_selected_ids().unwrap(),
            vec!["CUST_001".to_string(), "CUST_017".to_string()]
        );

        args.select = None;
        assert!(args.parse_selected_ids().unwrap().is_empty());

        args.select = Some("CUST_01".to_string());
        assert!(args.parse_selected_ids().is_err());

        args.select = Some("customer-1".to_string());
        assert!(args.parse_selected_ids().is_err());
    }

    #[test]
    fn test_parse_select_cell() {
        let mut args = args();
        args.select_cell = Some("5-4".to_string());
        assert_eq!(args.parse_select_cell().unwrap(), Some((5, 4)));

        args.select_cell = Some("9-9".to_string());
        assert!(args.parse_select_cell().is_err());

        args.select_cell = None;
        assert_eq!(args.parse_select_cell().unwrap(), None);
    }
}
