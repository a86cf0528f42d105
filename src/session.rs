//! Interactive analysis state threaded through the pipeline
//!
//! A `Session` owns one generated dataset together with its scores, the
//! current filter and the analyst's selection. Every stage it calls is a
//! pure function; the session only decides which outputs are current.
//!
//! Regenerating the data or changing the filter clears the selection,
//! since ids picked under the previous view may no longer be visible.

use crate::data::{self, CustomerRecord};
use crate::error::{RfmError, RfmResult};
use crate::grid::{self, CellSummary, Grid};
use crate::model::{self, FilterCriteria, ScoredCustomer};
use crate::submit::{SubmissionRequest, SubmissionResponse, Submitter};
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Session {
    records: Vec<CustomerRecord>,
    scores: Vec<ScoredCustomer>,
    grid: Grid,
    criteria: FilterCriteria,
    filtered: Vec<ScoredCustomer>,
    selection: BTreeSet<String>,
}

impl Session {
    /// Score an existing dataset and start with the default filter
    pub fn load(records: Vec<CustomerRecord>) -> RfmResult<Self> {
        let scores = model::score(&records)?;
        let grid = grid::bucketize(&scores);
        let criteria = FilterCriteria::default();
        let filtered = model::filter(&scores, &criteria);
        log::info!("Session loaded with {} customers", records.len());
        Ok(Self {
            records,
            scores,
            grid,
            criteria,
            filtered,
            selection: BTreeSet::new(),
        })
    }

    /// Generate a fresh dataset of `count` customers
    pub fn generate<R: Rng + ?Sized>(count: usize, rng: &mut R) -> RfmResult<Self> {
        Self::load(data::generate(count, rng)?)
    }

    /// Replace the dataset, keeping the current filter
    pub fn regenerate<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> RfmResult<()> {
        let records = data::generate(count, rng)?;
        let scores = model::score(&records)?;
        self.grid = grid::bucketize(&scores);
        self.filtered = model::filter(&scores, &self.criteria);
        self.records = records;
        self.scores = scores;
        self.selection.clear();
        log::info!("Regenerated {} customers", self.records.len());
        Ok(())
    }

    pub fn records(&self) -> &[CustomerRecord] {
        &self.records
    }

    pub fn scores(&self) -> &[ScoredCustomer] {
        &self.scores
    }

    /// Grid over every scored customer, ignoring the filter
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn criteria(&self) -> FilterCriteria {
        self.criteria
    }

    /// Apply new thresholds; scores are left untouched
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.filtered = model::filter(&self.scores, &criteria);
        self.selection.clear();
        log::debug!(
            "Filter {:?} keeps {} of {} customers",
            criteria,
            self.filtered.len(),
            self.scores.len()
        );
    }

    /// Customers passing the current filter, in dataset order
    pub fn filtered(&self) -> &[ScoredCustomer] {
        &self.filtered
    }

    /// Grid over the filtered customers only
    pub fn filtered_grid(&self) -> Grid {
        grid::bucketize(&self.filtered)
    }

    fn is_visible(&self, id: &str) -> bool {
        self.filtered.iter().any(|c| c.id == id)
    }

    /// Flip one customer's selection; returns whether it is now selected
    pub fn toggle(&mut self, id: &str) -> RfmResult<bool> {
        if !self.is_visible(id) {
            return Err(RfmError::UnknownCustomer { id: id.to_string() });
        }
        if self.selection.remove(id) {
            Ok(false)
        } else {
            self.selection.insert(id.to_string());
            Ok(true)
        }
    }

    /// Add every filtered customer in cell (x, y); returns how many were added
    pub fn select_cell(&mut self, x: u8, y: u8) -> RfmResult<usize> {
        grid::check_cell(x, y)?;
        let before = self.selection.len();
        self.selection.extend(
            self.filtered
                .iter()
                .filter(|c| c.x == x && c.y == y)
                .map(|c| c.id.clone()),
        );
        Ok(self.selection.len() - before)
    }

    pub fn select_all(&mut self) {
        self.selection
            .extend(self.filtered.iter().map(|c| c.id.clone()));
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    /// Selected ids in sorted order
    pub fn selected_ids(&self) -> Vec<String> {
        self.selection.iter().cloned().collect()
    }

    pub fn submission(&self) -> RfmResult<SubmissionRequest> {
        if self.selection.is_empty() {
            return Err(RfmError::EmptySelection);
        }
        Ok(SubmissionRequest {
            customer_ids: self.selected_ids(),
        })
    }

    /// Hand the selection to `submitter`; the session itself is unchanged
    pub fn submit(&self, submitter: &dyn Submitter) -> crate::Result<SubmissionResponse> {
        let request = self.submission()?;
        submitter.submit(&request)
    }

    pub fn report(&self) -> Report {
        let grid = self.filtered_grid();
        Report {
            total: self.scores.len(),
            filtered: self.filtered.len(),
            criteria: self.criteria,
            cells: grid.summary(),
            grid,
            selected: self.selected_ids(),
        }
    }

    /// Write the JSON report for the current view to `path`
    pub fn write_report(&self, path: impl AsRef<Path>) -> crate::Result<()> {
        let json = serde_json::to_string_pretty(&self.report()).map_err(RfmError::from)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Report written to {}", path.as_ref().display());
        Ok(())
    }
}

/// Snapshot of the filtered view for export
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub total: usize,
    pub filtered: usize,
    pub criteria: FilterCriteria,
    pub cells: Vec<CellSummary>,
    pub grid: Grid,
    pub selected: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample_dataset;
    use crate::submit::EchoBackend;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    fn sample_session() -> Session {
        Session::load(sample_dataset()).unwrap()
    }

    #[test]
    fn test_load_scores_everything() {
        let session = sample_session();
        assert_eq!(session.records().len(), 20);
        assert_eq!(session.scores().len(), 20);
        assert_eq!(session.filtered().len(), 20);
        assert_eq!(session.grid().total(), 20);
        assert_eq!(session.criteria(), FilterCriteria::default());
    }

    #[test]
    fn test_load_rejects_empty() {
        assert!(matches!(
            Session::load(Vec::new()),
            Err(RfmError::EmptyDataset)
        ));
    }

    #[test]
    fn test_toggle() {
        let mut session = sample_session();
        assert!(session.toggle("CUST_005").unwrap());
        assert!(session.is_selected("CUST_005"));
        assert!(!session.toggle("CUST_005").unwrap());
        assert!(!session.is_selected("CUST_005"));
        assert!(session.toggle("CUST_999").is_err());
    }

    #[test]
    fn test_toggle_requires_visible_customer() {
        let mut session = sample_session();
        session.set_criteria(FilterCriteria::new(6, 6, 6));
        assert!(matches!(
            session.toggle("CUST_001"),
            Err(RfmError::UnknownCustomer { .. })
        ));
    }

    #[test]
    fn test_filter_change_clears_selection_and_keeps_scores() {
        let mut session = sample_session();
        let scores = session.scores().to_vec();
        session.select_all();
        assert_eq!(session.selected_ids().len(), 20);

        session.set_criteria(FilterCriteria::new(3, 3, 3));
        assert!(session.selected_ids().is_empty());
        assert_eq!(session.scores(), scores.as_slice());
        assert!(session
            .filtered()
            .iter()
            .all(|c| c.recency_score >= 3 && c.frequency_score >= 3 && c.monetary_score >= 3));
    }

    #[test]
    fn test_clear_selection_keeps_filter() {
        let mut session = sample_session();
        session.set_criteria(FilterCriteria::new(2, 1, 1));
        let visible = session.filtered().len();
        session.select_all();
        assert_eq!(session.selected_ids().len(), visible);

        session.clear_selection();
        assert!(session.selected_ids().is_empty());
        assert!(matches!(session.submission(), Err(RfmError::EmptySelection)));
        assert_eq!(session.criteria(), FilterCriteria::new(2, 1, 1));
        assert_eq!(session.filtered().len(), visible);
    }

    #[test]
    fn test_regenerate_clears_selection() {
        let mut rng = Pcg64Mcg::seed_from_u64(8);
        let mut session = Session::generate(30, &mut rng).unwrap();
        session.select_all();
        session.regenerate(40, &mut rng).unwrap();
        assert_eq!(session.records().len(), 40);
        assert_eq!(session.grid().total(), 40);
        assert!(session.selected_ids().is_empty());
    }

    #[test]
    fn test_select_cell_matches_filtered_grid() {
        let mut session = sample_session();
        let expected = session.filtered_grid().cell(5, 5).unwrap().count;
        assert_eq!(session.select_cell(5, 5).unwrap(), expected);
        assert_eq!(session.select_cell(5, 5).unwrap(), 0);
        assert!(session.select_cell(0, 5).is_err());
    }

    #[test]
    fn test_submit_requires_selection() {
        let session = sample_session();
        assert!(session.submit(&EchoBackend).is_err());
    }

    #[test]
    fn test_submit_echoes_sorted_ids() {
        let mut session = sample_session();
        session.toggle("CUST_010").unwrap();
        session.toggle("CUST_002").unwrap();
        let response = session.submit(&EchoBackend).unwrap();
        assert!(response.success);
        assert_eq!(response.count, 2);
        assert_eq!(response.selected_ids, vec!["CUST_002", "CUST_010"]);
    }

    #[test]
    fn test_report_reflects_filter() {
        let mut session = sample_session();
        session.set_criteria(FilterCriteria::new(1, 4, 1));
        let report = session.report();
        assert_eq!(report.total, 20);
        assert_eq!(report.filtered, session.filtered().len());
        assert_eq!(report.grid.total(), report.filtered);
        assert_eq!(report.cells.len(), 25);
    }
}
