use crate::features::reports::models::{Report, ReportStatus};

/// Ordered reports for the current session, ids unique
#[derive(Debug, Default)]
pub struct ReportCollection {
    reports: Vec<Report>,
}

impl ReportCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection. Later duplicates of an id are dropped;
    /// returns how many were dropped.
    pub fn replace_all(&mut self, reports: Vec<Report>) -> usize {
        self.reports.clear();
        let mut dropped = 0;
        for report in reports {
            if self.contains(report.id) {
                dropped += 1;
                continue;
            }
            self.reports.push(report);
        }
        dropped
    }

    /// Append one report. Fails with the report back if its id is taken.
    pub fn append(&mut self, report: Report) -> Result<(), Report> {
        if self.contains(report.id) {
            return Err(report);
        }
        self.reports.push(report);
        Ok(())
    }

    /// Set the status of one report, leaving every other field untouched
    pub fn update_status(&mut self, id: i64, status: ReportStatus) -> Option<&Report> {
        let report = self.reports.iter_mut().find(|r| r.id == id)?;
        report.status = status;
        Some(report)
    }

    /// Smallest id >= `candidate` not used by any report
    pub fn next_free_id(&self, candidate: i64) -> i64 {
        let mut id = candidate;
        while self.contains(id) {
            id += 1;
        }
        id
    }

    pub fn get(&self, id: i64) -> Option<&Report> {
        self.reports.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.reports.iter().any(|r| r.id == id)
    }

    pub fn as_slice(&self) -> &[Report] {
        &self.reports
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::models::Severity;

    fn report(id: i64) -> Report {
        Report {
            id,
            lat: 10.0,
            lng: 20.0,
            severity: Severity::Medium,
            comments: format!("report {}", id),
            photo_url: String::new(),
            status: ReportStatus::Submitted,
            timestamp: "01/01/2026, 10:00:00".to_string(),
            photo_file: None,
            city: Some("Mumbai".to_string()),
            state: Some("Maharashtra".to_string()),
        }
    }

    #[test]
    fn test_replace_all_discards_previous_reports() {
        let mut collection = ReportCollection::new();
        collection.append(report(99)).unwrap();

        let dropped = collection.replace_all(vec![report(1), report(2)]);

        assert_eq!(dropped, 0);
        assert_eq!(collection.len(), 2);
        assert!(!collection.contains(99));
    }

    #[test]
    fn test_replace_all_drops_duplicate_ids() {
        let mut collection = ReportCollection::new();
        let mut second = report(1);
        second.comments = "duplicate".to_string();

        let dropped = collection.replace_all(vec![report(1), second]);

        assert_eq!(dropped, 1);
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.get(1).unwrap().comments, "report 1");
    }

    #[test]
    fn test_append_rejects_taken_id() {
        let mut collection = ReportCollection::new();
        collection.append(report(5)).unwrap();
        assert!(collection.append(report(5)).is_err());
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_update_status_only_touches_target() {
        let mut collection = ReportCollection::new();
        collection.replace_all(vec![report(1), report(2), report(3)]);
        let before: Vec<Report> = collection.as_slice().to_vec();

        let updated = collection
            .update_status(2, ReportStatus::Resolved)
            .cloned()
            .unwrap();

        let mut expected = before[1].clone();
        expected.status = ReportStatus::Resolved;
        assert_eq!(updated, expected);
        assert_eq!(collection.get(1), Some(&before[0]));
        assert_eq!(collection.get(3), Some(&before[2]));
    }

    #[test]
    fn test_update_status_unknown_id() {
        let mut collection = ReportCollection::new();
        collection.append(report(1)).unwrap();
        assert!(collection.update_status(42, ReportStatus::Closed).is_none());
    }

    #[test]
    fn test_next_free_id_skips_taken_ids() {
        let mut collection = ReportCollection::new();
        collection.replace_all(vec![report(100), report(101)]);
        assert_eq!(collection.next_free_id(100), 102);
        assert_eq!(collection.next_free_id(50), 50);
    }
}
