use chrono::Utc;
use std::collections::{HashMap, VecDeque};
use tokio::sync::RwLock;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{
    display_timestamp, CreateReport, Report, ReportCollection, ReportStatus, SeedRecord,
    StoredPhoto,
};
use crate::shared::constants::PHOTO_STORE_BUDGET;

/// Photos of submitted reports, bounded by a total byte budget
struct PhotoStore {
    photos: HashMap<i64, StoredPhoto>,
    order: VecDeque<i64>,
    total_bytes: usize,
    budget: usize,
}

impl PhotoStore {
    fn new(budget: usize) -> Self {
        Self {
            photos: HashMap::new(),
            order: VecDeque::new(),
            total_bytes: 0,
            budget,
        }
    }

    /// Store a photo, evicting the oldest ones until it fits the budget
    fn insert(&mut self, id: i64, photo: StoredPhoto) {
        while self.total_bytes + photo.bytes.len() > self.budget {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            if let Some(evicted) = self.photos.remove(&oldest) {
                self.total_bytes -= evicted.bytes.len();
                tracing::info!("Evicted photo of report {} from memory", oldest);
            }
        }

        self.total_bytes += photo.bytes.len();
        self.order.push_back(id);
        self.photos.insert(id, photo);
    }

    fn get(&self, id: i64) -> Option<&StoredPhoto> {
        self.photos.get(&id)
    }

    fn clear(&mut self) {
        self.photos.clear();
        self.order.clear();
        self.total_bytes = 0;
    }
}

/// Service for the in-memory report collection
pub struct ReportService {
    collection: RwLock<ReportCollection>,
    photos: RwLock<PhotoStore>,
}

impl ReportService {
    pub fn new() -> Self {
        Self::with_photo_budget(PHOTO_STORE_BUDGET)
    }

    /// Keep at most `budget` bytes of photos in memory
    pub fn with_photo_budget(budget: usize) -> Self {
        Self {
            collection: RwLock::new(ReportCollection::new()),
            photos: RwLock::new(PhotoStore::new(budget)),
        }
    }

    /// Replace the collection with the records from the static data file
    pub async fn load_seed(&self, records: Vec<SeedRecord>) -> Vec<Report> {
        let timestamp = display_timestamp();
        let reports: Vec<Report> = records
            .into_iter()
            .map(|r| Report::from_seed(r, timestamp.clone()))
            .collect();

        let mut collection = self.collection.write().await;
        let dropped = collection.replace_all(reports);
        if dropped > 0 {
            tracing::warn!("Dropped {} seed records with duplicate ids", dropped);
        }
        self.photos.write().await.clear();

        tracing::info!("Loaded {} seed reports", collection.len());

        collection.as_slice().to_vec()
    }

    /// Append a report for a submission the form endpoint accepted.
    /// The id comes from the wall clock in milliseconds.
    pub async fn create(&self, data: CreateReport) -> Result<Report> {
        let mut collection = self.collection.write().await;
        let id = collection.next_free_id(Utc::now().timestamp_millis());

        let report = Report {
            id,
            lat: data.lat,
            lng: data.lng,
            severity: data.severity,
            comments: data.comments,
            photo_url: format!("/api/reports/{}/photo", id),
            status: ReportStatus::INITIAL,
            timestamp: display_timestamp(),
            photo_file: Some(data.photo.file_name.clone()),
            city: None,
            state: None,
        };

        collection.append(report.clone()).map_err(|r| {
            AppError::Internal(format!("Report id {} already taken", r.id))
        })?;
        self.photos.write().await.insert(id, data.photo);

        tracing::info!(
            "Created report: id={}, severity={}, total={}",
            report.id,
            report.severity,
            collection.len()
        );

        Ok(report)
    }

    /// Update the status of a report
    pub async fn update_status(&self, id: i64, status: ReportStatus) -> Result<Report> {
        let mut collection = self.collection.write().await;
        let report = collection
            .update_status(id, status)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;

        tracing::info!("Report {} status changed to {}", id, status);

        Ok(report)
    }

    pub async fn list(&self) -> Vec<Report> {
        self.collection.read().await.as_slice().to_vec()
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Report> {
        self.collection
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))
    }

    /// Photo attached to a submitted report, while it is still held in memory
    pub async fn get_photo(&self, id: i64) -> Result<StoredPhoto> {
        self.photos
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Report {} has no photo", id)))
    }

    pub async fn count(&self) -> usize {
        self.collection.read().await.len()
    }
}

impl Default for ReportService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::models::Severity;
    use axum::body::Bytes;

    fn seed(id: i64) -> SeedRecord {
        SeedRecord {
            id,
            lat: 19.07,
            lng: 72.87,
            severity: Severity::High,
            description: "knee-deep water".to_string(),
            city: Some("Mumbai".to_string()),
            state: Some("Maharashtra".to_string()),
        }
    }

    fn new_report() -> CreateReport {
        CreateReport {
            lat: 12.97,
            lng: 77.59,
            severity: Severity::Low,
            comments: "puddles".to_string(),
            photo: StoredPhoto {
                file_name: "street.jpg".to_string(),
                content_type: "image/jpeg".to_string(),
                bytes: Bytes::from_static(b"jpeg"),
            },
        }
    }

    #[tokio::test]
    async fn test_load_seed_sets_initial_status() {
        let service = ReportService::new();
        let loaded = service.load_seed(vec![seed(1), seed(2)]).await;

        assert_eq!(loaded.len(), 2);
        assert!(loaded.iter().all(|r| r.status == ReportStatus::Submitted));
        assert!(loaded.iter().all(|r| r.photo_url.is_empty()));
    }

    #[tokio::test]
    async fn test_create_appends_with_empty_city_and_state() {
        let service = ReportService::new();
        service.load_seed(vec![seed(1)]).await;

        let report = service.create(new_report()).await.unwrap();

        assert_eq!(service.count().await, 2);
        assert_eq!(report.status, ReportStatus::Submitted);
        assert!(report.city.is_none());
        assert!(report.state.is_none());
        assert_eq!(report.photo_file.as_deref(), Some("street.jpg"));
        assert_eq!(report.photo_url, format!("/api/reports/{}/photo", report.id));

        let photo = service.get_photo(report.id).await.unwrap();
        assert_eq!(photo.content_type, "image/jpeg");
    }

    #[tokio::test]
    async fn test_create_twice_in_same_millisecond_keeps_ids_unique() {
        let service = ReportService::new();
        let first = service.create(new_report()).await.unwrap();
        let second = service.create(new_report()).await.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_photo_store_evicts_oldest_over_budget() {
        let service = ReportService::with_photo_budget(10);
        let photo = |size: usize| CreateReport {
            photo: StoredPhoto {
                file_name: "street.jpg".to_string(),
                content_type: "image/jpeg".to_string(),
                bytes: Bytes::from(vec![0u8; size]),
            },
            ..new_report()
        };

        let first = service.create(photo(4)).await.unwrap();
        let second = service.create(photo(4)).await.unwrap();
        let third = service.create(photo(4)).await.unwrap();

        assert!(matches!(
            service.get_photo(first.id).await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(service.get_photo(second.id).await.unwrap().bytes.len(), 4);
        assert_eq!(service.get_photo(third.id).await.unwrap().bytes.len(), 4);
        assert_eq!(service.count().await, 3);
    }

    #[tokio::test]
    async fn test_update_status_unknown_report() {
        let service = ReportService::new();
        let result = service.update_status(7, ReportStatus::Closed).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_seed_reports_have_no_photo() {
        let service = ReportService::new();
        service.load_seed(vec![seed(1)]).await;
        assert!(matches!(
            service.get_photo(1).await,
            Err(AppError::NotFound(_))
        ));
    }
}
