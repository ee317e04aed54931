/// Largest photo accepted with a report (25 MiB)
pub const MAX_PHOTO_SIZE: usize = 25 * 1024 * 1024;

/// Photo bytes kept in memory for the thumbnail route; oldest photos go first
pub const PHOTO_STORE_BUDGET: usize = 256 * 1024 * 1024;

/// Exact response body the form endpoint sends back when it stored a report
pub const FORM_ENDPOINT_SUCCESS: &str = "Success";

/// Decimal places used when a map click is written into the location field
pub const PIN_LOCATION_PRECISION: usize = 5;

// =============================================================================
// USER-FACING MESSAGES
// =============================================================================

pub const MSG_PICK_LOCATION: &str = "Please click on the map to pick a location.";
pub const MSG_PICK_SEVERITY: &str = "Please select severity level.";
pub const MSG_ATTACH_PHOTO: &str = "Please attach a photo.";
pub const MSG_PHOTO_TOO_LARGE: &str = "Image must be less than 25 MB.";
pub const MSG_PHOTO_UNREADABLE: &str = "Failed to read the attached photo.";
pub const MSG_NETWORK_ERROR: &str = "Network error. Please try again.";
pub const MSG_SUBMISSION_IN_PROGRESS: &str = "A submission is already in progress.";
pub const MSG_SUBMITTED: &str = "Report submitted successfully!";
