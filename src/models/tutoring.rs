use crate::models::availability::AvailabilityGrid;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    Presential,
    Online,
    Both,
}

impl SessionMode {
    pub fn needs_location(self) -> bool {
        matches!(self, SessionMode::Presential | SessionMode::Both)
    }

    pub fn needs_meeting_url(self) -> bool {
        matches!(self, SessionMode::Online | SessionMode::Both)
    }
}

fn validate_availability(grid: &AvailabilityGrid) -> Result<(), ValidationError> {
    if grid.is_empty() {
        let mut error = ValidationError::new("no_availability");
        error.message = Some("Select at least one available slot".into());
        return Err(error);
    }
    Ok(())
}

fn validate_mode_details(request: &TutoringSessionRequest) -> Result<(), ValidationError> {
    let blank = |value: &Option<String>| value.as_deref().is_none_or(|v| v.trim().is_empty());

    if request.mode.needs_location() && blank(&request.location) {
        return Err(ValidationError::new("location_required"));
    }
    if request.mode.needs_meeting_url() && blank(&request.meeting_url) {
        return Err(ValidationError::new("meeting_url_required"));
    }
    Ok(())
}

/// Tutoring session as submitted by the create/edit forms. `available_hours`
/// travels as the encoded availability string.
#[derive(Deserialize, Serialize, Debug, Clone, Validate)]
#[validate(schema(function = "validate_mode_details"))]
pub struct TutoringSessionRequest {
    #[validate(length(min = 3))]
    pub title: String,
    #[validate(length(min = 10))]
    pub description: String,
    #[validate(length(min = 2))]
    pub subject: String,
    #[validate(range(min = 0))]
    pub price_per_hour: i32,
    #[validate(range(min = 30, max = 240))]
    pub duration_minutes: i32,
    pub mode: SessionMode,
    pub location: Option<String>,
    #[validate(url)]
    pub meeting_url: Option<String>,
    #[validate(range(min = 1))]
    pub max_students: Option<i32>,
    #[validate(custom(function = "validate_availability"))]
    pub available_hours: AvailabilityGrid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::availability::{Day, Slot};

    fn request() -> TutoringSessionRequest {
        TutoringSessionRequest {
            title: "Calculus I".to_string(),
            description: "Limits, derivatives and exam practice".to_string(),
            subject: "Math".to_string(),
            price_per_hour: 20000,
            duration_minutes: 60,
            mode: SessionMode::Online,
            location: None,
            meeting_url: Some("https://meet.example.com/calc".to_string()),
            max_students: Some(3),
            available_hours: AvailabilityGrid::new().with_slot(Day::Monday, Slot::Morning),
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn empty_availability_is_rejected() {
        let request = TutoringSessionRequest {
            available_hours: AvailabilityGrid::new(),
            ..request()
        };

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("available_hours"));
    }

    #[test]
    fn presential_needs_location() {
        let request = TutoringSessionRequest {
            mode: SessionMode::Presential,
            location: Some("  ".to_string()),
            ..request()
        };
        assert!(request.validate().is_err());

        let request = TutoringSessionRequest {
            location: Some("Library, room 204".to_string()),
            ..request
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn availability_travels_as_encoded_string() {
        let json = serde_json::to_value(request()).unwrap();
        assert_eq!(json["available_hours"], "mon:10-14");
        assert_eq!(json["mode"], "online");
    }
}
