use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    id::{AssignmentId, ParkingSpotId, ResidentId, VehicleId},
    parking::{
        event::{AssignmentListOptions, CreateAssignment, CreateParkingSpot},
        AssignmentPaymentStatus, AssignmentStatus, ParkingAssignment, ParkingSpot, SpotStatus,
    },
    rotation::RotationSummary,
};
use serde::{Deserialize, Serialize};

use super::define_name_enum;

define_name_enum!(SpotStatusName, SpotStatus, [Available, Occupied, Assigned]);
define_name_enum!(AssignmentStatusName, AssignmentStatus, [Active, Expired, Cancelled]);
define_name_enum!(AssignmentPaymentStatusName, AssignmentPaymentStatus, [Paid, Unpaid]);

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateParkingSpotRequest {
    #[garde(length(min = 1))]
    pub spot_number: String,
    #[garde(length(min = 1))]
    pub location: String,
}

impl From<CreateParkingSpotRequest> for CreateParkingSpot {
    fn from(value: CreateParkingSpotRequest) -> Self {
        let CreateParkingSpotRequest {
            spot_number,
            location,
        } = value;
        CreateParkingSpot {
            spot_number,
            location,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingSpotResponse {
    pub spot_id: ParkingSpotId,
    pub spot_number: String,
    pub location: String,
    pub status: SpotStatusName,
}

impl From<ParkingSpot> for ParkingSpotResponse {
    fn from(value: ParkingSpot) -> Self {
        let ParkingSpot {
            spot_id,
            spot_number,
            location,
            status,
        } = value;
        Self {
            spot_id,
            spot_number,
            location,
            status: status.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingSpotsResponse {
    pub items: Vec<ParkingSpotResponse>,
}

impl From<Vec<ParkingSpot>> for ParkingSpotsResponse {
    fn from(value: Vec<ParkingSpot>) -> Self {
        Self {
            items: value.into_iter().map(ParkingSpotResponse::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentListQuery {
    pub status: Option<AssignmentStatusName>,
}

impl From<AssignmentListQuery> for AssignmentListOptions {
    fn from(value: AssignmentListQuery) -> Self {
        AssignmentListOptions {
            status: value.status.map(AssignmentStatus::from),
            resident_id: None,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentRequest {
    #[garde(skip)]
    pub resident_id: ResidentId,
    #[garde(skip)]
    pub vehicle_id: VehicleId,
    #[garde(skip)]
    pub spot_id: ParkingSpotId,
    #[garde(skip)]
    pub start_date: DateTime<Utc>,
    #[garde(custom(ends_after(&self.start_date)))]
    pub end_date: DateTime<Utc>,
    #[garde(skip)]
    pub payment_status: Option<AssignmentPaymentStatusName>,
}

fn ends_after(
    start_date: &DateTime<Utc>,
) -> impl FnOnce(&DateTime<Utc>, &()) -> garde::Result + '_ {
    move |end_date, _| {
        if end_date <= start_date {
            return Err(garde::Error::new(
                "終了日は開始日より後の日時を指定してください。",
            ));
        }
        Ok(())
    }
}

impl From<CreateAssignmentRequest> for CreateAssignment {
    fn from(value: CreateAssignmentRequest) -> Self {
        let CreateAssignmentRequest {
            resident_id,
            vehicle_id,
            spot_id,
            start_date,
            end_date,
            payment_status,
        } = value;
        CreateAssignment {
            resident_id,
            vehicle_id,
            spot_id,
            start_date,
            end_date,
            payment_status: payment_status
                .map_or(AssignmentPaymentStatus::Unpaid, AssignmentPaymentStatus::from),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentResponse {
    pub assignment_id: AssignmentId,
    pub resident_id: ResidentId,
    pub vehicle_id: VehicleId,
    pub spot_id: ParkingSpotId,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub payment_status: AssignmentPaymentStatusName,
    pub status: AssignmentStatusName,
    pub created_at: DateTime<Utc>,
}

impl From<ParkingAssignment> for AssignmentResponse {
    fn from(value: ParkingAssignment) -> Self {
        let ParkingAssignment {
            assignment_id,
            resident_id,
            vehicle_id,
            spot_id,
            start_date,
            end_date,
            payment_status,
            status,
            created_at,
        } = value;
        Self {
            assignment_id,
            resident_id,
            vehicle_id,
            spot_id,
            start_date,
            end_date,
            payment_status: payment_status.into(),
            status: status.into(),
            created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentsResponse {
    pub items: Vec<AssignmentResponse>,
}

impl From<Vec<ParkingAssignment>> for AssignmentsResponse {
    fn from(value: Vec<ParkingAssignment>) -> Self {
        Self {
            items: value.into_iter().map(AssignmentResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationResponse {
    pub removed: usize,
    pub assigned: usize,
    pub waiting: usize,
    pub message: String,
}

impl From<RotationSummary> for RotationResponse {
    fn from(value: RotationSummary) -> Self {
        Self {
            removed: value.removed,
            assigned: value.assigned,
            waiting: value.waiting,
            message: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn assignment_request(start: &str, end: &str) -> CreateAssignmentRequest {
        serde_json::from_value(json!({
            "residentId": ResidentId::new(),
            "vehicleId": VehicleId::new(),
            "spotId": ParkingSpotId::new(),
            "startDate": start,
            "endDate": end,
        }))
        .unwrap()
    }

    #[rstest]
    #[case("2024-01-01T00:00:00Z", "2024-04-01T00:00:00Z", true)]
    #[case("2024-01-01T00:00:00Z", "2024-01-01T00:00:00Z", false)]
    #[case("2024-04-01T00:00:00Z", "2024-01-01T00:00:00Z", false)]
    fn assignment_must_end_after_it_starts(
        #[case] start: &str,
        #[case] end: &str,
        #[case] valid: bool,
    ) {
        assert_eq!(assignment_request(start, end).validate(&()).is_ok(), valid);
    }

    #[test]
    fn manual_assignment_defaults_to_unpaid() {
        let event = CreateAssignment::from(assignment_request(
            "2024-01-01T00:00:00Z",
            "2024-04-01T00:00:00Z",
        ));
        assert_eq!(event.payment_status, AssignmentPaymentStatus::Unpaid);
    }

    #[test]
    fn rotation_response_carries_the_summary_message() {
        let res = RotationResponse::from(RotationSummary {
            removed: 1,
            assigned: 2,
            waiting: 0,
        });
        assert_eq!(res.assigned, 2);
        assert_eq!(
            res.message,
            "ローテーションが完了しました。解除: 1、割り当て: 2、待機: 0"
        );
    }

    #[test]
    fn status_filter_is_lowercase() {
        let query: AssignmentListQuery =
            serde_json::from_value(json!({ "status": "expired" })).unwrap();
        let options = AssignmentListOptions::from(query);
        assert_eq!(options.status, Some(AssignmentStatus::Expired));
    }
}
