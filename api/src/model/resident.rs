use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::ResidentId,
    resident::{
        event::{CreateResident, UpdatePaymentStatus},
        PaymentStatus, Resident,
    },
    role::Role,
    vehicle::Vehicle,
};
use serde::{Deserialize, Serialize};

use super::{
    define_name_enum,
    vehicle::{CreateVehicleRequest, VehicleResponse},
};

define_name_enum!(RoleName, Role, [Admin, Resident]);
define_name_enum!(PaymentStatusName, PaymentStatus, [Current, Overdue]);

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateResidentRequest {
    #[garde(length(min = 3))]
    pub full_name: String,
    #[garde(email)]
    pub email: String,
    #[garde(length(min = 1))]
    pub password: String,
    #[garde(length(min = 10, max = 10))]
    pub phone: String,
    #[garde(length(min = 1))]
    pub house_number: String,
    #[garde(skip)]
    pub interior_number: i32,
    #[garde(skip)]
    pub role: Option<RoleName>,
    #[garde(skip)]
    pub payment_status: Option<PaymentStatusName>,
    #[garde(dive)]
    pub vehicle: Option<CreateVehicleRequest>,
}

impl From<CreateResidentRequest> for CreateResident {
    fn from(value: CreateResidentRequest) -> Self {
        let CreateResidentRequest {
            full_name,
            email,
            password,
            phone,
            house_number,
            interior_number,
            role,
            payment_status,
            vehicle,
        } = value;
        CreateResident {
            full_name,
            email,
            password,
            phone,
            house_number,
            interior_number,
            role: role.map_or(Role::Resident, Role::from),
            // 支払いが確認されるまでは滞納扱い
            payment_status: payment_status.map_or(PaymentStatus::Overdue, PaymentStatus::from),
            vehicle: vehicle.map(Into::into),
        }
    }
}

// 居住者自身による登録。ロールと支払い状況は指定できない
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[garde(length(min = 3))]
    pub full_name: String,
    #[garde(email)]
    pub email: String,
    #[garde(length(min = 1))]
    pub password: String,
    #[garde(length(min = 10, max = 10))]
    pub phone: String,
    #[garde(length(min = 1))]
    pub house_number: String,
    #[garde(skip)]
    pub interior_number: i32,
    #[garde(dive)]
    pub vehicle: Option<CreateVehicleRequest>,
}

impl From<RegisterRequest> for CreateResident {
    fn from(value: RegisterRequest) -> Self {
        let RegisterRequest {
            full_name,
            email,
            password,
            phone,
            house_number,
            interior_number,
            vehicle,
        } = value;
        CreateResident {
            full_name,
            email,
            password,
            phone,
            house_number,
            interior_number,
            role: Role::Resident,
            payment_status: PaymentStatus::Overdue,
            vehicle: vehicle.map(Into::into),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentStatusRequest {
    #[garde(custom(requires_payment_date(&self.last_payment_date)))]
    pub payment_status: PaymentStatusName,
    #[garde(skip)]
    pub last_payment_date: Option<DateTime<Utc>>,
}

// 支払い済みにするときは最終支払日が必須
fn requires_payment_date(
    last_payment_date: &Option<DateTime<Utc>>,
) -> impl FnOnce(&PaymentStatusName, &()) -> garde::Result + '_ {
    move |status, _| {
        if *status == PaymentStatusName::Current && last_payment_date.is_none() {
            return Err(garde::Error::new("最終支払日を入力してください。"));
        }
        Ok(())
    }
}

#[derive(new)]
pub struct UpdatePaymentStatusRequestWithId(ResidentId, UpdatePaymentStatusRequest);

impl From<UpdatePaymentStatusRequestWithId> for UpdatePaymentStatus {
    fn from(value: UpdatePaymentStatusRequestWithId) -> Self {
        let UpdatePaymentStatusRequestWithId(
            resident_id,
            UpdatePaymentStatusRequest {
                payment_status,
                last_payment_date,
            },
        ) = value;
        UpdatePaymentStatus {
            resident_id,
            payment_status: payment_status.into(),
            last_payment_date,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentResponse {
    pub resident_id: ResidentId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub house_number: String,
    pub interior_number: i32,
    pub role: RoleName,
    pub payment_status: PaymentStatusName,
    pub last_payment_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Resident> for ResidentResponse {
    fn from(value: Resident) -> Self {
        let Resident {
            resident_id,
            full_name,
            email,
            phone,
            house_number,
            interior_number,
            role,
            payment_status,
            last_payment_date,
            created_at,
        } = value;
        Self {
            resident_id,
            full_name,
            email,
            phone,
            house_number,
            interior_number,
            role: role.into(),
            payment_status: payment_status.into(),
            last_payment_date,
            created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentsResponse {
    pub items: Vec<ResidentResponse>,
}

impl From<Vec<Resident>> for ResidentsResponse {
    fn from(value: Vec<Resident>) -> Self {
        Self {
            items: value.into_iter().map(ResidentResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentDetailResponse {
    #[serde(flatten)]
    pub resident: ResidentResponse,
    pub vehicles: Vec<VehicleResponse>,
}

impl From<(Resident, Vec<Vehicle>)> for ResidentDetailResponse {
    fn from((resident, vehicles): (Resident, Vec<Vehicle>)) -> Self {
        Self {
            resident: resident.into(),
            vehicles: vehicles.into_iter().map(VehicleResponse::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn create_request(patch: serde_json::Value) -> CreateResidentRequest {
        let mut body = json!({
            "fullName": "Ana Gomez",
            "email": "ana@example.com",
            "password": "secret",
            "phone": "3001234567",
            "houseNumber": "12",
            "interiorNumber": 3
        });
        if let (Some(body), Some(patch)) = (body.as_object_mut(), patch.as_object()) {
            body.extend(patch.clone());
        }
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn valid_resident_request_defaults_to_overdue_resident() {
        let req = create_request(json!({}));
        assert!(req.validate(&()).is_ok());

        let event = CreateResident::from(req);
        assert_eq!(event.role, Role::Resident);
        assert_eq!(event.payment_status, PaymentStatus::Overdue);
        assert!(event.vehicle.is_none());
    }

    #[rstest]
    #[case(json!({ "fullName": "Al" }))]
    #[case(json!({ "email": "not-an-email" }))]
    #[case(json!({ "phone": "300123456" }))]
    #[case(json!({ "phone": "30012345678" }))]
    #[case(json!({ "houseNumber": "" }))]
    #[case(json!({ "password": "" }))]
    #[case(json!({ "vehicle": { "licensePlate": "", "brand": "Mazda", "model": "2", "color": "red" } }))]
    fn invalid_resident_request_is_rejected(#[case] patch: serde_json::Value) {
        assert!(create_request(patch).validate(&()).is_err());
    }

    #[test]
    fn admin_can_set_role_and_payment_status() {
        let req = create_request(json!({ "role": "admin", "paymentStatus": "current" }));
        let event = CreateResident::from(req);
        assert_eq!(event.role, Role::Admin);
        assert_eq!(event.payment_status, PaymentStatus::Current);
    }

    #[rstest]
    #[case(json!({ "paymentStatus": "current" }), false)]
    #[case(json!({ "paymentStatus": "current", "lastPaymentDate": "2024-05-01T00:00:00Z" }), true)]
    #[case(json!({ "paymentStatus": "overdue" }), true)]
    fn current_payment_status_requires_a_date(
        #[case] body: serde_json::Value,
        #[case] valid: bool,
    ) {
        let req: UpdatePaymentStatusRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.validate(&()).is_ok(), valid);
    }
}
