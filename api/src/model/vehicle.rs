use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::{ResidentId, VehicleId},
    vehicle::{
        event::{CreateVehicle, NewVehicle, UpdateVehicleActive},
        Vehicle,
    },
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
    #[garde(length(min = 1))]
    pub license_plate: String,
    #[garde(length(min = 1))]
    pub brand: String,
    #[garde(length(min = 1))]
    pub model: String,
    #[garde(length(min = 1))]
    pub color: String,
}

impl From<CreateVehicleRequest> for NewVehicle {
    fn from(value: CreateVehicleRequest) -> Self {
        let CreateVehicleRequest {
            license_plate,
            brand,
            model,
            color,
        } = value;
        NewVehicle {
            license_plate,
            brand,
            model,
            color,
        }
    }
}

#[derive(new)]
pub struct CreateVehicleRequestWithResidentId(ResidentId, CreateVehicleRequest);

impl From<CreateVehicleRequestWithResidentId> for CreateVehicle {
    fn from(value: CreateVehicleRequestWithResidentId) -> Self {
        let CreateVehicleRequestWithResidentId(resident_id, req) = value;
        CreateVehicle::new(resident_id, req.into())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicleActiveRequest {
    pub active: bool,
}

#[derive(new)]
pub struct UpdateVehicleActiveRequestWithId(VehicleId, UpdateVehicleActiveRequest);

impl From<UpdateVehicleActiveRequestWithId> for UpdateVehicleActive {
    fn from(value: UpdateVehicleActiveRequestWithId) -> Self {
        let UpdateVehicleActiveRequestWithId(vehicle_id, UpdateVehicleActiveRequest { active }) =
            value;
        UpdateVehicleActive { vehicle_id, active }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleResponse {
    pub vehicle_id: VehicleId,
    pub resident_id: ResidentId,
    pub license_plate: String,
    pub brand: String,
    pub model: String,
    pub color: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(value: Vehicle) -> Self {
        let Vehicle {
            vehicle_id,
            resident_id,
            license_plate,
            brand,
            model,
            color,
            active,
            created_at,
        } = value;
        Self {
            vehicle_id,
            resident_id,
            license_plate,
            brand,
            model,
            color,
            active,
            created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclesResponse {
    pub items: Vec<VehicleResponse>,
}

impl From<Vec<Vehicle>> for VehiclesResponse {
    fn from(value: Vec<Vehicle>) -> Self {
        Self {
            items: value.into_iter().map(VehicleResponse::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vehicle_requires_every_field() {
        let req: CreateVehicleRequest = serde_json::from_value(serde_json::json!({
            "licensePlate": "ABC123",
            "brand": "Mazda",
            "model": "",
            "color": "red"
        }))
        .unwrap();
        assert!(req.validate(&()).is_err());
    }
}
