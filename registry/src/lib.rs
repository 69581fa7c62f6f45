use std::sync::Arc;

use adapter::{
    database::ConnectionPool,
    redis::RedisClient,
    repository::{
        auth::AuthRepositoryImpl, dashboard::DashboardRepositoryImpl,
        health::HealthCheckRepositoryImpl, notification::NotificationRepositoryImpl,
        parking::ParkingRepositoryImpl, project::ProjectRepositoryImpl,
        resident::ResidentRepositoryImpl, rotation::RotationRepositoryImpl,
        vehicle::VehicleRepositoryImpl,
    },
};
use kernel::{
    model::rotation::RotationPolicy,
    repository::{
        auth::AuthRepository, dashboard::DashboardRepository, health::HealthCheckRepository,
        notification::NotificationRepository, parking::ParkingRepository,
        project::ProjectRepository, resident::ResidentRepository, rotation::RotationRepository,
        vehicle::VehicleRepository,
    },
};
use shared::config::AppConfig;

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    auth_repository: Arc<dyn AuthRepository>,
    resident_repository: Arc<dyn ResidentRepository>,
    vehicle_repository: Arc<dyn VehicleRepository>,
    parking_repository: Arc<dyn ParkingRepository>,
    rotation_repository: Arc<dyn RotationRepository>,
    project_repository: Arc<dyn ProjectRepository>,
    notification_repository: Arc<dyn NotificationRepository>,
    dashboard_repository: Arc<dyn DashboardRepository>,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool, redis_client: Arc<RedisClient>, app_config: AppConfig) -> Self {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let auth_repository = Arc::new(AuthRepositoryImpl::new(
            pool.clone(),
            redis_client.clone(),
            app_config.auth.ttl,
        ));
        let resident_repository = Arc::new(ResidentRepositoryImpl::new(pool.clone()));
        let vehicle_repository = Arc::new(VehicleRepositoryImpl::new(pool.clone()));
        let parking_repository = Arc::new(ParkingRepositoryImpl::new(pool.clone()));
        let rotation_repository = Arc::new(RotationRepositoryImpl::new(
            pool.clone(),
            RotationPolicy::from(&app_config.rotation),
        ));
        let project_repository = Arc::new(ProjectRepositoryImpl::new(pool.clone()));
        let notification_repository = Arc::new(NotificationRepositoryImpl::new(pool.clone()));
        let dashboard_repository = Arc::new(DashboardRepositoryImpl::new(pool.clone()));
        Self {
            health_check_repository,
            auth_repository,
            resident_repository,
            vehicle_repository,
            parking_repository,
            rotation_repository,
            project_repository,
            notification_repository,
            dashboard_repository,
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn auth_repository(&self) -> Arc<dyn AuthRepository> {
        self.auth_repository.clone()
    }

    pub fn resident_repository(&self) -> Arc<dyn ResidentRepository> {
        self.resident_repository.clone()
    }

    pub fn vehicle_repository(&self) -> Arc<dyn VehicleRepository> {
        self.vehicle_repository.clone()
    }

    pub fn parking_repository(&self) -> Arc<dyn ParkingRepository> {
        self.parking_repository.clone()
    }

    pub fn rotation_repository(&self) -> Arc<dyn RotationRepository> {
        self.rotation_repository.clone()
    }

    pub fn project_repository(&self) -> Arc<dyn ProjectRepository> {
        self.project_repository.clone()
    }

    pub fn notification_repository(&self) -> Arc<dyn NotificationRepository> {
        self.notification_repository.clone()
    }

    pub fn dashboard_repository(&self) -> Arc<dyn DashboardRepository> {
        self.dashboard_repository.clone()
    }
}
