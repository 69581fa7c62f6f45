use kernel::model::dashboard::DashboardSummary;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub total_residents: i64,
    pub active_projects: i64,
    pub occupied_spots: i64,
    pub unpaid_assignments: i64,
}

impl From<DashboardSummary> for DashboardResponse {
    fn from(value: DashboardSummary) -> Self {
        let DashboardSummary {
            total_residents,
            active_projects,
            occupied_spots,
            unpaid_assignments,
        } = value;
        Self {
            total_residents,
            active_projects,
            occupied_spots,
            unpaid_assignments,
        }
    }
}
