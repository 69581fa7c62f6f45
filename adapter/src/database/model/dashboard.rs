use kernel::model::dashboard::DashboardSummary;

#[derive(sqlx::FromRow)]
pub struct DashboardRow {
    pub total_residents: i64,
    pub active_projects: i64,
    pub occupied_spots: i64,
    pub unpaid_assignments: i64,
}

impl From<DashboardRow> for DashboardSummary {
    fn from(value: DashboardRow) -> Self {
        let DashboardRow {
            total_residents,
            active_projects,
            occupied_spots,
            unpaid_assignments,
        } = value;
        DashboardSummary {
            total_residents,
            active_projects,
            occupied_spots,
            unpaid_assignments,
        }
    }
}
