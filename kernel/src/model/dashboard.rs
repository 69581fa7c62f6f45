#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardSummary {
    pub total_residents: i64,
    pub active_projects: i64,
    pub occupied_spots: i64,
    pub unpaid_assignments: i64,
}
