// Dashboard domain state
use crate::shared::database::Database;
use crate::domains::dashboard::services::StatsService;

/// 대시보드는 통계 외에 auth / wallet / ledger 서비스를 AppState에서 직접 사용
#[derive(Clone)]
pub struct DashboardState {
    pub stats_service: StatsService,
}

impl DashboardState {
    pub fn new(db: Database) -> Self {
        Self {
            stats_service: StatsService::new(db),
        }
    }
}
