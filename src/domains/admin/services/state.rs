// Admin domain state
use crate::shared::database::Database;
use crate::domains::admin::services::AdminService;

#[derive(Clone)]
pub struct AdminState {
    pub admin_service: AdminService,
}

impl AdminState {
    pub fn new(db: Database) -> Self {
        Self {
            admin_service: AdminService::new(db),
        }
    }
}
