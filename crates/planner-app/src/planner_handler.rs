use salvo::async_trait;
use std::sync::Arc;

use crate::error::AppResult;
use planner_core::error::CoreError;
use planner_service::planner::PlannerService;

pub struct PlannerServiceHandler {
    pub service: Arc<PlannerService>,
}

#[async_trait]
impl salvo::Handler for PlannerServiceHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        // Share the planner state with every handler below this hoop
        depot.inject(Arc::clone(&self.service));
    }
}

/// ## Summary
/// Retrieves the planner service from the depot.
///
/// ## Errors
/// Returns an error if the planner service is not found in the depot.
pub fn get_planner_from_depot(depot: &salvo::Depot) -> AppResult<Arc<PlannerService>> {
    depot
        .obtain::<Arc<PlannerService>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Planner service not found in depot").into())
}
