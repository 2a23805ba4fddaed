use crate::{
    AppState,
    auth::{Employee, RequireRole},
    handlers,
};
use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{post, put},
};

/// require_employee
///
/// `RequireRole<Employee>` rejects with 401 or 403 before the handler runs; on
/// success the resolved principal is stored in the request extensions.
async fn require_employee(
    RequireRole(user, _): RequireRole<Employee>,
    mut request: Request,
    next: Next,
) -> Response {
    request.extensions_mut().insert(user);
    next.run(request).await
}

/// Employee Router Module
///
/// Category mutations. The guard is attached per method router, so only
/// POST, PUT and DELETE pass through it; other methods on the shared paths
/// still get axum's 405.
pub fn employee_routes(state: &AppState) -> Router<AppState> {
    let guard = middleware::from_fn_with_state(state.clone(), require_employee);

    Router::new()
        // POST /v1/categories
        .route(
            "/v1/categories",
            post(handlers::create_category).route_layer(guard.clone()),
        )
        // PUT/DELETE /v1/categories/{id}
        // PUT is a full replace; the body id must equal the path id.
        .route(
            "/v1/categories/{id}",
            put(handlers::update_category)
                .delete(handlers::delete_category)
                .route_layer(guard),
        )
}
