//! HTTP route handlers for the admin API.
//!
//! Every handler outside `/auth` requires a logged-in admin via the
//! `RequireAdminAuth` extractor; admin-user management additionally
//! requires `SuperAdmin`.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health, /health/ready
//!
//! # Auth
//! POST /auth/login, POST /auth/logout, GET /auth/me
//!
//! # Admin users (SuperAdmin only)
//! GET|POST /admin-users
//! PUT  /admin-users/{id}/role
//! POST /admin-users/{id}/deactivate
//!
//! # Clients
//! GET|POST /clients           GET|PUT|DELETE /clients/{id}
//! POST /clients/{id}/credit   GET|POST /clients/{id}/notes
//!
//! # Professionals
//! GET|POST /professionals     GET|PUT|DELETE /professionals/{id}
//! GET|PUT  /professionals/{id}/working-hours
//! GET|POST /professionals/{id}/blocked-hours
//! DELETE   /professionals/{id}/blocked-hours/{blocked_id}
//!
//! # Catalog
//! GET|POST /services          GET|PUT|DELETE /services/{id}
//! GET|POST /products          GET|PUT|DELETE /products/{id}
//! POST /products/{id}/stock
//! GET|POST /promotions        GET|PUT|DELETE /promotions/{id}
//!
//! # Comandas
//! GET|POST /comandas          GET /comandas/{id}
//! POST /comandas/{id}/items   DELETE /comandas/{id}/items/{item_id}
//! POST /comandas/{id}/close   POST /comandas/{id}/cancel
//!
//! # Cashier
//! POST /cashier/open          POST /cashier/close
//! GET  /cashier/current       GET /cashier/history
//! POST /cashier/movements     GET /cashier/{id}/movements
//!
//! # Expenses
//! GET|POST /expenses          GET|PUT|DELETE /expenses/{id}
//!
//! # Appointments
//! GET /appointments           PUT /appointments/{id}/status
//!
//! # Reports
//! GET /reports/revenue        GET /reports/commissions
//! GET /reports/top-services
//! ```

pub mod admin_users;
pub mod appointments;
pub mod auth;
pub mod cashier;
pub mod clients;
pub mod comandas;
pub mod expenses;
pub mod products;
pub mod professionals;
pub mod promotions;
pub mod reports;
pub mod services;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the admin-user management router (SuperAdmin only).
pub fn admin_user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin_users::list).post(admin_users::create))
        .route("/{id}/role", put(admin_users::update_role))
        .route("/{id}/deactivate", post(admin_users::deactivate))
}

/// Create the client management router.
pub fn client_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(clients::list).post(clients::create))
        .route(
            "/{id}",
            get(clients::show).put(clients::update).delete(clients::remove),
        )
        .route("/{id}/credit", post(clients::adjust_credit))
        .route("/{id}/notes", get(clients::list_notes).post(clients::add_note))
}

/// Create the professional management router.
pub fn professional_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(professionals::list).post(professionals::create))
        .route(
            "/{id}",
            get(professionals::show)
                .put(professionals::update)
                .delete(professionals::remove),
        )
        .route(
            "/{id}/working-hours",
            get(professionals::working_hours).put(professionals::replace_working_hours),
        )
        .route(
            "/{id}/blocked-hours",
            get(professionals::list_blocked_hours).post(professionals::add_blocked_hours),
        )
        .route(
            "/{id}/blocked-hours/{blocked_id}",
            delete(professionals::delete_blocked_hours),
        )
}

/// Create the catalog management router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/services", get(services::list).post(services::create))
        .route(
            "/services/{id}",
            get(services::show).put(services::update).delete(services::remove),
        )
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/{id}",
            get(products::show).put(products::update).delete(products::remove),
        )
        .route("/products/{id}/stock", post(products::adjust_stock))
        .route("/promotions", get(promotions::list).post(promotions::create))
        .route(
            "/promotions/{id}",
            get(promotions::show)
                .put(promotions::update)
                .delete(promotions::remove),
        )
}

/// Create the comanda router.
pub fn comanda_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(comandas::list).post(comandas::open))
        .route("/{id}", get(comandas::show))
        .route("/{id}/items", post(comandas::add_item))
        .route("/{id}/items/{item_id}", delete(comandas::remove_item))
        .route("/{id}/close", post(comandas::close))
        .route("/{id}/cancel", post(comandas::cancel))
}

/// Create the cashier router.
pub fn cashier_routes() -> Router<AppState> {
    Router::new()
        .route("/open", post(cashier::open))
        .route("/close", post(cashier::close))
        .route("/current", get(cashier::current))
        .route("/history", get(cashier::history))
        .route("/movements", post(cashier::add_movement))
        .route("/{id}/movements", get(cashier::list_movements))
}

/// Create the expense router.
pub fn expense_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(expenses::list).post(expenses::create))
        .route(
            "/{id}",
            get(expenses::show).put(expenses::update).delete(expenses::remove),
        )
}

/// Create the appointment router.
pub fn appointment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(appointments::list))
        .route("/{id}/status", put(appointments::update_status))
}

/// Create the report router.
pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/revenue", get(reports::revenue))
        .route("/commissions", get(reports::commissions))
        .route("/top-services", get(reports::top_services))
}

/// Create all routes for the admin API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/admin-users", admin_user_routes())
        .nest("/clients", client_routes())
        .nest("/professionals", professional_routes())
        .merge(catalog_routes())
        .nest("/comandas", comanda_routes())
        .nest("/cashier", cashier_routes())
        .nest("/expenses", expense_routes())
        .nest("/appointments", appointment_routes())
        .nest("/reports", report_routes())
}
