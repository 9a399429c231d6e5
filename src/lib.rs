pub mod config;
pub mod error;
pub mod handlers;
pub mod idle;
pub mod middleware;
pub mod models;
pub mod postgrest;
pub mod session;
pub mod utils;
pub mod validate;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use config::Config;
use postgrest::PostgrestClient;
use session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub postgrest: PostgrestClient,
    pub sessions: SessionStore,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            postgrest: PostgrestClient::new(&config.postgrest_url),
            sessions: SessionStore::new(config.idle_timeout, config.idle_warning),
            config: Arc::new(config),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Authentication
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/me", get(handlers::auth::me))
        // Users
        .route(
            "/api/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/api/users/:id",
            delete(handlers::users::delete_user).patch(handlers::users::update_user),
        )
        // Roles and permissions
        .route(
            "/api/roles",
            get(handlers::rbac::list_roles).post(handlers::rbac::create_role),
        )
        .route(
            "/api/roles/:id",
            delete(handlers::rbac::delete_role).patch(handlers::rbac::update_role),
        )
        .route(
            "/api/permissions",
            get(handlers::rbac::list_permissions).post(handlers::rbac::create_permission),
        )
        .route(
            "/api/permissions/:id",
            delete(handlers::rbac::delete_permission).patch(handlers::rbac::update_permission),
        )
        .route(
            "/api/role-permissions",
            get(handlers::rbac::list_role_permissions)
                .post(handlers::rbac::assign_role_permission),
        )
        .route(
            "/api/role-permissions/:role_id/:permission_id",
            delete(handlers::rbac::revoke_role_permission),
        )
        // Menus
        .route(
            "/api/menus",
            get(handlers::menus::list_menus).post(handlers::menus::create_menu),
        )
        .route(
            "/api/menus/:id",
            delete(handlers::menus::delete_menu).patch(handlers::menus::update_menu),
        )
        // Warehouses, zones, locations
        .route(
            "/api/warehouses",
            get(handlers::warehouses::list_warehouses).post(handlers::warehouses::create_warehouse),
        )
        .route(
            "/api/warehouses/:id",
            delete(handlers::warehouses::delete_warehouse)
                .patch(handlers::warehouses::update_warehouse),
        )
        .route(
            "/api/zones",
            get(handlers::warehouses::list_zones).post(handlers::warehouses::create_zone),
        )
        .route(
            "/api/zones/:id",
            delete(handlers::warehouses::delete_zone).patch(handlers::warehouses::update_zone),
        )
        .route(
            "/api/locations",
            get(handlers::warehouses::list_locations).post(handlers::warehouses::create_location),
        )
        .route(
            "/api/locations/:id",
            delete(handlers::warehouses::delete_location)
                .patch(handlers::warehouses::update_location),
        )
        // Products, images, metadata
        .route(
            "/api/products",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route(
            "/api/products/:id",
            delete(handlers::products::delete_product).patch(handlers::products::update_product),
        )
        .route(
            "/api/product-images",
            get(handlers::products::list_product_images)
                .post(handlers::products::create_product_image),
        )
        .route(
            "/api/product-images/:id",
            delete(handlers::products::delete_product_image)
                .patch(handlers::products::update_product_image),
        )
        .route(
            "/api/products/:id/images/:image_id/primary",
            post(handlers::products::set_primary_image),
        )
        .route(
            "/api/product-metadata",
            get(handlers::products::list_product_metadata)
                .post(handlers::products::create_product_metadata),
        )
        .route(
            "/api/product-metadata/:id",
            delete(handlers::products::delete_product_metadata)
                .patch(handlers::products::update_product_metadata),
        )
        // Inventory and transactions
        .route(
            "/api/inventory",
            get(handlers::inventory::list_inventory).post(handlers::inventory::create_inventory),
        )
        .route(
            "/api/inventory/:id",
            delete(handlers::inventory::delete_inventory)
                .patch(handlers::inventory::update_inventory),
        )
        .route(
            "/api/inventory-transactions",
            get(handlers::inventory::list_transactions)
                .post(handlers::inventory::create_transaction),
        )
        .route(
            "/api/inventory-transactions/:id",
            delete(handlers::inventory::delete_transaction)
                .patch(handlers::inventory::update_transaction),
        )
        .route(
            "/api/transaction-types",
            get(handlers::inventory::list_transaction_types)
                .post(handlers::inventory::create_transaction_type),
        )
        .route(
            "/api/transaction-types/:id",
            delete(handlers::inventory::delete_transaction_type),
        )
        // Uploads and image serving
        .route("/api/uploads", post(handlers::uploads::upload_image))
        .route("/images/:file", get(handlers::uploads::serve_image))
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CookieManagerLayer::new())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(10 * 1024 * 1024)), // 10MB
        )
        .with_state(state)
}
