use std::sync::Arc;

use axum::{Router, extract::Extension, http::StatusCode, routing::get};

use crate::app::dto::{self, ProductResource};
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/", get(list_products))
}

pub async fn list_products(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.orders.products().await {
        Ok(products) => {
            let data: Vec<ProductResource> = products.iter().map(ProductResource::from).collect();
            dto::respond(StatusCode::OK, "Products retrieved successfully", Some(data))
        }
        Err(e) => errors::service_error_to_response(e),
    }
}
