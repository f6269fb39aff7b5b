use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};

use orderdesk_core::OrderId;

use crate::app::dto::{self, CreateOrderRequest, OrderResource};
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/:id", get(get_order).delete(delete_order))
}

pub async fn create_order(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match services.orders.place(body.into()).await {
        Ok(view) => dto::respond(
            StatusCode::CREATED,
            "Order created successfully",
            Some(OrderResource::from(&view)),
        ),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_orders(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.orders.list().await {
        Ok(views) => {
            let data: Vec<OrderResource> = views.iter().map(OrderResource::from).collect();
            dto::respond(StatusCode::OK, "Orders retrieved successfully", Some(data))
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: OrderId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.orders.get(id).await {
        Ok(view) => dto::respond(
            StatusCode::OK,
            "Order retrieved successfully",
            Some(OrderResource::from(&view)),
        ),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: OrderId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.orders.delete(id).await {
        Ok(()) => dto::respond::<()>(StatusCode::OK, "Order deleted successfully", None),
        Err(e) => errors::service_error_to_response(e),
    }
}
