use serde_json::{json, Value};

use crate::middleware::{ApiResult, IntoApiResponse};

/// GET / - service name, version and route overview
pub async fn root() -> ApiResult<Value> {
    Ok(json!({
        "name": "Storefront Admin API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health (public)",
            "search": "/api/search?query= (protected)",
            "account": "/api/account/security (protected)",
            "categories": "/api/categories[/:id] (protected, categories.view)",
            "notifications": "/api/notifications (protected)",
            "requests": "/api/requests (protected, not yet available)",
        }
    })
    .into_api_response())
}
