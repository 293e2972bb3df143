// Copyright Alexandre D. Díaz
use actix_web::{
    dev::ServiceResponse,
    http::header,
    middleware::ErrorHandlerResponse,
    HttpResponse, Result,
};
use serde_json::json;

/// Error handler for a 404 Page not found error.
///
/// Responses that already carry a JSON body (e.g. a missing record) are kept.
pub fn handler_fn<B>(svc_res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    let is_json = svc_res
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map_or(false, |value| value.starts_with("application/json"));
    if is_json {
        return Ok(ErrorHandlerResponse::Response(svc_res.map_into_left_body()));
    }

    let res = HttpResponse::build(svc_res.status()).json(json!({
        "status": "Not Found",
        "message": "Page not found",
    }));
    Ok(ErrorHandlerResponse::Response(ServiceResponse::new(
        svc_res.into_parts().0,
        res.map_into_right_body(),
    )))
}
