use actix_web::{web, HttpRequest, HttpResponse, Result};
use shared_types::{ActionResponse, ContactRequest};
use std::sync::Arc;

use crate::helpers::client_address::client_address;
use crate::services::ContactRelay;

pub async fn send_contact(
    relay: web::Data<Arc<ContactRelay>>,
    request: web::Json<ContactRequest>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let origin = client_address(&req);

    relay.send_message(&request, &origin).await?;

    Ok(HttpResponse::Ok().json(ActionResponse::ok("Message sent successfully")))
}
