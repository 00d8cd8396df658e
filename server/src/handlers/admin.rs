use crate::admin::AdminCommand;
use crate::gateway::{GatewayCommand, GatewayTx};
use crate::room_coordinator::RoomDescription;
use actix_web::error;
use actix_web::web;
use actix_web::{HttpResponse, Responder, Result};

pub fn configure_admin_handlers(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin").service(
            web::resource("/rooms")
                .name("admin_rooms")
                .route(web::get().to(list_rooms)),
        ),
    );
}

pub async fn list_rooms(gateway_tx: web::Data<GatewayTx>) -> Result<impl Responder> {
    let (tx, rx) = tokio::sync::oneshot::channel::<Vec<RoomDescription>>();

    gateway_tx
        .send(GatewayCommand::AdminCommand(AdminCommand::ListRooms { tx }))
        .map_err(|_| error::ErrorInternalServerError("Internal Server Error"))?;

    let rooms = rx
        .await
        .map_err(|_| error::ErrorInternalServerError("Receiver await error"))?;

    Ok(HttpResponse::Ok().json(rooms))
}
