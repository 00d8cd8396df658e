use actix_cors::Cors;
use actix_web::middleware::{Condition, Logger};
use actix_web::{web, App, HttpServer};
use clap::Parser;

use canvas_server::config::Config;
use canvas_server::connection::{ConnectionIdSource, ConnectionSettings};
use canvas_server::gateway::spawn_gateway;
use canvas_server::handlers::root;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();

    let gateway_tx = web::Data::new(spawn_gateway());
    let connection_ids = web::Data::new(ConnectionIdSource::new());
    let settings = web::Data::new(ConnectionSettings {
        egress_buffer: config.egress_buffer,
    });
    let permissive_cors = config.permissive_cors;

    log::info!("Listening on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Condition::new(permissive_cors, Cors::permissive()))
            .app_data(gateway_tx.clone())
            .app_data(connection_ids.clone())
            .app_data(settings.clone())
            .configure(root)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
