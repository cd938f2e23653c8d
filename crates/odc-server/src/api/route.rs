use actix_web::{Scope, web};

use super::{about, broker, data, health, messages};

pub fn about_routes() -> Scope {
    web::scope("/about")
        .service(about::connector)
        .service(about::self_description)
        .service(about::connector_as)
}

pub fn data_routes() -> Scope {
    web::scope("/data").service(data::artifact)
}

pub fn api_routes() -> Scope {
    web::scope("/api")
        .service(web::scope("/messages").service(messages::build_message))
        .service(web::scope("/broker").service(broker::notify_broker))
}

/// Register every connector route on an actix `App`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health)
        .service(about_routes())
        .service(data_routes())
        .service(api_routes());
}
