use actix_web::{error, middleware, web, App, HttpServer, Result};
use pr_insight_api::config::{Config, Opts};
use pr_insight_api::handlers;

#[actix_rt::main]
async fn main() -> std::io::Result<()> {
    let (_handle, _opt) = Opts::parse_from_args();
    let state = Config::parse_from_env().into_state();
    let state2 = state.clone();

    log::info!("listening on port {}", state2.config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::PathConfig::default())
            .app_data(web::JsonConfig::default())
            .app_data(web::QueryConfig::default())
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .default_service(web::route().to(not_found))
            .route("/", web::get().to(index))
            .service(
                web::scope("/api/auth")
                    .configure(handlers::auth::init)
                    .configure(handlers::pulls::init)
                    .configure(handlers::reviews::init)
                    .configure(handlers::viewer::init),
            )
    })
    .keep_alive(std::time::Duration::from_secs(300))
    .bind(("0.0.0.0", state2.config.port))?
    .run()
    .await
}

/// Root greeting, doubling as a liveness probe.
async fn index() -> &'static str {
    "Hii"
}

async fn not_found() -> Result<&'static str> {
    Err(error::ErrorNotFound("route not found"))
}
