use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use learnx_server::{
    app_state::AppState,
    config::Config,
    handlers::{generate_study_plan, health_check},
    middleware::RequestIdMiddleware,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    let (host, port) = config.bind_address();

    let state = AppState::new(config).map_err(|e| {
        log::error!("Failed to initialise application state: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    log::info!("Starting LearnX on http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(RequestIdMiddleware)
            .wrap(Logger::new(r#"%a %{x-request-id}o "%r" %s %b %T"#))
            .wrap(Cors::permissive())
            .service(health_check)
            .service(generate_study_plan)
    })
    .bind((host, port))?
    .run()
    .await
}
