use crate::core::{AppConfig, RedisHelper};
use crate::jobs::start_subscription_completion_checker;
use crate::routes::gazoduc_invest_routes;
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{dev::Server, web::Data, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub struct GazoducWebServer {
    port: u16,
    server: Server,
}

impl GazoducWebServer {
    pub async fn build(configuration: AppConfig) -> Result<Self, anyhow::Error> {
        let address = format!(
            "{}:{}",
            configuration.server.host, configuration.server.port
        );

        let pg_pool = PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_secs(5))
            .connect_lazy_with(configuration.postgres.connect());

        let redis = configuration.redis.connect();

        start_subscription_completion_checker(pg_pool.clone()).await;

        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();

        let server = run(listener, pg_pool, redis, configuration).await?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub async fn run(
    listener: TcpListener,
    pg_pool: PgPool,
    redis_client: redis::Client,
    configuration: AppConfig,
) -> Result<Server, anyhow::Error> {
    let pg_pool = Data::new(pg_pool);
    let redis_client = Data::new(redis_client);
    let redis_helper = Data::new(RedisHelper::new(redis_client.clone()));
    let jwt_config = Data::new(configuration.jwt);

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allowed_headers(vec![
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                header::ACCEPT,
            ])
            .supports_credentials();
        App::new()
            .configure(gazoduc_invest_routes)
            .app_data(pg_pool.clone())
            .app_data(redis_client.clone())
            .app_data(redis_helper.clone())
            .app_data(jwt_config.clone())
            .wrap(TracingLogger::default())
            .wrap(cors)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
