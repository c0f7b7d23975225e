use std::io;

use actix_web::{App, HttpServer, web};

use tg_shop_backend::db::establish_connection_pool;
use tg_shop_backend::models::config::{AdminAllowList, ServerConfig};
use tg_shop_backend::repository::DieselRepository;
use tg_shop_backend::routes;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config: ServerConfig = config::Config::builder()
        .add_source(config::File::with_name("config").required(false))
        .add_source(config::Environment::default())
        .build()
        .and_then(config::Config::try_deserialize)
        .map_err(io::Error::other)?;

    let pool = establish_connection_pool(&config.database_url).map_err(io::Error::other)?;
    let repo = DieselRepository::new(pool.clone());
    let admins = AdminAllowList::parse(&config.moderator_ids);
    if admins.is_empty() {
        log::warn!("MODERATOR_IDS is empty; every catalog mutation will be rejected");
    }

    log::info!("Starting server on {}", config.bind_address);

    let bind_address = config.bind_address.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(admins.clone()))
            .service(routes::main::index)
            .service(routes::main::health)
            .service(
                web::scope("/api")
                    .service(routes::users::ensure_user)
                    .service(routes::categories::list_categories)
                    .service(routes::categories::create_category)
                    .service(routes::categories::update_category)
                    .service(routes::categories::delete_category)
                    .service(routes::products::list_products)
                    .service(routes::products::get_product)
                    .service(routes::products::create_product)
                    .service(routes::products::update_product)
                    .service(routes::products::delete_product),
            )
    })
    .bind(bind_address)?
    .run()
    .await
}
