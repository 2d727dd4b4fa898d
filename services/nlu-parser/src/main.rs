use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use nlu_parser::{api, tokenizer::RuleTokenizer, OrderParser};
use shared::config::Settings;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    info!("starting nlu-parser service");

    let settings = Settings::new().map_err(|e| {
        error!(%e, "invalid configuration");
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    // Loaded once; requests never retry it.
    let parser = match RuleTokenizer::from_settings(&settings) {
        Ok(tokenizer) => {
            info!(lexicon = %tokenizer.variant(), "numeral tokenizer ready");
            OrderParser::new(Arc::new(tokenizer))
        }
        Err(e) => {
            error!(%e, "numeral tokenizer unavailable, /parse will answer with no items");
            OrderParser::unavailable()
        }
    };
    let parser = web::Data::new(parser);

    info!(addr = %settings.bind_addr, port = settings.port, "listening");
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(parser.clone())
            .configure(api::configure)
    })
    .bind((settings.bind_addr.as_str(), settings.port))?
    .run()
    .await
}
