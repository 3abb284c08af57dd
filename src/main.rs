pub mod api;
pub mod config;
pub mod health;
pub mod modules;
pub mod shared;

pub use modules::{auth, catalog, email, review};

use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::openapi::ApiDoc;
use crate::auth::adapter::outgoing::jwt::JwtTokenService;
use crate::auth::adapter::outgoing::random_code_generator::RandomCodeGenerator;
use crate::auth::adapter::outgoing::user_query_postgres::UserQueryPostgres;
use crate::auth::adapter::outgoing::user_repository_postgres::UserRepositoryPostgres;
use crate::auth::application::auth_use_cases::AuthUseCases;
use crate::auth::application::helpers::ActorResolver;
use crate::auth::application::ports::outgoing::{TokenProvider, UserQuery, UserRepository};
use crate::auth::application::services::{
    ConfirmationCodeIssuer, ManageUsersService, ObtainTokenService, OwnProfileService,
    SignupService,
};
use crate::catalog::adapter::outgoing::{
    TaxonomyRepositoryPostgres, TitleQueryPostgres, TitleRepositoryPostgres,
};
use crate::catalog::application::catalog_use_cases::CatalogUseCases;
use crate::catalog::application::domain::entities::TaxonomyKind;
use crate::catalog::application::services::{
    BrowseTitlesService, ManageTitlesService, TaxonomyService,
};
use crate::config::{AppConfig, EmailBackend, SmtpSettings};
use crate::email::adapter::outgoing::{ConsoleEmailSender, SmtpEmailSender};
use crate::email::application::ports::outgoing::EmailSender;
use crate::review::adapter::outgoing::{
    CommentRepositoryPostgres, ReviewRepositoryPostgres, TitleDirectoryPostgres,
};
use crate::review::application::review_use_cases::ReviewUseCases;
use crate::review::application::services::{CommentService, ReviewService};
use crate::shared::api::{custom_json_config, custom_query_config};

#[cfg(test)]
mod tests;

#[derive(Clone)]
pub struct AppState {
    pub auth: AuthUseCases,
    pub catalog: CatalogUseCases,
    pub review: ReviewUseCases,
    pub actor_resolver: ActorResolver,
}

#[cfg(not(tarpaulin_include))]
fn email_sender(config: &AppConfig) -> anyhow::Result<Arc<dyn EmailSender>> {
    let sender: Arc<dyn EmailSender> = match &config.email_backend {
        EmailBackend::Console => Arc::new(ConsoleEmailSender),
        EmailBackend::Smtp(SmtpSettings::Local { host, port }) => {
            Arc::new(SmtpEmailSender::new_local(host, *port, &config.email_from))
        }
        EmailBackend::Smtp(SmtpSettings::Relay {
            server,
            username,
            password,
        }) => Arc::new(
            SmtpEmailSender::new(server, username, password, &config.email_from)
                .context("Failed to build SMTP transport")?,
        ),
    };
    Ok(sender)
}

#[cfg(not(tarpaulin_include))]
fn build_state(
    config: &AppConfig,
    db: &Arc<DatabaseConnection>,
    sender: Arc<dyn EmailSender>,
) -> AppState {
    let tokens: Arc<dyn TokenProvider> = Arc::new(JwtTokenService::new(config.jwt.clone()));
    let user_query: Arc<dyn UserQuery> = Arc::new(UserQueryPostgres::new(Arc::clone(db)));
    let user_repository: Arc<dyn UserRepository> =
        Arc::new(UserRepositoryPostgres::new(Arc::clone(db)));

    let issuer = ConfirmationCodeIssuer::new(
        user_repository.clone(),
        Arc::new(RandomCodeGenerator),
        sender,
    );
    let auth = AuthUseCases {
        signup: Arc::new(SignupService::new(
            user_query.clone(),
            user_repository.clone(),
            issuer,
        )),
        obtain_token: Arc::new(ObtainTokenService::new(
            user_query.clone(),
            user_repository.clone(),
            tokens.clone(),
            config.single_use_codes,
        )),
        manage_users: Arc::new(ManageUsersService::new(
            user_query.clone(),
            user_repository.clone(),
        )),
        own_profile: Arc::new(OwnProfileService::new(user_query.clone(), user_repository)),
    };

    let categories = Arc::new(TaxonomyRepositoryPostgres::new(
        Arc::clone(db),
        TaxonomyKind::Category,
    ));
    let genres = Arc::new(TaxonomyRepositoryPostgres::new(
        Arc::clone(db),
        TaxonomyKind::Genre,
    ));
    let title_query = Arc::new(TitleQueryPostgres::new(Arc::clone(db)));
    let catalog = CatalogUseCases {
        categories: Arc::new(TaxonomyService::new(
            TaxonomyKind::Category,
            categories.clone(),
        )),
        genres: Arc::new(TaxonomyService::new(TaxonomyKind::Genre, genres.clone())),
        browse_titles: Arc::new(BrowseTitlesService::new(title_query.clone())),
        manage_titles: Arc::new(ManageTitlesService::new(
            title_query,
            Arc::new(TitleRepositoryPostgres::new(Arc::clone(db))),
            categories,
            genres,
        )),
    };

    let reviews = Arc::new(ReviewRepositoryPostgres::new(Arc::clone(db)));
    let review = ReviewUseCases {
        reviews: Arc::new(ReviewService::new(
            Arc::new(TitleDirectoryPostgres::new(Arc::clone(db))),
            reviews.clone(),
        )),
        comments: Arc::new(CommentService::new(
            reviews,
            Arc::new(CommentRepositoryPostgres::new(Arc::clone(db))),
        )),
    };

    AppState {
        auth,
        catalog,
        review,
        actor_resolver: ActorResolver::new(tokens, user_query),
    }
}

#[actix_web::main]
#[cfg(not(tarpaulin_include))]
async fn start() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().context("Invalid configuration")?;
    info!(environment = %config.environment, "Starting application...");

    let mut opt = ConnectOptions::new(config.database_url.clone());
    opt.max_connections(50)
        .min_connections(10)
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(false);

    let db = Arc::new(
        Database::connect(opt)
            .await
            .context("Failed to connect to database")?,
    );

    let state = web::Data::new(build_state(&config, &db, email_sender(&config)?));
    let db_data = web::Data::new(Arc::clone(&db));

    let server_addr = config.server_addr();
    info!(address = %server_addr, "Server listening");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(db_data.clone())
            .app_data(custom_json_config())
            .app_data(custom_query_config())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
            .configure(init_routes)
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {server_addr}"))?
    .run()
    .await
    .context("Server terminated with an error")
}

#[cfg(not(tarpaulin_include))]
fn init_routes(cfg: &mut web::ServiceConfig) {
    use crate::auth::adapter::incoming::web::routes as auth_routes;
    use crate::catalog::adapter::incoming::web::routes as catalog_routes;
    use crate::review::adapter::incoming::web::routes as review_routes;

    // Health
    cfg.service(crate::health::health);
    cfg.service(crate::health::readiness);
    // Auth
    cfg.service(auth_routes::signup_handler);
    cfg.service(auth_routes::obtain_token_handler);
    // Users (`me` must be registered before `{username}`)
    cfg.service(auth_routes::get_me_handler);
    cfg.service(auth_routes::patch_me_handler);
    cfg.service(auth_routes::list_users_handler);
    cfg.service(auth_routes::create_user_handler);
    cfg.service(auth_routes::get_user_handler);
    cfg.service(auth_routes::patch_user_handler);
    cfg.service(auth_routes::delete_user_handler);
    // Categories & genres
    cfg.service(catalog_routes::list_categories_handler);
    cfg.service(catalog_routes::create_category_handler);
    cfg.service(catalog_routes::delete_category_handler);
    cfg.service(catalog_routes::list_genres_handler);
    cfg.service(catalog_routes::create_genre_handler);
    cfg.service(catalog_routes::delete_genre_handler);
    // Titles
    cfg.service(catalog_routes::list_titles_handler);
    cfg.service(catalog_routes::create_title_handler);
    cfg.service(catalog_routes::get_title_handler);
    cfg.service(catalog_routes::patch_title_handler);
    cfg.service(catalog_routes::delete_title_handler);
    // Reviews
    cfg.service(review_routes::list_reviews_handler);
    cfg.service(review_routes::create_review_handler);
    cfg.service(review_routes::get_review_handler);
    cfg.service(review_routes::patch_review_handler);
    cfg.service(review_routes::delete_review_handler);
    // Comments
    cfg.service(review_routes::list_comments_handler);
    cfg.service(review_routes::create_comment_handler);
    cfg.service(review_routes::get_comment_handler);
    cfg.service(review_routes::patch_comment_handler);
    cfg.service(review_routes::delete_comment_handler);
}

#[cfg(not(tarpaulin_include))]
fn main() {
    if let Err(e) = start() {
        eprintln!("Error starting app: {e:#}");
        std::process::exit(1);
    }
}
