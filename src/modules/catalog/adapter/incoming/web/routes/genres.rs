use actix_web::{delete, get, post, web, HttpRequest, Responder};

use crate::api::schemas::ErrorResponse;
use crate::auth::adapter::incoming::web::extractors::auth::MaybeActor;
use crate::catalog::application::domain::entities::TaxonRef;
use crate::AppState;

use super::taxonomy::{
    create_entry, delete_entry, list_entries, CreateTaxonRequest, TaxonSearchQuery,
};

const NOT_FOUND: &str = "GENRE_NOT_FOUND";

/// List genres
#[utoipa::path(
    get,
    path = "/api/v1/genres/",
    tag = "genres",
    params(TaxonSearchQuery),
    responses(
        (status = 200, description = "Genres ordered by name", body = [TaxonRef])
    )
)]
#[get("/api/v1/genres/")]
pub async fn list_genres_handler(
    req: HttpRequest,
    actor: MaybeActor,
    query: web::Query<TaxonSearchQuery>,
    data: web::Data<AppState>,
) -> impl Responder {
    list_entries(
        data.catalog.genres.as_ref(),
        &req,
        &actor,
        query.into_inner(),
        NOT_FOUND,
    )
    .await
}

/// Create a genre (admin)
#[utoipa::path(
    post,
    path = "/api/v1/genres/",
    tag = "genres",
    request_body = CreateTaxonRequest,
    responses(
        (status = 201, description = "Genre created", body = TaxonRef),
        (status = 400, description = "Invalid or duplicate slug", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[post("/api/v1/genres/")]
pub async fn create_genre_handler(
    req: HttpRequest,
    actor: MaybeActor,
    body: web::Json<CreateTaxonRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    create_entry(
        data.catalog.genres.as_ref(),
        &req,
        &actor,
        body.into_inner(),
        NOT_FOUND,
    )
    .await
}

/// Delete a genre (admin). Titles keep their other genres.
#[utoipa::path(
    delete,
    path = "/api/v1/genres/{slug}/",
    tag = "genres",
    params(("slug" = String, Path, description = "Genre slug")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No such genre", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[delete("/api/v1/genres/{slug}/")]
pub async fn delete_genre_handler(
    req: HttpRequest,
    actor: MaybeActor,
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> impl Responder {
    delete_entry(
        data.catalog.genres.as_ref(),
        &req,
        &actor,
        &path.into_inner(),
        NOT_FOUND,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    use crate::auth::application::domain::entities::UserRole;
    use crate::tests::support::app_state_builder::TestAppStateBuilder;
    use crate::tests::support::auth_helper::bearer_for;
    use crate::tests::support::in_memory::{sample_user_with_role, InMemoryUserStore};
    use crate::tests::support::in_memory_catalog::{InMemoryTaxonomy, InMemoryTitles};

    macro_rules! genres_app {
        ($users:expr, $catalog:expr) => {
            test::init_service(
                App::new()
                    .app_data(
                        TestAppStateBuilder::default()
                            .with_user_store($users.clone())
                            .with_catalog($catalog.clone())
                            .build(),
                    )
                    .service(list_genres_handler)
                    .service(create_genre_handler)
                    .service(delete_genre_handler),
            )
            .await
        };
    }

    fn catalog() -> InMemoryTitles {
        InMemoryTitles::new(
            InMemoryTaxonomy::default(),
            InMemoryTaxonomy::with(&[("Films", "films"), ("Books", "books")]),
        )
    }

    #[actix_web::test]
    async fn test_anonymous_can_list_with_search() {
        let users = InMemoryUserStore::default();
        let catalog = catalog();
        let app = genres_app!(users, catalog);

        let req = test::TestRequest::get()
            .uri("/api/v1/genres/?search=fil")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"], json!([{ "name": "Films", "slug": "films" }]));
    }

    #[actix_web::test]
    async fn test_underscore_search_matches_nothing() {
        let users = InMemoryUserStore::default();
        let catalog = catalog();
        let app = genres_app!(users, catalog);

        let req = test::TestRequest::get()
            .uri("/api/v1/genres/?search=_")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"], json!([]));
        assert_eq!(catalog.genres.len(), 2);
    }

    #[actix_web::test]
    async fn test_anonymous_create_is_unauthorized() {
        let users = InMemoryUserStore::default();
        let catalog = catalog();
        let app = genres_app!(users, catalog);

        let req = test::TestRequest::post()
            .uri("/api/v1/genres/")
            .set_json(json!({ "name": "Music", "slug": "music" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_moderator_create_is_forbidden() {
        let users = InMemoryUserStore::default();
        let moderator = users.insert(sample_user_with_role("mod", UserRole::Moderator));
        let catalog = catalog();
        let app = genres_app!(users, catalog);

        let req = test::TestRequest::post()
            .uri("/api/v1/genres/")
            .insert_header(("Authorization", bearer_for(&moderator)))
            .set_json(json!({ "name": "Music", "slug": "music" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(catalog.genres.len(), 2);
    }

    #[actix_web::test]
    async fn test_admin_creates_and_duplicate_is_rejected() {
        let users = InMemoryUserStore::default();
        let admin = users.insert(sample_user_with_role("boss", UserRole::Admin));
        let catalog = catalog();
        let app = genres_app!(users, catalog);

        let req = test::TestRequest::post()
            .uri("/api/v1/genres/")
            .insert_header(("Authorization", bearer_for(&admin)))
            .set_json(json!({ "name": "Music", "slug": "music" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/api/v1/genres/")
            .insert_header(("Authorization", bearer_for(&admin)))
            .set_json(json!({ "name": "More music", "slug": "music" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"]["fields"]["slug"].is_array());
    }

    #[actix_web::test]
    async fn test_admin_deletes_by_slug() {
        let users = InMemoryUserStore::default();
        let admin = users.insert(sample_user_with_role("boss", UserRole::Admin));
        let catalog = catalog();
        let app = genres_app!(users, catalog);

        let req = test::TestRequest::delete()
            .uri("/api/v1/genres/books/")
            .insert_header(("Authorization", bearer_for(&admin)))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NO_CONTENT
        );

        let req = test::TestRequest::delete()
            .uri("/api/v1/genres/books/")
            .insert_header(("Authorization", bearer_for(&admin)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "GENRE_NOT_FOUND");
    }
}
