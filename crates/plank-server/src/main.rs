use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{delete, get, patch, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use plank_api::auth::{self, AppState, AppStateInner};
use plank_api::middleware::require_auth;
use plank_api::{boards, cards, comments, labels, lists, members, users};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plank=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("PLANK_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let db_path = std::env::var("PLANK_DB_PATH").unwrap_or_else(|_| "plank.db".into());
    let host = std::env::var("PLANK_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("PLANK_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // Init database
    let db = plank_db::Database::open(&PathBuf::from(&db_path))?;

    // Shared state
    let app_state: AppState = Arc::new(AppStateInner { db, jwt_secret });

    // Routes
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .with_state(app_state.clone());

    let protected_routes = Router::new()
        .route("/users/{user_id}", get(users::find_by_id))
        .route("/users/{user_id}", patch(users::update))
        .route("/users/{user_id}", delete(users::delete))
        .route("/boards", post(boards::create))
        .route("/boards", get(boards::find))
        .route("/boards/{board_id}", get(boards::find_by_id))
        .route("/boards/{board_id}", patch(boards::update))
        .route("/boards/{board_id}", delete(boards::delete))
        .route("/boards/{board_id}/members", get(members::find))
        .route("/boards/{board_id}/members/{user_id}", put(members::add))
        .route(
            "/boards/{board_id}/members/{user_id}",
            patch(members::update_role),
        )
        .route(
            "/boards/{board_id}/members/{user_id}",
            delete(members::remove),
        )
        .route("/boards/{board_id}/labels", get(labels::find))
        .route("/boards/{board_id}/labels/{label_id}", patch(labels::update))
        .route(
            "/boards/{board_id}/labels/{label_id}",
            delete(labels::delete),
        )
        .route("/boards/{board_id}/lists", post(lists::create))
        .route("/boards/{board_id}/lists", get(lists::find))
        .route("/boards/{board_id}/lists/{list_id}", patch(lists::update))
        .route("/boards/{board_id}/lists/{list_id}", delete(lists::delete))
        .route("/lists/{list_id}/cards", post(cards::create))
        .route("/lists/{list_id}/cards", get(cards::find))
        .route("/lists/{list_id}/cards/{card_id}", patch(cards::update))
        .route("/lists/{list_id}/cards/{card_id}", delete(cards::delete))
        .route("/cards/{card_id}/comments", post(comments::create))
        .route("/cards/{card_id}/comments", get(comments::find))
        .route("/comments/{comment_id}", patch(comments::update))
        .route("/comments/{comment_id}", delete(comments::delete))
        .layer(middleware::from_fn(require_auth))
        .with_state(app_state);

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Plank server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
