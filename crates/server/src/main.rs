//! Tutorium server entry point.

use std::sync::Arc;

use axum::{Router, routing::get};
use sea_orm::DatabaseConnection;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tutorium_api::{AppState, StreamingState, router as api_router, streaming_handler};
use tutorium_common::Config;
use tutorium_core::{
    AccountService, AffiliationService, ChatService, CourseCategoryService, CourseService,
    EventPublisherService, MeetingService, MessageService, OwnershipService,
};
use tutorium_db::repositories::{
    AccountRepository, AffiliationRepository, ChatRepository, CourseCategoryRepository,
    CourseRepository, MeetingRepository, MessageRepository, ProgressRepository, RatingRepository,
    RoleRepository, VerifierRepository,
};
use tutorium_pubsub::RedisPubSub;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

/// Install the global subscriber. `TUTORIUM_LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tutorium=debug,tower_http=debug".into());

    let json = std::env::var("TUTORIUM_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(filter)
            .init();
    }
}

fn build_state(
    db: &Arc<DatabaseConnection>,
    streaming: StreamingState,
    event_publisher: EventPublisherService,
) -> AppState {
    let account_repo = AccountRepository::new(Arc::clone(db));
    let role_repo = RoleRepository::new(Arc::clone(db));
    let verifier_repo = VerifierRepository::new(Arc::clone(db));
    let affiliation_repo = AffiliationRepository::new(Arc::clone(db));
    let message_repo = MessageRepository::new(Arc::clone(db));
    let chat_repo = ChatRepository::new(Arc::clone(db));
    let category_repo = CourseCategoryRepository::new(Arc::clone(db));
    let course_repo = CourseRepository::new(Arc::clone(db));
    let meeting_repo = MeetingRepository::new(Arc::clone(db));
    let rating_repo = RatingRepository::new(Arc::clone(db));
    let progress_repo = ProgressRepository::new(Arc::clone(db));

    let mut message_service =
        MessageService::new(message_repo.clone(), account_repo.clone(), chat_repo.clone());
    message_service.set_event_publisher(event_publisher);

    AppState {
        account_service: AccountService::new(
            account_repo.clone(),
            role_repo.clone(),
            verifier_repo,
            affiliation_repo.clone(),
            message_repo.clone(),
        ),
        message_service,
        chat_service: ChatService::new(chat_repo, account_repo.clone()),
        course_category_service: CourseCategoryService::new(category_repo.clone()),
        course_service: CourseService::new(
            course_repo,
            category_repo,
            account_repo.clone(),
            role_repo,
        ),
        affiliation_service: AffiliationService::new(affiliation_repo),
        meeting_service: MeetingService::new(meeting_repo, account_repo),
        ownership_service: OwnershipService::new(rating_repo, progress_repo, message_repo),
        streaming,
    }
}

async fn health() -> &'static str {
    "ok"
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting tutorium server...");

    let config = Config::load()?;

    let db = Arc::new(tutorium_db::init(&config).await?);
    info!("Connected to database");

    info!("Running database migrations...");
    tutorium_db::migrate(&db).await?;
    info!("Migrations completed");

    let streaming = StreamingState::new(config.streaming.channel_capacity);

    // With Redis, saved messages reach local sockets through the subscription.
    let pubsub = match &config.redis {
        Some(redis) => {
            info!("Connecting to Redis...");
            let pubsub =
                RedisPubSub::new(&redis.url, redis.channel.clone(), streaming.sender()).await?;
            pubsub.start().await?;
            Some(pubsub)
        }
        None => {
            info!("Redis not configured, broadcasting messages in-process only");
            None
        }
    };

    let event_publisher: EventPublisherService = match &pubsub {
        Some(pubsub) => Arc::new(pubsub.clone()),
        None => Arc::new(streaming.clone()),
    };

    let state = build_state(&db, streaming, event_publisher);

    let app = Router::new()
        .route("/ws", get(streaming_handler))
        .route("/health", get(health))
        .nest("/api", api_router())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pubsub) = pubsub
        && let Err(e) = pubsub.shutdown().await
    {
        warn!("Failed to shut down Redis Pub/Sub: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}
