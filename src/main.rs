use auth_service::{
    config::AppConfig,
    domain::{
        repositories::credential_repository::CredentialRepository,
        services::{password_service::PasswordHasher, token_service::TokenGenerator},
    },
    infrastructure::{
        bcrypt_password_hasher::BcryptPasswordHasher,
        in_memory_credential_repository::InMemoryCredentialRepository,
        jwt_token_generator::JwtTokenGenerator,
    },
    presentation::handlers::auth_handler::create_auth_router,
    telemetry,
    usecase::login_usecase::LoginUsecase,
};
use axum::{Router, routing::get};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    telemetry::init_tracing(config.log_format);
    tracing::debug!(?config, "configuration loaded");

    let credential_repository = match &config.credentials_file {
        Some(path) => InMemoryCredentialRepository::from_json_file(path)?,
        None => {
            tracing::warn!("CREDENTIALS_FILE is not set, every login will be rejected");
            InMemoryCredentialRepository::default()
        }
    };
    tracing::info!(
        credentials = credential_repository.len(),
        "credential store ready"
    );

    let stored_max_cost = credential_repository.max_cost();
    if let Some(stored) = stored_max_cost.filter(|stored| *stored > config.bcrypt_cost) {
        tracing::warn!(
            stored_cost = stored.get(),
            bcrypt_cost = config.bcrypt_cost.get(),
            "stored hashes use a higher cost than BCRYPT_COST, unknown accounts are checked at the stored cost"
        );
    }

    let password_hasher = BcryptPasswordHasher::new(config.bcrypt_cost);
    let token_generator =
        JwtTokenGenerator::with_expiration(config.jwt_secret.clone(), config.jwt_expiration_hours);
    let login_service = LoginUsecase::new(
        credential_repository,
        password_hasher,
        token_generator,
        stored_max_cost,
    )?;

    let app = create_app(login_service);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %listener.local_addr()?, "auth service listening");
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

fn create_app<
    C: CredentialRepository + Send + Sync + 'static,
    P: PasswordHasher + Send + Sync + 'static,
    T: TokenGenerator + Send + Sync + 'static,
>(
    login_service: LoginUsecase<C, P, T>,
) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/api", create_auth_router(login_service))
}
