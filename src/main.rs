use token_maker::configuration::get_configuration;
use token_maker::telemetry::{get_subscriber, init_telemetry};
use token_maker::AppError;

fn main() -> Result<(), AppError> {
    let configuration = get_configuration()?;

    let subscriber = get_subscriber(&configuration.application.log_level, std::io::stdout);
    init_telemetry(subscriber)?;
    tracing::info!(backend = %configuration.token.backend, "Configuration loaded successfully");

    let username = std::env::args().nth(1).unwrap_or_else(|| "alice".to_string());

    // A bad key must stop startup
    let maker = configuration.token.build_maker().map_err(|e| {
        tracing::error!("Failed to create token maker: {}", e);
        e
    })?;

    let (access_token, access_payload) =
        maker.make(&username, configuration.token.access_token_duration())?;
    let (refresh_token, refresh_payload) =
        maker.make(&username, configuration.token.refresh_token_duration())?;

    let verified = maker.verify(&access_token)?;
    tracing::info!(username = %verified.username, token_id = %verified.id, "Access token verified");

    let output = serde_json::json!({
        "session_id": refresh_payload.id,
        "access_token": access_token,
        "access_token_expires_at": access_payload.expired_at.to_rfc3339(),
        "refresh_token": refresh_token,
        "refresh_token_expires_at": refresh_payload.expired_at.to_rfc3339(),
    });
    println!("{}", output);

    Ok(())
}
