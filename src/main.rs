use anyhow::Context;
use art_gateway::config::{Command, GatewayConfig};
use art_gateway::users::{user_gateway_port, GatewayFactory, User};
use art_gateway::utils::logger;
use art_gateway::{CliConfig, GatewayError, RecordTable};
use clap::Parser;

const NOT_FOUND_EXIT_CODE: i32 = 4;

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if config.json_logs() {
        logger::init_json_logger(config.verbose());
    } else {
        logger::init_cli_logger(config.verbose());
    }
    tracing::debug!("Resolved config: {:?}", config);

    match run(&cli.command, &config) {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(NOT_FOUND_EXIT_CODE),
        Err(e) => {
            let Some(gateway_error) = e.downcast_ref::<GatewayError>() else {
                return Err(e);
            };

            tracing::error!(
                "❌ {:#} (Category: {:?}, Severity: {:?})",
                e,
                gateway_error.category(),
                gateway_error.severity()
            );
            eprintln!("❌ {}", gateway_error.user_friendly_message());
            eprintln!("💡 {}", gateway_error.recovery_suggestion());

            std::process::exit(gateway_error.severity().exit_code());
        }
    }
}

/// Returns `Ok(false)` when the lookup found nothing.
fn run(command: &Command, config: &GatewayConfig) -> anyhow::Result<bool> {
    if *command == Command::Describe {
        let port = user_gateway_port()?;
        println!("{}", port.name());
        for expose in port.exposed_operations() {
            println!(
                "  {}({}) -> {}",
                expose.name(),
                expose.parameters().join(", "),
                expose.return_type().name()
            );
        }
        return Ok(true);
    }

    let records_path = config.validated_records_path()?;

    let table = RecordTable::from_json_file(config.table(), records_path)?;
    tracing::info!("📁 Loaded {} rows into table {}", table.len(), table.name());

    let factory = GatewayFactory::new(table);
    let users = factory.record_table_user_gateway()?;

    let user: Option<User> = match command {
        Command::FindById { id } => users.find_by_id(*id)?,
        Command::FindByEmail { email } => users.find_by_email(email)?,
        Command::Describe => None,
    };

    match user {
        Some(user) => {
            let json = serde_json::to_string_pretty(&user).context("rendering user as JSON")?;
            println!("{}", json);
            Ok(true)
        }
        None => {
            tracing::warn!("No user matched {:?}", command);
            eprintln!("Not found");
            Ok(false)
        }
    }
}
