use menucheck_core::config::{AppConfig, LoadOptions};
use menucheck_core::governor::cap_reply;
use menucheck_core::pipeline::MenuChecker;
use menucheck_sms::inbound::{parse_menu_query, InboundSms, LocationDefaults, MenuQuery};
use tracing::info;

use crate::commands::CommandResult;

pub fn run(text: &str, location: Option<&str>) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "check",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let menu_query = match resolve_query(&config, text, location) {
        Ok(menu_query) => menu_query,
        Err(message) => return CommandResult::failure("check", "invalid_request", message, 5),
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "check",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let checker = match MenuChecker::from_config(&config) {
        Ok(checker) => checker,
        Err(error) => return CommandResult::failure("check", "venue_client", error.to_string(), 4),
    };

    match runtime.block_on(checker.check(&menu_query.query, &menu_query.location)) {
        Ok(reply) => {
            info!(
                event_name = "cli.check.completed",
                correlation_id = "cli",
                outcome = reply.outcome.as_str(),
                "menu check completed"
            );
            CommandResult {
                exit_code: 0,
                output: cap_reply(&reply.text, config.sms.max_message_size),
            }
        }
        Err(error) => CommandResult::failure("check", "pipeline", error.to_string(), 6),
    }
}

/// An explicit `--location` wins; otherwise the text is parsed the way an
/// inbound SMS body would be.
fn resolve_query(
    config: &AppConfig,
    text: &str,
    location: Option<&str>,
) -> Result<MenuQuery, String> {
    match location.map(str::trim).filter(|location| !location.is_empty()) {
        Some(location) => {
            let query = text.trim();
            if query.is_empty() {
                return Err("restaurant text must not be empty".to_string());
            }
            Ok(MenuQuery { query: query.to_string(), location: location.to_string() })
        }
        None => {
            let payload = InboundSms { body: Some(text.to_string()), ..InboundSms::default() };
            let defaults =
                LocationDefaults::new(&config.sms.default_city, &config.sms.default_state);
            parse_menu_query(&payload, &defaults).map_err(|error| error.to_string())
        }
    }
}
