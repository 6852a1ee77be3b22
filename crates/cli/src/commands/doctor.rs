use menucheck_core::config::{AppConfig, LoadOptions};
use menucheck_core::words::{FileWordSource, WordSource};
use secrecy::ExposeSecret;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_venue_credentials(&config));
            checks.push(check_danger_words(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "venue_credentials",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
            checks.push(DoctorCheck {
                name: "danger_word_source",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_venue_credentials(config: &AppConfig) -> DoctorCheck {
    let id_present = !config.venue.client_id.expose_secret().trim().is_empty();
    let secret_present = !config.venue.client_secret.expose_secret().trim().is_empty();

    if id_present && secret_present {
        DoctorCheck {
            name: "venue_credentials",
            status: CheckStatus::Pass,
            details: format!("client id and secret present for `{}`", config.venue.base_url),
        }
    } else {
        DoctorCheck {
            name: "venue_credentials",
            status: CheckStatus::Fail,
            details: "venue client id or secret is empty".to_string(),
        }
    }
}

fn check_danger_words(config: &AppConfig) -> DoctorCheck {
    let source = FileWordSource::new(&config.filter.danger_words_path);
    match source.load_words() {
        Ok(words) if words.is_empty() => DoctorCheck {
            name: "danger_word_source",
            status: CheckStatus::Fail,
            details: format!("{} contains no words; every dish would be kept", source.describe()),
        },
        Ok(words) => DoctorCheck {
            name: "danger_word_source",
            status: CheckStatus::Pass,
            details: format!("{} loaded {} words", source.describe(), words.len()),
        },
        Err(error) => DoctorCheck {
            name: "danger_word_source",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
