use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Set to `production` to switch log output to JSON lines.
pub const ENV_VAR: &str = "HIRESWIPE_ENV";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn for_environment(env: Option<&str>) -> Self {
        match env {
            Some(v) if v.eq_ignore_ascii_case("production") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Default directives when `RUST_LOG` is unset: the service's own crate at
/// debug, everything else at info.
fn default_directives(service_name: &str) -> String {
    let crate_target = service_name.replace('-', "_");
    format!("info,{crate_target}=debug,hireswipe_shared=debug,tower_http=debug")
}

pub fn init_tracing(service_name: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(service_name)));
    let format = LogFormat::for_environment(std::env::var(ENV_VAR).ok().as_deref());

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .init(),
    }

    tracing::info!(service = service_name, ?format, "tracing initialized");
}
