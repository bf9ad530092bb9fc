use asapi_mcp::server::McpHttpServerConfig;
use asapi_types::schema::DEFAULT_DETAIL_CONCURRENCY;
use clap::{Parser, builder::BoolishValueParser};
use std::error::Error;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_MCP_HTTP_ADDR: &str = "127.0.0.1:4020";
const DEFAULT_DETAIL_TIMEOUT_SECS: u64 = 0;
const DEFAULT_SSE_KEEP_ALIVE_SECS: u64 = 15;
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Parser, Debug)]
#[command(name = "asapi-mcpd", version, about = "AngelScript API search MCP daemon.")]
struct CliArgs {
    #[arg(long = "snapshot", env = "ASAPI_SNAPSHOT_PATH")]
    snapshot_path: Option<PathBuf>,

    #[arg(
        long = "stdio",
        env = "ASAPI_ENABLE_STDIO",
        default_value_t = true,
        value_parser = BoolishValueParser::new()
    )]
    enable_stdio: bool,

    #[arg(
        long,
        env = "ASAPI_MCP_SERVE",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    mcp_serve: bool,

    #[arg(long, env = "ASAPI_MCP_HTTP_ADDR", default_value = DEFAULT_MCP_HTTP_ADDR)]
    mcp_http_addr: SocketAddr,

    #[arg(
        long,
        env = "ASAPI_MCP_STATEFUL",
        default_value_t = true,
        value_parser = BoolishValueParser::new()
    )]
    mcp_stateful: bool,

    #[arg(
        long,
        env = "ASAPI_SSE_KEEP_ALIVE_SECS",
        default_value_t = DEFAULT_SSE_KEEP_ALIVE_SECS
    )]
    sse_keep_alive_secs: u64,

    #[arg(
        long,
        env = "ASAPI_DETAIL_CONCURRENCY",
        default_value_t = DEFAULT_DETAIL_CONCURRENCY
    )]
    detail_concurrency: usize,

    #[arg(
        long,
        env = "ASAPI_DETAIL_TIMEOUT_SECS",
        default_value_t = DEFAULT_DETAIL_TIMEOUT_SECS
    )]
    detail_timeout_secs: u64,

    #[arg(long, env = "ASAPI_LOG", default_value = DEFAULT_LOG_FILTER)]
    log_filter: String,
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Debug, Clone)]
pub struct AsapiConfig {
    pub snapshot_path: Option<PathBuf>,
    pub enable_stdio: bool,
    pub mcp_serve: bool,
    pub mcp_http_addr: SocketAddr,
    pub mcp_stateful: bool,
    pub sse_keep_alive: Option<Duration>,
    pub detail_concurrency: usize,
    pub detail_timeout: Option<Duration>,
    pub log_filter: String,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingSetting(&'static str),
    InvalidSetting { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSetting(name) => write!(f, "missing required setting: {name}"),
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
        }
    }
}

impl Error for ConfigError {}

impl AsapiConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }

    /// Settings for the streamable HTTP transport.
    pub const fn mcp_http_config(&self) -> McpHttpServerConfig {
        McpHttpServerConfig::new(self.mcp_http_addr)
            .with_stateful_mode(self.mcp_stateful)
            .with_sse_keep_alive(self.sse_keep_alive)
    }
}

impl TryFrom<CliArgs> for AsapiConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if !args.enable_stdio && !args.mcp_serve {
            return Err(ConfigError::MissingSetting(
                "ASAPI_ENABLE_STDIO or ASAPI_MCP_SERVE",
            ));
        }

        if args.detail_concurrency == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "ASAPI_DETAIL_CONCURRENCY",
                value: args.detail_concurrency.to_string(),
            });
        }

        if args.log_filter.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "ASAPI_LOG",
                value: args.log_filter,
            });
        }

        let detail_timeout = if args.detail_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(args.detail_timeout_secs))
        };
        let sse_keep_alive = if args.sse_keep_alive_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(args.sse_keep_alive_secs))
        };
        let snapshot_path = args
            .snapshot_path
            .filter(|path| !path.as_os_str().is_empty());

        Ok(Self {
            snapshot_path,
            enable_stdio: args.enable_stdio,
            mcp_serve: args.mcp_serve,
            mcp_http_addr: args.mcp_http_addr,
            mcp_stateful: args.mcp_stateful,
            sse_keep_alive,
            detail_concurrency: args.detail_concurrency,
            detail_timeout,
            log_filter: args.log_filter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> CliArgs {
        CliArgs {
            snapshot_path: None,
            enable_stdio: true,
            mcp_serve: false,
            mcp_http_addr: DEFAULT_MCP_HTTP_ADDR.parse().expect("valid MCP addr"),
            mcp_stateful: true,
            sse_keep_alive_secs: DEFAULT_SSE_KEEP_ALIVE_SECS,
            detail_concurrency: DEFAULT_DETAIL_CONCURRENCY,
            detail_timeout_secs: DEFAULT_DETAIL_TIMEOUT_SECS,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }

    #[test]
    fn defaults_serve_stdio_without_timeout() {
        let config = AsapiConfig::try_from(base_args()).expect("config should parse");

        assert!(config.enable_stdio);
        assert!(!config.mcp_serve);
        assert_eq!(config.detail_concurrency, 10);
        assert!(config.detail_timeout.is_none());
        assert!(config.snapshot_path.is_none());
    }

    #[test]
    fn rejects_when_no_transport_is_enabled() {
        let mut args = base_args();
        args.enable_stdio = false;
        args.mcp_serve = false;

        let err = AsapiConfig::try_from(args).expect_err("config should fail");
        assert!(matches!(err, ConfigError::MissingSetting(_)));
    }

    #[test]
    fn rejects_zero_concurrency() {
        let mut args = base_args();
        args.detail_concurrency = 0;

        let err = AsapiConfig::try_from(args).expect_err("config should fail");
        assert_eq!(err.to_string(), "invalid ASAPI_DETAIL_CONCURRENCY value: 0");
    }

    #[test]
    fn rejects_blank_log_filter() {
        let mut args = base_args();
        args.log_filter = "  ".to_string();

        let err = AsapiConfig::try_from(args).expect_err("config should fail");
        assert!(matches!(
            err,
            ConfigError::InvalidSetting { name: "ASAPI_LOG", .. }
        ));
    }

    #[test]
    fn converts_timeout_and_keeps_http_settings() {
        let mut args = base_args();
        args.enable_stdio = false;
        args.mcp_serve = true;
        args.detail_timeout_secs = 5;
        args.snapshot_path = Some(PathBuf::from("api.json"));

        let config = AsapiConfig::try_from(args).expect("config should parse");

        assert_eq!(config.detail_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.mcp_http_addr.to_string(), "127.0.0.1:4020");
        assert_eq!(config.snapshot_path, Some(PathBuf::from("api.json")));
    }

    #[test]
    fn http_settings_flow_into_server_config() {
        let mut args = base_args();
        args.mcp_serve = true;
        args.mcp_stateful = false;
        args.sse_keep_alive_secs = 0;
        args.mcp_http_addr = "0.0.0.0:9000".parse().expect("valid MCP addr");

        let http = AsapiConfig::try_from(args)
            .expect("config should parse")
            .mcp_http_config();

        assert_eq!(http.addr.to_string(), "0.0.0.0:9000");
        assert!(!http.stateful_mode);
        assert!(http.sse_keep_alive.is_none());

        let defaults = AsapiConfig::try_from(base_args())
            .expect("config should parse")
            .mcp_http_config();
        assert!(defaults.stateful_mode);
        assert_eq!(defaults.sse_keep_alive, Some(Duration::from_secs(15)));
    }
}
