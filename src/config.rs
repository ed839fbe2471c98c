use crate::github::QueryClient;
use crate::state::*;

use std::env;
use std::sync::Arc;
use std::time::Duration;

/// Outbound calls to GitHub carry a hard deadline so a stalled upstream
/// cannot pin request handlers indefinitely.
pub const OUTBOUND_TIMEOUT: Duration = Duration::from_secs(10);

const DEFAULT_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const DEFAULT_OAUTH_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Config {
    pub port: u16,
    pub gh_client_id: String,
    pub gh_client_secret: String,
    /// Fixed server-side token used for the pull-request search and review
    /// queries; viewer-profile queries use the token supplied per request.
    pub gh_token: String,
    pub gh_user_agent: String,
    pub gh_authorize_url: String,
    pub gh_oauth_token_url: String,
    pub gh_graphql_url: String,
}

impl Config {
    pub fn parse_from_env() -> Self {
        // Load environment variables from a .env file. This is used for dev workflows.
        dotenv::dotenv().ok();

        let mut env_vars: std::collections::HashMap<String, String> = env::vars().collect();

        // Note: it's okay to panic in places like this, because without these
        // env vars, we can't launch the server at all, and it only happens at startup.

        let port = env_vars
            .remove("PORT")
            .map(|p| p.parse::<u16>().expect("invalid port"))
            .unwrap_or(9000);
        let gh_client_id = env_vars
            .remove("GITHUB_CLIENT_ID")
            .expect("no GITHUB_CLIENT_ID environment variable present");
        let gh_client_secret = env_vars
            .remove("GITHUB_CLIENT_SECRET")
            .expect("no GITHUB_CLIENT_SECRET environment variable present");
        let gh_token = env_vars
            .remove("GITHUB_TOKEN")
            .expect("no GITHUB_TOKEN environment variable present");
        let gh_user_agent = env_vars
            .remove("GITHUB_USER_AGENT")
            .unwrap_or_else(|| "pr-insight".to_string());

        // Endpoint overrides exist for GitHub Enterprise hosts and for tests
        // that point the relay at a stub server.
        let gh_authorize_url = env_vars
            .remove("GITHUB_AUTHORIZE_URL")
            .unwrap_or_else(|| DEFAULT_AUTHORIZE_URL.to_string());
        let gh_oauth_token_url = env_vars
            .remove("GITHUB_OAUTH_URL")
            .unwrap_or_else(|| DEFAULT_OAUTH_TOKEN_URL.to_string());
        let gh_graphql_url = env_vars
            .remove("GITHUB_GRAPHQL_URL")
            .unwrap_or_else(|| DEFAULT_GRAPHQL_URL.to_string());

        Config {
            port,
            gh_client_id,
            gh_client_secret,
            gh_token,
            gh_user_agent,
            gh_authorize_url,
            gh_oauth_token_url,
            gh_graphql_url,
        }
    }

    pub fn into_state(self) -> AppStateRaw {
        log::info!("config: port={} client_id={}", self.port, self.gh_client_id);

        let http = reqwest::Client::builder()
            .user_agent(self.gh_user_agent.clone())
            .timeout(OUTBOUND_TIMEOUT)
            .build()
            .expect("could not build outbound HTTP client");

        // The search and review relays authenticate with the server-held
        // token; viewer queries build their own client per request.
        let github = QueryClient::new(http.clone(), self.gh_graphql_url.clone(), &self.gh_token);

        Arc::new(State {
            config: self,
            http,
            github,
        })
    }

    // generate and show config string
    pub fn show() {
        let de: Self = Default::default();
        println!("{}", serde_json::to_string_pretty(&de).unwrap())
    }
}

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[derive(clap::Parser, Debug)]
#[clap(version = version())]
pub struct Opts {
    // The number of occurrences of the `v/verbose` flag
    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[clap(short, long, parse(from_occurrences))]
    pub verbose: u8,
}

impl Opts {
    pub fn parse_from_args() -> (JoinHandle, Self) {
        use clap::Parser;
        let opt: Self = Opts::parse();

        let level = match opt.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _more => LevelFilter::Trace,
        };

        let formater = BaseFormater::new()
            .local(true)
            .color(true)
            .level(4)
            .formater(format);
        let filter = BaseFilter::new()
            .starts_with(true)
            .notfound(true)
            .max_level(level)
            .chain(
                "reqwest",
                if opt.verbose > 1 {
                    LevelFilter::Debug
                } else {
                    LevelFilter::Warn
                },
            );

        let handle = NonblockLogger::new()
            .filter(filter)
            .unwrap()
            .formater(formater)
            .log_to_stdout()
            .map_err(|e| eprintln!("failed to init nonblock_logger: {:?}", e))
            .unwrap();

        log::info!("opt: {:?}", opt);

        (handle, opt)
    }
}

use nonblock_logger::{
    log::{LevelFilter, Record},
    BaseFilter, BaseFormater, FixedLevel, JoinHandle, NonblockLogger,
};

pub fn format(base: &BaseFormater, record: &Record) -> String {
    let level = FixedLevel::with_color(record.level(), base.color_get())
        .length(base.level_get())
        .into_colored()
        .into_coloredfg();

    format!(
        "[{} {}#{}:{} {}] {}\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S.%3f"),
        level,
        record.module_path().unwrap_or("*"),
        record.line().unwrap_or(0),
        nonblock_logger::current_thread_name(),
        record.args()
    )
}
