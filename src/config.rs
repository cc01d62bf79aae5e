/// Runtime settings, read once at startup. Missing variables fall back to
/// local-development defaults rather than aborting.
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> Config {
        dotenv::dotenv().ok();

        let database_url = dotenv::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:shoutbox.db?mode=rwc".to_owned());
        let bind_addr = dotenv::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_owned());

        Config { database_url, bind_addr }
    }
}
