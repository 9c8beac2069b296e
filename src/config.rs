#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://castlist.db?mode=rwc".to_string());

        if database_url.trim().is_empty() {
            anyhow::bail!("DATABASE_URL is set but empty");
        }

        Ok(Self { database_url })
    }
}
