use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("a scrape is already running for this profile")]
    AlreadyRunning,

    #[error("scrape job could not be started: provider returned no run id")]
    JobStart,

    #[error("scrape job did not succeed (status: {status})")]
    JobFailed { status: String },

    #[error(transparent)]
    Scraper(#[from] postpulse_scraper::ScraperError),

    #[error(transparent)]
    Db(#[from] postpulse_db::DbError),
}
