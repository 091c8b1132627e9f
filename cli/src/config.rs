use std::time::Duration;

use clap::Parser;
use pager_core::{ControllerConfig, RetryPolicy, DEFAULT_PAGE_SIZE};

#[derive(Debug, Parser)]
#[command(name = "todo-pager", version, about = "Page through a remote item list")]
pub struct Args {
    /// Base URL of the item store
    #[arg(long, env = "TODO_PAGER_URL", default_value = "http://127.0.0.1:3000")]
    pub base_url: String,

    /// Items shown per page
    #[arg(long, env = "TODO_PAGER_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE, value_parser = parse_page_size)]
    pub page_size: usize,

    /// Extra attempts for GET, PATCH and DELETE after a transient failure
    #[arg(long, env = "TODO_PAGER_RETRIES", default_value_t = 1)]
    pub retries: u32,

    /// Per-request timeout in seconds; 0 waits forever
    #[arg(long, env = "TODO_PAGER_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,
}

impl Args {
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            page_size: self.page_size,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retries.saturating_add(1),
            backoff: Duration::from_millis(200),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

fn parse_page_size(s: &str) -> Result<usize, String> {
    let size: usize = s.parse().map_err(|e| format!("invalid page size '{s}': {e}"))?;
    if size == 0 {
        return Err("page size must be at least 1".to_string());
    }
    Ok(size)
}
