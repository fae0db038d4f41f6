use thiserror::Error;

pub type Result<T> = std::result::Result<T, MoltError>;

#[derive(Debug, Error)]
pub enum MoltError {
    #[error("config: {0}")]
    Config(String),

    #[error("missing configuration: {0}")]
    MissingConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("state: {0}")]
    State(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("http: {0}")]
    Http(#[from] reqwest::Error),

    #[error("authentication rejected: {0}")]
    Auth(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("monthly usage cap exceeded: {0}")]
    UsageCapExceeded(String),

    #[error("daily delete budget already spent")]
    DailyBudgetSpent,

    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },
}

impl MoltError {
    /// Exit code consumed by the external scheduler: 0 success, 401 auth
    /// failure, 429 platform rate limit, 2 monthly usage cap, 3 daily
    /// budget spent, 1 anything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            MoltError::Auth(_) => 401,
            MoltError::RateLimited(_) => 429,
            MoltError::UsageCapExceeded(_) => 2,
            MoltError::DailyBudgetSpent => 3,
            _ => 1,
        }
    }

    /// Whether a delete batch must stop at this error instead of dropping
    /// the entry and moving on. Aborting keeps the current ID queued.
    pub fn aborts_batch(&self) -> bool {
        matches!(
            self,
            MoltError::Auth(_) | MoltError::RateLimited(_) | MoltError::UsageCapExceeded(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_the_scheduler_contract() {
        assert_eq!(MoltError::Auth("nope".to_string()).exit_code(), 401);
        assert_eq!(MoltError::RateLimited("slow down".to_string()).exit_code(), 429);
        assert_eq!(MoltError::UsageCapExceeded("cap".to_string()).exit_code(), 2);
        assert_eq!(MoltError::DailyBudgetSpent.exit_code(), 3);
        assert_eq!(MoltError::Config("bad".to_string()).exit_code(), 1);
        assert_eq!(
            MoltError::Api {
                status: 500,
                message: "oops".to_string()
            }
            .exit_code(),
            1
        );
    }

    #[test]
    fn only_platform_level_errors_abort_a_batch() {
        assert!(MoltError::Auth("x".to_string()).aborts_batch());
        assert!(MoltError::RateLimited("x".to_string()).aborts_batch());
        assert!(MoltError::UsageCapExceeded("x".to_string()).aborts_batch());
        assert!(
            !MoltError::Api {
                status: 404,
                message: "gone".to_string()
            }
            .aborts_batch()
        );
        assert!(!MoltError::State("x".to_string()).aborts_batch());
    }
}
