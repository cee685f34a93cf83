use super::schema::{Config, MAX_SUMMARY_IDS};

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let literature = &config.literature;

    if literature.enabled {
        if literature.queries.is_empty() {
            errors.push("literature.queries: at least one query is required".to_string());
        }
        for (i, query) in literature.queries.iter().enumerate() {
            if query.trim().is_empty() {
                errors.push(format!("literature.queries[{}]: must not be empty", i));
            }
        }
    }

    if literature.base_url.trim().is_empty() {
        errors.push("literature.base_url: must not be empty".to_string());
    }

    if literature.max_results == 0 {
        errors.push("literature.max_results: must be at least 1".to_string());
    }

    if literature.summary_limit == 0 || literature.summary_limit > MAX_SUMMARY_IDS {
        errors.push(format!(
            "literature.summary_limit: must be between 1 and {}, got {}",
            MAX_SUMMARY_IDS, literature.summary_limit
        ));
    }

    if let Err(e) = literature.request_delay() {
        errors.push(format!(
            "literature.request_delay: invalid duration '{}' - {}",
            literature.request_delay, e
        ));
    }

    if let Err(e) = literature.query_pause() {
        errors.push(format!(
            "literature.query_pause: invalid duration '{}' - {}",
            literature.query_pause, e
        ));
    }

    if literature.user_agent.trim().is_empty() {
        errors.push("literature.user_agent: must not be empty".to_string());
    }

    if config.conference.name.trim().is_empty() {
        errors.push("conference.name: must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
