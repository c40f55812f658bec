use crate::error::FrontendError;

pub async fn metrics() -> Result<String, FrontendError> {
    Ok(crate::services::metrics::get_metrics()?)
}
