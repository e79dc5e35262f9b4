use makeline::executable_utils::{initialize_executable, run_fulfillment};
use makeline::model::GenericError;

#[tokio::main]
async fn main() -> Result<(), GenericError> {
    let config = initialize_executable()?;
    run_fulfillment(config).await
}
