// AWS Lambda binary entry point
//
// Build with: cargo build -p imagesync-lambda --release
// The provider framework invokes this as the custom resource's onEvent handler.

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    imagesync_lambda::run().await
}
