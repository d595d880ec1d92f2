use std::process::exit;
use std::time::Duration;

use aws_config::{BehaviorVersion, Region};
use clap::Parser;
use itemfetch_core::contract::{
    FetchConfig, DEFAULT_FUNCTION_NAME, DEFAULT_INVOKE_TIMEOUT_SECS, DEFAULT_ITEMS_TO_GET,
    DEFAULT_REGION, DEFAULT_SORT_BY, DEFAULT_SORT_ORDER,
};
use itemfetch_cli::adapters::invoke::{FunctionInvoker, InvocationOutput};
use itemfetch_cli::handlers::fetch::{render_outcome, run_fetch};

#[derive(Parser)]
#[command(
    name = "itemfetch",
    about = "Fetch the most recent items from the optimize-source function",
    long_about = "Invokes the optimize-source function once with a fixed\n\
                  get-items request and prints the returned item identifiers,\n\
                  one per line. All flags default to the standard deployment\n\
                  values; a flagless run needs only ambient AWS credentials."
)]
struct Cli {
    /// Name of the function to invoke
    #[arg(long, default_value = DEFAULT_FUNCTION_NAME)]
    function_name: String,
    /// AWS region hosting the function
    #[arg(long, default_value = DEFAULT_REGION)]
    region: String,
    /// Field the remote function sorts by
    #[arg(long, default_value = DEFAULT_SORT_BY)]
    sort_by: String,
    /// Sort direction
    #[arg(long, default_value = DEFAULT_SORT_ORDER)]
    sort_order: String,
    /// Number of items to request
    #[arg(long, default_value_t = DEFAULT_ITEMS_TO_GET)]
    items_to_get: u32,
    /// Upper bound on the invocation round trip, in seconds
    #[arg(long, default_value_t = DEFAULT_INVOKE_TIMEOUT_SECS)]
    invoke_timeout_secs: u64,
}

impl Cli {
    fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            function_name: self.function_name.clone(),
            region: self.region.clone(),
            sort_by: self.sort_by.clone(),
            sort_order: self.sort_order.clone(),
            items_to_get: self.items_to_get,
            invoke_timeout_secs: self.invoke_timeout_secs,
        }
    }
}

struct AwsFunctionInvoker {
    lambda_client: aws_sdk_lambda::Client,
    invoke_timeout: Duration,
}

impl FunctionInvoker for AwsFunctionInvoker {
    fn invoke(&self, function_name: &str, payload: &[u8]) -> Result<InvocationOutput, String> {
        let request_payload = payload.to_vec();
        let client = self.lambda_client.clone();
        let function_name = function_name.to_string();
        let invoke_timeout = self.invoke_timeout;

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let send = client
                    .invoke()
                    .function_name(function_name)
                    .set_payload(Some(request_payload.into()))
                    .send();

                let output = match tokio::time::timeout(invoke_timeout, send).await {
                    Ok(result) => result
                        .map_err(|error| format!("failed to invoke function: {error}"))?,
                    Err(_) => {
                        return Err(format!(
                            "invocation timed out after {}s",
                            invoke_timeout.as_secs()
                        ));
                    }
                };

                Ok(InvocationOutput {
                    status_code: output.status_code(),
                    function_error: output.function_error().map(str::to_string),
                    payload: output
                        .payload()
                        .map(|blob| blob.as_ref().to_vec())
                        .unwrap_or_default(),
                })
            })
        })
    }
}

#[tokio::main]
async fn main() {
    let config = Cli::parse().fetch_config();

    let aws_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .load()
        .await;
    let invoker = AwsFunctionInvoker {
        lambda_client: aws_sdk_lambda::Client::new(&aws_config),
        invoke_timeout: Duration::from_secs(config.invoke_timeout_secs),
    };

    match run_fetch(&config, &invoker) {
        Ok(outcome) => {
            for line in render_outcome(&outcome) {
                println!("{line}");
            }
        }
        Err(error) => {
            // Failures are reported on stdout; only the exit code marks them.
            println!("{}", error.user_message(&config.function_name));
            exit(1);
        }
    }
}
