/// Raw result of one synchronous function invocation, as reported by the
/// transport. `status_code` is the SDK-level invocation status, not the
/// gateway status embedded in the response payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationOutput {
    pub status_code: i32,
    pub function_error: Option<String>,
    pub payload: Vec<u8>,
}

pub trait FunctionInvoker {
    fn invoke(&self, function_name: &str, payload: &[u8]) -> Result<InvocationOutput, String>;
}
