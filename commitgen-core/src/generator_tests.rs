// commitgen-core/src/generator_tests.rs
#![cfg(test)]

use super::*;
use crate::validate::MAX_MESSAGE_BYTES;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

// --- Mock runner ---
struct MockRunner {
    response: Result<Vec<u8>, GenerateError>,
    calls: StdMutex<Vec<(String, Duration)>>,
}

impl MockRunner {
    fn new(response: Result<Vec<u8>, GenerateError>) -> Arc<Self> {
        Arc::new(Self {
            response,
            calls: StdMutex::new(Vec::new()),
        })
    }

    fn stdout(bytes: &[u8]) -> Arc<Self> {
        Self::new(Ok(bytes.to_vec()))
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn run(&self, command: &str, timeout: Duration) -> Result<Vec<u8>, GenerateError> {
        self.calls
            .lock()
            .unwrap()
            .push((command.to_string(), timeout));
        self.response.clone()
    }
}

fn enabled(command: &str) -> InvocationConfig {
    InvocationConfig::new(true, command)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

// --- Guard ---

#[tokio::test]
async fn test_disabled_never_runs_command() {
    for command in ["", "echo 'test'"] {
        let runner = MockRunner::stdout(b"feat: x");
        let generator = CommitMessageGenerator::with_runner(runner.clone());
        let result = generator
            .generate(&InvocationConfig::new(false, command))
            .await;
        assert_eq!(result, Err(GenerateError::FeatureDisabled));
        assert_eq!(runner.call_count(), 0);
    }
}

#[tokio::test]
async fn test_empty_command_never_runs() {
    let runner = MockRunner::stdout(b"feat: x");
    let generator = CommitMessageGenerator::with_runner(runner.clone());
    let result = generator.generate(&enabled("")).await;
    assert_eq!(result, Err(GenerateError::CommandNotConfigured));
    assert_eq!(runner.call_count(), 0);
}

// --- Pipeline with a mock runner ---

#[tokio::test]
async fn test_runner_receives_command_and_timeout() {
    let runner = MockRunner::stdout(b"feat: x\n");
    let generator = CommitMessageGenerator::with_runner(runner.clone())
        .with_timeout(Duration::from_secs(7));
    generator.generate(&enabled("my-llm --staged")).await.unwrap();

    let calls = runner.calls.lock().unwrap();
    assert_eq!(
        *calls,
        vec![("my-llm --staged".to_string(), Duration::from_secs(7))]
    );
}

#[tokio::test]
async fn test_default_timeout_is_thirty_seconds() {
    assert_eq!(
        CommitMessageGenerator::new().timeout(),
        Duration::from_secs(30)
    );
}

#[tokio::test]
async fn test_runner_error_passes_through() {
    let err = GenerateError::CommandFailed {
        stderr: "command failed".to_string(),
    };
    let generator = CommitMessageGenerator::with_runner(MockRunner::new(Err(err.clone())));
    assert_eq!(generator.generate(&enabled("x")).await, Err(err));
}

#[tokio::test]
async fn test_validation_order_through_pipeline() {
    let cases: Vec<(Vec<u8>, GenerateError)> = vec![
        (b"  \n".to_vec(), GenerateError::EmptyResponse),
        (
            vec![b'a'; MAX_MESSAGE_BYTES + 1],
            GenerateError::OversizedResponse {
                bytes: MAX_MESSAGE_BYTES + 1,
            },
        ),
        (b"feat: \xc3\x28".to_vec(), GenerateError::InvalidEncoding),
    ];
    for (stdout, expected) in cases {
        let generator = CommitMessageGenerator::with_runner(MockRunner::stdout(&stdout));
        assert_eq!(generator.generate(&enabled("x")).await, Err(expected));
    }
}

#[tokio::test]
async fn test_upstream_error_is_not_success() {
    init_tracing();
    let generator =
        CommitMessageGenerator::with_runner(MockRunner::stdout(b"error: API rate limit exceeded\n"));
    let result = generator.generate(&enabled("x")).await;
    assert_eq!(
        result,
        Err(GenerateError::UpstreamReportedError {
            message: "error: API rate limit exceeded".to_string()
        })
    );
}

#[tokio::test]
async fn test_warnings_ride_along_with_success() {
    let subject = format!("feat: {}", "y".repeat(80));
    let generator = CommitMessageGenerator::with_runner(MockRunner::stdout(subject.as_bytes()));
    let message = generator.generate(&enabled("x")).await.unwrap();
    assert_eq!(message.text, subject);
    assert_eq!(message.warnings.len(), 1);
}

#[tokio::test]
async fn test_exactly_one_outcome_per_call() {
    let outputs: [&[u8]; 5] = [
        b"feat: ok",
        b"",
        b"\x80",
        b"error: nope",
        b"\n\nfix: trailing\n\n",
    ];
    for stdout in outputs {
        let generator = CommitMessageGenerator::with_runner(MockRunner::stdout(stdout));
        match generator.generate(&enabled("x")).await {
            Ok(message) => assert!(!message.text.is_empty()),
            Err(e) => assert!(!e.to_string().is_empty()),
        }
    }
}

// --- Live shell scenarios ---

#[tokio::test]
async fn test_scenario_echo_success() {
    init_tracing();
    let generator = CommitMessageGenerator::new();
    let message = generator
        .generate(&enabled("echo 'feat: add new feature'"))
        .await
        .unwrap();
    assert_eq!(message.text, "feat: add new feature");
    assert!(message.warnings.is_empty());
}

#[tokio::test]
async fn test_scenario_exit_without_stderr() {
    let result = CommitMessageGenerator::new().generate(&enabled("exit 1")).await;
    match result {
        Err(e @ GenerateError::ExecutionFailed { .. }) => {
            assert!(e.to_string().contains("failed to execute LLM command"));
            assert!(e.detail().unwrap().contains("exit status"));
        }
        other => panic!("expected ExecutionFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_scenario_stderr_and_exit() {
    let result = CommitMessageGenerator::new()
        .generate(&enabled("echo 'msg' >&2; exit 1"))
        .await;
    assert_eq!(
        result,
        Err(GenerateError::CommandFailed {
            stderr: "msg".to_string()
        })
    );
}

#[tokio::test]
async fn test_scenario_empty_echo() {
    let result = CommitMessageGenerator::new().generate(&enabled("echo ''")).await;
    assert_eq!(result, Err(GenerateError::EmptyResponse));
}

#[tokio::test]
async fn test_live_upstream_error_prefix() {
    let result = CommitMessageGenerator::new()
        .generate(&enabled("echo 'error: API rate limit exceeded'"))
        .await;
    assert_eq!(
        result.unwrap_err().detail().as_deref(),
        Some("error: API rate limit exceeded")
    );
}

#[tokio::test]
async fn test_live_invalid_utf8() {
    let result = CommitMessageGenerator::new()
        .generate(&enabled("printf 'test\\200\\201'"))
        .await;
    assert_eq!(result, Err(GenerateError::InvalidEncoding));
}

#[tokio::test]
async fn test_live_timeout() {
    let generator = CommitMessageGenerator::new().with_timeout(Duration::from_millis(200));
    let result = generator.generate(&enabled("sleep 5; echo 'feat: late'")).await;
    assert_eq!(
        result,
        Err(GenerateError::Timeout {
            timeout: Duration::from_millis(200)
        })
    );
}

#[tokio::test]
async fn test_concurrent_calls_are_independent() {
    let generator = CommitMessageGenerator::new();
    let first = enabled("echo 'feat: one'");
    let second = enabled("echo 'fix: two'");
    let (a, b) = tokio::join!(generator.generate(&first), generator.generate(&second));
    assert_eq!(a.unwrap().text, "feat: one");
    assert_eq!(b.unwrap().text, "fix: two");
}

#[test]
fn test_generate_blocking() {
    let generator = CommitMessageGenerator::new();
    let message = generator
        .generate_blocking(&enabled("printf '\\n  chore: tidy  \\n\\n'"))
        .unwrap();
    assert_eq!(message.text, "chore: tidy");
}
