//! Runner capability and the in-process runner.
//!
//! A [`Runner`] registers named groups and cases. A case body receives
//! [`CaseSignals`]: `done` awaits a produced promise and checks how it
//! settles, `error` fails the case right away when given an error.
//! [`LocalRunner`] runs registered cases one by one on an event loop.

use crate::checks::{check_settlement, CheckError, Expectation, Settlement};
use crate::report::{TestReport, TestResult};
use core_types::{EventLoopDriver, Function, JsError, Value};
use std::cell::RefCell;
use std::rc::Rc;

/// Completion signals handed to a case body.
pub trait CaseSignals {
    /// Awaits `produced` and fails the case unless it settles as expected.
    fn done(&self, produced: Value, expected: Expectation);

    /// Fails the case immediately when `error` is `Some`.
    fn error(&self, error: Option<CheckError>);
}

/// The body of a registered case.
pub type CaseBody = Box<dyn FnOnce(Rc<dyn CaseSignals>)>;

/// Test registration capability.
pub trait Runner {
    /// Registers a group; `body` registers its children. Everything inside
    /// a skipped group is skipped.
    fn register_group(&mut self, name: &str, skipped: bool, body: &mut dyn FnMut(&mut dyn Runner));

    /// Registers one case.
    fn register_case(&mut self, name: &str, body: CaseBody);
}

#[derive(Debug, Clone, PartialEq)]
enum CaseState {
    Pending,
    Passed,
    Failed(String),
}

/// Completion state of one running case.
#[derive(Debug, Clone)]
pub struct CaseOutcome {
    state: Rc<RefCell<CaseState>>,
}

impl CaseOutcome {
    fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(CaseState::Pending)),
        }
    }

    fn record(state: &RefCell<CaseState>, result: Result<(), CheckError>) {
        let mut state = state.borrow_mut();
        if matches!(*state, CaseState::Failed(_)) {
            return;
        }
        *state = match result {
            Ok(()) => CaseState::Passed,
            Err(error) => CaseState::Failed(error.to_string()),
        };
    }

    fn result(&self, unhandled: Vec<JsError>) -> TestResult {
        match &*self.state.borrow() {
            CaseState::Failed(reason) => TestResult::Fail(reason.clone()),
            CaseState::Pending => TestResult::Timeout,
            CaseState::Passed => match unhandled.first() {
                Some(error) => {
                    TestResult::Fail(CheckError::UnhandledRejection(error.to_string()).to_string())
                }
                None => TestResult::Pass,
            },
        }
    }
}

impl CaseSignals for CaseOutcome {
    fn done(&self, produced: Value, expected: Expectation) {
        let promise = match produced.as_promise() {
            Some(promise) => promise.clone(),
            None => {
                Self::record(&self.state, Err(CheckError::NotAwaitable(produced.to_string())));
                return;
            }
        };

        let state = self.state.clone();
        let want = expected.clone();
        let on_fulfilled = Function::named("done fulfilled", move |args| {
            let value = args.into_iter().next().unwrap_or(Value::Undefined);
            Self::record(&state, check_settlement(&want, &Settlement::Fulfilled(value)));
            Ok(Value::Undefined)
        });

        let state = self.state.clone();
        let on_rejected = Function::named("done rejected", move |args| {
            let error = match args.into_iter().next() {
                Some(Value::Error(error)) => error,
                Some(other) => JsError::new(other.to_string()),
                None => JsError::new("undefined"),
            };
            Self::record(&state, check_settlement(&expected, &Settlement::Rejected(error)));
            Ok(Value::Undefined)
        });

        promise.then(Some(on_fulfilled), Some(on_rejected));
    }

    fn error(&self, error: Option<CheckError>) {
        if let Some(error) = error {
            let mut state = self.state.borrow_mut();
            if !matches!(*state, CaseState::Failed(_)) {
                *state = CaseState::Failed(error.to_string());
            }
        }
    }
}

struct RegisteredCase {
    name: String,
    skipped: bool,
    body: CaseBody,
}

/// Runs registered cases sequentially, draining the event loop after
/// each one.
///
/// A case that has not signalled completion once the loop is idle can
/// never complete and is reported as [`TestResult::Timeout`].
pub struct LocalRunner {
    driver: Rc<dyn EventLoopDriver>,
    resets: Vec<Box<dyn Fn()>>,
    groups: Vec<String>,
    skip_depth: usize,
    cases: Vec<RegisteredCase>,
}

impl LocalRunner {
    /// Creates a runner with no registered cases, driving `driver`.
    pub fn new(driver: Rc<dyn EventLoopDriver>) -> Self {
        Self {
            driver,
            resets: Vec::new(),
            groups: Vec::new(),
            skip_depth: 0,
            cases: Vec::new(),
        }
    }

    /// Adds a hook run before every case, for state the collaborators
    /// share across cases (binding logs and the like).
    pub fn with_case_reset(mut self, reset: impl Fn() + 'static) -> Self {
        self.resets.push(Box::new(reset));
        self
    }

    /// Number of registered cases, skipped ones included.
    pub fn case_count(&self) -> usize {
        self.cases.len()
    }

    /// Full names of registered cases, in registration order.
    pub fn case_names(&self) -> Vec<String> {
        self.cases.iter().map(|case| case.name.clone()).collect()
    }

    /// Runs and drains every registered case.
    pub fn run(&mut self) -> TestReport {
        let mut report = TestReport::new();
        for case in std::mem::take(&mut self.cases) {
            let result = if case.skipped {
                TestResult::Skip("no constructor configured".to_string())
            } else {
                self.run_case(case.body)
            };
            match &result {
                TestResult::Fail(reason) => {
                    tracing::warn!(case = %case.name, %reason, "case failed")
                }
                TestResult::Timeout => tracing::warn!(case = %case.name, "case never completed"),
                _ => tracing::debug!(case = %case.name, ?result, "case finished"),
            }
            report.add_result(&case.name, result);
        }
        tracing::info!(
            total = report.total,
            passed = report.passed,
            failed = report.failed,
            skipped = report.skipped,
            timeout = report.timeout,
            "run finished"
        );
        report
    }

    fn run_case(&self, body: CaseBody) -> TestResult {
        // Leftovers from an earlier case must not be blamed on this one.
        let _ = self.driver.take_unhandled_rejections();
        for reset in &self.resets {
            reset();
        }

        let outcome = CaseOutcome::new();
        body(Rc::new(outcome.clone()));
        if let Err(error) = self.driver.run_until_idle() {
            return TestResult::Fail(format!("event loop error: {}", error));
        }
        outcome.result(self.driver.take_unhandled_rejections())
    }
}

impl Runner for LocalRunner {
    fn register_group(
        &mut self,
        name: &str,
        skipped: bool,
        body: &mut dyn FnMut(&mut dyn Runner),
    ) {
        self.groups.push(name.to_string());
        if skipped {
            self.skip_depth += 1;
        }
        body(self);
        if skipped {
            self.skip_depth -= 1;
        }
        self.groups.pop();
    }

    fn register_case(&mut self, name: &str, body: CaseBody) {
        let mut parts = self.groups.clone();
        parts.push(name.to_string());
        self.cases.push(RegisteredCase {
            name: parts.join(" > "),
            skipped: self.skip_depth > 0,
            body,
        });
    }
}
