//! Scenario matrix builder.
//!
//! Pure functions from contract options and constructor slots to an
//! ordered list of [`Scenario`] records. Nothing here touches a promise;
//! the engine turns records into registered test cases.

use crate::fixtures::{ConstructorSlot, FixtureSpec, Outcome};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Group name of the instance-method sync attachment branch.
pub const ATTACHED_SYNC: &str = "attached synchronously to promise";
/// Group name of the instance-method async attachment branch.
pub const ATTACHED_ASYNC: &str = "attached asynchronously to promise";
/// Group name wrapping the static-method handler matrix.
pub const STATIC_GROUP: &str =
    "returns instance of patched Promise constructor when handler returns";

/// Contract of one API under test. Applies to the whole matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractOptions {
    /// Handler fires when the promise resolves
    pub continues: bool,
    /// Handler fires when the promise rejects
    pub catches: bool,
    /// Original rejection survives even when the handler fires
    pub pass_through: bool,
    /// Skip the "no handler supplied" scenario
    pub no_undefined: bool,
    /// Fulfilment values are not the fixture literal; accept any value
    pub transforms_value: bool,
}

impl ContractOptions {
    /// Handler fires on resolution (`.then(handler)` style).
    pub fn continues() -> Self {
        Self {
            continues: true,
            ..Self::default()
        }
    }

    /// Handler fires on rejection (`.catch(handler)` style).
    pub fn catches() -> Self {
        Self {
            catches: true,
            ..Self::default()
        }
    }

    fn handler_fires(&self, outcome: Outcome) -> bool {
        match outcome {
            Outcome::Resolved => self.continues,
            Outcome::Rejected => self.catches,
        }
    }
}

/// When the method under test is attached relative to fixture creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachTiming {
    /// In the same turn the fixture was created
    Sync,
    /// One scheduler turn later
    Async,
}

impl AttachTiming {
    fn group_name(self) -> &'static str {
        match self {
            AttachTiming::Sync => ATTACHED_SYNC,
            AttachTiming::Async => ATTACHED_ASYNC,
        }
    }
}

/// The promise an instance method is called on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Origin {
    /// Attachment timing
    pub attach: AttachTiming,
    /// Primary-constructor fixture
    pub fixture: FixtureSpec,
}

/// What a handler (or supplied value) does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerSpec {
    /// Returns the fixture literal
    Literal,
    /// Throws a fresh error
    Throw,
    /// Returns a fixture promise
    Promise(FixtureSpec),
}

impl HandlerSpec {
    /// True for handlers whose outcome is a rejection with a
    /// handler-made error.
    pub fn makes_error(&self) -> bool {
        match self {
            HandlerSpec::Literal => false,
            HandlerSpec::Throw => true,
            HandlerSpec::Promise(spec) => spec.is_rejecting(),
        }
    }

    /// Constructor slot a promise-returning handler draws from.
    pub fn constructor(&self) -> Option<ConstructorSlot> {
        match self {
            HandlerSpec::Promise(spec) => Some(spec.constructor),
            _ => None,
        }
    }
}

/// Symbolic settlement a scenario must observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedSettlement {
    /// Fulfils; with `value_checked` it must fulfil with the fixture literal
    Fulfilled { value_checked: bool },
    /// Rejects with the origin fixture's error
    RejectedWithOrigin,
    /// Rejects with the error made for the handler
    RejectedWithHandler,
}

/// Tagged scenario variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Instance method called with no handler
    NoHandler(Origin),
    /// Instance method called with a handler that must never fire
    Ignored(Origin),
    /// A handler that fires; `origin` is `None` for static methods
    Handler {
        origin: Option<Origin>,
        handler: HandlerSpec,
    },
    /// A value passed straight to a value-taking method
    Value(HandlerSpec),
}

/// One concrete, fully-parameterised case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Enclosing group names, outermost first
    pub path: Vec<String>,
    /// Case name
    pub name: String,
    /// Registered as skipped (empty alternate slot)
    pub skipped: bool,
    pub kind: ScenarioKind,
    pub expected: ExpectedSettlement,
}

impl Scenario {
    /// Group path and name joined for display.
    pub fn full_name(&self) -> String {
        let mut parts = self.path.clone();
        parts.push(self.name.clone());
        parts.join(" > ")
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

/// A constructor slot as seen by the builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotInfo {
    pub slot: ConstructorSlot,
    pub name: String,
    /// False for an alternate slot with no constructor configured
    pub available: bool,
}

impl SlotInfo {
    /// The primary slot, always available.
    pub fn primary(name: &str) -> Self {
        Self {
            slot: ConstructorSlot::Primary,
            name: name.to_string(),
            available: true,
        }
    }

    /// Alternate slot `index`.
    pub fn alternate(index: usize, name: &str, available: bool) -> Self {
        Self {
            slot: ConstructorSlot::Alternate(index),
            name: name.to_string(),
            available,
        }
    }
}

/// Instance-method matrix: both attachment timings × four settlement
/// branches, each with a no-handler case and either the handler
/// sub-matrix or an ignored-handler case.
pub fn instance_method_matrix(options: &ContractOptions, slots: &[SlotInfo]) -> Vec<Scenario> {
    let mut scenarios = Vec::new();
    for attach in [AttachTiming::Sync, AttachTiming::Async] {
        for fixture in FixtureSpec::settlements(ConstructorSlot::Primary) {
            let origin = Origin { attach, fixture };
            let path = vec![attach.group_name().to_string(), fixture.to_string()];
            let plain = if fixture.is_rejecting() {
                ExpectedSettlement::RejectedWithOrigin
            } else {
                ExpectedSettlement::Fulfilled {
                    value_checked: !options.transforms_value,
                }
            };

            if !options.no_undefined {
                scenarios.push(Scenario {
                    path: path.clone(),
                    name: "is undefined".to_string(),
                    skipped: false,
                    kind: ScenarioKind::NoHandler(origin),
                    expected: plain,
                });
            }

            if options.handler_fires(fixture.outcome) {
                let mut returns = path;
                returns.push("returns".to_string());
                scenarios.extend(handler_matrix(
                    &returns,
                    slots,
                    true,
                    |handler| ScenarioKind::Handler {
                        origin: Some(origin),
                        handler,
                    },
                    |handler| {
                        if fixture.is_rejecting() && options.pass_through {
                            ExpectedSettlement::RejectedWithOrigin
                        } else {
                            handler_expectation(handler, !options.transforms_value)
                        }
                    },
                ));
            } else {
                scenarios.push(Scenario {
                    path,
                    name: "is ignored".to_string(),
                    skipped: false,
                    kind: ScenarioKind::Ignored(origin),
                    expected: plain,
                });
            }
        }
    }
    scenarios
}

/// Static-method-with-callback matrix: the handler sub-matrix alone.
pub fn static_method_matrix(slots: &[SlotInfo]) -> Vec<Scenario> {
    handler_matrix(
        &[STATIC_GROUP.to_string()],
        slots,
        true,
        |handler| ScenarioKind::Handler {
            origin: None,
            handler,
        },
        |handler| handler_expectation(handler, true),
    )
}

/// Static-method-with-value matrix: literal and promise values passed
/// directly to the method. A value cannot throw, so there is no thrown
/// error leaf.
pub fn value_matrix(slots: &[SlotInfo]) -> Vec<Scenario> {
    handler_matrix(&[], slots, false, ScenarioKind::Value, |handler| {
        handler_expectation(handler, true)
    })
}

fn handler_expectation(handler: HandlerSpec, value_checked: bool) -> ExpectedSettlement {
    if handler.makes_error() {
        ExpectedSettlement::RejectedWithHandler
    } else {
        ExpectedSettlement::Fulfilled { value_checked }
    }
}

/// Shared handler sub-matrix: literal value, a promise of every
/// settlement from every slot, then (optionally) a thrown error.
fn handler_matrix(
    base: &[String],
    slots: &[SlotInfo],
    include_throw: bool,
    kind: impl Fn(HandlerSpec) -> ScenarioKind,
    expected: impl Fn(HandlerSpec) -> ExpectedSettlement,
) -> Vec<Scenario> {
    let leaf = |path: Vec<String>, name: &str, skipped: bool, handler: HandlerSpec| Scenario {
        path,
        name: name.to_string(),
        skipped,
        kind: kind(handler),
        expected: expected(handler),
    };

    let mut scenarios = vec![leaf(base.to_vec(), "literal value", false, HandlerSpec::Literal)];

    for slot in slots {
        let mut path = base.to_vec();
        path.push(format!("promise ({})", slot.name));
        for fixture in FixtureSpec::settlements(slot.slot) {
            scenarios.push(leaf(
                path.clone(),
                &fixture.to_string(),
                !slot.available,
                HandlerSpec::Promise(fixture),
            ));
        }
    }

    if include_throw {
        scenarios.push(leaf(base.to_vec(), "thrown error", false, HandlerSpec::Throw));
    }
    scenarios
}

/// Counts over a built matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixStats {
    pub total: usize,
    pub skipped: usize,
    pub no_handler: usize,
    pub ignored: usize,
    pub handler: usize,
    pub value: usize,
}

impl MatrixStats {
    /// Tallies `scenarios`.
    pub fn of(scenarios: &[Scenario]) -> Self {
        let mut stats = MatrixStats {
            total: scenarios.len(),
            ..Self::default()
        };
        for scenario in scenarios {
            if scenario.skipped {
                stats.skipped += 1;
            }
            match scenario.kind {
                ScenarioKind::NoHandler(_) => stats.no_handler += 1,
                ScenarioKind::Ignored(_) => stats.ignored += 1,
                ScenarioKind::Handler { .. } => stats.handler += 1,
                ScenarioKind::Value(_) => stats.value += 1,
            }
        }
        stats
    }
}
