use super::{failures, runtime};
use promise_conformance::reference::{
    catch_method, register_suite, resolve_method, run_reference, then_both_method, then_method,
    try_method,
};
use promise_conformance::{ContractOptions, MatrixSelection, RunConfig};

#[test]
fn then_matrix_passes() {
    let rt = runtime();
    let mut runner = rt.runner();
    let stats = rt
        .harness()
        .instance_method_returns_promise(&mut runner, then_method(), ContractOptions::continues());
    assert_eq!(stats.total, 68);
    assert_eq!(runner.case_count(), 68);

    let report = runner.run();
    assert!(report.is_success(), "{}", failures(&report));
    assert_eq!(report.skipped, 16);
    assert_eq!(report.passed, 52);
}

#[test]
fn catch_matrix_passes() {
    let rt = runtime();
    let mut runner = rt.runner();
    rt.harness()
        .instance_method_returns_promise(&mut runner, catch_method(), ContractOptions::catches());
    let report = runner.run();
    assert!(report.is_success(), "{}", failures(&report));
    assert_eq!(report.passed, 52);
}

#[test]
fn both_handlers_matrix_passes() {
    let rt = runtime();
    let mut runner = rt.runner();
    let options = ContractOptions {
        continues: true,
        catches: true,
        ..ContractOptions::default()
    };
    rt.harness()
        .instance_method_returns_promise(&mut runner, then_both_method(), options);
    let report = runner.run();
    assert!(report.is_success(), "{}", failures(&report));
    assert_eq!(report.total, 120);
    assert_eq!(report.skipped, 32);
}

#[test]
fn try_matrix_passes() {
    let rt = runtime();
    let mut runner = rt.runner();
    let stats = rt
        .harness()
        .static_method_returns_promise(&mut runner, try_method(rt.patched()));
    assert_eq!(stats.total, 14);
    let report = runner.run();
    assert!(report.is_success(), "{}", failures(&report));
    assert_eq!(report.passed, 10);
}

#[test]
fn resolve_matrix_passes() {
    let rt = runtime();
    let mut runner = rt.runner();
    let stats = rt
        .harness()
        .value_returns_promise(&mut runner, resolve_method(rt.patched()));
    assert_eq!(stats.total, 13);
    let report = runner.run();
    assert!(report.is_success(), "{}", failures(&report));
    assert_eq!(report.passed, 9);
}

#[test]
fn default_suite_passes() {
    let report = run_reference(&RunConfig::default());
    assert!(report.is_success(), "{}", failures(&report));
    assert_eq!(report.total, 68 + 68 + 120 + 14 + 13);
    assert_eq!(report.skipped, 16 + 16 + 32 + 4 + 4);
}

#[test]
fn suite_groups_cases_by_method() {
    let rt = runtime();
    let mut runner = rt.runner();
    let config = RunConfig {
        matrices: MatrixSelection {
            then: false,
            catch: false,
            then_both: false,
            try_call: true,
            resolve: true,
        },
        ..RunConfig::default()
    };
    let registered = register_suite(&rt, &config, &mut runner);
    let names: Vec<_> = registered.iter().map(|(name, _)| *name).collect();
    assert_eq!(names, vec!["Promise.try", "Promise.resolve"]);

    let cases = runner.case_names();
    assert_eq!(
        cases[0],
        "Promise.try > returns instance of patched Promise constructor when handler returns > literal value"
    );
    assert_eq!(cases[14], "Promise.resolve > literal value");
    assert_eq!(cases[15], "Promise.resolve > promise (patched) > resolved sync");
}

#[test]
fn no_undefined_drops_cases_from_the_suite() {
    let rt = runtime();
    let mut runner = rt.runner();
    let config = RunConfig {
        no_undefined: true,
        ..RunConfig::default()
    };
    register_suite(&rt, &config, &mut runner);
    assert!(runner.case_names().iter().all(|name| !name.ends_with("is undefined")));
    let report = runner.run();
    assert!(report.is_success(), "{}", failures(&report));
    assert_eq!(report.total, 283 - 3 * 8);
}

#[test]
fn without_alternates_every_alternate_case_is_skipped() {
    let report = run_reference(&RunConfig::default().without_alternates());
    assert!(report.is_success(), "{}", failures(&report));
    assert_eq!(report.skipped, 2 * (16 + 16 + 32 + 4 + 4));
}
