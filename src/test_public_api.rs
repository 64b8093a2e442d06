use std::sync::Arc;

use futures::executor::block_on;

use crate::form::{SubmissionResult, contact};

#[test]
fn prelude_wires_a_configured_controller() {
    use crate::prelude::*;

    let config = LeadformConfig::from_toml_str(
        r#"
        [backend]
        latency_ms = 0
        failure_rate = 0.0
        seed = 42
        "#,
    )
    .expect("parse config");
    let view = Arc::new(InMemoryView::new());
    let controller = SubmissionController::new(
        FieldValidator::new(config.rule_set().expect("rule set")),
        Arc::new(SimulatedBackend::new(
            config.backend_config().expect("backend config"),
        )),
        view.clone(),
        Arc::new(ThreadScheduler::new().expect("timer pool")),
    )
    .with_options(config.controller_options());
    controller
        .register_observer(LiveRegionAnnouncer::new(view.clone()))
        .expect("register announcer");

    let values = FormValues::new()
        .with(contact::NAME, "Ana")
        .with(contact::EMAIL, "ana@example.com")
        .with(contact::GOALS, "Gerar mais leads qualificados");
    let outcome = block_on(controller.on_submit_requested(values)).expect("submit");

    assert!(matches!(
        outcome,
        SubmitOutcome::Settled(SubmissionResult::Success(_))
    ));
    assert_eq!(
        view.success().expect("success panel").title(),
        "Obrigado, Ana!"
    );
    assert_eq!(view.announcements().len(), 2);
    assert_eq!(
        controller.snapshot().expect("snapshot").submit_state,
        SubmitState::Idle
    );
}

#[test]
fn logging_installs_once_and_panic_hook_chains() {
    assert!(crate::logging::init_logging().is_ok());
    assert!(crate::logging::init_logging().is_err());

    let previous = std::panic::take_hook();
    crate::logging::install_panic_hook();
    let caught = std::panic::catch_unwind(|| panic!("hook check"));
    std::panic::set_hook(previous);
    assert!(caught.is_err());
}
