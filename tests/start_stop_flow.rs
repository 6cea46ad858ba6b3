// ABOUTME: Start/stop lifecycle tests over scripted couriers.
// ABOUTME: Verifies exists checks and inverse-operation rollback.

mod support;

use convoy::deploy::{BlueGreen, DeploymentInfo, Phase, StartCreator, StopCreator};
use convoy::transcript::Transcript;
use std::sync::Arc;
use support::{deployment_info, environment, CourierScript, MockCourierFactory};

const A: &str = "https://api.a.example.com";
const B: &str = "https://api.b.example.com";

fn harness(
    factory: MockCourierFactory,
    env: &convoy::config::Environment,
) -> (Arc<MockCourierFactory>, Arc<DeploymentInfo>, Transcript) {
    (
        Arc::new(factory),
        Arc::new(deployment_info("shop", env)),
        Transcript::new(),
    )
}

#[tokio::test]
async fn start_drives_login_exists_start() {
    let env = environment("prod", None, &[A]);
    let factory = MockCourierFactory::with_default_script(CourierScript {
        app_exists: true,
        ..CourierScript::default()
    });
    let (factory, info, transcript) = harness(factory, &env);

    let mut creator = StartCreator::new(info, factory.clone(), transcript);
    BlueGreen::new().run(&mut creator, &env).await.unwrap();

    assert_eq!(
        factory.log.calls_for(A),
        vec![
            "login deployer".to_string(),
            "exists shop".to_string(),
            "start shop".to_string(),
            "clean-up".to_string(),
        ]
    );
}

#[tokio::test]
async fn starting_a_missing_application_fails() {
    let env = environment("prod", None, &[A]);
    let (factory, info, transcript) = harness(MockCourierFactory::new(), &env);

    let mut creator = StartCreator::new(info, factory.clone(), transcript);
    let err = BlueGreen::new().run(&mut creator, &env).await.unwrap_err();

    assert_eq!(err.fatal().phase, Phase::Execute);
    assert!(err.fatal().error.to_string().contains("does not exist"));
    assert!(!factory
        .log
        .calls()
        .iter()
        .any(|c| c.contains("start shop")));
}

#[tokio::test]
async fn partial_stop_restarts_the_stopped_foundations() {
    let env = environment("prod", None, &[A, B]);
    let factory = MockCourierFactory::with_default_script(CourierScript {
        app_exists: true,
        ..CourierScript::default()
    });
    factory.script_for(
        B,
        CourierScript {
            app_exists: true,
            fail_stop: true,
            ..CourierScript::default()
        },
    );
    let (factory, info, transcript) = harness(factory, &env);

    let mut creator = StopCreator::new(info, factory.clone(), transcript);
    let err = BlueGreen::new().run(&mut creator, &env).await.unwrap_err();

    assert_eq!(err.fatal().phase, Phase::Execute);

    // A was stopped cleanly, so undo starts it again; B's undo also
    // attempts the inverse.
    let calls = factory.log.calls();
    assert!(calls.contains(&format!("{A} stop shop")));
    assert!(calls.contains(&format!("{A} start shop")));
    assert!(calls.contains(&format!("{B} start shop")));
}

#[tokio::test]
async fn partial_start_stops_the_started_foundations() {
    let env = environment("prod", None, &[A, B]);
    let factory = MockCourierFactory::with_default_script(CourierScript {
        app_exists: true,
        ..CourierScript::default()
    });
    factory.script_for(
        B,
        CourierScript {
            app_exists: true,
            fail_start: true,
            ..CourierScript::default()
        },
    );
    let (factory, info, transcript) = harness(factory, &env);

    let mut creator = StartCreator::new(info, factory.clone(), transcript);
    let err = BlueGreen::new().run(&mut creator, &env).await.unwrap_err();

    assert_eq!(err.fatal().phase, Phase::Execute);
    let calls = factory.log.calls();
    assert!(calls.contains(&format!("{A} stop shop")));
}

#[tokio::test]
async fn stop_success_leaves_applications_stopped() {
    let env = environment("prod", None, &[A, B]);
    let factory = MockCourierFactory::with_default_script(CourierScript {
        app_exists: true,
        ..CourierScript::default()
    });
    let (factory, info, transcript) = harness(factory, &env);

    let mut creator = StopCreator::new(info, factory.clone(), transcript);
    BlueGreen::new().run(&mut creator, &env).await.unwrap();

    let calls = factory.log.calls();
    assert_eq!(calls.iter().filter(|c| c.contains("stop shop")).count(), 2);
    assert!(!calls.iter().any(|c| c.contains("start shop")));
}
