//! Lifecycle engine tests
//!
//! Only resources tagged exactly `AutoSchedule=true` receive commands, and
//! only when the action moves them out of a steady state:
//! - start + stopped -> start
//! - stop + available -> stop
//! - anything else -> nothing

mod common;

use common::fixtures::*;
use rds_ops::rds::ResourceKind;
use rds_ops::services::{Action, LifecycleService};
use rstest::rstest;
use std::sync::Arc;

#[rstest]
#[case("start", "stopped", Some("start"))]
#[case("start", "available", None)]
#[case("start", "starting", None)]
#[case("start", "stopping", None)]
#[case("start", "backing-up", None)]
#[case("stop", "available", Some("stop"))]
#[case("stop", "stopped", None)]
#[case("stop", "starting", None)]
#[case("stop", "modifying", None)]
#[case("restart", "available", None)]
#[case("restart", "stopped", None)]
#[tokio::test]
async fn test_eligible_instance_transitions(
    #[case] action: &str,
    #[case] status: &str,
    #[case] expected: Option<&str>,
) {
    let db = Arc::new(FakeDatabase::new().with_resources(vec![scheduled_instance("db-1", status)]));
    let service = LifecycleService::new(db.clone());

    service
        .apply(&Action::parse(action), ResourceKind::Instance)
        .await
        .unwrap();

    let expected = match expected {
        Some("start") => vec![IssuedCommand::Start(ResourceKind::Instance, "db-1".to_string())],
        Some("stop") => vec![IssuedCommand::Stop(ResourceKind::Instance, "db-1".to_string())],
        _ => vec![],
    };
    assert_eq!(db.commands(), expected);
}

#[rstest]
#[case(&[])]
#[case(&[("AutoSchedule", "false")])]
#[case(&[("AutoSchedule", "True")])]
#[case(&[("AutoSchedule", "TRUE")])]
#[case(&[("autoschedule", "true")])]
#[case(&[("Environment", "dev")])]
#[tokio::test]
async fn test_untagged_resources_never_change_state(#[case] tags: &[(&str, &str)]) {
    let db = Arc::new(FakeDatabase::new().with_resources(vec![
        resource(ResourceKind::Instance, "db-2", "stopped", tags),
        resource(ResourceKind::Cluster, "cluster-2", "available", tags),
    ]));
    let service = LifecycleService::new(db.clone());

    for action in [Action::Start, Action::Stop] {
        for kind in ResourceKind::ALL {
            let report = service.apply(&action, kind).await.unwrap();
            assert_eq!(report.ineligible.len(), 1);
        }
    }

    assert!(db.commands().is_empty());
}

#[tokio::test]
async fn test_mixed_fleet_only_touches_tagged_resources() {
    let db = Arc::new(FakeDatabase::new().with_resources(vec![
        scheduled_instance("db-1", "stopped"),
        resource(ResourceKind::Instance, "db-2", "stopped", &[]),
        scheduled_instance("db-3", "available"),
        scheduled_cluster("cluster-1", "stopped"),
    ]));
    let service = LifecycleService::new(db.clone());

    let report = service
        .apply(&Action::Start, ResourceKind::Instance)
        .await
        .unwrap();

    assert_eq!(report.started, vec!["db-1"]);
    assert_eq!(report.ineligible, vec!["db-2"]);
    assert_eq!(report.unchanged, vec!["db-3"]);
    assert_eq!(
        db.commands(),
        vec![IssuedCommand::Start(ResourceKind::Instance, "db-1".to_string())]
    );
}

#[tokio::test]
async fn test_command_failure_does_not_stop_later_resources() {
    let db = Arc::new(
        FakeDatabase::new()
            .with_resources(vec![
                scheduled_cluster("cluster-1", "available"),
                scheduled_cluster("cluster-2", "available"),
                scheduled_cluster("cluster-3", "available"),
            ])
            .failing_on("cluster-2"),
    );
    let service = LifecycleService::new(db.clone());

    let report = service
        .apply(&Action::Stop, ResourceKind::Cluster)
        .await
        .unwrap();

    assert_eq!(report.stopped, vec!["cluster-1", "cluster-3"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].identifier, "cluster-2");
    assert_eq!(report.failed[0].kind, ResourceKind::Cluster);
    assert!(report.failed[0].reason.contains("InvalidDBInstanceState"));
    assert_eq!(report.commands_issued(), 3);
    assert_eq!(db.commands().len(), 3);
}

#[tokio::test]
async fn test_listing_failure_is_an_error() {
    let db = Arc::new(
        FakeDatabase::new()
            .with_resources(vec![scheduled_instance("db-1", "stopped")])
            .failing_listing(ResourceKind::Instance),
    );
    let service = LifecycleService::new(db.clone());

    let err = service
        .apply(&Action::Start, ResourceKind::Instance)
        .await
        .unwrap_err();

    assert!(format!("{:#}", err).contains("Error processing RDS instances"));
    assert!(format!("{:#}", err).contains("AccessDenied"));
    assert!(db.commands().is_empty());
}

#[tokio::test]
async fn test_empty_fleet_is_a_no_op() {
    let db = Arc::new(FakeDatabase::new());
    let service = LifecycleService::new(db.clone());

    let report = service
        .apply(&Action::Stop, ResourceKind::Cluster)
        .await
        .unwrap();

    assert_eq!(report, Default::default());
    assert!(db.commands().is_empty());
}
