//! Composite targets run through the orchestrator with a fake tool.
#![cfg(unix)]

mod common;

use common::Project;
use fxpack::bundler::{FailureReason, PipelineOrchestrator, TaskResult};

#[tokio::test]
async fn one_failed_installer_fails_the_composite_but_not_its_siblings() {
    let project = Project::new();
    project.set_mode("fail-msi");
    let orchestrator = PipelineOrchestrator::new(project.context(project.settings(None))).unwrap();

    let report = orchestrator.run_composite(&["build-all"]).await.unwrap();

    let names: Vec<_> = report.tasks().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["build-exe", "build-msi", "build-portable"]);
    assert!(matches!(report.get("build-exe"), Some(TaskResult::Succeeded { .. })));
    assert!(matches!(
        report.get("build-msi"),
        Some(TaskResult::Failed {
            reason: FailureReason::ToolFailed { .. }
        })
    ));
    assert!(matches!(report.get("build-portable"), Some(TaskResult::Succeeded { .. })));
    assert!(!report.is_success());
    assert_eq!(report.failures().count(), 1);
}

#[tokio::test]
async fn all_succeeding_tasks_make_a_successful_report() {
    let project = Project::new();
    let orchestrator = PipelineOrchestrator::new(project.context(project.settings(None))).unwrap();

    let report = orchestrator
        .run_composite(&["build-all-safe", "build-portable"])
        .await
        .unwrap();

    assert!(report.is_success());
    // build-portable is shared and runs once
    assert_eq!(report.tasks().len(), 3);
    assert_eq!(project.invocations().len(), 3);
}

#[tokio::test]
async fn failed_runtime_image_skips_the_runtime_installer() {
    let project = Project::new();
    project.set_mode("fail-jlink");
    let orchestrator = PipelineOrchestrator::new(project.context(project.settings(None))).unwrap();

    let report = orchestrator.run_composite(&["build-with-runtime"]).await.unwrap();

    match report.get("runtime-image") {
        Some(TaskResult::Failed {
            reason: FailureReason::ToolFailed { tool, stderr, .. },
        }) => {
            assert_eq!(tool, "jlink");
            assert_eq!(stderr, "Error: module not found: javafx.base");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(
        report.get("build-with-runtime"),
        Some(&TaskResult::Skipped {
            upstream: "runtime-image".into()
        })
    );
    // Only jlink ran
    assert_eq!(project.invocations().len(), 1);
}

#[tokio::test]
async fn runtime_installer_embeds_the_built_image() {
    let project = Project::new();
    let orchestrator = PipelineOrchestrator::new(project.context(project.settings(None))).unwrap();

    let report = orchestrator.run_composite(&["build-with-runtime"]).await.unwrap();

    assert!(report.is_success(), "{:?}", report.tasks());
    let invocations = project.invocations();
    assert!(invocations[0].starts_with("--add-modules java.base,"));
    let runtime = project.root().join("runtime");
    assert!(invocations[1].contains(&format!("--runtime-image {}", runtime.display())));
}

#[tokio::test]
async fn clean_then_build_removes_every_known_output() {
    let project = Project::new();
    for dir in ["installer-debug", "runtime", "jpackage-temp-msi"] {
        std::fs::create_dir_all(project.root().join(dir).join("leftover")).unwrap();
    }
    let orchestrator = PipelineOrchestrator::new(project.context(project.settings(None))).unwrap();

    let report = orchestrator.run_composite(&["clean-and-build-all"]).await.unwrap();

    match report.get("clean-outputs") {
        Some(TaskResult::Cleaned { summary }) => {
            assert!(summary.is_success());
            assert_eq!(summary.removed_count(), 3);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(!project.root().join("installer-debug").exists());
    assert!(report.is_success());
    assert_eq!(report.tasks()[0].name, "clean-outputs");
}

#[tokio::test]
async fn unknown_target_runs_nothing() {
    let project = Project::new();
    let orchestrator = PipelineOrchestrator::new(project.context(project.settings(None))).unwrap();

    assert!(orchestrator.run_composite(&["build-exe", "build-deb"]).await.is_err());
    assert!(project.invocations().is_empty());
}
