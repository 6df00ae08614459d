//! Packaging tasks against a fake packaging tool.
#![cfg(unix)]

mod common;

use common::{CountingTerminator, Project, RecordingRemover, context_with_evictor};
use fxpack::bundler::{FailureReason, Format, PackagingTask, SettingsBuilder, TaskResult};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

#[tokio::test]
async fn portable_image_succeeds_with_directory_size() {
    let project = Project::new();
    let ctx = project.context(project.settings(None));

    let result = PackagingTask::new(Format::AppImage).run(&ctx).await;

    match result {
        TaskResult::Succeeded {
            artifact,
            size_bytes,
        } => {
            assert_eq!(artifact, project.root().join("portable/TradingAnalytics"));
            assert_eq!(size_bytes, 4); // "jar\n"
        }
        other => panic!("unexpected {other:?}"),
    }
    let invocations = project.invocations();
    assert_eq!(invocations.len(), 1);
    assert!(invocations[0].contains("--type app-image"));
    assert!(invocations[0].contains("jpackage-temp-portable"));
}

#[tokio::test]
async fn stale_output_is_evicted_before_packaging() {
    let project = Project::new();
    let stale = project.root().join("installer/old-build.exe");
    std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
    std::fs::write(&stale, b"old").unwrap();
    let ctx = project.context(project.settings(None));

    let result = PackagingTask::new(Format::Exe).run(&ctx).await;

    match result {
        TaskResult::Succeeded { artifact, .. } => {
            assert_eq!(artifact, project.root().join("installer/TradingAnalytics-1.0.0.exe"));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(!stale.exists());
}

#[tokio::test]
async fn exit_zero_without_artifact_is_a_failure() {
    let project = Project::new();
    project.set_mode("no-artifact");
    let ctx = project.context(project.settings(None));

    let result = PackagingTask::new(Format::Msi).run(&ctx).await;

    assert!(matches!(
        result,
        TaskResult::Failed {
            reason: FailureReason::ArtifactMissing { .. }
        }
    ));
}

#[tokio::test]
async fn nonzero_exit_reports_code_and_stderr() {
    let project = Project::new();
    project.set_mode("fail");
    let ctx = project.context(project.settings(None));

    let result = PackagingTask::new(Format::Exe).run(&ctx).await;

    match result {
        TaskResult::Failed {
            reason:
                FailureReason::ToolFailed {
                    exit_code, stderr, ..
                },
        } => {
            assert_eq!(exit_code, Some(2));
            assert_eq!(stderr, "Error: simulated packaging failure");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn missing_archive_never_invokes_the_tool() {
    let project = Project::new();
    project.remove_bundle();
    let ctx = project.context(project.settings(None));

    for format in Format::ALL {
        let result = PackagingTask::new(format).run(&ctx).await;
        assert!(
            result.to_string().contains("input not found"),
            "{format}: {result}"
        );
    }
    assert!(project.invocations().is_empty());
}

#[tokio::test]
async fn icon_is_passed_only_when_present() {
    let project = Project::new();
    let icon = project.root().join("app.ico");
    let ctx = project.context(project.settings(Some(icon.clone())));

    PackagingTask::new(Format::DebugAppImage).run(&ctx).await;
    std::fs::write(&icon, b"ico").unwrap();
    PackagingTask::new(Format::DebugAppImage).run(&ctx).await;

    let invocations = project.invocations();
    assert_eq!(invocations.len(), 2);
    assert!(!invocations[0].contains("--icon"));
    assert!(invocations[1].contains(&format!("--icon {}", icon.display())));
    assert!(invocations[1].contains("--name TradingAnalyticsDebug"));
}

#[tokio::test]
async fn sequential_timestamped_runs_use_distinct_directories() {
    let project = Project::new();
    let ctx = project.context(project.settings(None));

    let first = PackagingTask::new(Format::ExeTimestamped).run(&ctx).await;
    let second = PackagingTask::new(Format::ExeTimestamped).run(&ctx).await;

    let artifact = |result: &TaskResult| match result {
        TaskResult::Succeeded { artifact, .. } => artifact.clone(),
        other => panic!("unexpected {other:?}"),
    };
    let (first, second) = (artifact(&first), artifact(&second));
    assert_ne!(first.parent(), second.parent());
    // Neither run removed the other's output
    assert!(first.exists());
    assert!(second.exists());
}

#[tokio::test]
async fn hung_tool_times_out() {
    let project = Project::new();
    project.set_mode("hang");
    let settings = SettingsBuilder::new()
        .build_root(project.root())
        .icon(None)
        .process_timeout(Duration::from_millis(300))
        .build()
        .unwrap();
    let ctx = project.context(settings);

    let result = PackagingTask::new(Format::AppImage).run(&ctx).await;

    assert!(matches!(result, TaskResult::TimedOut { .. }));
    assert!(result.is_failure());
}

#[tokio::test]
async fn timestamped_runs_never_evict() {
    let project = Project::new();
    // Leftovers of earlier fixed-name and isolated runs
    let leftover = project.root().join("jpackage-temp-safe/leftover");
    std::fs::create_dir_all(&leftover).unwrap();
    std::fs::create_dir_all(project.root().join("installer/old")).unwrap();
    let terminator = Arc::new(CountingTerminator::default());
    let remover = Arc::new(RecordingRemover::default());
    let ctx = context_with_evictor(&project, terminator.clone(), remover.clone());

    for _ in 0..2 {
        let result = PackagingTask::new(Format::ExeTimestamped).run(&ctx).await;
        assert!(result.is_success(), "{result}");
    }

    assert_eq!(terminator.calls.load(Ordering::SeqCst), 0);
    assert_eq!(remover.calls.load(Ordering::SeqCst), 0);
    assert!(leftover.exists());
    assert!(project.root().join("installer/old").exists());
    for invocation in project.invocations() {
        assert!(invocation.contains("jpackage-temp-safe-"), "{invocation}");
    }
}

#[tokio::test]
async fn locked_installer_output_is_fatal_but_locked_image_output_is_not() {
    let project = Project::new();
    std::fs::create_dir_all(project.root().join("installer/TradingAnalytics")).unwrap();
    std::fs::create_dir_all(project.root().join("portable/TradingAnalytics")).unwrap();
    let remover = Arc::new(RecordingRemover {
        locked: true,
        ..Default::default()
    });
    let ctx = context_with_evictor(&project, Arc::default(), remover.clone());

    let exe = PackagingTask::new(Format::Exe).run(&ctx).await;
    match exe {
        TaskResult::Failed {
            reason:
                FailureReason::Eviction {
                    path,
                    attempts,
                    remediation,
                },
        } => {
            assert_eq!(path, project.root().join("installer"));
            assert_eq!(attempts, 2);
            assert!(remediation.contains("clean-outputs"));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(project.invocations().is_empty());

    let image = PackagingTask::new(Format::AppImage).run(&ctx).await;
    assert!(matches!(image, TaskResult::Succeeded { .. }), "{image}");
    assert_eq!(project.invocations().len(), 1);
    // Both outputs were attempted for the full budget
    assert_eq!(remover.calls.load(Ordering::SeqCst), 4);
}
