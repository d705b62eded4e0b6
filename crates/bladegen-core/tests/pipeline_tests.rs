//! End-to-end pipeline tests: instruction text in, document out.
//!
//! Probes and backends are the deterministic fakes from
//! bladegen-test-utils; nothing here touches kubectl or the network.

use std::sync::Arc;

use pretty_assertions::assert_eq;

use bladegen_core::{
    Action, BackendConfig, ExperimentGenerator, GeneratorConfig, ParsedIntent, Scope, Target,
};
use bladegen_schema::ParamValue;
use bladegen_test_utils::{
    scripted_params, FakeBackend, FakeProbe, CONTAINER_LOAD_INSTRUCTION, HOST_KILL_INSTRUCTION,
    NODE_FILE_INSTRUCTION, POD_DELAY_INSTRUCTION,
};

fn offline_generator() -> ExperimentGenerator {
    ExperimentGenerator::with_probe(GeneratorConfig::new(), Arc::new(FakeProbe::empty()))
}

fn cluster_generator() -> ExperimentGenerator {
    ExperimentGenerator::with_probe(GeneratorConfig::new(), Arc::new(FakeProbe::full_cluster()))
}

#[tokio::test]
async fn node_file_instruction_end_to_end() {
    let report = offline_generator().generate(NODE_FILE_INSTRUCTION).await;

    assert_eq!(report.intent.scope, Scope::Node);
    assert_eq!(report.intent.target, Target::File);
    assert_eq!(report.intent.action, Action::Add);
    assert!((report.intent.confidence - 0.7).abs() < 1e-9);

    assert!(report.outcome.is_valid);
    assert!(report.succeeded());
    assert_eq!(
        report.document.content,
        "apiVersion: chaosblade.io/v1alpha1\n\
         kind: ChaosBlade\n\
         metadata:\n\
         \x20 name: node-file-add\n\
         spec:\n\
         \x20 experiments:\n\
         \x20 - scope: node\n\
         \x20   target: file\n\
         \x20   action: add\n\
         \x20   desc: node-scope file add experiment\n\
         \x20   matchers:\n\
         \x20   - name: names\n\
         \x20     value:\n\
         \x20     - node-1\n\
         \x20   flags:\n\
         \x20   - name: filepath\n\
         \x20     value: /root/test.log\n\
         \x20   - name: content\n\
         \x20     value: hello world\n\
         \x20   - name: timeout\n\
         \x20     value: 300s\n"
    );
}

#[tokio::test]
async fn pod_delay_instruction_uses_detected_namespace() {
    let report = cluster_generator().generate(POD_DELAY_INSTRUCTION).await;

    assert_eq!(report.intent.scope, Scope::Pod);
    assert_eq!(report.intent.target, Target::Network);
    assert_eq!(report.intent.action, Action::Delay);
    assert!((report.intent.confidence - 1.0).abs() < 1e-9);
    assert!(report
        .intent
        .warnings
        .iter()
        .any(|w| w == "missing required parameter: namespace"));

    assert!(report.outcome.is_valid);
    assert_eq!(
        report.document.content,
        "apiVersion: chaosblade.io/v1alpha1\n\
         kind: ChaosBlade\n\
         metadata:\n\
         \x20 name: pod-network-delay\n\
         \x20 namespace: default\n\
         spec:\n\
         \x20 experiments:\n\
         \x20 - scope: pod\n\
         \x20   target: network\n\
         \x20   action: delay\n\
         \x20   desc: pod-scope network delay experiment\n\
         \x20   matchers:\n\
         \x20   - name: names\n\
         \x20     value:\n\
         \x20     - Pod\n\
         \x20   - name: namespace\n\
         \x20     value:\n\
         \x20     - default\n\
         \x20   flags:\n\
         \x20   - name: delay\n\
         \x20     value: '100'\n\
         \x20   - name: interface\n\
         \x20     value: eth0\n\
         \x20   - name: timeout\n\
         \x20     value: 300s\n"
    );
}

#[tokio::test]
async fn pod_delay_without_interface_extracts_the_first_token() {
    let report = cluster_generator()
        .generate("在 Pod nginx-pod 上创建网络延迟，延迟 100ms")
        .await;

    assert_eq!(report.intent.scope, Scope::Pod);
    assert_eq!(report.intent.target, Target::Network);
    assert_eq!(report.intent.action, Action::Delay);

    // nginx-pod has no generated-style suffix, so name extraction falls
    // back to the first ASCII token.
    assert_eq!(
        report.intent.parameters.get("names"),
        Some(&ParamValue::list(vec!["Pod"]))
    );
    assert_eq!(
        report.intent.parameters.get("delay"),
        Some(&ParamValue::scalar("100"))
    );

    assert!(report.succeeded());
    assert!(report.document.content.contains("value: '100'"));
    assert!(!report.document.content.contains("interface"));
}

#[tokio::test]
async fn container_load_offline_is_auto_repaired() {
    let report = offline_generator()
        .generate(CONTAINER_LOAD_INSTRUCTION)
        .await;

    assert_eq!(report.intent.scope, Scope::Container);
    assert_eq!(report.intent.target, Target::Cpu);
    assert_eq!(report.intent.action, Action::Load);

    // Nothing to detect offline, so the repair defaults kick in.
    assert!(report.outcome.is_valid);
    assert!(report
        .document
        .warnings
        .iter()
        .any(|w| w == "auto-repaired some invalid or missing parameters"));
    assert!(report.document.content.contains("- name: namespace"));
    assert!(report.document.content.contains("- default"));
    assert!(report.document.content.contains("- name: container-names"));
    assert!(report.document.content.contains("- main"));
    assert!(report.document.content.contains("- name: load"));
    assert!(report.document.content.contains("value: '60'"));
}

#[tokio::test]
async fn container_load_on_cluster_uses_detected_containers() {
    let report = cluster_generator()
        .generate(CONTAINER_LOAD_INSTRUCTION)
        .await;

    assert!(report.outcome.is_valid);
    assert!(report.document.content.contains("- name: container-names"));
    assert!(report.document.content.contains("- app"));
    assert!(!report
        .document
        .warnings
        .iter()
        .any(|w| w.contains("auto-repaired")));
}

#[tokio::test]
async fn host_kill_instruction_end_to_end() {
    let report = offline_generator().generate(HOST_KILL_INSTRUCTION).await;

    assert_eq!(report.intent.scope, Scope::Host);
    assert_eq!(report.intent.target, Target::Process);
    assert_eq!(report.intent.action, Action::Kill);

    assert!(report.outcome.is_valid);
    assert_eq!(
        report.document.content,
        "apiVersion: chaosblade.io/v1alpha1\n\
         kind: ChaosBlade\n\
         metadata:\n\
         \x20 name: host-process-kill\n\
         spec:\n\
         \x20 experiments:\n\
         \x20 - scope: host\n\
         \x20   target: process\n\
         \x20   action: kill\n\
         \x20   desc: host-scope process kill experiment\n\
         \x20   matchers:\n\
         \x20   - name: names\n\
         \x20     value:\n\
         \x20     - 192.168.1.100\n\
         \x20   flags:\n\
         \x20   - name: timeout\n\
         \x20     value: 300s\n"
    );

    // The safe-mode advisory is surfaced exactly once even though two
    // validation passes saw it.
    let safe_mode_warnings = report
        .document
        .warnings
        .iter()
        .filter(|w| w.contains("safe-mode"))
        .count();
    assert_eq!(safe_mode_warnings, 1);
}

#[tokio::test]
async fn unfixable_parameters_fail_generation() {
    // A runtime-scope instruction with no extractable names: nothing
    // can repair that, so the report carries the validation failure.
    let report = offline_generator().generate("在运行时暂停进程").await;

    assert_eq!(report.intent.scope, Scope::Cri);
    assert!(!report.outcome.is_valid);
    assert!(!report.succeeded());
    assert!(report
        .document
        .error
        .as_deref()
        .is_some_and(|e| e.contains("missing required parameters: names")));
    assert!(report.document.content.is_empty());
}

#[tokio::test]
async fn batch_results_preserve_input_order() {
    let instructions = vec![
        HOST_KILL_INSTRUCTION.to_string(),
        NODE_FILE_INSTRUCTION.to_string(),
        POD_DELAY_INSTRUCTION.to_string(),
    ];

    let reports = cluster_generator().generate_many(&instructions).await;

    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0].intent.scope, Scope::Host);
    assert_eq!(reports[1].intent.scope, Scope::Node);
    assert_eq!(reports[2].intent.scope, Scope::Pod);
    assert!(reports.iter().all(bladegen_core::GenerationReport::succeeded));
}

#[tokio::test]
async fn batch_failures_do_not_abort_the_rest() {
    let instructions = vec![
        "在运行时暂停进程".to_string(),
        HOST_KILL_INSTRUCTION.to_string(),
    ];

    let reports = offline_generator().generate_many(&instructions).await;

    assert!(!reports[0].succeeded());
    assert!(reports[1].succeeded());
}

#[tokio::test]
async fn all_scopes_follow_target_support_in_priority_order() {
    let reports = cluster_generator()
        .generate_all_scopes(HOST_KILL_INSTRUCTION)
        .await;

    let scopes: Vec<Scope> = reports.iter().map(|r| r.intent.scope).collect();
    assert_eq!(
        scopes,
        vec![Scope::Node, Scope::Pod, Scope::Container, Scope::Cri, Scope::Host]
    );
    assert!(reports.iter().all(bladegen_core::GenerationReport::succeeded));

    // Each document names its own scope.
    for report in &reports {
        assert!(report
            .document
            .content
            .contains(&format!("name: {}-process-kill", report.intent.scope)));
    }
}

#[tokio::test]
async fn single_scope_targets_render_once() {
    let reports = offline_generator().generate_all_scopes("修改主机时间").await;

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].intent.scope, Scope::Host);
    assert_eq!(reports[0].intent.target, Target::Time);
}

#[tokio::test]
async fn persistence_writes_one_file_per_report() {
    let dir = tempfile::tempdir().unwrap();
    let generator = ExperimentGenerator::with_probe(
        GeneratorConfig::new().with_output_dir(dir.path()),
        Arc::new(FakeProbe::empty()),
    );

    let report = generator.generate(NODE_FILE_INSTRUCTION).await;

    assert!(report.succeeded());
    assert_eq!(report.document.written_paths.len(), 1);
    let path = &report.document.written_paths[0];
    assert!(path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("node-file-add-") && n.ends_with(".yaml")));

    let written = tokio::fs::read_to_string(path).await.unwrap();
    assert_eq!(written, report.document.content);
}

#[tokio::test]
async fn all_scopes_persistence_suffixes_filenames() {
    let dir = tempfile::tempdir().unwrap();
    let generator = ExperimentGenerator::with_probe(
        GeneratorConfig::new().with_output_dir(dir.path()),
        Arc::new(FakeProbe::full_cluster()),
    );

    let reports = generator.generate_all_scopes(HOST_KILL_INSTRUCTION).await;

    for report in &reports {
        let path = &report.document.written_paths[0];
        let suffix = format!("-{}.yaml", report.intent.scope);
        assert!(path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(&suffix)));
        assert!(path.exists());
    }
}

#[tokio::test]
async fn backend_intent_pre_empts_the_rules() {
    let scripted = ParsedIntent {
        name: "scripted-experiment".to_string(),
        scope: Scope::Host,
        candidate_scopes: vec![Scope::Host],
        target: Target::Cpu,
        action: Action::Load,
        parameters: scripted_params(&[("names", &["10.0.0.9"]), ("load", &["80"])]),
        description: "host-scope cpu load experiment".to_string(),
        confidence: 0.95,
        warnings: Vec::new(),
    };

    let generator = offline_generator().with_backend(Arc::new(FakeBackend::answering(scripted)));
    let report = generator.generate("whatever the user typed").await;

    assert_eq!(report.intent.name, "scripted-experiment");
    assert_eq!(report.intent.target, Target::Cpu);
    assert!(report.document.content.contains("value: '80'"));
}

#[tokio::test]
async fn declining_backend_falls_back_to_rules() {
    let generator = offline_generator().with_backend(Arc::new(FakeBackend::declining()));
    let report = generator.generate(HOST_KILL_INSTRUCTION).await;

    assert_eq!(report.intent.scope, Scope::Host);
    assert_eq!(report.intent.target, Target::Process);
    assert!(report.succeeded());
}

#[tokio::test]
async fn backend_settings_alone_do_not_replace_the_rules() {
    let config =
        GeneratorConfig::new().with_backend(BackendConfig::default().with_model("llama3:8b"));
    let generator = ExperimentGenerator::with_probe(config, Arc::new(FakeProbe::empty()));

    let report = generator.generate(HOST_KILL_INSTRUCTION).await;

    assert_eq!(report.intent.scope, Scope::Host);
    assert_eq!(report.intent.target, Target::Process);
    assert!(report.succeeded());
}

#[tokio::test]
async fn reports_serialize_to_json() {
    let report = offline_generator().generate(HOST_KILL_INSTRUCTION).await;

    let encoded = serde_json::to_value(&report).unwrap();
    assert_eq!(encoded["intent"]["scope"], "host");
    assert_eq!(encoded["outcome"]["is_valid"], true);
    assert_eq!(encoded["document"]["success"], true);
}
