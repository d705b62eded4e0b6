//! Rule-based instruction classifier.
//!
//! Turns one free-form instruction (Chinese, English, or mixed) into a
//! [`ParsedIntent`] by matching keyword tables and a fixed bank of
//! extraction patterns. The classifier is pure: same text in, same
//! intent out (modulo the timestamp suffix in the generated name).
//!
//! Resolution order:
//! - scope: first keyword hit in priority order, default `host`
//! - target: first keyword hit in declaration order, default `file`
//! - action: first keyword hit in declaration order, default `add`
//! - parameters: fixed extraction order so the output map is stable

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;

use bladegen_schema::{
    action, rule_for, Action, ParamMap, ParamValue, Scope, ScopeCatalog, Target, TargetCatalog,
};

use crate::intent::ParsedIntent;

/// Absolute file path; charset-bounded so trailing CJK punctuation is
/// not swallowed into the path.
static FILEPATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/[A-Za-z0-9._/-]+").expect("extraction patterns are constants"));

/// `内容为 hello world` / `内容是 "hello"`, capturing to end of text.
static CONTENT_CN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"内容[为是]\s*["']?(.+?)["']?\s*$"#).expect("extraction patterns are constants")
});

/// `content is "hello"` / `content: hello`, capturing to end of text.
static CONTENT_EN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)content\s*(?:is|:)?\s*["']?(.+?)["']?\s*$"#)
        .expect("extraction patterns are constants")
});

static DELAY_CN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"延迟\D*(\d+)").expect("extraction patterns are constants"));

static DELAY_EN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"delay\D*(\d+)").expect("extraction patterns are constants"));

static LOAD_CN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"负载\D*(\d+)").expect("extraction patterns are constants"));

static LOAD_EN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"load\D*(\d+)").expect("extraction patterns are constants"));

static IFACE_CN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"网卡\s+(\w+)").expect("extraction patterns are constants"));

static IFACE_EN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"interface\s+(\w+)").expect("extraction patterns are constants"));

static NAMESPACE_CN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"命名空间[为是]?\s*["']?([a-zA-Z0-9-]+)["']?"#)
        .expect("extraction patterns are constants")
});

static NAMESPACE_EN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)namespace\s*(?:is|:)?\s*["']?([a-zA-Z0-9-]+)["']?"#)
        .expect("extraction patterns are constants")
});

/// Dotted quad anywhere in the text.
static IPV4_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b").expect("extraction patterns are constants")
});

/// Kubernetes-style generated suffix: `web-app-7f9d8c` and friends.
static SLUG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9-]+-[a-zA-Z0-9]{5,10}").expect("extraction patterns are constants")
});

/// Loosest fallback: first ASCII identifier-ish token.
static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9-]+").expect("extraction patterns are constants"));

/// Keyword and pattern driven classifier with no external dependencies.
///
/// The classifier never rejects an instruction: unresolvable fields fall
/// back to defaults and the uncertainty shows up in [`ParsedIntent::confidence`]
/// and its warnings instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct InstructionClassifier;

impl InstructionClassifier {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Classify one instruction into a structured intent.
    #[must_use]
    pub fn classify(&self, instruction: &str) -> ParsedIntent {
        let text = instruction.trim();
        let lower = text.to_lowercase();

        // 1. Resolve the experiment triple from the keyword catalogs.
        let candidate_scopes = ScopeCatalog::global().match_keywords(text);
        let scope = candidate_scopes.first().copied().unwrap_or(Scope::DEFAULT);
        let target = TargetCatalog::global()
            .match_keywords(text)
            .unwrap_or(Target::DEFAULT);
        let act = action::match_keywords(text).unwrap_or(Action::DEFAULT);

        // 2. Pull out parameters in a fixed order.
        let parameters = self.extract_parameters(text, &lower);

        // 3. Score and annotate.
        let confidence = confidence_for(&parameters, target, act);
        let warnings = warnings_for(scope, &parameters);

        let name = format!(
            "{scope}-{target}-{act}-{}",
            Utc::now().format("%Y%m%d%H%M%S")
        );
        let description = format!("{scope}-scope {target} {act} experiment");

        tracing::debug!(
            scope = %scope,
            target = %target,
            action = %act,
            params = parameters.len(),
            confidence,
            "classified instruction"
        );

        ParsedIntent {
            name,
            scope,
            candidate_scopes,
            target,
            action: act,
            parameters,
            description,
            confidence,
            warnings,
        }
    }

    fn extract_parameters(&self, text: &str, lower: &str) -> ParamMap {
        let mut params = ParamMap::new();

        if let Some(m) = FILEPATH_RE.find(text) {
            params.insert("filepath".to_string(), ParamValue::scalar(m.as_str()));
        }

        let content = CONTENT_CN_RE
            .captures(text)
            .or_else(|| CONTENT_EN_RE.captures(text));
        if let Some(c) = content {
            params.insert("content".to_string(), ParamValue::scalar(&c[1]));
        }

        // A delay figure wins over a load figure when both appear; the
        // two never co-exist in one experiment.
        let delay = DELAY_CN_RE
            .captures(text)
            .or_else(|| DELAY_EN_RE.captures(lower));
        if let Some(d) = delay {
            params.insert("delay".to_string(), ParamValue::scalar(&d[1]));
        } else if let Some(l) = LOAD_CN_RE
            .captures(text)
            .or_else(|| LOAD_EN_RE.captures(lower))
        {
            params.insert("load".to_string(), ParamValue::scalar(&l[1]));
        }

        let iface = IFACE_CN_RE
            .captures(text)
            .or_else(|| IFACE_EN_RE.captures(lower));
        if let Some(i) = iface {
            params.insert("interface".to_string(), ParamValue::scalar(&i[1]));
        }

        let names = extract_names(text);
        if !names.is_empty() {
            params.insert("names".to_string(), ParamValue::list(names));
        }

        let namespace = NAMESPACE_CN_RE
            .captures(text)
            .or_else(|| NAMESPACE_EN_RE.captures(text));
        if let Some(ns) = namespace {
            params.insert("namespace".to_string(), ParamValue::list(vec![&ns[1]]));
        }

        params
    }
}

/// Extract resource names with three fallback tiers: IPv4 addresses,
/// then generated-suffix slugs, then the first bare token. Returns an
/// empty vec only when the text has no ASCII tokens at all.
fn extract_names(text: &str) -> Vec<String> {
    let ips: Vec<String> = IPV4_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();
    if !ips.is_empty() {
        return ips;
    }

    let slugs: Vec<String> = SLUG_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();
    if !slugs.is_empty() {
        return slugs;
    }

    TOKEN_RE
        .find(text)
        .map(|m| vec![m.as_str().to_string()])
        .unwrap_or_default()
}

/// Confidence score: 0.5 base, +0.2 when any parameter was extracted,
/// +0.2 when the target is not the fallback, +0.1 when the action is
/// not the fallback. Clamped to 1.0.
fn confidence_for(parameters: &ParamMap, target: Target, act: Action) -> f64 {
    let mut confidence: f64 = 0.5;
    if !parameters.is_empty() {
        confidence += 0.2;
    }
    if target != Target::DEFAULT {
        confidence += 0.2;
    }
    if act != Action::DEFAULT {
        confidence += 0.1;
    }
    confidence.min(1.0)
}

/// Advisory notes: required parameters the extraction did not find, and
/// a malformed timeout if one slipped in. These are hints for the
/// optimizer stage, not rejections.
fn warnings_for(scope: Scope, parameters: &ParamMap) -> Vec<String> {
    let mut warnings = Vec::new();

    let schema = ScopeCatalog::global().get(scope);
    for required in schema.required_params {
        if !parameters.contains_key(*required) {
            warnings.push(format!("missing required parameter: {required}"));
        }
    }

    if let Some(timeout) = parameters.get("timeout") {
        if let Some(rule) = rule_for("timeout") {
            if rule.check(timeout).is_err() {
                warnings.push(
                    "timeout should be a number with an s/m/h suffix, e.g. 300s".to_string(),
                );
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn classify(text: &str) -> ParsedIntent {
        InstructionClassifier::new().classify(text)
    }

    #[test]
    fn node_file_instruction() {
        let intent = classify("在节点 node-1 上添加文件 /root/test.log，内容为 hello world");

        assert_eq!(intent.scope, Scope::Node);
        assert_eq!(intent.candidate_scopes, vec![Scope::Node]);
        assert_eq!(intent.target, Target::File);
        assert_eq!(intent.action, Action::Add);
        assert_eq!(
            intent.parameters.get("filepath").and_then(|v| v.as_scalar()),
            Some("/root/test.log")
        );
        assert_eq!(
            intent.parameters.get("content").and_then(|v| v.as_scalar()),
            Some("hello world")
        );
        assert_eq!(
            intent.parameters.get("names").and_then(|v| v.as_list()),
            Some(&["node-1".to_string()][..])
        );
        assert!((intent.confidence - 0.7).abs() < 1e-9);
        assert!(intent.warnings.is_empty());
    }

    #[test]
    fn pod_network_delay_instruction() {
        let intent = classify("在 Pod web-app-pod 上创建网络延迟，延迟 100ms，网卡 eth0");

        assert_eq!(intent.scope, Scope::Pod);
        assert_eq!(intent.target, Target::Network);
        assert_eq!(intent.action, Action::Delay);
        assert_eq!(
            intent.parameters.get("delay").and_then(|v| v.as_scalar()),
            Some("100")
        );
        assert_eq!(
            intent.parameters.get("interface").and_then(|v| v.as_scalar()),
            Some("eth0")
        );
        // No slug tier hit ("pod" suffix is too short), so the first
        // bare token wins.
        assert_eq!(
            intent.parameters.get("names").and_then(|v| v.as_list()),
            Some(&["Pod".to_string()][..])
        );
        assert!((intent.confidence - 1.0).abs() < 1e-9);
        assert!(intent
            .warnings
            .iter()
            .any(|w| w == "missing required parameter: namespace"));
    }

    #[test]
    fn container_cpu_load_instruction() {
        let intent = classify("在容器 app-container 中创建 CPU 负载，负载 60%，核心数 2");

        assert_eq!(intent.scope, Scope::Container);
        assert_eq!(intent.target, Target::Cpu);
        assert_eq!(intent.action, Action::Load);
        assert_eq!(
            intent.parameters.get("load").and_then(|v| v.as_scalar()),
            Some("60")
        );
        assert_eq!(
            intent.parameters.get("names").and_then(|v| v.as_list()),
            Some(&["app-container".to_string()][..])
        );
    }

    #[test]
    fn host_process_kill_instruction() {
        let intent = classify("在主机 192.168.1.100 上停止 nginx 服务");

        assert_eq!(intent.scope, Scope::Host);
        assert_eq!(intent.target, Target::Process);
        assert_eq!(intent.action, Action::Kill);
        assert_eq!(
            intent.parameters.get("names").and_then(|v| v.as_list()),
            Some(&["192.168.1.100".to_string()][..])
        );
        assert!((intent.confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn defaults_when_nothing_matches() {
        let intent = classify("随便做点什么");

        assert_eq!(intent.scope, Scope::Host);
        assert!(intent.candidate_scopes.is_empty());
        assert_eq!(intent.target, Target::File);
        assert_eq!(intent.action, Action::Add);
        assert!(intent.parameters.is_empty());
        assert!((intent.confidence - 0.5).abs() < 1e-9);
        assert!(intent
            .warnings
            .iter()
            .any(|w| w == "missing required parameter: names"));
    }

    #[test]
    fn name_carries_triple_and_timestamp() {
        let intent = classify("在节点 node-1 上添加文件 /root/test.log");

        assert!(intent.name.starts_with("node-file-add-"));
        let suffix = &intent.name["node-file-add-".len()..];
        assert_eq!(suffix.len(), 14);
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn delay_wins_over_load() {
        let intent = classify("网络延迟 100ms 且负载 50%");

        assert_eq!(
            intent.parameters.get("delay").and_then(|v| v.as_scalar()),
            Some("100")
        );
        assert!(!intent.parameters.contains_key("load"));
    }

    #[test]
    fn english_instruction() {
        let intent = classify("kill the nginx process on host 10.0.0.5");

        assert_eq!(intent.scope, Scope::Host);
        assert_eq!(intent.target, Target::Process);
        assert_eq!(intent.action, Action::Kill);
        assert_eq!(
            intent.parameters.get("names").and_then(|v| v.as_list()),
            Some(&["10.0.0.5".to_string()][..])
        );
    }

    #[test]
    fn namespace_is_extracted_as_list() {
        let cn = classify("在 Pod web-pod 上杀进程，命名空间为 staging");
        assert_eq!(
            cn.parameters.get("namespace").and_then(|v| v.as_list()),
            Some(&["staging".to_string()][..])
        );

        let en = classify("kill pod process, namespace: staging");
        assert_eq!(
            en.parameters.get("namespace").and_then(|v| v.as_list()),
            Some(&["staging".to_string()][..])
        );
    }

    #[test]
    fn name_extraction_tiers() {
        assert_eq!(
            extract_names("主机 192.168.1.1 和 10.0.0.2"),
            vec!["192.168.1.1", "10.0.0.2"]
        );
        assert_eq!(extract_names("pod nginx-7f9d8c 异常"), vec!["nginx-7f9d8c"]);
        assert_eq!(extract_names("在 server 上"), vec!["server"]);
        assert!(extract_names("纯中文没有名字").is_empty());
    }

    #[test]
    fn slug_tier_requires_generated_suffix() {
        // "node-1" has a one-character tail, below the generated-suffix
        // minimum, so it is found by the bare-token tier instead.
        assert_eq!(extract_names("节点 node-1 异常"), vec!["node-1"]);
    }

    #[test]
    fn timeout_warning_on_bad_format() {
        let mut params = ParamMap::new();
        params.insert("timeout".to_string(), ParamValue::scalar("300"));
        let warnings = warnings_for(Scope::Pod, &params);
        assert!(warnings.iter().any(|w| w.contains("timeout")));

        let mut ok = ParamMap::new();
        ok.insert("timeout".to_string(), ParamValue::scalar("300s"));
        let warnings = warnings_for(Scope::Pod, &ok);
        assert!(!warnings.iter().any(|w| w.contains("timeout")));
    }

    #[test]
    fn multiple_scope_candidates_keep_priority_order() {
        let intent = classify("在节点 node-1 的容器里杀进程");
        assert_eq!(intent.scope, Scope::Node);
        assert_eq!(intent.candidate_scopes, vec![Scope::Node, Scope::Container]);
    }

    proptest! {
        #[test]
        fn confidence_stays_in_range(text in ".{0,120}") {
            let intent = classify(&text);
            prop_assert!(intent.confidence >= 0.5);
            prop_assert!(intent.confidence <= 1.0);
        }

        #[test]
        fn ipv4_tier_is_exact_and_ordered(a in 1u8..=254, b in 0u8..=254, c in 1u8..=254) {
            let text = format!("主机 {a}.{b}.{c}.1 和 {a}.{b}.{c}.2 故障");
            let names = extract_names(&text);
            prop_assert_eq!(names, vec![
                format!("{a}.{b}.{c}.1"),
                format!("{a}.{b}.{c}.2"),
            ]);
        }
    }
}
