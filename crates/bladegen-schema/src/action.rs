//! Experiment action table
//!
//! Actions name the fault behavior applied (delay, kill, add, ...). Like
//! targets they are matched against an ordered keyword table; the table
//! order is binding and `add` is the fallback.

use serde::{Deserialize, Serialize};

/// Fault behavior applied by an experiment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Inject latency
    Delay,
    /// Drop packets
    Loss,
    /// Generate load
    Load,
    /// Kill a process
    Kill,
    /// Occupy a resource
    Occupy,
    /// Pause execution
    Pause,
    /// Restart a component
    Restart,
    /// Create something new
    Add,
    /// Remove something
    Delete,
    /// Change something in place
    Modify,
}

impl Action {
    /// Action assumed when no keyword matches
    pub const DEFAULT: Action = Action::Add;

    /// Lowercase identifier used in documents and file names
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Delay => "delay",
            Action::Loss => "loss",
            Action::Load => "load",
            Action::Kill => "kill",
            Action::Occupy => "occupy",
            Action::Pause => "pause",
            Action::Restart => "restart",
            Action::Add => "add",
            Action::Delete => "delete",
            Action::Modify => "modify",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered action keyword table. Earlier entries shadow later ones, so
/// `delay` beats `add` when an instruction mentions both.
static KEYWORDS: [(Action, &[&str]); 10] = [
    (Action::Delay, &["延迟", "delay", "慢", "网络延迟"]),
    (Action::Loss, &["丢包", "loss", "丢失"]),
    (Action::Load, &["负载", "load", "满载"]),
    (Action::Kill, &["杀死", "kill", "停止", "终止"]),
    (Action::Occupy, &["占用", "occupy", "使用"]),
    (Action::Pause, &["暂停", "pause"]),
    (Action::Restart, &["重启", "restart", "重新启动"]),
    (Action::Add, &["添加", "创建", "新增", "add", "create"]),
    (Action::Delete, &["删除", "移除", "delete", "remove"]),
    (Action::Modify, &["修改", "更改", "modify", "change"]),
];

/// First action in table order whose keyword set hits the text
#[must_use]
pub fn match_keywords(text: &str) -> Option<Action> {
    let lowered = text.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(action, _)| *action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_beats_add() {
        // "创建" alone would be add, but delay is earlier in the table.
        assert_eq!(match_keywords("创建网络延迟"), Some(Action::Delay));
    }

    #[test]
    fn load_from_chinese() {
        assert_eq!(match_keywords("创建 CPU 负载"), Some(Action::Load));
    }

    #[test]
    fn stop_maps_to_kill() {
        assert_eq!(match_keywords("停止 nginx 服务"), Some(Action::Kill));
    }

    #[test]
    fn english_keywords() {
        assert_eq!(match_keywords("PAUSE the container"), Some(Action::Pause));
        assert_eq!(match_keywords("remove that file"), Some(Action::Delete));
    }

    #[test]
    fn no_hit_returns_none() {
        assert_eq!(match_keywords("毫无动作可言"), None);
        assert_eq!(Action::DEFAULT, Action::Add);
    }
}
