//! Daemon configuration: actions, webhook handlers and the rules binding them.
use std::{
    collections::{BTreeMap, HashMap, HashSet},
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use actuator_api::{Receiver, WebhookApi};
use actuator_core::{
    CoreError, Dispatcher, LogReaction, Plan, ReactionGroup, ReactionRef, Rule, SinkHandle,
};
use actuator_exec::{CommandReaction, CommandSpec, ExecError};
use actuator_model::LabelSet;
use actuator_observe::LoggerConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("action name is empty")]
    EmptyActionName,

    #[error("duplicate action: {0}")]
    DuplicateAction(String),

    #[error("invalid action {name}: {source}")]
    InvalidAction { name: String, source: ExecError },

    #[error("invalid handler path {0:?}: must start with '/'")]
    InvalidPath(String),

    #[error("duplicate handler path: {0}")]
    DuplicateHandler(String),

    #[error("handler {path} refers to unknown action {action:?}")]
    UnknownAction { path: String, action: String },

    #[error("handler {path} has an invalid rule: {source}")]
    InvalidRule { path: String, source: CoreError },
}

fn default_fail_on_non_zero() -> bool {
    true
}

/// Named reaction.
///
/// An action without a command only logs the alerts it is invoked with.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionConfig {
    pub name: String,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    #[serde(default)]
    pub cwd: Option<PathBuf>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default = "default_fail_on_non_zero")]
    pub fail_on_non_zero: bool,
}

impl ActionConfig {
    fn build(&self) -> Result<ReactionRef, ConfigError> {
        if self.command.trim().is_empty() {
            info!(action = %self.name, "action has no command, and so will just be logged");
            return Ok(Arc::new(LogReaction::new(self.name.clone())));
        }
        let spec = CommandSpec {
            command: self.command.clone(),
            args: self.args.clone(),
            env: self.env.clone(),
            cwd: self.cwd.clone(),
            timeout_ms: self.timeout_ms,
            fail_on_non_zero: self.fail_on_non_zero,
        };
        let reaction = CommandReaction::new(self.name.clone(), spec).map_err(|source| {
            ConfigError::InvalidAction {
                name: self.name.clone(),
                source,
            }
        })?;
        Ok(Arc::new(reaction))
    }
}

/// Label key or value in a rule condition.
///
/// YAML scalars are taken as written, so `{code: 500}` and `{code: "500"}` are the same
/// condition.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(from = "RawScalar")]
pub struct Scalar(String);

impl Scalar {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Text(String),
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
}

impl From<RawScalar> for Scalar {
    fn from(raw: RawScalar) -> Self {
        Self(match raw {
            RawScalar::Text(s) => s,
            RawScalar::Bool(b) => b.to_string(),
            RawScalar::Int(n) => n.to_string(),
            RawScalar::Uint(n) => n.to_string(),
            RawScalar::Float(n) => n.to_string(),
        })
    }
}

/// Rule of a handler: run `do` when the alert carries all labels of any `when` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleConfig {
    /// One label condition per entry; an empty list matches every alert.
    #[serde(default)]
    pub when: Vec<BTreeMap<Scalar, Scalar>>,
    #[serde(rename = "do")]
    pub actions: Vec<String>,
}

/// Webhook endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct HandlerConfig {
    pub path: String,
    /// Bearer token required from Alertmanager, if any.
    #[serde(default)]
    pub token: Option<String>,
    /// Action run for every alert received on this path.
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logger: LoggerConfig,
    /// Deadline for dispatching one payload.
    #[serde(default)]
    pub dispatch_timeout_ms: Option<u64>,
    #[serde(default)]
    pub actions: Vec<ActionConfig>,
    #[serde(default)]
    pub handlers: Vec<HandlerConfig>,
}

impl Config {
    /// Read and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&raw)
    }

    /// Parse and validate config text.
    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        let cfg: Config = serde_yaml::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check cross references and uniqueness.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut actions = HashSet::new();
        for a in &self.actions {
            if a.name.trim().is_empty() {
                return Err(ConfigError::EmptyActionName);
            }
            if !actions.insert(a.name.as_str()) {
                return Err(ConfigError::DuplicateAction(a.name.clone()));
            }
        }

        let mut paths = HashSet::new();
        for h in &self.handlers {
            if !h.path.starts_with('/') {
                return Err(ConfigError::InvalidPath(h.path.clone()));
            }
            if !paths.insert(h.path.as_str()) {
                return Err(ConfigError::DuplicateHandler(h.path.clone()));
            }
            let referenced = h
                .action
                .iter()
                .chain(h.rules.iter().flat_map(|r| r.actions.iter()));
            for name in referenced {
                if !actions.contains(name.as_str()) {
                    return Err(ConfigError::UnknownAction {
                        path: h.path.clone(),
                        action: name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn dispatch_timeout(&self) -> Option<Duration> {
        self.dispatch_timeout_ms.map(Duration::from_millis)
    }

    /// Instantiate every configured action by name.
    pub fn build_actions(&self) -> Result<HashMap<String, ReactionRef>, ConfigError> {
        self.actions
            .iter()
            .map(|a| Ok((a.name.clone(), a.build()?)))
            .collect()
    }

    /// Build the webhook API: one receiver per handler, each over its own plan.
    pub fn build_api(&self, sink: SinkHandle) -> Result<WebhookApi, ConfigError> {
        let actions = self.build_actions()?;
        let mut api = WebhookApi::new();

        for h in &self.handlers {
            let plan = h.build_plan(&actions)?;
            info!(
                path = %h.path,
                rules = plan.len(),
                auth = h.token.is_some(),
                "handler configured"
            );

            let dispatcher = Dispatcher::new(Arc::new(plan)).with_sink(sink.clone());
            let receiver = Receiver::new(dispatcher)
                .with_token(h.token.clone())
                .with_timeout(self.dispatch_timeout());
            api = api.receiver(h.path.clone(), receiver);
        }
        Ok(api)
    }
}

impl HandlerConfig {
    fn build_plan(&self, actions: &HashMap<String, ReactionRef>) -> Result<Plan, ConfigError> {
        let mut plan = Plan::new();

        if let Some(name) = &self.action {
            let group = self.group(actions, std::slice::from_ref(name))?;
            plan.register_set(&LabelSet::new(), group);
        }
        for rule in &self.rules {
            let group = self.group(actions, &rule.actions)?;
            if rule.when.is_empty() {
                plan.register_set(&LabelSet::new(), group);
                continue;
            }
            for condition in &rule.when {
                let rule = Rule::new(
                    condition.iter().map(|(k, v)| (k.as_str(), v.as_str())),
                    group.clone(),
                )
                .map_err(|source| ConfigError::InvalidRule {
                    path: self.path.clone(),
                    source,
                })?;
                debug!(path = %self.path, rule = ?rule, "rule built");
                plan.register(rule);
            }
        }
        Ok(plan)
    }

    fn group(
        &self,
        actions: &HashMap<String, ReactionRef>,
        names: &[String],
    ) -> Result<ReactionGroup, ConfigError> {
        names
            .iter()
            .map(|name| {
                actions
                    .get(name)
                    .cloned()
                    .ok_or_else(|| ConfigError::UnknownAction {
                        path: self.path.clone(),
                        action: name.clone(),
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use actuator_core::noop_sink;
    use actuator_observe::LoggerFormat;

    use super::*;

    const SAMPLE: &str = r#"
logger:
  format: json
  level: debug
dispatch_timeout_ms: 30000
actions:
  - name: restart-web
    command: systemctl restart web
    timeout_ms: 10000
  - name: page
handlers:
  - path: /hooks/web
    token: s3cret
    rules:
      - when:
          - { severity: critical }
          - { service: web, site: west }
        do: [restart-web, page]
  - path: /hooks/all
    action: page
"#;

    fn labels(pairs: &[(&str, &str)]) -> LabelSet {
        LabelSet::from_labels(pairs.iter().copied()).unwrap()
    }

    fn names(plan: &Plan, alert: &[(&str, &str)]) -> Vec<Vec<String>> {
        plan.matches(&labels(alert))
            .iter()
            .map(|g| g.iter().map(|r| r.name().to_string()).collect())
            .collect()
    }

    #[test]
    fn parses_sample() {
        let cfg = Config::from_yaml(SAMPLE).unwrap();

        assert_eq!(cfg.logger.format, LoggerFormat::Json);
        assert_eq!(cfg.dispatch_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(cfg.actions.len(), 2);
        assert!(cfg.actions[1].command.is_empty());
        assert!(cfg.actions[0].fail_on_non_zero);
        assert_eq!(cfg.handlers[0].token.as_deref(), Some("s3cret"));
        assert_eq!(cfg.handlers[0].rules[0].when.len(), 2);
        assert_eq!(cfg.handlers[1].action.as_deref(), Some("page"));
    }

    #[test]
    fn empty_config_is_valid() {
        let cfg = Config::from_yaml("{}").unwrap();
        assert!(cfg.handlers.is_empty());
        assert_eq!(cfg.dispatch_timeout(), None);
    }

    #[test]
    fn each_condition_registers_the_group() {
        let cfg = Config::from_yaml(SAMPLE).unwrap();
        let actions = cfg.build_actions().unwrap();
        let plan = cfg.handlers[0].build_plan(&actions).unwrap();

        assert_eq!(plan.len(), 2);
        assert_eq!(
            names(&plan, &[("severity", "critical"), ("team", "a")]),
            [vec!["restart-web", "page"]]
        );
        assert_eq!(
            names(&plan, &[("site", "west"), ("service", "web")]),
            [vec!["restart-web", "page"]]
        );
        assert!(names(&plan, &[("service", "web")]).is_empty());
    }

    #[test]
    fn conditions_ignore_unrelated_alert_labels() {
        let cfg = Config::from_yaml(SAMPLE).unwrap();
        let actions = cfg.build_actions().unwrap();
        let plan = cfg.handlers[0].build_plan(&actions).unwrap();

        let alert = [
            ("alertname", "InstanceDown"),
            ("instance", "web-1:9100"),
            ("severity", "critical"),
        ];
        assert_eq!(names(&plan, &alert), [vec!["restart-web", "page"]]);
    }

    #[test]
    fn unquoted_scalars_are_label_values() {
        let raw = "actions: [{name: a}]\nhandlers: [{path: /x, rules: [{when: [{code: 500, canary: true}], do: [a]}]}]";
        let cfg = Config::from_yaml(raw).unwrap();
        let actions = cfg.build_actions().unwrap();
        let plan = cfg.handlers[0].build_plan(&actions).unwrap();

        assert_eq!(names(&plan, &[("canary", "true"), ("code", "500")]), [vec!["a"]]);
        assert!(Config::from_yaml(
            "handlers: [{path: /x, rules: [{when: [{code: [1]}], do: []}]}]"
        )
        .is_err());
    }

    #[test]
    fn handler_action_matches_everything() {
        let cfg = Config::from_yaml(SAMPLE).unwrap();
        let actions = cfg.build_actions().unwrap();
        let plan = cfg.handlers[1].build_plan(&actions).unwrap();

        assert_eq!(names(&plan, &[("anything", "goes")]), [vec!["page"]]);
        assert_eq!(names(&plan, &[]), [vec!["page"]]);
    }

    #[test]
    fn builds_api() {
        let cfg = Config::from_yaml(SAMPLE).unwrap();
        let _router = cfg.build_api(noop_sink()).unwrap().router();
    }

    #[test]
    fn rejects_unknown_action() {
        let raw = "actions: [{name: a}]\nhandlers: [{path: /x, rules: [{when: [{a: b}], do: [b]}]}]";
        assert!(matches!(
            Config::from_yaml(raw),
            Err(ConfigError::UnknownAction { ref action, .. }) if action == "b"
        ));

        let raw = "handlers: [{path: /x, action: nope}]";
        assert!(matches!(Config::from_yaml(raw), Err(ConfigError::UnknownAction { .. })));
    }

    #[test]
    fn rejects_duplicates() {
        let raw = "actions: [{name: a}, {name: a}]";
        assert!(matches!(
            Config::from_yaml(raw),
            Err(ConfigError::DuplicateAction(ref n)) if n == "a"
        ));

        let raw = "handlers: [{path: /x}, {path: /x}]";
        assert!(matches!(Config::from_yaml(raw), Err(ConfigError::DuplicateHandler(_))));
    }

    #[test]
    fn rejects_bad_paths_and_names() {
        for raw in ["handlers: [{path: x}]", "handlers: [{path: ''}]"] {
            assert!(matches!(Config::from_yaml(raw), Err(ConfigError::InvalidPath(_))));
        }
        assert!(matches!(
            Config::from_yaml("actions: [{name: ' '}]"),
            Err(ConfigError::EmptyActionName)
        ));
    }

    #[test]
    fn rejects_invalid_command_spec() {
        let cfg = Config::from_yaml("actions: [{name: a, command: 'true', timeout_ms: 0}]").unwrap();
        assert!(matches!(
            cfg.build_actions(),
            Err(ConfigError::InvalidAction { ref name, .. }) if name == "a"
        ));
    }

    #[test]
    fn reports_parse_and_read_errors() {
        assert!(matches!(Config::from_yaml("handlers: 3"), Err(ConfigError::Parse(_))));

        let missing = std::env::temp_dir().join("actuator-agentd-missing-config.yml");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Read { .. })));
    }

    #[test]
    fn loads_from_file() {
        let path = std::env::temp_dir().join(format!("actuator-agentd-{}.yml", std::process::id()));
        std::fs::write(&path, SAMPLE).unwrap();
        let cfg = Config::load(&path);
        let _ = std::fs::remove_file(&path);

        assert_eq!(cfg.unwrap().handlers.len(), 2);
    }
}
