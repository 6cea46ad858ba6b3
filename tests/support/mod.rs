// ABOUTME: Shared test support: scripted couriers, fake actions, and builders.
// ABOUTME: The courier mock records every call in a cross-foundation log.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use convoy::config::{Config, EnvValue, Environment};
use convoy::courier::{Courier, CourierError, CourierFactory, CourierResult};
use convoy::deploy::{Action, ActionCreator, DeployError, DeploymentInfo};
use convoy::events::EventData;
use convoy::types::{AppName, Authorization, CfContext, DeploymentId, FoundationUrl};
use nonempty::NonEmpty;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

// =============================================================================
// Builders
// =============================================================================

pub fn foundation(url: &str) -> FoundationUrl {
    FoundationUrl::new(url).unwrap()
}

pub fn environment(name: &str, domain: Option<&str>, foundations: &[&str]) -> Environment {
    let urls: Vec<FoundationUrl> = foundations.iter().map(|f| foundation(f)).collect();
    Environment {
        name: name.to_string(),
        domain: domain.map(str::to_string),
        skip_ssl: false,
        authenticate: false,
        enable_rollback: true,
        instances: 1,
        foundations: NonEmpty::from_vec(urls).expect("test environment needs foundations"),
        custom_params: HashMap::new(),
    }
}

pub fn context(app: &str, environment: &str) -> CfContext {
    CfContext {
        organization: "retail".to_string(),
        space: "production".to_string(),
        application: AppName::new(app).unwrap(),
        environment: environment.to_string(),
    }
}

pub fn deployment_info(app: &str, env: &Environment) -> DeploymentInfo {
    DeploymentInfo::new(
        &context(app, &env.name),
        env,
        &Authorization::new("deployer", "secret"),
        DeploymentId::new(),
        EventData::new(),
    )
}

pub fn config_with(env: Environment) -> Config {
    Config {
        username: Some(EnvValue::Literal("default-user".to_string())),
        password: Some(EnvValue::Literal("default-pass".to_string())),
        command_timeout: Duration::from_secs(60),
        environments: vec![env],
    }
}

// =============================================================================
// Scripted courier
// =============================================================================

/// Global call log shared by every courier of one test, so tests can
/// assert cross-foundation ordering.
#[derive(Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, foundation: &FoundationUrl, entry: String) {
        self.entries.lock().push(format!("{foundation} {entry}"));
    }

    /// Every call, in time order, as "<foundation> <command...>".
    pub fn calls(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    /// Calls made against one foundation, foundation prefix stripped.
    pub fn calls_for(&self, foundation: &str) -> Vec<String> {
        let prefix = format!("{foundation} ");
        self.entries
            .lock()
            .iter()
            .filter_map(|e| e.strip_prefix(&prefix).map(str::to_string))
            .collect()
    }
}

/// Per-foundation behavior of the scripted courier.
#[derive(Clone, Default)]
pub struct CourierScript {
    /// Whether the original application already exists.
    pub app_exists: bool,
    pub fail_login: bool,
    pub fail_push: bool,
    pub fail_logs: bool,
    pub fail_delete: bool,
    pub fail_rename: bool,
    pub fail_map_route: bool,
    pub fail_unmap_route: bool,
    pub fail_start: bool,
    pub fail_stop: bool,
    pub fail_clean_up: bool,
}

pub struct MockCourier {
    foundation: FoundationUrl,
    script: CourierScript,
    log: CallLog,
}

impl MockCourier {
    fn respond(&self, entry: String, fail: bool) -> CourierResult {
        self.log.record(&self.foundation, entry.clone());
        if fail {
            Err(CourierError::with_output(
                entry.split_whitespace().next().unwrap_or_default(),
                "exit status 1",
                Bytes::from(format!("[{}] {entry} failed\n", self.foundation)),
            ))
        } else {
            Ok(Bytes::from(format!("[{}] {entry} ok\n", self.foundation)))
        }
    }
}

#[async_trait]
impl Courier for MockCourier {
    async fn login(
        &self,
        _url: &FoundationUrl,
        username: &str,
        _password: &str,
        _organization: &str,
        _space: &str,
        _skip_ssl: bool,
    ) -> CourierResult {
        self.respond(format!("login {username}"), self.script.fail_login)
    }

    async fn push(
        &self,
        name: &str,
        _path: &Path,
        hostname: &str,
        instances: u16,
    ) -> CourierResult {
        self.respond(
            format!("push {name} hostname={hostname} instances={instances}"),
            self.script.fail_push,
        )
    }

    async fn rename(&self, from: &str, to: &str) -> CourierResult {
        self.respond(format!("rename {from} {to}"), self.script.fail_rename)
    }

    async fn delete(&self, name: &str) -> CourierResult {
        self.respond(format!("delete {name}"), self.script.fail_delete)
    }

    async fn map_route(&self, name: &str, domain: &str, hostname: &str) -> CourierResult {
        self.respond(
            format!("map-route {name} {domain} {hostname}"),
            self.script.fail_map_route,
        )
    }

    async fn unmap_route(&self, name: &str, domain: &str, hostname: &str) -> CourierResult {
        self.respond(
            format!("unmap-route {name} {domain} {hostname}"),
            self.script.fail_unmap_route,
        )
    }

    async fn exists(&self, name: &str) -> bool {
        self.log
            .record(&self.foundation, format!("exists {name}"));
        self.script.app_exists
    }

    async fn logs(&self, name: &str) -> CourierResult {
        self.respond(format!("logs {name}"), self.script.fail_logs)
    }

    async fn start(&self, name: &str) -> CourierResult {
        self.respond(format!("start {name}"), self.script.fail_start)
    }

    async fn stop(&self, name: &str) -> CourierResult {
        self.respond(format!("stop {name}"), self.script.fail_stop)
    }

    async fn clean_up(&self) -> CourierResult {
        self.respond("clean-up".to_string(), self.script.fail_clean_up)
    }
}

/// Factory handing out scripted couriers per foundation.
#[derive(Default)]
pub struct MockCourierFactory {
    scripts: Mutex<HashMap<String, CourierScript>>,
    default_script: CourierScript,
    pub log: CallLog,
}

impl MockCourierFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_script(default_script: CourierScript) -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            default_script,
            log: CallLog::new(),
        }
    }

    pub fn script_for(&self, foundation: &str, script: CourierScript) {
        self.scripts.lock().insert(foundation.to_string(), script);
    }
}

impl CourierFactory for MockCourierFactory {
    fn session(&self, foundation: &FoundationUrl) -> Result<Box<dyn Courier>, CourierError> {
        let script = self
            .scripts
            .lock()
            .get(foundation.as_str())
            .cloned()
            .unwrap_or_else(|| self.default_script.clone());
        Ok(Box::new(MockCourier {
            foundation: foundation.clone(),
            script,
            log: self.log.clone(),
        }))
    }
}

// =============================================================================
// Fake actions for coordinator tests
// =============================================================================

/// An Action that records phase entries into a shared log and fails on
/// the scripted phase.
pub struct FakeAction {
    label: String,
    fail_phase: Option<&'static str>,
    log: Arc<Mutex<Vec<String>>>,
}

impl FakeAction {
    fn enter(&self, phase: &'static str) -> Result<(), DeployError> {
        self.log.lock().push(format!("{}:{phase}", self.label));
        if self.fail_phase == Some(phase) {
            Err(DeployError::Push {
                app_name: self.label.clone(),
                source: CourierError::new(phase, "scripted failure"),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Action for FakeAction {
    async fn verify(&mut self) -> Result<(), DeployError> {
        self.enter("verify")
    }

    async fn initially(&mut self) -> Result<(), DeployError> {
        self.enter("initially")
    }

    async fn execute(&mut self) -> Result<(), DeployError> {
        self.enter("execute")
    }

    async fn success(&mut self) -> Result<(), DeployError> {
        self.enter("success")
    }

    async fn undo(&mut self) -> Result<(), DeployError> {
        self.enter("undo")
    }

    async fn finally(&mut self) -> Result<(), DeployError> {
        self.enter("finally")
    }
}

/// Creator minting [`FakeAction`]s keyed by foundation URL.
pub struct FakeCreator {
    pub phase_log: Arc<Mutex<Vec<String>>>,
    fail_phases: HashMap<String, &'static str>,
    fail_setup: bool,
    fail_create_for: Option<String>,
    pub setup_calls: Mutex<u32>,
    pub teardown_calls: Mutex<u32>,
}

impl FakeCreator {
    pub fn new() -> Self {
        Self {
            phase_log: Arc::new(Mutex::new(Vec::new())),
            fail_phases: HashMap::new(),
            fail_setup: false,
            fail_create_for: None,
            setup_calls: Mutex::new(0),
            teardown_calls: Mutex::new(0),
        }
    }

    /// Make the action for `foundation` fail in `phase`.
    pub fn fail_in(mut self, foundation: &str, phase: &'static str) -> Self {
        self.fail_phases.insert(foundation.to_string(), phase);
        self
    }

    pub fn fail_setup(mut self) -> Self {
        self.fail_setup = true;
        self
    }

    pub fn fail_create_for(mut self, foundation: &str) -> Self {
        self.fail_create_for = Some(foundation.to_string());
        self
    }

    /// Phase entries in time order, as "<foundation>:<phase>".
    pub fn phases(&self) -> Vec<String> {
        self.phase_log.lock().clone()
    }

    pub fn count(&self, phase: &str) -> usize {
        self.phases()
            .iter()
            .filter(|e| e.ends_with(&format!(":{phase}")))
            .count()
    }
}

impl Default for FakeCreator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActionCreator for FakeCreator {
    async fn setup(&mut self) -> Result<(), DeployError> {
        *self.setup_calls.lock() += 1;
        if self.fail_setup {
            Err(DeployError::Fetch(
                std::io::Error::other("scripted setup failure").into(),
            ))
        } else {
            Ok(())
        }
    }

    fn create(&self, foundation: &FoundationUrl) -> Result<Box<dyn Action>, DeployError> {
        if self.fail_create_for.as_deref() == Some(foundation.as_str()) {
            return Err(DeployError::Session {
                foundation: foundation.clone(),
                source: CourierError::new("session", "scripted create failure"),
            });
        }
        Ok(Box::new(FakeAction {
            label: foundation.to_string(),
            fail_phase: self.fail_phases.get(foundation.as_str()).copied(),
            log: self.phase_log.clone(),
        }))
    }

    fn teardown(&mut self) {
        *self.teardown_calls.lock() += 1;
    }
}
