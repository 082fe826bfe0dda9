//! Playwright browser automation
//!
//! Each test owns one bridge: a `node` child process hosting a single
//! Playwright browser, context and page. Commands travel as JSON lines on
//! the child's stdin and replies come back on its stdout, matched by id.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command as TokioCommand};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use journeycheck_common::Viewport;

use crate::error::{E2eError, E2eResult};
use crate::locator::Locator;

/// Browser engine a test runs on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
    /// Chromium engine with the `msedge` channel
    Edge,
}

impl Browser {
    pub const ALL: [Browser; 4] = [
        Browser::Chromium,
        Browser::Firefox,
        Browser::Webkit,
        Browser::Edge,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
            Browser::Edge => "edge",
        }
    }

    /// Playwright browser type used to launch this browser
    fn engine(&self) -> &'static str {
        match self {
            Browser::Chromium | Browser::Edge => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }

    fn channel(&self) -> Option<&'static str> {
        match self {
            Browser::Edge => Some("msedge"),
            _ => None,
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Browser {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Browser::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown browser '{}' (chromium, firefox, webkit, edge)", s))
    }
}

/// A single bridge request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Goto { url: String, timeout_ms: u64 },
    Url,
    SetViewport { width: u32, height: u32 },
    Click { locator: Locator, timeout_ms: u64 },
    Fill { locator: Locator, value: String, timeout_ms: u64 },
    Press { locator: Locator, key: String, timeout_ms: u64 },
    IsVisible { locator: Locator },
    GetAttribute { locator: Locator, name: String, timeout_ms: u64 },
    TextContent { locator: Locator, timeout_ms: u64 },
    Count { locator: Locator },
    Evaluate { expression: String },
    Screenshot { path: PathBuf, full_page: bool },
    /// Stop tracing, close the context and browser. Trace and video are
    /// only kept when `retain_artifacts` is set.
    Close {
        retain_artifacts: bool,
        trace_path: Option<PathBuf>,
    },
}

impl Command {
    /// Short name for logs
    pub fn name(&self) -> String {
        match self {
            Command::Goto { url, .. } => format!("goto:{}", url),
            Command::Url => "url".to_string(),
            Command::SetViewport { width, height } => format!("viewport:{}x{}", width, height),
            Command::Click { locator, .. } => format!("click:{}", locator),
            Command::Fill { locator, .. } => format!("fill:{}", locator),
            Command::Press { locator, key, .. } => format!("press:{}:{}", locator, key),
            Command::IsVisible { locator } => format!("is_visible:{}", locator),
            Command::GetAttribute { locator, name, .. } => format!("attribute:{}@{}", locator, name),
            Command::TextContent { locator, .. } => format!("text:{}", locator),
            Command::Count { locator } => format!("count:{}", locator),
            Command::Evaluate { expression } => {
                format!("evaluate:{}", expression.chars().take(30).collect::<String>())
            }
            Command::Screenshot { path, .. } => format!("screenshot:{}", path.display()),
            Command::Close { .. } => "close".to_string(),
        }
    }

    /// What a timeout on this command was waiting for
    pub fn target(&self) -> String {
        match self {
            Command::Goto { url, .. } => format!("navigation to {}", url),
            Command::Click { locator, .. }
            | Command::Fill { locator, .. }
            | Command::Press { locator, .. }
            | Command::IsVisible { locator }
            | Command::GetAttribute { locator, .. }
            | Command::TextContent { locator, .. }
            | Command::Count { locator } => locator.to_string(),
            other => other.name(),
        }
    }

    /// Timeout Playwright applies to this command, if any
    pub fn timeout_ms(&self) -> Option<u64> {
        match self {
            Command::Goto { timeout_ms, .. }
            | Command::Click { timeout_ms, .. }
            | Command::Fill { timeout_ms, .. }
            | Command::Press { timeout_ms, .. }
            | Command::GetAttribute { timeout_ms, .. }
            | Command::TextContent { timeout_ms, .. } => Some(*timeout_ms),
            _ => None,
        }
    }
}

/// Executes bridge commands against one browser page
#[async_trait]
pub trait Driver: Send + Sync {
    async fn send(&self, command: Command) -> E2eResult<Value>;

    /// Close the browser. Returns the kept video recording, if any.
    async fn close(&self, retain_artifacts: bool, trace_path: Option<&Path>) -> E2eResult<Option<PathBuf>> {
        let value = self
            .send(Command::Close {
                retain_artifacts,
                trace_path: trace_path.map(Path::to_path_buf),
            })
            .await?;
        Ok(video_path(&value))
    }
}

fn video_path(value: &Value) -> Option<PathBuf> {
    value.get("video").and_then(Value::as_str).map(PathBuf::from)
}

/// Starts a browser for one journey
#[async_trait]
pub trait Launcher: Send + Sync {
    async fn launch(&self, browser: Browser, viewport: Viewport, artifact_dir: &Path) -> E2eResult<Arc<dyn Driver>>;
}

/// Launches browsers through the node Playwright bridge
#[derive(Debug, Clone)]
pub struct PlaywrightLauncher {
    config: PlaywrightConfig,
}

impl PlaywrightLauncher {
    pub fn new(config: PlaywrightConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Launcher for PlaywrightLauncher {
    async fn launch(&self, browser: Browser, viewport: Viewport, artifact_dir: &Path) -> E2eResult<Arc<dyn Driver>> {
        let bridge = PlaywrightBridge::launch(&self.config, browser, viewport, artifact_dir).await?;
        Ok(Arc::new(bridge))
    }
}

#[derive(Serialize)]
struct Request<'a> {
    id: u64,
    #[serde(flatten)]
    command: &'a Command,
}

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    id: u64,
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    ready: bool,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl Response {
    fn into_result(self, command: &Command) -> E2eResult<Value> {
        if self.ok {
            return Ok(self.value);
        }
        let message = self.error.unwrap_or_else(|| "unknown bridge error".to_string());
        match (self.kind.as_deref(), command.timeout_ms()) {
            (Some("timeout"), Some(timeout_ms)) => Err(E2eError::Timeout {
                target: command.target(),
                timeout_ms,
            }),
            _ => Err(E2eError::Playwright(format!("{}: {}", command.name(), message))),
        }
    }
}

/// Launch options handed to the bridge script
#[derive(Debug, Serialize)]
struct BridgeOptions<'a> {
    engine: &'a str,
    channel: Option<&'a str>,
    headless: bool,
    viewport_width: u32,
    viewport_height: u32,
    trace: bool,
    video_dir: Option<&'a Path>,
}

struct BridgeIo {
    stdin: ChildStdin,
    lines: Lines<BufReader<ChildStdout>>,
}

/// Handle to a running Playwright bridge
pub struct PlaywrightBridge {
    io: Mutex<BridgeIo>,
    child: Mutex<Child>,
    next_id: AtomicU64,
    /// Extra time allowed beyond a command's own timeout before giving up on the reply
    reply_grace: Duration,
    /// Limit for commands without a Playwright timeout (url, evaluate, close...)
    default_reply_timeout: Duration,
    _script_dir: tempfile::TempDir,
}

impl PlaywrightBridge {
    /// Launch a browser for one test
    pub async fn launch(
        config: &PlaywrightConfig,
        browser: Browser,
        viewport: Viewport,
        artifact_dir: &Path,
    ) -> E2eResult<Self> {
        let script_dir = tempfile::tempdir()?;
        let script_path = script_dir.path().join("bridge.js");
        std::fs::write(&script_path, BRIDGE_SCRIPT)?;

        let video_dir = if config.record_video {
            let dir = artifact_dir.join("video");
            std::fs::create_dir_all(&dir)?;
            Some(dir)
        } else {
            None
        };

        let options = BridgeOptions {
            engine: browser.engine(),
            channel: browser.channel(),
            headless: config.headless,
            viewport_width: viewport.width,
            viewport_height: viewport.height,
            trace: config.record_trace,
            video_dir: video_dir.as_deref(),
        };

        info!("Launching {} ({}) for {}", browser, if config.headless { "headless" } else { "headed" }, viewport.label());

        let mut cmd = TokioCommand::new("node");
        cmd.arg(&script_path)
            .current_dir(&config.work_dir)
            .env(BRIDGE_OPTIONS_VAR, serde_json::to_string(&options)?)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if std::env::var_os("NODE_PATH").is_none() {
            cmd.env("NODE_PATH", config.work_dir.join("node_modules"));
        }

        let mut child = cmd.spawn().map_err(|e| {
            E2eError::Playwright(format!("Failed to spawn node: {}", e))
        })?;

        let stdin = child.stdin.take().ok_or(E2eError::BridgeClosed)?;
        let stdout = child.stdout.take().ok_or(E2eError::BridgeClosed)?;
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!("[bridge] {}", line);
                }
            });
        }

        let bridge = Self {
            io: Mutex::new(BridgeIo {
                stdin,
                lines: BufReader::new(stdout).lines(),
            }),
            child: Mutex::new(child),
            next_id: AtomicU64::new(1),
            reply_grace: config.reply_grace,
            default_reply_timeout: config.navigation_timeout,
            _script_dir: script_dir,
        };

        bridge.wait_for_ready(config.launch_timeout).await?;
        Ok(bridge)
    }

    async fn wait_for_ready(&self, limit: Duration) -> E2eResult<()> {
        let mut io = self.io.lock().await;
        match tokio::time::timeout(limit, read_ready(&mut io)).await {
            Ok(result) => result,
            Err(_) => Err(E2eError::Timeout {
                target: "browser launch".to_string(),
                timeout_ms: limit.as_millis() as u64,
            }),
        }
    }
}

#[async_trait]
impl Driver for PlaywrightBridge {
    async fn send(&self, command: Command) -> E2eResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let limit = command
            .timeout_ms()
            .map(|ms| Duration::from_millis(ms) + self.reply_grace)
            .unwrap_or(self.default_reply_timeout);

        debug!("Executing command #{}: {}", id, command.name());

        let mut io = self.io.lock().await;
        let mut line = serde_json::to_string(&Request { id, command: &command })?;
        line.push('\n');
        io.stdin.write_all(line.as_bytes()).await?;
        io.stdin.flush().await?;

        match tokio::time::timeout(limit, read_reply(&mut io, id, &command)).await {
            Ok(result) => result,
            Err(_) => Err(E2eError::Timeout {
                target: command.target(),
                timeout_ms: limit.as_millis() as u64,
            }),
        }
    }

    async fn close(&self, retain_artifacts: bool, trace_path: Option<&Path>) -> E2eResult<Option<PathBuf>> {
        let value = self
            .send(Command::Close {
                retain_artifacts,
                trace_path: trace_path.map(Path::to_path_buf),
            })
            .await?;

        let mut child = self.child.lock().await;
        match tokio::time::timeout(self.default_reply_timeout, child.wait()).await {
            Ok(status) => debug!("Bridge exited: {}", status?),
            Err(_) => {
                warn!("Bridge did not exit after close, killing it");
                child.kill().await?;
            }
        }

        Ok(video_path(&value))
    }
}

async fn read_ready(io: &mut BridgeIo) -> E2eResult<()> {
    loop {
        let line = io.lines.next_line().await?.ok_or(E2eError::BridgeClosed)?;
        match serde_json::from_str::<Response>(&line) {
            Ok(resp) if resp.ready => return Ok(()),
            Ok(resp) if !resp.ok && resp.error.is_some() => {
                return Err(E2eError::Playwright(format!(
                    "Browser launch failed: {}",
                    resp.error.unwrap_or_default()
                )));
            }
            _ => debug!("Ignoring bridge output before ready: {}", line),
        }
    }
}

async fn read_reply(io: &mut BridgeIo, id: u64, command: &Command) -> E2eResult<Value> {
    loop {
        let line = io.lines.next_line().await?.ok_or(E2eError::BridgeClosed)?;
        match serde_json::from_str::<Response>(&line) {
            Ok(resp) if resp.id == id => return resp.into_result(command),
            // replies to commands abandoned by an earlier timeout
            Ok(resp) => debug!("Discarding stale reply #{}", resp.id),
            Err(_) => debug!("Ignoring bridge output: {}", line),
        }
    }
}

/// Check if Playwright is installed
pub async fn check_playwright_installed() -> E2eResult<()> {
    check_installed("npx").await
}

async fn check_installed(npx: &str) -> E2eResult<()> {
    let output = TokioCommand::new(npx)
        .args(["playwright", "--version"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;

    match output {
        Ok(status) if status.success() => Ok(()),
        _ => Err(E2eError::PlaywrightNotFound),
    }
}

/// Configuration for Playwright
#[derive(Debug, Clone)]
pub struct PlaywrightConfig {
    pub headless: bool,
    /// Directory whose `node_modules` provides the `playwright` package
    pub work_dir: PathBuf,
    pub action_timeout: Duration,
    pub navigation_timeout: Duration,
    pub expect_timeout: Duration,
    pub launch_timeout: Duration,
    pub reply_grace: Duration,
    pub record_video: bool,
    pub record_trace: bool,
}

impl Default for PlaywrightConfig {
    fn default() -> Self {
        Self {
            headless: true,
            work_dir: PathBuf::from("."),
            action_timeout: Duration::from_secs(10),
            navigation_timeout: Duration::from_secs(30),
            expect_timeout: Duration::from_secs(5),
            launch_timeout: Duration::from_secs(30),
            reply_grace: Duration::from_secs(2),
            record_video: true,
            record_trace: true,
        }
    }
}

const BRIDGE_OPTIONS_VAR: &str = "JOURNEYCHECK_BRIDGE_OPTIONS";

const BRIDGE_SCRIPT: &str = r#"
const fs = require('fs');
const readline = require('readline');
const playwright = require('playwright');

const opts = JSON.parse(process.env.JOURNEYCHECK_BRIDGE_OPTIONS);

function reply(msg) {
  process.stdout.write(JSON.stringify(msg) + '\n');
}

function resolve(page, locator) {
  let target = page;
  for (const part of locator.parts) {
    target = target.locator(part.selector, part.has_text != null ? { hasText: part.has_text } : undefined);
    if (part.nth != null) target = target.nth(part.nth);
  }
  return target;
}

(async () => {
  let browser;
  try {
    browser = await playwright[opts.engine].launch({
      headless: opts.headless,
      channel: opts.channel || undefined,
    });
  } catch (e) {
    reply({ ok: false, error: String((e && e.message) || e) });
    process.exit(1);
  }

  const viewport = { width: opts.viewport_width, height: opts.viewport_height };
  const contextOptions = { viewport };
  if (opts.video_dir) contextOptions.recordVideo = { dir: opts.video_dir, size: viewport };
  const context = await browser.newContext(contextOptions);
  if (opts.trace) await context.tracing.start({ screenshots: true, snapshots: true });
  const page = await context.newPage();
  reply({ ready: true });

  const handlers = {
    goto: async (c) => { await page.goto(c.url, { timeout: c.timeout_ms }); return null; },
    url: async () => page.url(),
    set_viewport: async (c) => { await page.setViewportSize({ width: c.width, height: c.height }); return null; },
    click: async (c) => { await resolve(page, c.locator).click({ timeout: c.timeout_ms }); return null; },
    fill: async (c) => { await resolve(page, c.locator).fill(c.value, { timeout: c.timeout_ms }); return null; },
    press: async (c) => { await resolve(page, c.locator).press(c.key, { timeout: c.timeout_ms }); return null; },
    is_visible: async (c) => resolve(page, c.locator).isVisible(),
    get_attribute: async (c) => resolve(page, c.locator).getAttribute(c.name, { timeout: c.timeout_ms }),
    text_content: async (c) => resolve(page, c.locator).textContent({ timeout: c.timeout_ms }),
    count: async (c) => resolve(page, c.locator).count(),
    evaluate: async (c) => page.evaluate(c.expression),
    screenshot: async (c) => { await page.screenshot({ path: c.path, fullPage: c.full_page }); return c.path; },
    close: async (c) => {
      const video = page.video();
      if (opts.trace) {
        await context.tracing.stop(c.retain_artifacts && c.trace_path ? { path: c.trace_path } : undefined);
      }
      await context.close();
      let videoPath = null;
      if (video) {
        videoPath = await video.path();
        if (!c.retain_artifacts) {
          fs.rmSync(videoPath, { force: true });
          videoPath = null;
        }
      }
      await browser.close();
      return { video: videoPath };
    },
  };

  const rl = readline.createInterface({ input: process.stdin });
  for await (const line of rl) {
    if (!line.trim()) continue;
    let req;
    try {
      req = JSON.parse(line);
    } catch (e) {
      reply({ id: 0, ok: false, kind: 'error', error: 'bad request: ' + e.message });
      continue;
    }
    const handler = handlers[req.op];
    if (!handler) {
      reply({ id: req.id, ok: false, kind: 'error', error: 'unknown op: ' + req.op });
      continue;
    }
    try {
      const value = await handler(req);
      reply({ id: req.id, ok: true, value: value === undefined ? null : value });
    } catch (e) {
      const kind = e && e.name === 'TimeoutError' ? 'timeout' : 'error';
      reply({ id: req.id, ok: false, kind, error: String((e && e.message) || e) });
    }
    if (req.op === 'close') break;
  }
  process.exit(0);
})().catch((e) => {
  process.stderr.write(String((e && e.stack) || e) + '\n');
  process.exit(1);
});
"#;
