use crate::api::client::{RequestError, SecurityApi};
use crate::api::models::request::RgbRequest;
use crate::config::GrafanaConfig;
use crate::format::parse_hex_color;
use crate::ui::Console;
use tokio::sync::mpsc::Sender;
use tracing::{debug, warn};

pub const REASON_DOOR: &str = "door_unlock>5s";
pub const REASON_MOTION: &str = "motion_when_empty";
pub const REASON_GSG: &str = "gsg_moved";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Arm,
    Disarm,
    StopAlarm,
    Trigger(String),
    People(i64),
    TimerSet(i64),
    TimerAdd,
    TimerConfig(i64),
    Rgb(RgbRequest),
    Pin(String),
    Panel(String),
    Refresh,
    Help,
    Quit,
}

/// Parse one operator line. Numeric arguments fall back instead of failing:
/// timer seconds to 0, the extend increment to 1, an undecodable color to
/// 0,0,0.
pub fn parse_command(line: &str) -> Option<Command> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        ["arm"] => Some(Command::Arm),
        ["disarm"] => Some(Command::Disarm),
        ["stop"] => Some(Command::StopAlarm),
        ["trigger", "door"] => Some(Command::Trigger(REASON_DOOR.to_string())),
        ["trigger", "motion"] => Some(Command::Trigger(REASON_MOTION.to_string())),
        ["trigger", "gsg"] => Some(Command::Trigger(REASON_GSG.to_string())),
        ["in"] => Some(Command::People(1)),
        ["out"] => Some(Command::People(-1)),
        ["timer", "set", rest @ ..] => {
            let seconds = rest.first().and_then(|s| s.parse().ok()).unwrap_or(0);
            Some(Command::TimerSet(seconds))
        }
        ["timer", "add"] => Some(Command::TimerAdd),
        ["timer", "config", rest @ ..] => {
            let n_seconds = rest.first().and_then(|s| s.parse().ok()).unwrap_or(1);
            Some(Command::TimerConfig(n_seconds))
        }
        ["rgb", on_off, rest @ ..] if *on_off == "on" || *on_off == "off" => {
            let (r, g, b) = rest
                .first()
                .and_then(|hex| parse_hex_color(hex))
                .unwrap_or((0, 0, 0));
            Some(Command::Rgb(RgbRequest { on: *on_off == "on", r, g, b }))
        }
        ["pin", value] => Some(Command::Pin(value.to_string())),
        ["panel", id] => Some(Command::Panel(id.to_string())),
        ["refresh"] => Some(Command::Refresh),
        ["help"] | ["?"] => Some(Command::Help),
        ["quit"] | ["exit"] | ["q"] => Some(Command::Quit),
        _ => None,
    }
}

pub const HELP: &str = "\
commands:
  arm | disarm | stop            alarm control (uses the session pin)
  trigger door|motion|gsg        raise an alarm with a fixed reason
  in | out                       occupancy +1 / -1
  timer set <seconds>            set the countdown (blank -> 0)
  timer add                      extend by the configured increment
  timer config <n>               set the extend increment (blank -> 1)
  rgb on|off [#RRGGBB]           apply the RGB indicator
  pin <value>                    change the session pin
  panel <id>                     print the grafana panel url
  refresh                        force a state refresh now
  help | quit";

/// Rebuild the third-party dashboard-panel URL for a sensor selection.
pub fn panel_url(grafana: &GrafanaConfig, panel_id: &str) -> String {
    format!(
        "{}{}?orgId=1&panelId={}&refresh=5s&theme=dark",
        grafana.base_url, grafana.dashboard_path, panel_id
    )
}

/// Binds operator commands to their POST calls. Every successful write is
/// followed by exactly one forced refresh request; a failed write never
/// refreshes and always toasts the failure message.
pub struct Dispatcher<T: SecurityApi> {
    api: T,
    refresh_tx: Sender<()>,
    console: Console,
    grafana: GrafanaConfig,
    pin: String,
}

impl<T: SecurityApi> Dispatcher<T> {
    pub fn new(api: T, refresh_tx: Sender<()>, console: Console, grafana: GrafanaConfig, pin: String) -> Self {
        Self { api, refresh_tx, console, grafana, pin }
    }

    /// Run one command. Returns false when the session should end.
    pub async fn handle(&mut self, command: Command) -> bool {
        debug!("dispatching {:?}", command);
        match command {
            Command::Arm => {
                let result = self.api.arm(&self.pin).await;
                self.finish(result).await;
            }
            Command::Disarm => {
                let result = self.api.disarm(&self.pin).await;
                self.finish(result).await;
            }
            Command::StopAlarm => {
                let result = self.api.stop_alarm(&self.pin).await;
                self.finish(result).await;
            }
            Command::Trigger(reason) => {
                let result = self.api.trigger(&reason).await;
                self.finish(result).await;
            }
            Command::People(delta) => {
                let result = self.api.adjust_people(delta).await;
                self.finish(result).await;
            }
            Command::TimerSet(seconds) => {
                let result = self.api.set_timer(seconds).await;
                self.finish(result).await;
            }
            Command::TimerAdd => {
                let result = self.api.extend_timer().await;
                self.finish(result).await;
            }
            Command::TimerConfig(n_seconds) => {
                let result = self.api.set_timer_increment(n_seconds).await;
                self.finish(result).await;
            }
            Command::Rgb(request) => {
                let result = self.api.set_rgb(&request).await;
                self.finish(result).await;
            }
            Command::Pin(value) => {
                self.pin = value;
                self.console.line("pin updated");
            }
            Command::Panel(id) => {
                self.console.line(&panel_url(&self.grafana, &id));
            }
            Command::Refresh => {
                self.request_refresh().await;
            }
            Command::Help => {
                self.console.line(HELP);
            }
            Command::Quit => return false,
        }
        true
    }

    async fn finish(&self, result: Result<(), RequestError>) {
        match result {
            Ok(()) => self.request_refresh().await,
            Err(e) => {
                warn!("command failed: {}", e);
                self.console.toast(&e.message);
            }
        }
    }

    async fn request_refresh(&self) {
        if self.refresh_tx.send(()).await.is_err() {
            warn!("poll loop is gone, cannot refresh");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::snapshot::Snapshot;
    use crate::ui::test_support::capture;
    use std::sync::{Arc, Mutex};
    use tokio::sync::mpsc;

    #[test]
    fn parses_simple_commands() {
        assert_eq!(parse_command("arm"), Some(Command::Arm));
        assert_eq!(parse_command("  disarm  "), Some(Command::Disarm));
        assert_eq!(parse_command("stop"), Some(Command::StopAlarm));
        assert_eq!(parse_command("in"), Some(Command::People(1)));
        assert_eq!(parse_command("out"), Some(Command::People(-1)));
        assert_eq!(parse_command("timer add"), Some(Command::TimerAdd));
        assert_eq!(parse_command("refresh"), Some(Command::Refresh));
        assert_eq!(parse_command("bogus"), None);
        assert_eq!(parse_command(""), None);
    }

    #[test]
    fn trigger_reasons_are_fixed_strings() {
        assert_eq!(
            parse_command("trigger door"),
            Some(Command::Trigger("door_unlock>5s".to_string()))
        );
        assert_eq!(
            parse_command("trigger motion"),
            Some(Command::Trigger("motion_when_empty".to_string()))
        );
        assert_eq!(
            parse_command("trigger gsg"),
            Some(Command::Trigger("gsg_moved".to_string()))
        );
        assert_eq!(parse_command("trigger"), None);
    }

    #[test]
    fn numeric_arguments_fall_back() {
        assert_eq!(parse_command("timer set 45"), Some(Command::TimerSet(45)));
        assert_eq!(parse_command("timer set"), Some(Command::TimerSet(0)));
        assert_eq!(parse_command("timer set abc"), Some(Command::TimerSet(0)));
        assert_eq!(parse_command("timer config 30"), Some(Command::TimerConfig(30)));
        assert_eq!(parse_command("timer config"), Some(Command::TimerConfig(1)));
    }

    #[test]
    fn rgb_decodes_hex_with_undefined_color_fallback() {
        assert_eq!(
            parse_command("rgb on #ff0010"),
            Some(Command::Rgb(RgbRequest { on: true, r: 255, g: 0, b: 16 }))
        );
        assert_eq!(
            parse_command("rgb off"),
            Some(Command::Rgb(RgbRequest { on: false, r: 0, g: 0, b: 0 }))
        );
        assert_eq!(
            parse_command("rgb on nothex"),
            Some(Command::Rgb(RgbRequest { on: true, r: 0, g: 0, b: 0 }))
        );
    }

    #[test]
    fn panel_url_substitutes_panel_id() {
        let grafana = GrafanaConfig {
            base_url: "http://localhost:3000".to_string(),
            dashboard_path: "/d-solo/iot-dashboard/iot-system-dashboard".to_string(),
        };
        assert_eq!(
            panel_url(&grafana, "4"),
            "http://localhost:3000/d-solo/iot-dashboard/iot-system-dashboard?orgId=1&panelId=4&refresh=5s&theme=dark"
        );
    }

    /// Records calls; every write returns the configured result.
    #[derive(Clone)]
    struct MockApi {
        calls: Arc<Mutex<Vec<String>>>,
        failure: Option<String>,
    }

    impl MockApi {
        fn ok() -> Self {
            Self { calls: Arc::new(Mutex::new(Vec::new())), failure: None }
        }
        fn failing(message: &str) -> Self {
            Self {
                calls: Arc::new(Mutex::new(Vec::new())),
                failure: Some(message.to_string()),
            }
        }
        fn result(&self, call: String) -> Result<(), RequestError> {
            self.calls.lock().unwrap().push(call);
            match &self.failure {
                None => Ok(()),
                Some(message) => Err(RequestError { message: message.clone() }),
            }
        }
    }

    impl SecurityApi for MockApi {
        async fn get_state(&self) -> Result<Snapshot, RequestError> {
            unimplemented!()
        }
        async fn arm(&self, pin: &str) -> Result<(), RequestError> {
            self.result(format!("arm {}", pin))
        }
        async fn disarm(&self, pin: &str) -> Result<(), RequestError> {
            self.result(format!("disarm {}", pin))
        }
        async fn stop_alarm(&self, pin: &str) -> Result<(), RequestError> {
            self.result(format!("stop {}", pin))
        }
        async fn trigger(&self, reason: &str) -> Result<(), RequestError> {
            self.result(format!("trigger {}", reason))
        }
        async fn adjust_people(&self, delta: i64) -> Result<(), RequestError> {
            self.result(format!("people {}", delta))
        }
        async fn set_timer(&self, seconds: i64) -> Result<(), RequestError> {
            self.result(format!("timer/set {}", seconds))
        }
        async fn extend_timer(&self) -> Result<(), RequestError> {
            self.result("timer/add".to_string())
        }
        async fn set_timer_increment(&self, n_seconds: i64) -> Result<(), RequestError> {
            self.result(format!("timer/add_config {}", n_seconds))
        }
        async fn set_rgb(&self, request: &RgbRequest) -> Result<(), RequestError> {
            self.result(format!(
                "rgb {} {},{},{}",
                request.on, request.r, request.g, request.b
            ))
        }
    }

    fn grafana() -> GrafanaConfig {
        GrafanaConfig {
            base_url: "http://localhost:3000".to_string(),
            dashboard_path: "/d".to_string(),
        }
    }

    #[tokio::test]
    async fn success_sends_exactly_one_refresh() {
        let api = MockApi::ok();
        let (tx, mut rx) = mpsc::channel(8);
        let (console, buf) = capture();
        let mut dispatcher =
            Dispatcher::new(api.clone(), tx, console, grafana(), "1234".to_string());

        assert!(dispatcher.handle(Command::Arm).await);

        assert_eq!(api.calls.lock().unwrap().as_slice(), ["arm 1234"]);
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
        assert!(buf.text().is_empty());
    }

    #[tokio::test]
    async fn failure_toasts_and_never_refreshes() {
        let api = MockApi::failing("invalid pin");
        let (tx, mut rx) = mpsc::channel(8);
        let (console, buf) = capture();
        let mut dispatcher =
            Dispatcher::new(api.clone(), tx, console, grafana(), "0000".to_string());

        assert!(dispatcher.handle(Command::TimerSet(0)).await);

        assert!(rx.try_recv().is_err());
        assert_eq!(buf.text(), "!! invalid pin\n");
    }

    #[tokio::test]
    async fn pin_command_changes_session_pin() {
        let api = MockApi::ok();
        let (tx, _rx) = mpsc::channel(8);
        let (console, _buf) = capture();
        let mut dispatcher =
            Dispatcher::new(api.clone(), tx, console, grafana(), "1234".to_string());

        dispatcher.handle(Command::Pin("9999".to_string())).await;
        dispatcher.handle(Command::Disarm).await;

        assert_eq!(api.calls.lock().unwrap().last().unwrap(), "disarm 9999");
    }

    #[tokio::test]
    async fn quit_ends_the_session() {
        let api = MockApi::ok();
        let (tx, _rx) = mpsc::channel(8);
        let (console, _buf) = capture();
        let mut dispatcher = Dispatcher::new(api, tx, console, grafana(), String::new());
        assert!(!dispatcher.handle(Command::Quit).await);
    }
}
