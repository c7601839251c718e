use crate::render::snapshot::DashboardView;
use std::io::Write;
use std::sync::{Arc, Mutex};

const CLEAR: &str = "\x1b[2J\x1b[H";

struct ConsoleInner {
    out: Box<dyn Write + Send>,
    clear_screen: bool,
    last_view: Option<DashboardView>,
}

/// Shared console handle. The lock keeps dashboard redraws and toasts from
/// the poll task and the dispatcher from interleaving mid-line.
#[derive(Clone)]
pub struct Console {
    inner: Arc<Mutex<ConsoleInner>>,
}

impl Console {
    pub fn stdout() -> Self {
        Self::with_writer(Box::new(std::io::stdout()), true)
    }

    pub fn with_writer(out: Box<dyn Write + Send>, clear_screen: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ConsoleInner {
                out,
                clear_screen,
                last_view: None,
            })),
        }
    }

    /// Redraw the whole dashboard block. Every field is overwritten from the
    /// view; there is no incremental merge. A view whose content matches the
    /// last drawn one (staleness stamp aside) is skipped entirely.
    pub fn draw(&self, view: &DashboardView) {
        let mut inner = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let key = DashboardView {
            last_ok: None,
            ..view.clone()
        };
        if inner.last_view.as_ref() == Some(&key) {
            return;
        }
        inner.last_view = Some(key);
        if inner.clear_screen {
            let _ = write!(inner.out, "{}", CLEAR);
        }
        let _ = writeln!(inner.out, "== Security Console ==");
        let _ = writeln!(inner.out, "armed:   {}", view.armed);
        let _ = writeln!(inner.out, "alarm:   {}", view.alarm);
        let _ = writeln!(inner.out, "reason:  {}", view.reason);
        let _ = writeln!(inner.out, "people:  {}", view.people);
        let _ = writeln!(inner.out, "timer:   {}  (extend step: {})", view.timer, view.add_seconds);
        let _ = writeln!(inner.out, "rgb:     {}", view.rgb);
        let _ = writeln!(inner.out, "updated: {}", view.updated);
        let _ = writeln!(inner.out, "-- devices --");
        for row in &view.devices {
            if row.timestamp.is_empty() && row.value.is_empty() {
                let _ = writeln!(inner.out, "{}", row.name);
            } else {
                let _ = writeln!(inner.out, "{} [{}]  {}", row.name, row.timestamp, row.value);
            }
        }
        let _ = writeln!(
            inner.out,
            "last ok: {}",
            view.last_ok.as_deref().unwrap_or("never")
        );
        let _ = inner.out.flush();
    }

    /// Transient one-line notification; the next redraw sweeps it away.
    pub fn toast(&self, msg: &str) {
        let mut inner = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let _ = writeln!(inner.out, "!! {}", msg);
        let _ = inner.out.flush();
    }

    pub fn line(&self, msg: &str) {
        let mut inner = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let _ = writeln!(inner.out, "{}", msg);
        let _ = inner.out.flush();
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::capture;
    use crate::render::devices::DeviceRow;
    use crate::render::snapshot::DashboardView;

    fn view() -> DashboardView {
        DashboardView {
            armed: "ON".into(),
            alarm: "OFF".into(),
            reason: "-".into(),
            people: "2".into(),
            timer: "-".into(),
            rgb: "-".into(),
            updated: "2023-11-14 23:13:20".into(),
            add_seconds: "-".into(),
            devices: vec![DeviceRow {
                name: "Door (s1)".into(),
                timestamp: "23:13:20".into(),
                value: "open:true, temp:21".into(),
            }],
            last_ok: Some("23:13:21".into()),
        }
    }

    #[test]
    fn draw_writes_every_field() {
        let (console, buf) = capture();
        console.draw(&view());
        let text = buf.text();
        assert!(text.contains("armed:   ON"));
        assert!(text.contains("alarm:   OFF"));
        assert!(text.contains("people:  2"));
        assert!(text.contains("Door (s1) [23:13:20]  open:true, temp:21"));
        assert!(text.contains("last ok: 23:13:21"));
    }

    #[test]
    fn missing_staleness_stamp_renders_never() {
        let (console, buf) = capture();
        let mut v = view();
        v.last_ok = None;
        console.draw(&v);
        assert!(buf.text().contains("last ok: never"));
    }

    #[test]
    fn unchanged_view_is_drawn_once() {
        let (console, buf) = capture();
        console.draw(&view());
        console.draw(&view());
        assert_eq!(buf.text().matches("== Security Console ==").count(), 1);
    }

    #[test]
    fn fresher_stamp_alone_does_not_force_a_redraw() {
        let (console, buf) = capture();
        console.draw(&view());
        let mut v = view();
        v.last_ok = Some("23:13:22".into());
        console.draw(&v);
        assert_eq!(buf.text().matches("== Security Console ==").count(), 1);
    }

    #[test]
    fn changed_content_is_redrawn() {
        let (console, buf) = capture();
        console.draw(&view());
        let mut v = view();
        v.alarm = "ON".into();
        console.draw(&v);
        assert_eq!(buf.text().matches("== Security Console ==").count(), 2);
    }

    #[test]
    fn toast_is_a_single_marked_line() {
        let (console, buf) = capture();
        console.toast("invalid pin");
        assert_eq!(buf.text(), "!! invalid pin\n");
    }
}
