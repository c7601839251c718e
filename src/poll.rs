use crate::api::client::SecurityApi;
use crate::render::snapshot::Presenter;
use crate::ui::Console;
use chrono::Local;
use std::time::Duration;
use tokio::sync::mpsc::Receiver;
use tracing::{debug, error};

/// Fixed-cadence poll loop. The presenter lives here, so timer ticks and
/// command-forced refreshes (arriving on `refresh_rx`) are serialized through
/// one fetch-present-draw path. A failed refresh is logged and the next tick
/// proceeds; there is no backoff and no retry cap.
pub async fn run<T: SecurityApi>(
    api: T,
    console: Console,
    mut refresh_rx: Receiver<()>,
    period: Duration,
) {
    let mut presenter = Presenter::new();
    let mut seq: u64 = 0;
    let mut tick = tokio::time::interval(period);
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = tick.tick() => {
                refresh_once(&api, &console, &mut presenter, &mut seq).await;
            }
            msg = refresh_rx.recv() => match msg {
                Some(()) => refresh_once(&api, &console, &mut presenter, &mut seq).await,
                // all dispatchers gone, nothing will force refreshes anymore
                None => break,
            },
        }
    }
}

pub async fn refresh_once<T: SecurityApi>(
    api: &T,
    console: &Console,
    presenter: &mut Presenter,
    seq: &mut u64,
) {
    *seq += 1;
    let stamp = *seq;
    match api.get_state().await {
        Ok(snapshot) => {
            if let Some(mut outcome) = presenter.apply(stamp, &snapshot) {
                outcome.view.last_ok = Some(Local::now().format("%H:%M:%S").to_string());
                console.draw(&outcome.view);
                if let Some(reason) = outcome.alarm_notice {
                    console.toast(&format!("ALARM ON ({})", reason));
                }
            } else {
                debug!("discarded stale state response (seq {})", stamp);
            }
        }
        Err(e) => {
            error!("state refresh failed: {}", e);
        }
    }
}
