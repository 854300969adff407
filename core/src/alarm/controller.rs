use crate::alarm::envelope::Envelope;
use crate::alarm::output::{Tone, ToneOutput};
use crate::alarm::profile::{AlarmCategory, AlarmProfile};
use crate::alarm::schedule::{schedule_cycle, ScheduledTone};
use crate::clock::Clock;
use crate::prelude::{clamp_volume, AlarmConfig};
use crate::telemetry::{LogManager, MetricsRecorder};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::watch;

/// Observable state of the single alarm a controller owns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlarmSession {
    pub active: bool,
    pub profile: Option<AlarmProfile>,
    pub volume: f32,
    pub muted: bool,
}

/// Pending emissions of the cycle currently sounding.
struct CycleDriver {
    profile: AlarmProfile,
    cycle_start_ms: u64,
    pending: VecDeque<ScheduledTone>,
}

impl CycleDriver {
    fn new(profile: AlarmProfile, cycle_start_ms: u64) -> Self {
        Self {
            profile,
            cycle_start_ms,
            pending: schedule_cycle(&profile, cycle_start_ms).into(),
        }
    }

    /// Rolls forward to the latest cycle that has started by `now_ms`.
    /// Emissions left over from a finished cycle are discarded.
    fn roll(&mut self, now_ms: u64, interval_ms: u64) -> Option<usize> {
        if now_ms < self.cycle_start_ms + interval_ms {
            return None;
        }
        let stale = self.pending.len();
        let elapsed_cycles = (now_ms - self.cycle_start_ms) / interval_ms;
        self.cycle_start_ms += elapsed_cycles * interval_ms;
        self.pending = schedule_cycle(&self.profile, self.cycle_start_ms).into();
        Some(stale)
    }

    fn drain_due(&mut self, now_ms: u64, due: &mut Vec<ScheduledTone>) {
        while self
            .pending
            .front()
            .is_some_and(|tone| tone.at_ms <= now_ms)
        {
            if let Some(tone) = self.pending.pop_front() {
                due.push(tone);
            }
        }
    }

    fn next_deadline(&self, interval_ms: u64) -> u64 {
        self.pending
            .front()
            .map(|tone| tone.at_ms)
            .unwrap_or(self.cycle_start_ms + interval_ms)
    }
}

/// Owns one alarm session and plays its pattern through a [`ToneOutput`].
///
/// The controller never spawns timers of its own. A driver calls [`poll`]
/// whenever time may have advanced (ideally at [`next_deadline`]); every
/// emission that has come due is fired from inside `poll`. Since emissions
/// only happen there, [`stop`] dropping the pending schedule is enough to
/// guarantee nothing queued sounds afterwards.
///
/// [`poll`]: AlarmController::poll
/// [`next_deadline`]: AlarmController::next_deadline
/// [`stop`]: AlarmController::stop
pub struct AlarmController {
    output: Box<dyn ToneOutput>,
    clock: Arc<dyn Clock>,
    repeat_interval_ms: u64,
    envelope: Envelope,
    session: AlarmSession,
    driver: Option<CycleDriver>,
    resume_on_unmute: bool,
    output_warned: bool,
    snapshots: watch::Sender<AlarmSession>,
    logger: LogManager,
    metrics: Arc<MetricsRecorder>,
}

impl AlarmController {
    pub fn new(config: &AlarmConfig, output: Box<dyn ToneOutput>, clock: Arc<dyn Clock>) -> Self {
        let session = AlarmSession {
            active: false,
            profile: None,
            volume: clamp_volume(config.initial_volume),
            muted: false,
        };
        let (snapshots, _) = watch::channel(session.clone());
        Self {
            output,
            clock,
            repeat_interval_ms: config.repeat_interval_ms.max(1),
            envelope: Envelope::default(),
            session,
            driver: None,
            resume_on_unmute: false,
            output_warned: false,
            snapshots,
            logger: LogManager::new("alarm"),
            metrics: Arc::new(MetricsRecorder::new()),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsRecorder>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Starts sounding `profile`, replacing whatever was sounding before.
    pub fn start(&mut self, profile: AlarmProfile) {
        if let Err(err) = profile.validate() {
            self.logger.degraded(&format!("ignoring start: {}", err));
            return;
        }

        if self.cancel_schedule() {
            if let Some(previous) = self.session.profile {
                self.logger
                    .record(&format!("replacing {} with {}", previous.id, profile.id));
            }
        }
        self.session.profile = Some(profile);

        if self.session.muted {
            self.resume_on_unmute = true;
            self.session.active = false;
            self.logger
                .record(&format!("{} queued until unmuted", profile.id));
            self.publish();
            return;
        }

        self.session.active = true;
        self.driver = Some(CycleDriver::new(profile, self.clock.now_ms()));
        self.metrics.record_cycle();
        self.logger.record(&format!(
            "started {} ({} Hz, {:?})",
            profile.id, profile.frequency_hz, profile.pattern
        ));
        self.publish();
        self.poll();
    }

    pub fn start_category(&mut self, category: AlarmCategory) -> AlarmProfile {
        let profile = AlarmProfile::for_category(category);
        self.start(profile);
        profile
    }

    /// Silences output and drops every pending emission. Idempotent.
    pub fn stop(&mut self) {
        let had_schedule = self.cancel_schedule();
        let changed = had_schedule
            || self.session.active
            || self.session.profile.is_some()
            || self.resume_on_unmute;
        if !changed {
            return;
        }
        self.session.active = false;
        self.session.profile = None;
        self.resume_on_unmute = false;
        self.logger.record("stopped");
        self.publish();
    }

    /// Clamps into `[0, 1]`; tones already emitted keep their volume.
    pub fn set_volume(&mut self, volume: f32) {
        self.session.volume = clamp_volume(volume);
        self.publish();
    }

    /// Returns the new mute state.
    pub fn toggle_mute(&mut self) -> bool {
        if self.session.muted {
            self.session.muted = false;
            let resume = std::mem::take(&mut self.resume_on_unmute);
            self.logger.record("unmuted");
            match (resume, self.session.profile) {
                (true, Some(profile)) => self.start(profile),
                _ => self.publish(),
            }
        } else {
            self.resume_on_unmute = self.session.active;
            self.cancel_schedule();
            self.session.active = false;
            self.session.muted = true;
            self.logger.record("muted");
            self.publish();
        }
        self.session.muted
    }

    /// Fires every emission due by now. Returns how many tones were emitted.
    pub fn poll(&mut self) -> usize {
        let now = self.clock.now_ms();
        let interval = self.repeat_interval_ms;
        let mut due = Vec::new();

        let Some(driver) = self.driver.as_mut() else {
            return 0;
        };
        let rolled = driver.roll(now, interval);
        driver.drain_due(now, &mut due);

        if let Some(stale) = rolled {
            self.metrics.record_cycle();
            if stale > 0 {
                self.logger
                    .detail(&format!("dropped {} late emissions", stale));
            }
        }

        let emitted = due.len();
        for scheduled in due {
            self.emit(&scheduled);
        }
        emitted
    }

    /// Time of the next emission or cycle boundary, if anything is scheduled.
    pub fn next_deadline(&self) -> Option<u64> {
        self.driver
            .as_ref()
            .map(|driver| driver.next_deadline(self.repeat_interval_ms))
    }

    pub fn session(&self) -> AlarmSession {
        self.session.clone()
    }

    pub fn is_active(&self) -> bool {
        self.session.active
    }

    pub fn subscribe(&self) -> watch::Receiver<AlarmSession> {
        self.snapshots.subscribe()
    }

    pub fn metrics(&self) -> Arc<MetricsRecorder> {
        self.metrics.clone()
    }

    fn emit(&mut self, scheduled: &ScheduledTone) {
        if !self.output.is_available() {
            if !self.output_warned {
                self.logger
                    .degraded("no audio output available; alarm is silent");
                self.output_warned = true;
            }
            return;
        }
        let tone = Tone {
            frequency_hz: scheduled.frequency_hz,
            duration_ms: scheduled.duration_ms,
            volume: self.session.volume,
            envelope: self.envelope,
        };
        self.output.emit(&tone);
        self.metrics.record_tone();
        self.logger.detail(&format!(
            "tone {:.0} Hz for {} ms at +{} ms",
            tone.frequency_hz, tone.duration_ms, scheduled.offset_ms
        ));
    }

    fn cancel_schedule(&mut self) -> bool {
        if self.driver.take().is_some() {
            self.output.silence();
            true
        } else {
            false
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.session.clone());
    }
}

impl Drop for AlarmController {
    fn drop(&mut self) {
        self.cancel_schedule();
    }
}
