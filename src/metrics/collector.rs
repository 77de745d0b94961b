//! Metrics collection and registry.

use crate::sandbox::Simulation;
use prometheus::{Encoder, Gauge, GaugeVec, IntCounter, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// Per-camera view at snapshot time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CameraSnapshot {
    pub name: String,
    /// Targets inside the detection volume.
    pub tracked_targets: usize,
    /// Level of the most-detected target, 0 when nothing is tracked.
    pub max_detection_level: f32,
    pub feed_enabled: bool,
    pub frames_rendered: u64,
}

/// A snapshot of scene state for metrics update.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    /// Simulation ticks run.
    pub ticks: u64,
    /// Simulated seconds.
    pub elapsed_seconds: f64,
    /// Detection notifications raised so far.
    pub detections: u64,
    /// All-clear notifications raised so far.
    pub all_clears: u64,
    /// Automatic console switches so far.
    pub autoswitches: u64,
    pub cameras: Vec<CameraSnapshot>,
}

/// Prometheus metrics registry for camera monitoring.
pub struct MetricsRegistry {
    registry: Registry,

    // Simulation
    ticks_total: IntCounter,
    elapsed_seconds: Gauge,

    // Notifications
    detections_total: IntCounter,
    all_clears_total: IntCounter,
    autoswitches_total: IntCounter,

    // Per camera
    feeds_enabled: IntGauge,
    tracked_targets: IntGaugeVec,
    detection_level: GaugeVec,
    frames_rendered: IntGaugeVec,
}

impl MetricsRegistry {
    /// Creates a new metrics registry with all camera metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let ticks_total = IntCounter::new(
            "security_camera_ticks_total",
            "Total number of simulation ticks run",
        )?;
        let elapsed_seconds = Gauge::new(
            "security_camera_elapsed_seconds",
            "Simulated time in seconds",
        )?;

        let detections_total = IntCounter::new(
            "security_camera_detections_total",
            "Total number of target detected notifications",
        )?;
        let all_clears_total = IntCounter::new(
            "security_camera_all_clear_total",
            "Total number of all clear notifications",
        )?;
        let autoswitches_total = IntCounter::new(
            "security_camera_console_autoswitches_total",
            "Total number of automatic console camera switches",
        )?;

        let feeds_enabled = IntGauge::new(
            "security_camera_feeds_enabled",
            "Number of cameras whose feed is being rendered",
        )?;
        let tracked_targets = IntGaugeVec::new(
            Opts::new(
                "security_camera_tracked_targets",
                "Targets inside the camera detection volume",
            ),
            &["camera"],
        )?;
        let detection_level = GaugeVec::new(
            Opts::new(
                "security_camera_max_detection_level",
                "Detection level of the most-detected target (0..1)",
            ),
            &["camera"],
        )?;
        let frames_rendered = IntGaugeVec::new(
            Opts::new(
                "security_camera_frames_rendered",
                "Feed frames rendered for the camera",
            ),
            &["camera"],
        )?;

        registry.register(Box::new(ticks_total.clone()))?;
        registry.register(Box::new(elapsed_seconds.clone()))?;
        registry.register(Box::new(detections_total.clone()))?;
        registry.register(Box::new(all_clears_total.clone()))?;
        registry.register(Box::new(autoswitches_total.clone()))?;
        registry.register(Box::new(feeds_enabled.clone()))?;
        registry.register(Box::new(tracked_targets.clone()))?;
        registry.register(Box::new(detection_level.clone()))?;
        registry.register(Box::new(frames_rendered.clone()))?;

        Ok(Self {
            registry,
            ticks_total,
            elapsed_seconds,
            detections_total,
            all_clears_total,
            autoswitches_total,
            feeds_enabled,
            tracked_targets,
            detection_level,
            frames_rendered,
        })
    }

    /// Updates all metrics from a snapshot of scene state.
    pub fn update(&self, snapshot: &MetricsSnapshot) {
        // Counters only move forward by the difference
        advance(&self.ticks_total, snapshot.ticks);
        advance(&self.detections_total, snapshot.detections);
        advance(&self.all_clears_total, snapshot.all_clears);
        advance(&self.autoswitches_total, snapshot.autoswitches);

        self.elapsed_seconds.set(snapshot.elapsed_seconds);

        let enabled = snapshot.cameras.iter().filter(|c| c.feed_enabled).count();
        self.feeds_enabled.set(enabled as i64);

        for camera in &snapshot.cameras {
            let labels = [camera.name.as_str()];
            self.tracked_targets
                .with_label_values(&labels)
                .set(camera.tracked_targets as i64);
            self.detection_level
                .with_label_values(&labels)
                .set(f64::from(camera.max_detection_level));
            self.frames_rendered
                .with_label_values(&labels)
                .set(camera.frames_rendered as i64);
        }
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn advance(counter: &IntCounter, total: u64) {
    let current = counter.get();
    if total > current {
        counter.inc_by(total - current);
    }
}

impl MetricsSnapshot {
    /// Creates a snapshot from the current state of a simulation.
    pub fn from_simulation(simulation: &Simulation) -> Self {
        let cameras = simulation
            .scene()
            .cameras()
            .iter()
            .map(|camera| CameraSnapshot {
                name: camera.display_name().to_string(),
                tracked_targets: camera.tracker().targets().len(),
                max_detection_level: camera
                    .currently_detected()
                    .map_or(0.0, |t| t.detection_level),
                feed_enabled: camera.feed_enabled(),
                frames_rendered: simulation.frames_rendered(camera.id()),
            })
            .collect();

        Self {
            ticks: simulation.ticks(),
            elapsed_seconds: f64::from(simulation.elapsed()),
            detections: simulation.notifications().total_detections(),
            all_clears: simulation.notifications().total_all_clears(),
            autoswitches: simulation.autoswitches(),
            cameras,
        }
    }
}
